//! Permutation: cycle-notation permutations over an alphabet's index space.
//!
//! A permutation is written as disjoint cycles, `(ABC) (DE)`, meaning
//! `A→B→C→A` and `D→E→D`. Symbols absent from every cycle map to
//! themselves. Both directions are precomputed as dense index tables so
//! that per-keystroke application is a single lookup.

use std::fmt;
use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, EnigmaResult};

/// A permutation of `0..alphabet.size()` expressed through disjoint cycles.
///
/// Immutable once parsed. `forward` and `inverse` are exact inverses of
/// each other; only cycles of length two or more are recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    alphabet: Arc<Alphabet>,
    forward: Vec<usize>,
    inverse: Vec<usize>,
    cycles: Vec<Vec<usize>>,
}

impl Permutation {
    /// Parses `cycles` in cycle notation against `alphabet`.
    ///
    /// Whitespace between cycles is ignored. A one-symbol cycle such as
    /// `(C)` is accepted and leaves `C` fixed.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] for an unterminated or empty cycle,
    /// a non-whitespace character outside any cycle, a symbol not in
    /// `alphabet`, or a symbol used more than once.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Permutation};
    ///
    /// let alpha = Arc::new(Alphabet::new("ABCD").unwrap());
    /// let perm = Permutation::new("(AB) (CD)", alpha.clone()).unwrap();
    /// assert_eq!(perm.permute_char('A'), Ok('B'));
    /// assert!(perm.derangement());
    ///
    /// assert!(Permutation::new("(AB", alpha).is_err());
    /// ```
    pub fn new(cycles: &str, alphabet: Arc<Alphabet>) -> EnigmaResult<Self> {
        let size = alphabet.size();
        let mut used = vec![false; size];
        let mut parsed: Vec<Vec<usize>> = Vec::new();

        let mut chars = cycles.chars();
        while let Some(ch) = chars.next() {
            if ch.is_whitespace() {
                continue;
            }
            if ch != '(' {
                return Err(EnigmaError::config(format!(
                    "improper cycle formatting: '{}' outside of parentheses",
                    ch
                )));
            }

            let mut cycle = Vec::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == ')' {
                    closed = true;
                    break;
                }
                let index = alphabet.to_index(c).map_err(|_| {
                    EnigmaError::config(format!(
                        "improper cycle formatting: '{}' not in alphabet",
                        c
                    ))
                })?;
                if used[index] {
                    return Err(EnigmaError::config(format!(
                        "improper cycle formatting: '{}' repeated",
                        c
                    )));
                }
                used[index] = true;
                cycle.push(index);
            }

            if !closed {
                return Err(EnigmaError::config(
                    "improper cycle formatting: unterminated cycle",
                ));
            }
            if cycle.is_empty() {
                return Err(EnigmaError::config(
                    "improper cycle formatting: empty cycle ()",
                ));
            }
            if cycle.len() > 1 {
                parsed.push(cycle);
            }
        }

        let mut forward: Vec<usize> = (0..size).collect();
        let mut inverse = forward.clone();
        for cycle in &parsed {
            for (i, &from) in cycle.iter().enumerate() {
                let to = cycle[(i + 1) % cycle.len()];
                forward[from] = to;
                inverse[to] = from;
            }
        }

        Ok(Permutation {
            alphabet,
            forward,
            inverse,
            cycles: parsed,
        })
    }

    /// The identity permutation over `alphabet`.
    pub fn identity(alphabet: Arc<Alphabet>) -> Self {
        let forward: Vec<usize> = (0..alphabet.size()).collect();
        Permutation {
            alphabet,
            inverse: forward.clone(),
            forward,
            cycles: Vec::new(),
        }
    }

    /// The alphabet this permutation acts on.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Size of the alphabet.
    pub fn size(&self) -> usize {
        self.forward.len()
    }

    /// Reduces `p` into `0..size()` with floored modulo.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Permutation};
    ///
    /// let perm = Permutation::identity(Arc::new(Alphabet::default()));
    /// assert_eq!(perm.wrap(-1), 25);
    /// assert_eq!(perm.wrap(27), 1);
    /// ```
    pub fn wrap(&self, p: isize) -> usize {
        p.rem_euclid(self.size() as isize) as usize
    }

    /// Applies the permutation to index `p`, taken modulo `size()`.
    pub fn permute(&self, p: isize) -> usize {
        self.forward[self.wrap(p)]
    }

    /// Applies the inverse permutation to index `c`, taken modulo `size()`.
    pub fn invert(&self, c: isize) -> usize {
        self.inverse[self.wrap(c)]
    }

    /// Applies the permutation to symbol `p`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Alphabet`] if `p` is not in the alphabet.
    pub fn permute_char(&self, p: char) -> EnigmaResult<char> {
        let index = self
            .alphabet
            .to_index(p)
            .map_err(|_| EnigmaError::Alphabet(p))?;
        Ok(self.alphabet.symbol(self.forward[index]))
    }

    /// Applies the inverse permutation to symbol `c`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Alphabet`] if `c` is not in the alphabet.
    pub fn invert_char(&self, c: char) -> EnigmaResult<char> {
        let index = self
            .alphabet
            .to_index(c)
            .map_err(|_| EnigmaError::Alphabet(c))?;
        Ok(self.alphabet.symbol(self.inverse[index]))
    }

    /// Returns true iff no symbol maps to itself.
    pub fn derangement(&self) -> bool {
        self.forward.iter().enumerate().all(|(i, &j)| i != j)
    }

    /// Returns true iff applying the permutation twice is the identity,
    /// i.e. it consists only of transpositions.
    pub fn is_involution(&self) -> bool {
        self.forward
            .iter()
            .zip(self.inverse.iter())
            .all(|(f, i)| f == i)
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, cycle) in self.cycles.iter().enumerate() {
            if n > 0 {
                write!(f, " ")?;
            }
            write!(f, "(")?;
            for &index in cycle {
                write!(f, "{}", self.alphabet.symbol(index))?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}
