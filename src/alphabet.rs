//! Alphabet: bijection between machine symbols and dense indices.
//!
//! Every permutation, rotor and machine works on indices `0..size()`.
//! The alphabet translates between those indices and the characters
//! that appear in configuration text and messages.

use std::collections::HashMap;
use std::fmt;

use crate::error::{EnigmaError, EnigmaResult};

/// The 26 upper-case Latin letters.
pub const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Characters reserved by the cycle and settings syntax.
const DELIMITERS: [char; 3] = ['(', ')', '*'];

/// An ordered set of distinct symbols indexed from 0.
///
/// Immutable once built. Shared read-only (behind an `Arc`) by every
/// permutation constructed against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    indices: HashMap<char, usize>,
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::build(UPPER.chars().collect())
    }
}

impl Alphabet {
    /// Creates an alphabet whose symbol number `k` is the `k`-th character
    /// of `definition`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] if a character repeats, or if a
    /// character is whitespace or one of `(`, `)`, `*`.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::Alphabet;
    ///
    /// let alpha = Alphabet::new("ABCD").unwrap();
    /// assert_eq!(alpha.size(), 4);
    /// assert!(Alphabet::new("ABCA").is_err());
    /// ```
    pub fn new(definition: &str) -> EnigmaResult<Self> {
        let mut symbols = Vec::with_capacity(definition.len());
        let mut seen = HashMap::new();
        for ch in definition.chars() {
            if ch.is_whitespace() || DELIMITERS.contains(&ch) {
                return Err(EnigmaError::config(format!(
                    "invalid character {:?} in alphabet",
                    ch
                )));
            }
            if seen.insert(ch, symbols.len()).is_some() {
                return Err(EnigmaError::config(format!(
                    "duplicate character '{}' in alphabet",
                    ch
                )));
            }
            symbols.push(ch);
        }
        if symbols.is_empty() {
            return Err(EnigmaError::config("alphabet is empty"));
        }
        Ok(Alphabet {
            symbols,
            indices: seen,
        })
    }

    fn build(symbols: Vec<char>) -> Self {
        let indices = symbols.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Alphabet { symbols, indices }
    }

    /// Returns the number of symbols.
    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true iff `ch` is one of the symbols.
    pub fn contains(&self, ch: char) -> bool {
        self.indices.contains_key(&ch)
    }

    /// Returns symbol number `index`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Lookup`] if `index >= size()`.
    pub fn to_char(&self, index: usize) -> EnigmaResult<char> {
        self.symbols.get(index).copied().ok_or_else(|| {
            EnigmaError::Lookup(format!("index {} out of range 0..{}", index, self.size()))
        })
    }

    /// Returns the index of `ch`. Inverse of [`to_char`](Self::to_char).
    ///
    /// # Errors
    /// Returns [`EnigmaError::Lookup`] if `ch` is not in the alphabet.
    pub fn to_index(&self, ch: char) -> EnigmaResult<usize> {
        self.indices
            .get(&ch)
            .copied()
            .ok_or_else(|| EnigmaError::Lookup(format!("character '{}' not in alphabet", ch)))
    }

    /// Symbol at an index already known to be in range.
    pub(crate) fn symbol(&self, index: usize) -> char {
        self.symbols[index]
    }

    /// Returns the symbols in index order.
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in &self.symbols {
            write!(f, "{}", ch)?;
        }
        Ok(())
    }
}
