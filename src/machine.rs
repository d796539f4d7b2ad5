//! Machine: rotor slots, pawls and plugboard composed into one cipher.
//!
//! A keystroke first steps the rotors, then threads the signal through
//! plugboard → rotors right to left → reflector → rotors left to right →
//! plugboard. The transform is its own inverse for any fixed starting
//! configuration.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, EnigmaResult};
use crate::permutation::Permutation;
use crate::rotor::{Rotor, RotorRegistry};

/// A complete rotor machine.
///
/// # Architecture
///
/// ```text
///  slot:   0          1 .. k-1         k .. n-1
///        reflector   fixed rotors    moving rotors (num_pawls of them)
/// ```
///
/// Slot 0 always holds the only reflector and the moving rotors form a
/// contiguous suffix of length `num_pawls`. Each machine owns its rotor
/// state; the registry only provides the immutable rotor descriptions.
#[derive(Debug, Clone)]
pub struct Machine {
    alphabet: Arc<Alphabet>,
    num_rotors: usize,
    num_pawls: usize,
    registry: Arc<RotorRegistry>,
    rotors: Vec<Rotor>,
    plugboard: Permutation,
}

impl Machine {
    /// Creates a machine over `alphabet` with `num_rotors` slots and
    /// `num_pawls` pawls, drawing rotors from `registry`.
    ///
    /// The slots start empty and the plugboard is the identity. Call
    /// [`insert_rotors`](Self::insert_rotors) and
    /// [`set_rotors`](Self::set_rotors) before converting.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] unless `1 < num_rotors` and
    /// `num_pawls < num_rotors`, or if `registry` holds fewer rotor types
    /// than there are slots.
    pub fn new(
        alphabet: Arc<Alphabet>,
        num_rotors: usize,
        num_pawls: usize,
        registry: Arc<RotorRegistry>,
    ) -> EnigmaResult<Self> {
        if num_rotors < 2 {
            return Err(EnigmaError::config(format!(
                "machine needs at least 2 rotor slots, got {}",
                num_rotors
            )));
        }
        if num_pawls >= num_rotors {
            return Err(EnigmaError::config(format!(
                "pawl count {} must be less than slot count {}",
                num_pawls, num_rotors
            )));
        }
        if num_rotors > registry.len() {
            return Err(EnigmaError::config(format!(
                "{} rotor slots cannot be filled from {} rotor types",
                num_rotors,
                registry.len()
            )));
        }
        let plugboard = Permutation::identity(alphabet.clone());
        Ok(Machine {
            alphabet,
            num_rotors,
            num_pawls,
            registry,
            rotors: Vec::new(),
            plugboard,
        })
    }

    /// Returns the number of rotor slots.
    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    /// Returns the number of pawls, and thus of moving rotors.
    pub fn num_pawls(&self) -> usize {
        self.num_pawls
    }

    /// Alphabet shared by every rotor and the plugboard.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns the rotors in slot order, reflector first. Empty until
    /// rotors have been inserted.
    pub fn rotors(&self) -> &[Rotor] {
        &self.rotors
    }

    /// The current plugboard. The identity until one is set.
    pub fn plugboard(&self) -> &Permutation {
        &self.plugboard
    }

    // ──────── Configuration ────────

    /// Fills the slots with fresh rotors named by `names` (whitespace
    /// separated, reflector first). Every rotor starts at setting 0 and
    /// ring setting 0.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] if the name count differs from
    /// `num_rotors()`, a name is unknown or repeated, slot 0 is not a
    /// reflector, a reflector appears elsewhere, a stationary rotor follows
    /// a moving one, or the number of moving rotors differs from
    /// `num_pawls()`. The slots are left unchanged on error.
    pub fn insert_rotors(&mut self, names: &str) -> EnigmaResult<()> {
        let names: Vec<&str> = names.split_whitespace().collect();
        if names.len() != self.num_rotors {
            return Err(EnigmaError::config(format!(
                "expected {} rotors, got {}",
                self.num_rotors,
                names.len()
            )));
        }

        let mut seen = HashSet::new();
        let mut moving_added = false;
        let mut pawls_added = 0;
        let mut rotors = Vec::with_capacity(self.num_rotors);

        for (i, &name) in names.iter().enumerate() {
            let spec = self
                .registry
                .get(name)
                .ok_or_else(|| EnigmaError::config(format!("unknown rotor {}", name)))?;
            if !seen.insert(name) {
                return Err(EnigmaError::config(format!(
                    "rotor {} cannot occupy more than one slot",
                    name
                )));
            }
            if spec.permutation().alphabet() != &self.alphabet {
                return Err(EnigmaError::config(format!(
                    "rotor {} is wired over a different alphabet",
                    name
                )));
            }
            if i == 0 && !spec.reflecting() {
                return Err(EnigmaError::config("first rotor must be a reflector"));
            }
            if i > 0 && spec.reflecting() {
                return Err(EnigmaError::config(format!(
                    "reflector {} may only occupy the first slot",
                    name
                )));
            }
            if spec.rotates() {
                moving_added = true;
                pawls_added += 1;
            } else if moving_added {
                return Err(EnigmaError::config(format!(
                    "stationary rotor {} placed after a moving rotor",
                    name
                )));
            }
            rotors.push(Rotor::new(spec.clone()));
        }

        if pawls_added != self.num_pawls {
            return Err(EnigmaError::config(format!(
                "machine has {} pawls but {} moving rotors were inserted",
                self.num_pawls, pawls_added
            )));
        }

        debug!(rotors = ?names, "inserted rotors");
        self.rotors = rotors;
        Ok(())
    }

    /// Sets the positions of the non-reflector rotors from `setting`, one
    /// character per slot starting at slot 1, and their ring offsets from
    /// `ring` when given.
    ///
    /// The ring offset is applied first and then subtracted from the
    /// position, which re-anchors the wiring core against the alphabet ring.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] if no rotors are inserted, if either
    /// string does not have `num_rotors() - 1` characters, or if a character
    /// is not in the alphabet. No rotor is changed on error.
    pub fn set_rotors(&mut self, setting: &str, ring: Option<&str>) -> EnigmaResult<()> {
        self.ensure_loaded()?;
        let positions = self.setting_indices(setting, "initial position")?;
        let rings = match ring {
            Some(ring) => Some(self.setting_indices(ring, "ring setting")?),
            None => None,
        };

        for (i, &posn) in positions.iter().enumerate() {
            let rotor = &mut self.rotors[i + 1];
            if let Some(rings) = &rings {
                rotor.set_ring(rings[i]);
            }
            rotor.set(posn);
            let anchored = rotor
                .permutation()
                .wrap(rotor.setting() as isize - rotor.ring_setting() as isize);
            rotor.set(anchored);
        }

        debug!(setting, ?ring, "rotor settings applied");
        Ok(())
    }

    fn setting_indices(&self, text: &str, what: &str) -> EnigmaResult<Vec<usize>> {
        let expected = self.num_rotors - 1;
        let indices = text
            .chars()
            .map(|ch| {
                self.alphabet.to_index(ch).map_err(|_| {
                    EnigmaError::config(format!(
                        "{} '{}' is not in the alphabet",
                        what, ch
                    ))
                })
            })
            .collect::<EnigmaResult<Vec<_>>>()?;
        if indices.len() != expected {
            return Err(EnigmaError::config(format!(
                "{} {:?} must have {} characters",
                what, text, expected
            )));
        }
        Ok(indices)
    }

    /// Replaces the plugboard.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] if `plugboard` is over a different
    /// alphabet or is not made only of swapped pairs.
    pub fn set_plugboard(&mut self, plugboard: Permutation) -> EnigmaResult<()> {
        if plugboard.alphabet() != &self.alphabet {
            return Err(EnigmaError::config(
                "plugboard is over a different alphabet",
            ));
        }
        if !plugboard.is_involution() {
            return Err(EnigmaError::config(
                "plugboard cycles must contain exactly two characters",
            ));
        }
        debug!(plugboard = %plugboard, "plugboard replaced");
        self.plugboard = plugboard;
        Ok(())
    }

    fn ensure_loaded(&self) -> EnigmaResult<()> {
        if self.rotors.len() != self.num_rotors {
            return Err(EnigmaError::config("no rotors have been inserted"));
        }
        Ok(())
    }

    /// Returns the symbols visible in the window of every non-reflector
    /// rotor, left to right.
    pub fn window(&self) -> String {
        self.rotors
            .iter()
            .skip(1)
            .map(|rotor| self.alphabet.symbol(rotor.window_position()))
            .collect()
    }

    // ──────── Signal path ────────

    /// Advances the ratcheted rotors for one keystroke.
    ///
    /// The rightmost rotor always moves. A rotor moves when its right
    /// neighbor sits at a notch, and then also carries its right neighbor
    /// unless the rotor two slots to the right is itself at a notch.
    fn step(&mut self) {
        let n = self.num_rotors;
        for i in (n - self.num_pawls)..n {
            if i == n - 1 || self.rotors[i + 1].at_notch() {
                self.rotors[i].advance();
                if i + 2 < n && !self.rotors[i + 2].at_notch() {
                    self.rotors[i + 1].advance();
                }
            }
        }
        trace!(window = %self.window(), "stepped");
    }

    /// Converts the symbol at index `c`, after first advancing the machine.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] if no rotors are inserted and
    /// [`EnigmaError::Lookup`] if `c` is not below the alphabet size.
    pub fn convert(&mut self, c: usize) -> EnigmaResult<usize> {
        self.ensure_loaded()?;
        if c >= self.alphabet.size() {
            return Err(EnigmaError::Lookup(format!(
                "index {} out of range 0..{}",
                c,
                self.alphabet.size()
            )));
        }
        self.step();

        let mut c = self.plugboard.permute(c as isize);
        for rotor in self.rotors.iter().rev() {
            c = rotor.convert_forward(c);
        }
        for rotor in self.rotors.iter().skip(1) {
            c = rotor.convert_backward(c);
        }
        Ok(self.plugboard.permute(c as isize))
    }

    /// Converts a single symbol.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Alphabet`] if `ch` is not in the alphabet.
    pub fn convert_char(&mut self, ch: char) -> EnigmaResult<char> {
        let index = self
            .alphabet
            .to_index(ch)
            .map_err(|_| EnigmaError::Alphabet(ch))?;
        let out = self.convert(index)?;
        Ok(self.alphabet.symbol(out))
    }

    /// Converts `msg`, skipping whitespace. Rotors advance once per
    /// converted symbol.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Alphabet`] for the first non-whitespace
    /// character outside the alphabet. The whole message is checked before
    /// any rotor moves, so a failing message leaves the machine unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::MachineConfig;
    ///
    /// let config = MachineConfig::parse(
    ///     "ABCDEFGHIJKLMNOPQRSTUVWXYZ\n\
    ///      4 3\n\
    ///      I MQ (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)\n\
    ///      II ME (FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)\n\
    ///      III MV (ABDHPEJT) (CFLVMZOYQIRWUKXSG)\n\
    ///      B R (AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ) (VW)\n",
    /// )
    /// .unwrap();
    ///
    /// let mut machine = config.build_machine().unwrap();
    /// machine.insert_rotors("B I II III").unwrap();
    /// machine.set_rotors("AAA", None).unwrap();
    /// assert_eq!(machine.convert_message("AAAAA").unwrap(), "BDZGO");
    /// ```
    pub fn convert_message(&mut self, msg: &str) -> EnigmaResult<String> {
        if let Some(bad) = msg
            .chars()
            .find(|&ch| !ch.is_whitespace() && !self.alphabet.contains(ch))
        {
            return Err(EnigmaError::Alphabet(bad));
        }
        self.ensure_loaded()?;
        msg.chars()
            .filter(|ch| !ch.is_whitespace())
            .map(|ch| self.convert_char(ch))
            .collect()
    }
}
