//! Rotors: wired permutations with a rotating offset.
//!
//! The wiring and kind of a rotor type live in an immutable [`RotorSpec`],
//! shared through a [`RotorRegistry`]. A [`Rotor`] is one machine's
//! working copy of a spec: it adds the mutable `setting` and
//! `ring_setting`, so two machines built from the same registry never
//! share rotor state.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, EnigmaResult};
use crate::permutation::Permutation;

/// Lookup table from rotor name to its immutable description.
pub type RotorRegistry = HashMap<String, Arc<RotorSpec>>;

/// The three rotor behaviors. Only moving rotors carry notches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotorKind {
    /// Non-rotating, sends the signal back through the stack. Slot 0 only.
    Reflector,
    /// Non-rotating rotor in a stationary slot.
    Fixed,
    /// Ratcheted rotor. `notches` are alphabet indices at which the rotor
    /// lets its left neighbor advance.
    Moving { notches: Vec<usize> },
}

/// Immutable description of a named rotor type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotorSpec {
    name: String,
    kind: RotorKind,
    permutation: Permutation,
}

impl RotorSpec {
    /// A reflector named `name` wired by `permutation`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] if `permutation` has a fixed point.
    pub fn reflector(name: impl Into<String>, permutation: Permutation) -> EnigmaResult<Self> {
        let name = name.into();
        if !permutation.derangement() {
            return Err(EnigmaError::config(format!(
                "reflector {} must map every character to a different one",
                name
            )));
        }
        Ok(RotorSpec {
            name,
            kind: RotorKind::Reflector,
            permutation,
        })
    }

    /// A non-moving rotor named `name` wired by `permutation`.
    pub fn fixed(name: impl Into<String>, permutation: Permutation) -> Self {
        RotorSpec {
            name: name.into(),
            kind: RotorKind::Fixed,
            permutation,
        }
    }

    /// A moving rotor named `name` wired by `permutation` whose notches are
    /// the symbols of `notches`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] if a notch symbol is not in the
    /// permutation's alphabet.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Permutation, Rotor, RotorSpec};
    ///
    /// let alpha = Arc::new(Alphabet::default());
    /// let perm = Permutation::new("(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ)", alpha).unwrap();
    /// let spec = Arc::new(RotorSpec::moving("I", perm, "Q").unwrap());
    ///
    /// let mut rotor = Rotor::new(spec);
    /// rotor.set_char('Q').unwrap();
    /// assert!(rotor.at_notch());
    /// ```
    pub fn moving(
        name: impl Into<String>,
        permutation: Permutation,
        notches: &str,
    ) -> EnigmaResult<Self> {
        let name = name.into();
        let alphabet = permutation.alphabet();
        let mut indices = Vec::new();
        for ch in notches.chars() {
            let index = alphabet.to_index(ch).map_err(|_| {
                EnigmaError::config(format!(
                    "notch '{}' of rotor {} is not in the alphabet",
                    ch, name
                ))
            })?;
            if !indices.contains(&index) {
                indices.push(index);
            }
        }
        Ok(RotorSpec {
            name,
            kind: RotorKind::Moving { notches: indices },
            permutation,
        })
    }

    /// Rotor type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reflector, fixed or moving, with the notches of a moving rotor.
    pub fn kind(&self) -> &RotorKind {
        &self.kind
    }

    /// Wiring at position 0.
    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    /// True for moving rotors.
    pub fn rotates(&self) -> bool {
        matches!(self.kind, RotorKind::Moving { .. })
    }

    /// True for reflectors.
    pub fn reflecting(&self) -> bool {
        matches!(self.kind, RotorKind::Reflector)
    }
}

/// A rotor mounted in a machine: a spec plus its current offsets.
///
/// `setting` and `ring_setting` are always in `0..size()`.
#[derive(Debug, Clone)]
pub struct Rotor {
    spec: Arc<RotorSpec>,
    setting: usize,
    ring_setting: usize,
}

impl Rotor {
    /// A rotor of type `spec` at setting 0 and ring setting 0.
    pub fn new(spec: Arc<RotorSpec>) -> Self {
        Rotor {
            spec,
            setting: 0,
            ring_setting: 0,
        }
    }

    /// The immutable description this rotor was built from.
    pub fn spec(&self) -> &Arc<RotorSpec> {
        &self.spec
    }

    /// Rotor type name.
    pub fn name(&self) -> &str {
        self.spec.name()
    }

    /// Alphabet of the wiring.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        self.spec.permutation().alphabet()
    }

    /// Wiring at position 0.
    pub fn permutation(&self) -> &Permutation {
        self.spec.permutation()
    }

    /// Size of the alphabet.
    pub fn size(&self) -> usize {
        self.permutation().size()
    }

    /// True for moving rotors.
    pub fn rotates(&self) -> bool {
        self.spec.rotates()
    }

    /// True for reflectors.
    pub fn reflecting(&self) -> bool {
        self.spec.reflecting()
    }

    /// Current rotational offset.
    pub fn setting(&self) -> usize {
        self.setting
    }

    /// Ring offset.
    pub fn ring_setting(&self) -> usize {
        self.ring_setting
    }

    /// Sets `setting()` to `posn`, modulo `size()`.
    pub fn set(&mut self, posn: usize) {
        self.setting = posn % self.size();
    }

    /// Sets `setting()` to the index of `cposn`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Alphabet`] if `cposn` is not in the alphabet.
    pub fn set_char(&mut self, cposn: char) -> EnigmaResult<()> {
        let posn = self.index_of(cposn)?;
        self.set(posn);
        Ok(())
    }

    /// Sets `ring_setting()` to `posn`, modulo `size()`.
    pub fn set_ring(&mut self, posn: usize) {
        self.ring_setting = posn % self.size();
    }

    /// Sets `ring_setting()` to the index of `cposn`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Alphabet`] if `cposn` is not in the alphabet.
    pub fn set_ring_char(&mut self, cposn: char) -> EnigmaResult<()> {
        let posn = self.index_of(cposn)?;
        self.set_ring(posn);
        Ok(())
    }

    fn index_of(&self, ch: char) -> EnigmaResult<usize> {
        self.alphabet()
            .to_index(ch)
            .map_err(|_| EnigmaError::Alphabet(ch))
    }

    /// Position shown through the machine window: the setting measured
    /// on the alphabet ring.
    pub fn window_position(&self) -> usize {
        self.permutation()
            .wrap(self.setting as isize + self.ring_setting as isize)
    }

    /// True iff the rotor lets its left neighbor advance on the next step.
    pub fn at_notch(&self) -> bool {
        match self.spec.kind() {
            RotorKind::Moving { notches } => notches.contains(&self.window_position()),
            RotorKind::Reflector | RotorKind::Fixed => false,
        }
    }

    /// Advances one position. No-op unless the rotor moves.
    pub fn advance(&mut self) {
        match self.spec.kind() {
            RotorKind::Moving { .. } => self.set(self.setting + 1),
            RotorKind::Reflector | RotorKind::Fixed => {}
        }
    }

    /// Converts contact `p` entering from the right through the wiring at
    /// the current setting.
    pub fn convert_forward(&self, p: usize) -> usize {
        let setting = self.setting as isize;
        let contact = self.permutation().permute(p as isize + setting);
        self.permutation().wrap(contact as isize - setting)
    }

    /// Converts contact `e` entering from the left through the inverse of
    /// the wiring at the current setting.
    pub fn convert_backward(&self, e: usize) -> usize {
        let setting = self.setting as isize;
        let contact = self.permutation().invert(e as isize + setting);
        self.permutation().wrap(contact as isize - setting)
    }
}

impl fmt::Display for Rotor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.spec.kind() {
            RotorKind::Reflector => write!(f, "Reflector {}", self.name()),
            RotorKind::Fixed => write!(f, "Fixed Rotor {}", self.name()),
            RotorKind::Moving { .. } => write!(f, "Moving Rotor {}", self.name()),
        }
    }
}
