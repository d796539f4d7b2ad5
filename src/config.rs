//! Machine description parser.
//!
//! A description names the alphabet, the slot and pawl counts, and the
//! available rotor types:
//!
//! ```text
//! ABCDEFGHIJKLMNOPQRSTUVWXYZ
//! 5 3
//! I     MQ (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
//! Beta  N  (ALBEVFCYODJWUGNMQTZSKPR) (HIX)
//! B     R  (AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ)
//!          (VW)
//! ```
//!
//! The first line is the alphabet. Everything after it is read as
//! whitespace-separated tokens, so a rotor's cycles may continue on the
//! following lines.

use std::iter::Peekable;
use std::sync::Arc;

use tracing::debug;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, EnigmaResult};
use crate::machine::Machine;
use crate::permutation::Permutation;
use crate::rotor::{RotorRegistry, RotorSpec};

/// A parsed machine description, ready to build machines from.
///
/// Machines built from the same config share the alphabet and rotor specs
/// but never rotor state.
#[derive(Debug, Clone)]
pub struct MachineConfig {
    alphabet: Arc<Alphabet>,
    num_rotors: usize,
    num_pawls: usize,
    registry: Arc<RotorRegistry>,
}

impl MachineConfig {
    /// Parses a machine description.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] if the description is truncated,
    /// a count is not a number, a rotor type code is not `M<notches>`, `N`
    /// or `R`, a rotor name repeats, or an alphabet or cycle string is
    /// malformed.
    pub fn parse(text: &str) -> EnigmaResult<Self> {
        let mut lines = text.lines();
        let alphabet_line = lines
            .by_ref()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .ok_or_else(|| EnigmaError::config("configuration is empty"))?;
        let alphabet = Arc::new(Alphabet::new(alphabet_line)?);

        let mut tokens = lines.flat_map(str::split_whitespace).peekable();
        let num_rotors = parse_count(tokens.next(), "rotor slot count")?;
        let num_pawls = parse_count(tokens.next(), "pawl count")?;

        let mut registry = RotorRegistry::new();
        while let Some(name) = tokens.next() {
            let spec = parse_rotor(name, &mut tokens, &alphabet)?;
            if registry.contains_key(name) {
                return Err(EnigmaError::config(format!(
                    "rotor {} is described more than once",
                    name
                )));
            }
            registry.insert(name.to_string(), Arc::new(spec));
        }

        debug!(
            alphabet = %alphabet,
            num_rotors,
            num_pawls,
            rotor_types = registry.len(),
            "machine description parsed"
        );

        Ok(MachineConfig {
            alphabet,
            num_rotors,
            num_pawls,
            registry: Arc::new(registry),
        })
    }

    /// Builds a fresh machine with empty slots and no plugboard.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] if the slot and pawl counts are
    /// inconsistent, or if there are more slots than rotor types.
    pub fn build_machine(&self) -> EnigmaResult<Machine> {
        Machine::new(
            self.alphabet.clone(),
            self.num_rotors,
            self.num_pawls,
            self.registry.clone(),
        )
    }

    /// Alphabet named on the first line.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Number of rotor slots.
    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    /// Number of pawls, and thus of moving rotors.
    pub fn num_pawls(&self) -> usize {
        self.num_pawls
    }

    /// Rotor types by name.
    pub fn registry(&self) -> &Arc<RotorRegistry> {
        &self.registry
    }
}

/// Returns true iff `token` is one or more whole cycles, e.g. `(AB)(CD)`.
pub(crate) fn is_cycle_token(token: &str) -> bool {
    token.starts_with('(') && token.ends_with(')')
}

fn parse_count(token: Option<&str>, what: &str) -> EnigmaResult<usize> {
    let token = token
        .ok_or_else(|| EnigmaError::config(format!("configuration truncated: missing {}", what)))?;
    token
        .parse()
        .map_err(|_| EnigmaError::config(format!("invalid {} {:?}", what, token)))
}

fn parse_rotor<'a, I>(
    name: &str,
    tokens: &mut Peekable<I>,
    alphabet: &Arc<Alphabet>,
) -> EnigmaResult<RotorSpec>
where
    I: Iterator<Item = &'a str>,
{
    if name.starts_with('(') {
        return Err(EnigmaError::config(format!(
            "malformed cycles or missing rotor name at {:?}",
            name
        )));
    }
    let code = tokens.next().ok_or_else(|| {
        EnigmaError::config(format!("configuration truncated: rotor {} has no type", name))
    })?;

    let mut cycles = String::new();
    while let Some(token) = tokens.next_if(|token| is_cycle_token(token)) {
        cycles.push_str(token);
        cycles.push(' ');
    }
    let permutation = Permutation::new(&cycles, alphabet.clone())?;

    let mut code_chars = code.chars();
    match (code_chars.next(), code_chars.as_str()) {
        (Some('M'), notches) => RotorSpec::moving(name, permutation, notches),
        (Some('N'), "") => Ok(RotorSpec::fixed(name, permutation)),
        (Some('R'), "") => RotorSpec::reflector(name, permutation),
        _ => Err(EnigmaError::config(format!(
            "rotor {} has unknown type {:?}",
            name, code
        ))),
    }
}
