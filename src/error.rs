//! Error types for the Enigma library.

use thiserror::Error;

/// Errors produced by the Enigma library.
///
/// Every error is fatal to the operation that raised it. Configuration
/// calls validate before mutating, so a failed call leaves the machine
/// in its previous state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnigmaError {
    /// Malformed alphabet, cycle text, rotor description, slot assignment,
    /// setting string or plugboard.
    #[error("configuration error: {0}")]
    Config(String),

    /// A symbol outside the configured alphabet was permuted or converted.
    #[error("character '{0}' is not in the alphabet")]
    Alphabet(char),

    /// An index-to-symbol or symbol-to-index query outside the alphabet.
    #[error("lookup error: {0}")]
    Lookup(String),
}

impl EnigmaError {
    /// Shorthand for building a [`EnigmaError::Config`].
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        EnigmaError::Config(msg.into())
    }
}

/// Result alias used throughout the crate.
pub type EnigmaResult<T> = Result<T, EnigmaError>;
