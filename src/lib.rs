//! Enigma rotor cipher machine simulator.
//!
//! Simulates a historical rotor machine: a stack of permuting rotors, a
//! ratchet stepping mechanism with the double-step anomaly, and a
//! plugboard, composed into one symmetric encrypt/decrypt transform over a
//! configurable alphabet.
//!
//! # Architecture
//!
//! ```text
//! Alphabet     (symbols ↔ dense indices)
//!     ↓ shared read-only
//! Permutation  (cycle notation, forward + inverse tables)
//!     ↓ wiring
//! RotorSpec    (Reflector | Fixed | Moving{notches}) held in a RotorRegistry
//!     ↓ fresh working copy per machine
//! Rotor        (setting + ring setting)
//!     ↓ slots
//! Machine      (step → plugboard → rotors → reflector → rotors → plugboard)
//!     ↓
//! Session      (settings lines + message lines, five-letter groups)
//! ```
//!
//! # Examples
//!
//! Encrypt with reflector B and rotors I, II, III at `AAA`, then decrypt:
//!
//! ```
//! use enigma::MachineConfig;
//!
//! let config = MachineConfig::parse(
//!     "ABCDEFGHIJKLMNOPQRSTUVWXYZ\n\
//!      4 3\n\
//!      I MQ (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)\n\
//!      II ME (FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)\n\
//!      III MV (ABDHPEJT) (CFLVMZOYQIRWUKXSG)\n\
//!      B R (AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ) (VW)\n",
//! )
//! .unwrap();
//!
//! let mut machine = config.build_machine().unwrap();
//! machine.insert_rotors("B I II III").unwrap();
//! machine.set_rotors("AAA", None).unwrap();
//! let cipher = machine.convert_message("HELLO WORLD").unwrap();
//!
//! machine.set_rotors("AAA", None).unwrap();
//! assert_eq!(machine.convert_message(&cipher).unwrap(), "HELLOWORLD");
//! ```

#![deny(clippy::all)]

pub mod error;

mod alphabet;
mod config;
mod machine;
mod permutation;
mod rotor;
mod session;

pub use alphabet::{Alphabet, UPPER};
pub use config::MachineConfig;
pub use error::{EnigmaError, EnigmaResult};
pub use machine::Machine;
pub use permutation::Permutation;
pub use rotor::{Rotor, RotorKind, RotorRegistry, RotorSpec};
pub use session::{group, Session, SettingsLine};
