//! Session: drives a machine through settings lines and message lines.
//!
//! A settings line starts with `*` and reconfigures the machine:
//!
//! ```text
//! * B Beta III IV I AXLE [BCDE] [(HQ) (EX) (IP) (TR) (BY)]
//!   ^ rotors, reflector first
//!                   ^ positions   ^ ring settings  ^ plugboard
//! ```
//!
//! Every other line is a message, converted with the current settings and
//! returned in groups of five symbols.

use tracing::debug;

use crate::config::is_cycle_token;
use crate::error::{EnigmaError, EnigmaResult};
use crate::machine::Machine;
use crate::permutation::Permutation;

/// Number of symbols per output group.
const GROUP_SIZE: usize = 5;

/// Marker that starts a settings line.
const SETTINGS_MARKER: char = '*';

/// A parsed settings line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsLine {
    /// Rotor names, reflector first.
    pub rotors: Vec<String>,
    /// Initial positions of the non-reflector rotors.
    pub positions: String,
    /// Ring settings, when given.
    pub ring: Option<String>,
    /// Plugboard cycles, when given.
    pub plugboard: Option<String>,
}

impl SettingsLine {
    /// Parses the body of a settings line (the text after `*`) for a
    /// machine with `num_rotors` slots.
    ///
    /// The token after the positions is taken as the ring settings unless
    /// it starts with `(`. All remaining tokens must be cycles.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] if rotor names or positions are
    /// missing, or if a token after the positions is neither the ring
    /// settings nor a cycle.
    pub fn parse(body: &str, num_rotors: usize) -> EnigmaResult<Self> {
        let mut tokens = body.split_whitespace().peekable();

        let rotors: Vec<String> = tokens.by_ref().take(num_rotors).map(String::from).collect();
        if rotors.len() != num_rotors {
            return Err(EnigmaError::config(format!(
                "settings line names {} rotors, machine has {} slots",
                rotors.len(),
                num_rotors
            )));
        }
        let positions = tokens
            .next()
            .ok_or_else(|| EnigmaError::config("settings line has no initial positions"))?
            .to_string();
        let ring = tokens
            .next_if(|token| !token.starts_with('('))
            .map(String::from);

        let mut cycles: Vec<&str> = Vec::new();
        for token in tokens {
            if !is_cycle_token(token) {
                return Err(EnigmaError::config(format!(
                    "unexpected {:?} in settings line",
                    token
                )));
            }
            cycles.push(token);
        }
        let plugboard = if cycles.is_empty() {
            None
        } else {
            Some(cycles.join(" "))
        };

        Ok(SettingsLine {
            rotors,
            positions,
            ring,
            plugboard,
        })
    }
}

/// A machine plus the state of the message stream feeding it.
#[derive(Debug, Clone)]
pub struct Session {
    machine: Machine,
    configured: bool,
}

impl Session {
    /// Starts a session on an unconfigured machine.
    pub fn new(machine: Machine) -> Self {
        Session {
            machine,
            configured: false,
        }
    }

    /// The machine in its current configuration.
    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    /// Processes one input line.
    ///
    /// Returns `None` for a settings line and the grouped conversion for a
    /// message line.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] for a bad settings line or a message
    /// before the first settings line, and [`EnigmaError::Alphabet`] for a
    /// message containing a symbol outside the alphabet. The session is
    /// unchanged on error.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::{MachineConfig, Session};
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
    /// let mut session = Session::new(config.build_machine().unwrap());
    /// assert_eq!(session.process_line("* B I II III AAA").unwrap(), None);
    /// assert_eq!(
    ///     session.process_line("AAAAA AAAAA").unwrap().as_deref(),
    ///     Some("BDZGO WCXLT")
    /// );
    /// ```
    pub fn process_line(&mut self, line: &str) -> EnigmaResult<Option<String>> {
        match line.trim_start().strip_prefix(SETTINGS_MARKER) {
            Some(body) => {
                self.apply_settings(body)?;
                Ok(None)
            }
            None => {
                if !self.configured {
                    return Err(EnigmaError::config(
                        "message found before any settings line",
                    ));
                }
                let converted = self.machine.convert_message(line)?;
                Ok(Some(group(&converted)))
            }
        }
    }

    /// Parses and applies the body of a settings line.
    ///
    /// The new configuration is built on a copy of the machine and only
    /// installed once every step has succeeded. Without plugboard cycles
    /// the current plugboard is kept.
    ///
    /// # Errors
    /// Returns [`EnigmaError::Config`] for any malformed or invalid setting.
    pub fn apply_settings(&mut self, body: &str) -> EnigmaResult<()> {
        let settings = SettingsLine::parse(body, self.machine.num_rotors())?;

        let mut next = self.machine.clone();
        next.insert_rotors(&settings.rotors.join(" "))?;
        next.set_rotors(&settings.positions, settings.ring.as_deref())?;
        if let Some(cycles) = &settings.plugboard {
            let plugboard = Permutation::new(cycles, next.alphabet().clone())?;
            next.set_plugboard(plugboard)?;
        }

        debug!(window = %next.window(), "session configured");
        self.machine = next;
        self.configured = true;
        Ok(())
    }
}

/// Splits `text` into space-separated groups of five symbols.
pub fn group(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / GROUP_SIZE);
    for (i, ch) in text.chars().enumerate() {
        if i > 0 && i % GROUP_SIZE == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}
