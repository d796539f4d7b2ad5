//! Property-based tests for permutations and the machine transform.
//!
//! The machine is its own inverse at any starting position, ring setting
//! and plugboard: converting a message twice from the same settings must
//! give the original message back.

use std::sync::Arc;

use proptest::prelude::*;

use enigma::{Alphabet, MachineConfig, Permutation};

const CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/default.conf");

fn config() -> MachineConfig {
    MachineConfig::parse(&std::fs::read_to_string(CONFIG).unwrap()).unwrap()
}

/// Settings strings of `len` uppercase letters.
fn settings(len: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(b'A'..=b'Z', len)
        .prop_map(|bytes| bytes.into_iter().map(char::from).collect())
}

/// A plugboard built from a shuffled alphabet: the first `2 * pairs`
/// letters are swapped in adjacent pairs.
fn plugboard() -> impl Strategy<Value = String> {
    (Just(('A'..='Z').collect::<Vec<char>>()).prop_shuffle(), 0usize..=13).prop_map(
        |(letters, pairs)| {
            letters
                .chunks(2)
                .take(pairs)
                .map(|pair| format!("({}{})", pair[0], pair[1]))
                .collect::<Vec<_>>()
                .join(" ")
        },
    )
}

/// Arbitrary cycle notation over A-Z: a shuffled alphabet cut into
/// consecutive cycles.
fn cycles() -> impl Strategy<Value = String> {
    (
        Just(('A'..='Z').collect::<Vec<char>>()).prop_shuffle(),
        proptest::collection::vec(1usize..8, 1..10),
    )
        .prop_map(|(letters, lengths)| {
            let mut out = String::new();
            let mut rest = &letters[..];
            for len in lengths {
                if rest.is_empty() {
                    break;
                }
                let (cycle, tail) = rest.split_at(len.min(rest.len()));
                out.push('(');
                out.extend(cycle);
                out.push(')');
                rest = tail;
            }
            out
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn permutation_invert_undoes_permute(text in cycles(), p in 0usize..26) {
        let perm = Permutation::new(&text, Arc::new(Alphabet::default())).unwrap();
        prop_assert_eq!(perm.invert(perm.permute(p as isize) as isize), p);
        prop_assert_eq!(perm.permute(perm.invert(p as isize) as isize), p);
    }

    #[test]
    fn wrap_stays_in_range(p in -10_000isize..10_000) {
        let perm = Permutation::identity(Arc::new(Alphabet::default()));
        let w = perm.wrap(p);
        prop_assert!(w < 26);
        prop_assert_eq!((w as isize - p).rem_euclid(26), 0);
    }

    #[test]
    fn plugboard_is_involution(text in plugboard()) {
        let perm = Permutation::new(&text, Arc::new(Alphabet::default())).unwrap();
        prop_assert!(perm.is_involution());
    }

    #[test]
    fn machine_is_self_inverse(
        positions in settings(4),
        ring in settings(4),
        plugs in plugboard(),
        message in "[A-Z]{1,200}",
    ) {
        let config = config();
        let build = || {
            let mut m = config.build_machine().unwrap();
            m.insert_rotors("B Beta III IV I").unwrap();
            m.set_rotors(&positions, Some(&ring)).unwrap();
            let plugboard = Permutation::new(&plugs, config.alphabet().clone()).unwrap();
            m.set_plugboard(plugboard).unwrap();
            m
        };

        let cipher = build().convert_message(&message).unwrap();
        prop_assert_eq!(cipher.len(), message.len());
        let plain = build().convert_message(&cipher).unwrap();
        prop_assert_eq!(plain, message);
    }

    #[test]
    fn no_letter_encrypts_to_itself(positions in settings(4), key in b'A'..=b'Z') {
        let config = config();
        let mut m = config.build_machine().unwrap();
        m.insert_rotors("C Gamma VI VII VIII").unwrap();
        m.set_rotors(&positions, None).unwrap();
        let key = char::from(key);
        prop_assert_ne!(m.convert_char(key).unwrap(), key);
    }
}
