//! Benchmarks for Enigma machine operations.
//!
//! Measures machine description parsing, settings application, single
//! keystroke conversion, whole-message throughput, and how keystroke cost
//! scales with the number of moving rotors.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use enigma::{Machine, MachineConfig, Permutation, Session};

/// Bundled historical machine description.
const CONFIG: &str = include_str!("../data/default.conf");

/// Message converted in the throughput benchmarks.
const MESSAGE: &str = "FROM HIS SHOULDER HIAWATHA TOOK THE CAMERA OF ROSEWOOD \
                       MADE OF SLIDING FOLDING ROSEWOOD NEATLY PUT IT ALL TOGETHER";

fn naval_machine() -> Machine {
    let config = MachineConfig::parse(CONFIG).unwrap();
    let mut machine = config.build_machine().unwrap();
    machine.insert_rotors("B Beta III IV I").unwrap();
    machine.set_rotors("AXLE", Some("BCDE")).unwrap();
    let plugboard =
        Permutation::new("(HQ) (EX) (IP) (TR) (BY)", config.alphabet().clone()).unwrap();
    machine.set_plugboard(plugboard).unwrap();
    machine
}

/// Benchmarks `MachineConfig::parse()` on the bundled twelve-rotor
/// description.
fn bench_parse_config(c: &mut Criterion) {
    c.bench_function("parse_config", |b| {
        b.iter(|| MachineConfig::parse(black_box(CONFIG)).unwrap());
    });
}

/// Benchmarks a full settings line through `Session`, including rotor
/// insertion, positions, rings and plugboard parsing.
fn bench_apply_settings(c: &mut Criterion) {
    let config = MachineConfig::parse(CONFIG).unwrap();
    let mut session = Session::new(config.build_machine().unwrap());

    c.bench_function("apply_settings", |b| {
        b.iter(|| {
            session
                .process_line(black_box(
                    "* B Beta III IV I AXLE BCDE (HQ) (EX) (IP) (TR) (BY)",
                ))
                .unwrap()
        });
    });
}

/// Benchmarks single-keystroke `convert()` on a four-rotor machine.
///
/// The machine is set up once and rotors advance naturally between
/// iterations, so stepping and double steps are included.
fn bench_convert(c: &mut Criterion) {
    let mut machine = naval_machine();

    let mut group = c.benchmark_group("convert_keystroke");
    group.throughput(Throughput::Elements(1));
    group.bench_function("4_rotors", |b| {
        b.iter(|| machine.convert(black_box(7)).unwrap());
    });
    group.finish();
}

/// Benchmarks `convert_message()` throughput on a short plaintext.
fn bench_convert_message(c: &mut Criterion) {
    let mut machine = naval_machine();
    let symbols = MESSAGE.chars().filter(|ch| !ch.is_whitespace()).count();

    let mut group = c.benchmark_group("convert_message");
    group.throughput(Throughput::Elements(symbols as u64));
    group.bench_function("4_rotors", |b| {
        b.iter(|| machine.convert_message(black_box(MESSAGE)).unwrap());
    });
    group.finish();
}

/// Benchmarks `convert()` across machines with 3, 4 and 5 moving rotors.
///
/// Each machine has one slot per moving rotor plus the reflector, so the
/// signal passes through every rotor twice.
fn bench_convert_rotor_scaling(c: &mut Criterion) {
    let layouts: &[(usize, &str, &str)] = &[
        (3, "B I II III", "AAA"),
        (4, "B V I II III", "AAAA"),
        (5, "B IV V I II III", "AAAAA"),
    ];
    let rotors = CONFIG.lines().skip(2).collect::<Vec<_>>().join("\n");

    let mut group = c.benchmark_group("convert_rotor_scaling");
    group.throughput(Throughput::Elements(1));

    for &(moving, names, setting) in layouts {
        let text = format!(
            "ABCDEFGHIJKLMNOPQRSTUVWXYZ\n{} {}\n{}",
            moving + 1,
            moving,
            rotors
        );
        let config = MachineConfig::parse(&text).unwrap();
        let mut machine = config.build_machine().unwrap();
        machine.insert_rotors(names).unwrap();
        machine.set_rotors(setting, None).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(moving), &moving, |b, _| {
            b.iter(|| machine.convert(black_box(0)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_parse_config,
    bench_apply_settings,
    bench_convert,
    bench_convert_message,
    bench_convert_rotor_scaling,
);
criterion_main!(benches);
