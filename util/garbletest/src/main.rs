//! End-to-end harness: exec → garble → evaluate → decode → verify.
//!
//! Every case runs the circuit in cleartext for the expected outputs, then
//! through the full garbled path — including a serialize/deserialize round
//! trip of the table, standing in for the garbler→evaluator transport — and
//! checks the decoded bits against the cleartext run.

use anyhow::{Result, ensure};
use bitvec::vec::BitVec;
use clap::{Parser, Subcommand};
use garnet_circuit::{GarbledCircuit, GarbledTable, GateType};
use garnet_engine::{
    decode_outputs, evaluate, execute, garble, generate_delta, generate_label_pairs,
    select_labels,
};
use indicatif::{ProgressBar, ProgressStyle};
use rand_chacha::ChaCha20Rng;
use rand_chacha::rand_core::{RngCore, SeedableRng};

/// End-to-end tester for the garnet garbling engines.
#[derive(Parser, Debug)]
#[command(name = "garbletest")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// RNG seed for labels, keys and test inputs
    #[arg(long, default_value_t = 7)]
    seed: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sweep every gate type over all input combinations
    Gates,
    /// Ripple-carry adder on random operands
    Adder {
        /// Operand width in bits
        #[arg(default_value_t = 32)]
        bits: usize,
        /// Number of random operand pairs
        #[arg(long, default_value_t = 16)]
        cases: usize,
    },
    /// Sequential counter across cycles
    Counter {
        /// Counter width in bits
        #[arg(default_value_t = 8)]
        width: usize,
        /// Number of cycles to run
        #[arg(long, default_value_t = 5)]
        cycles: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut rng = ChaCha20Rng::seed_from_u64(cli.seed);

    match cli.command {
        Command::Gates => run_gates(&mut rng),
        Command::Adder { bits, cases } => run_adder(bits, cases, &mut rng),
        Command::Counter { width, cycles } => run_counter(width, cycles, &mut rng),
    }
}

/// Runs one circuit end to end and checks the decoded outputs against
/// cleartext execution. Returns the decoded bits.
fn run_case(
    circuit: &GarbledCircuit,
    inputs: &BitVec,
    dff_init: &BitVec,
    rng: &mut ChaCha20Rng,
) -> Result<BitVec> {
    let expected = execute(circuit, inputs, dff_init)?;

    let delta = generate_delta(rng);
    let input_pairs = generate_label_pairs(rng, delta, circuit.num_inputs() as usize);
    let dff_pairs = generate_label_pairs(rng, delta, circuit.num_dffs() as usize);
    let garbled = garble(circuit, &input_pairs, &dff_pairs, delta)?;

    // Ship the table across the byte contract.
    let table = GarbledTable::from_bytes(&garbled.table.to_bytes())?;

    let held_inputs = select_labels(&input_pairs, inputs)?;
    let held_dff = select_labels(&dff_pairs, dff_init)?;
    let recovered = evaluate(circuit, &table, &held_inputs, &held_dff)?;
    let decoded = decode_outputs(&garbled.output_labels, &recovered)?;

    ensure!(
        decoded == expected,
        "garbled outputs disagree with cleartext execution"
    );
    Ok(decoded)
}

fn progress(len: u64, label: &str) -> ProgressBar {
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len}")
            .expect("valid progress template"),
    );
    bar.set_message(label.to_string());
    bar
}

fn run_gates(rng: &mut ChaCha20Rng) -> Result<()> {
    let types: Vec<GateType> = GateType::ALL
        .into_iter()
        .filter(|&ty| ty != GateType::Dff)
        .collect();

    let bar = progress(types.len() as u64 * 4, "gate sweep");
    for ty in types {
        let mut key = [0u8; 16];
        rng.fill_bytes(&mut key);
        let circuit = netgen::single_gate(ty, key);

        for (a, b) in [(false, false), (false, true), (true, false), (true, true)] {
            let mut inputs = BitVec::new();
            inputs.push(a);
            inputs.push(b);
            let decoded = run_case(&circuit, &inputs, &BitVec::new(), rng)?;
            ensure!(
                decoded[0] == ty.eval(a, b),
                "{ty:?} on ({a}, {b}) decoded wrong bit"
            );
            bar.inc(1);
        }
    }
    bar.finish();

    println!("✓ all gate types match their truth tables");
    Ok(())
}

fn run_adder(bits: usize, cases: usize, rng: &mut ChaCha20Rng) -> Result<()> {
    ensure!((1..=64).contains(&bits), "adder width must be in 1..=64");

    let mut key = [0u8; 16];
    rng.fill_bytes(&mut key);
    let circuit = netgen::ripple_adder(bits, key);

    let mask = if bits == 64 { u64::MAX } else { (1 << bits) - 1 };
    let bar = progress(cases as u64, "adder cases");
    for _ in 0..cases {
        let a = rng.next_u64() & mask;
        let b = rng.next_u64() & mask;

        let mut inputs = to_bits(a, bits);
        inputs.extend(to_bits(b, bits));
        let decoded = run_case(&circuit, &inputs, &BitVec::new(), rng)?;

        let sum = from_bits(&decoded);
        ensure!(
            sum == a as u128 + b as u128,
            "adder computed {a} + {b} = {sum}"
        );
        bar.inc(1);
    }
    bar.finish();

    println!("✓ {cases} random {bits}-bit additions correct");
    Ok(())
}

fn run_counter(width: usize, cycles: u32, rng: &mut ChaCha20Rng) -> Result<()> {
    ensure!((1..=64).contains(&width), "counter width must be in 1..=64");

    let mut key = [0u8; 16];
    rng.fill_bytes(&mut key);
    let circuit = netgen::counter(width, cycles, key);

    let mask = if width == 64 { u64::MAX } else { (1 << width) - 1 };
    let init = rng.next_u64() & mask;
    let decoded = run_case(&circuit, &BitVec::new(), &to_bits(init, width), rng)?;

    let value = from_bits(&decoded) as u64 & mask;
    let expected = init.wrapping_add(u64::from(cycles)) & mask;
    ensure!(
        value == expected,
        "counter from {init} after {cycles} cycles read {value}, expected {expected}"
    );

    println!("✓ {width}-bit counter advanced {cycles} cycles correctly");
    Ok(())
}

fn to_bits(value: u64, len: usize) -> BitVec {
    let mut bits = BitVec::with_capacity(len);
    for i in 0..len {
        bits.push((value >> i) & 1 == 1);
    }
    bits
}

fn from_bits(bits: &BitVec) -> u128 {
    bits.iter()
        .enumerate()
        .fold(0u128, |acc, (i, bit)| acc | (u128::from(*bit) << i))
}
