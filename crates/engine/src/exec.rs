//! Cleartext circuit execution.
//!
//! Runs the circuit without any garbling, over a bit-packed working space.
//! This is the reference semantics the garbled path is tested against, and
//! what a party would run to compute expected outputs locally.

use anyhow::{Result, ensure};
use bitvec::vec::BitVec;
use garnet_circuit::GarbledCircuit;

/// Executes a circuit on plaintext bits.
///
/// * `inputs` — one bit per primary input (`n`).
/// * `dff_init` — one bit per DFF initial slot (`p`).
///
/// Returns the `m` output bits after the final cycle.
pub fn execute(circuit: &GarbledCircuit, inputs: &BitVec, dff_init: &BitVec) -> Result<BitVec> {
    let n = circuit.num_inputs() as usize;
    let p = circuit.num_dffs() as usize;

    ensure!(
        inputs.len() == n,
        "expected {n} input bits, got {}",
        inputs.len()
    );
    ensure!(
        dff_init.len() == p,
        "expected {p} DFF initial bits, got {}",
        dff_init.len()
    );

    let mut working_space: BitVec = BitVec::repeat(false, circuit.num_wires() as usize);
    for (i, bit) in inputs.iter().enumerate() {
        working_space.set(i, *bit);
    }

    for cycle in 0..circuit.cycles() {
        if cycle == 0 {
            for (i, &slot) in circuit.dff_init().iter().enumerate() {
                working_space.set(n + i, dff_init[slot as usize]);
            }
        } else {
            let latched: Vec<bool> = circuit
                .dff_data()
                .iter()
                .map(|&d| working_space[d as usize])
                .collect();
            for (i, bit) in latched.into_iter().enumerate() {
                working_space.set(n + i, bit);
            }
        }

        for gate in circuit.gates() {
            let a = working_space[gate.input0 as usize];
            let b = working_space[gate.input1 as usize];
            working_space.set(gate.output as usize, gate.gate_type.eval(a, b));
        }
    }

    let mut outputs = BitVec::with_capacity(circuit.output_wires().len());
    for &wire in circuit.output_wires() {
        outputs.push(working_space[wire as usize]);
    }
    Ok(outputs)
}
