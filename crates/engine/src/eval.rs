//! Evaluation: the single-label side of the half-gates construction.
//!
//! The evaluator holds exactly one label per wire and never learns which of
//! the pair it is; every gate's code path is independent of the underlying
//! plaintext values.

use anyhow::{Result, ensure};
use garnet_circuit::{Dispatch, GarbledCircuit, GarbledTable};

use crate::dkc::Dkc;
use crate::types::{Ciphertext, Label};

// Conditional imports for architecture-specific intrinsics
#[cfg(target_arch = "aarch64")]
use crate::aarch64::{get_permute_bit, index_to_tweak, xor128};

#[cfg(target_arch = "x86_64")]
use crate::x86_64::{get_permute_bit, index_to_tweak, xor128};

/// Evaluation instance: the evaluator's working state for one run over a
/// circuit.
///
/// The gate counter mirrors the garbler's exactly — both sides walk the same
/// gate sequence, so the tweaks line up without coordination.
///
/// # Safety
///
/// The caller must ensure the CPU supports the required target features
/// (AES and NEON/SSE2).
#[derive(Debug)]
pub struct EvaluationInstanceImpl {
    gate_ctr: u64,
    table_ctr: u64,
    working_space: Vec<Label>,
    dkc: Dkc,
}

impl EvaluationInstanceImpl {
    /// Creates an instance with `num_wires` working-space slots.
    pub fn new(num_wires: u32, global_key: [u8; 16]) -> Self {
        EvaluationInstanceImpl {
            gate_ctr: 0,
            table_ctr: 0,
            working_space: vec![Label::default(); num_wires as usize],
            dkc: Dkc::new(global_key),
        }
    }

    /// Installs the held label for a wire (circuit inputs, DFF initial
    /// values).
    pub fn set_wire_label(&mut self, addr: usize, label: [u8; 16]) {
        self.working_space[addr] = Label::from(label);
    }

    /// Feed an XOR or XNOR gate: the held output label is the XOR of the
    /// held input labels. XNOR needs no separate path — only the garbler's
    /// interpretation of the pair differs.
    pub fn feed_xor_gate(&mut self, in1_addr: usize, in2_addr: usize, out_addr: usize) {
        let in1 = self.working_space[in1_addr];
        let in2 = self.working_space[in2_addr];
        self.working_space[out_addr] = Label(unsafe { xor128(in1.0, in2.0) });
        self.gate_ctr += 1;
    }

    /// Feed a NOT gate: an identity copy of the held label; the inversion
    /// lives entirely in the garbler's relabeling.
    pub fn feed_not_gate(&mut self, in_addr: usize, out_addr: usize) {
        self.working_space[out_addr] = self.working_space[in_addr];
        self.gate_ctr += 1;
    }

    /// Feed a fixed-constant gate: the held label is the public constant.
    pub fn feed_fixed_gate(&mut self, value: bool, out_addr: usize) {
        self.working_space[out_addr] = if value { Label::one() } else { Label::zero() };
        self.gate_ctr += 1;
    }

    /// Feed a DFF-typed gate: passes the held data-input label through.
    pub fn feed_latch_gate(&mut self, in_addr: usize, out_addr: usize) {
        self.working_space[out_addr] = self.working_space[in_addr];
        self.gate_ctr += 1;
    }

    /// Feed an AND-family gate with its two garbled-table rows, per ZRE15
    /// half-gates evaluation.
    ///
    /// The point-and-permute bits of the held labels select how each row is
    /// used; the same path serves all eight AND-family variants because
    /// input/output inversions only change the garbler's relabeling.
    pub fn feed_table_gate(
        &mut self,
        in1_addr: usize,
        in2_addr: usize,
        out_addr: usize,
        row: [Ciphertext; 2],
    ) {
        let a = self.working_space[in1_addr].0;
        let b = self.working_space[in2_addr].0;

        let s_a = unsafe { get_permute_bit(a) };
        let s_b = unsafe { get_permute_bit(b) };
        let j = unsafe { index_to_tweak(2 * self.gate_ctr) };
        let k = unsafe { index_to_tweak(2 * self.gate_ctr + 1) };

        let h_a = self.dkc.hash_raw(a, j);
        let h_b = self.dkc.hash_raw(b, k);

        let mut w_g = h_a;
        if s_a {
            w_g = unsafe { xor128(w_g, row[0].0) };
        }
        let mut w_e = h_b;
        if s_b {
            w_e = unsafe { xor128(w_e, xor128(row[1].0, a)) };
        }

        self.working_space[out_addr] = Label(unsafe { xor128(w_g, w_e) });

        // Increment gate counter to enforce tweak uniqueness
        self.gate_ctr += 1;
        self.table_ctr += 1;
    }

    /// Extract the held labels for the given wires. Panics if the number of
    /// wires does not match the number of label slots.
    pub fn get_labels(&self, wires: &[u32], labels: &mut [[u8; 16]]) {
        assert_eq!(wires.len(), labels.len());
        for (label, &wire) in labels.iter_mut().zip(wires) {
            *label = self.working_space[wire as usize].into();
        }
    }

    /// Number of table gates fed so far.
    pub fn table_gates_fed(&self) -> u64 {
        self.table_ctr
    }
}

/// Evaluates a garbled circuit.
///
/// * `table` — the rows received from the garbler; must contain exactly one
///   row per table gate per cycle.
/// * `input_labels` — one held label per primary input (`n`).
/// * `dff_init_labels` — one held label per DFF initial slot (`p`).
///
/// Returns the `m` recovered output labels after the final cycle. Mapping
/// them to plaintext bits requires the garbler's output pairs — see
/// [`decode_outputs`](crate::translate::decode_outputs).
pub fn evaluate(
    circuit: &GarbledCircuit,
    table: &GarbledTable,
    input_labels: &[[u8; 16]],
    dff_init_labels: &[[u8; 16]],
) -> Result<Vec<[u8; 16]>> {
    let n = circuit.num_inputs() as usize;
    let p = circuit.num_dffs() as usize;

    ensure!(
        input_labels.len() == n,
        "expected {n} input labels, got {}",
        input_labels.len()
    );
    ensure!(
        dff_init_labels.len() == p,
        "expected {p} DFF initial labels, got {}",
        dff_init_labels.len()
    );
    ensure!(
        table.len() == circuit.table_rows(),
        "garbled table has {} rows but the circuit consumes {}",
        table.len(),
        circuit.table_rows()
    );

    let mut instance = EvaluationInstanceImpl::new(circuit.num_wires(), circuit.global_key());
    for (i, label) in input_labels.iter().enumerate() {
        instance.set_wire_label(i, *label);
    }

    let mut next_row = 0usize;
    for cycle in 0..circuit.cycles() {
        if cycle == 0 {
            for (i, &slot) in circuit.dff_init().iter().enumerate() {
                instance.set_wire_label(n + i, dff_init_labels[slot as usize]);
            }
        } else {
            let latched: Vec<Label> = circuit
                .dff_data()
                .iter()
                .map(|&d| instance.working_space[d as usize])
                .collect();
            for (i, label) in latched.into_iter().enumerate() {
                instance.working_space[n + i] = label;
            }
        }

        for gate in circuit.gates() {
            let in1 = gate.input0 as usize;
            let in2 = gate.input1 as usize;
            let out = gate.output as usize;
            match gate.gate_type.dispatch() {
                Dispatch::Table { .. } => {
                    let row = table.rows()[next_row];
                    next_row += 1;
                    instance.feed_table_gate(
                        in1,
                        in2,
                        out,
                        [Ciphertext::from(row[0]), Ciphertext::from(row[1])],
                    );
                }
                Dispatch::FreeXor { .. } => instance.feed_xor_gate(in1, in2, out),
                Dispatch::FreeNot => instance.feed_not_gate(in1, out),
                Dispatch::Fixed { value } => instance.feed_fixed_gate(value, out),
                Dispatch::Latch => instance.feed_latch_gate(in1, out),
            }
        }
    }

    debug_assert_eq!(next_row as u64, instance.table_gates_fed());

    let mut outputs = vec![[0u8; 16]; circuit.output_wires().len()];
    instance.get_labels(circuit.output_wires(), &mut outputs);
    Ok(outputs)
}
