//! Garbling: the label-pair side of the half-gates construction.
//!
//! The instance exposes per-gate feed methods so an external streaming layer
//! can drive it gate by gate; [`garble`] is the whole-circuit driver walking
//! the topologically sorted gate array once per sequential cycle.

use std::mem::transmute;

use anyhow::{Result, ensure};
use garnet_circuit::{Dispatch, GarbledCircuit, GarbledTable};

use crate::dkc::Dkc;
use crate::types::{Ciphertext, Inner, Label, xor_bytes};

// Conditional imports for architecture-specific intrinsics
#[cfg(target_arch = "aarch64")]
use crate::aarch64::{get_permute_bit, index_to_tweak, xor128};

#[cfg(target_arch = "x86_64")]
use crate::x86_64::{get_permute_bit, index_to_tweak, xor128};

/// Garbling instance: the garbler's working state for one run over a
/// circuit.
///
/// The working space holds `label0` for every wire in one contiguous
/// allocation; `label1 = label0 XOR delta` is derived on demand and never
/// stored, which makes the Free-XOR invariant structural. The gate counter
/// increments once per fed gate, across cycles, so every gate consumes
/// globally unique tweaks.
///
/// # Safety
///
/// The caller must ensure the CPU supports the required target features
/// (AES and NEON/SSE2).
#[derive(Debug)]
pub struct GarblingInstanceImpl {
    gate_ctr: u64,
    table_ctr: u64,
    working_space: Vec<Label>,
    delta: Inner,
    dkc: Dkc,
}

impl GarblingInstanceImpl {
    /// Creates an instance with `num_wires` working-space slots.
    pub fn new(num_wires: u32, delta: [u8; 16], global_key: [u8; 16]) -> Self {
        GarblingInstanceImpl {
            gate_ctr: 0,
            table_ctr: 0,
            working_space: vec![Label::default(); num_wires as usize],
            delta: unsafe { transmute::<[u8; 16], Inner>(delta) },
            dkc: Dkc::new(global_key),
        }
    }

    /// Installs `label0` for a wire (circuit inputs, DFF initial values).
    pub fn set_wire_label(&mut self, addr: usize, label0: [u8; 16]) {
        self.working_space[addr] = Label::from(label0);
    }

    /// Feed an XOR gate: the output `label0` is the XOR of the input
    /// `label0`s — no ciphertext. `invert_out` turns it into XNOR by
    /// offsetting the output with delta.
    pub fn feed_xor_gate(&mut self, in1_addr: usize, in2_addr: usize, out_addr: usize, invert_out: bool) {
        let in1 = self.working_space[in1_addr];
        let in2 = self.working_space[in2_addr];
        let mut out = unsafe { xor128(in1.0, in2.0) };
        if invert_out {
            out = unsafe { xor128(out, self.delta) };
        }
        self.working_space[out_addr] = Label(out);
        self.gate_ctr += 1;
    }

    /// Feed a NOT gate: a relabeling (swap the roles of label0/label1), no
    /// ciphertext.
    pub fn feed_not_gate(&mut self, in_addr: usize, out_addr: usize) {
        let input = self.working_space[in_addr];
        self.working_space[out_addr] = Label(unsafe { xor128(input.0, self.delta) });
        self.gate_ctr += 1;
    }

    /// Feed a fixed-constant gate. The evaluator's held label for the wire
    /// is the public constant, so `label0` is the constant itself for a
    /// fixed zero and the constant offset by delta for a fixed one.
    pub fn feed_fixed_gate(&mut self, value: bool, out_addr: usize) {
        let label0 = if value {
            Label(unsafe { xor128(Label::one().0, self.delta) })
        } else {
            Label::zero()
        };
        self.working_space[out_addr] = label0;
        self.gate_ctr += 1;
    }

    /// Feed a DFF-typed gate: passes the data-input label through, no
    /// cryptographic work.
    pub fn feed_latch_gate(&mut self, in_addr: usize, out_addr: usize) {
        self.working_space[out_addr] = self.working_space[in_addr];
        self.gate_ctr += 1;
    }

    /// Feed an AND-family gate, garbled with the two-row half-gates
    /// construction of ZRE15 <https://eprint.iacr.org/2014/756>.
    ///
    /// The inversion flags decompose the gate as
    /// `invert_out ^ AND(a ^ invert_a, b ^ invert_b)`; inverting an input
    /// garbles the underlying AND against the complementary label, and
    /// inverting the output offsets the result by delta. Both are free.
    /// Returns the generator and evaluator half-gate rows.
    pub fn feed_table_gate(
        &mut self,
        in1_addr: usize,
        in2_addr: usize,
        out_addr: usize,
        invert_a: bool,
        invert_b: bool,
        invert_out: bool,
    ) -> [Ciphertext; 2] {
        let mut a0 = self.working_space[in1_addr].0;
        let mut b0 = self.working_space[in2_addr].0;
        if invert_a {
            a0 = unsafe { xor128(a0, self.delta) };
        }
        if invert_b {
            b0 = unsafe { xor128(b0, self.delta) };
        }
        let a1 = unsafe { xor128(a0, self.delta) };
        let b1 = unsafe { xor128(b0, self.delta) };

        let p_a = unsafe { get_permute_bit(a0) };
        let p_b = unsafe { get_permute_bit(b0) };
        let j = unsafe { index_to_tweak(2 * self.gate_ctr) };
        let k = unsafe { index_to_tweak(2 * self.gate_ctr + 1) };

        let h_a0 = self.dkc.hash_raw(a0, j);
        let h_a1 = self.dkc.hash_raw(a1, j);
        let h_b0 = self.dkc.hash_raw(b0, k);
        let h_b1 = self.dkc.hash_raw(b1, k);

        // Generator half-gate: T_G = H(A0) ^ H(A1) ^ p_b*delta
        let mut t_g = unsafe { xor128(h_a0, h_a1) };
        if p_b {
            t_g = unsafe { xor128(t_g, self.delta) };
        }
        let mut w_g = h_a0;
        if p_a {
            w_g = unsafe { xor128(w_g, t_g) };
        }

        // Evaluator half-gate: T_E = H(B0) ^ H(B1) ^ A0
        let t_e = unsafe { xor128(xor128(h_b0, h_b1), a0) };
        let mut w_e = h_b0;
        if p_b {
            w_e = unsafe { xor128(w_e, xor128(t_e, a0)) };
        }

        let mut out0 = unsafe { xor128(w_g, w_e) };
        if invert_out {
            out0 = unsafe { xor128(out0, self.delta) };
        }
        self.working_space[out_addr] = Label(out0);

        // Increment gate counter to enforce tweak uniqueness
        self.gate_ctr += 1;
        self.table_ctr += 1;
        [Ciphertext(t_g), Ciphertext(t_e)]
    }

    /// Extract `(label0, label1)` pairs for the given wires. Panics if the
    /// number of wires does not match the number of pair slots.
    pub fn get_label_pairs(&self, wires: &[u32], pairs: &mut [[[u8; 16]; 2]]) {
        assert_eq!(wires.len(), pairs.len());
        for (pair, &wire) in pairs.iter_mut().zip(wires) {
            let label0 = self.working_space[wire as usize];
            let label1 = Label(unsafe { xor128(label0.0, self.delta) });
            pair[0] = label0.into();
            pair[1] = label1.into();
        }
    }

    /// Number of table gates fed so far.
    pub fn table_gates_fed(&self) -> u64 {
        self.table_ctr
    }
}

/// Artifacts of one garbling run.
#[derive(Debug)]
pub struct GarbledOutputs {
    /// Ciphertext rows, cycle-major in gate order — the only secret-derived
    /// artifact that travels to the evaluator.
    pub table: GarbledTable,
    /// Per circuit output, the `(label0, label1)` pair after the final
    /// cycle, for decoding recovered labels at the protocol boundary.
    pub output_labels: Vec<[[u8; 16]; 2]>,
}

/// Garbles a circuit.
///
/// * `input_labels` — `2n` interleaved labels from
///   [`generate_label_pairs`](crate::labels::generate_label_pairs).
/// * `dff_init_labels` — `2p` interleaved labels for DFF initial values,
///   generated under the same `delta`.
/// * `delta` — the garbler-secret Free-XOR offset; its low bit must be 1.
///
/// Walks the gate array once per cycle. The circuit is never mutated, so the
/// same topology can be garbled any number of times with fresh labels, each
/// run yielding an independent table.
pub fn garble(
    circuit: &GarbledCircuit,
    input_labels: &[[u8; 16]],
    dff_init_labels: &[[u8; 16]],
    delta: [u8; 16],
) -> Result<GarbledOutputs> {
    let n = circuit.num_inputs() as usize;
    let p = circuit.num_dffs() as usize;

    ensure!(
        delta[0] & 1 == 1,
        "delta must have its low (point-and-permute) bit set"
    );
    ensure!(
        input_labels.len() == 2 * n,
        "expected {} input labels, got {}",
        2 * n,
        input_labels.len()
    );
    ensure!(
        dff_init_labels.len() == 2 * p,
        "expected {} DFF initial labels, got {}",
        2 * p,
        dff_init_labels.len()
    );
    for pair in input_labels
        .chunks_exact(2)
        .chain(dff_init_labels.chunks_exact(2))
    {
        ensure!(
            pair[1] == xor_bytes(&pair[0], &delta),
            "label pair does not respect the Free-XOR offset"
        );
    }

    let mut instance =
        GarblingInstanceImpl::new(circuit.num_wires(), delta, circuit.global_key());
    for i in 0..n {
        instance.set_wire_label(i, input_labels[2 * i]);
    }

    let mut rows = Vec::with_capacity(circuit.table_rows());
    for cycle in 0..circuit.cycles() {
        // Latch the DFF state wires. Cycle 0 takes the initial-label slots
        // selected by I; later cycles take the previous cycle's label of the
        // wire selected by D, snapshotted first so DFF-to-DFF feeds never
        // observe this cycle's writes.
        if cycle == 0 {
            for (i, &slot) in circuit.dff_init().iter().enumerate() {
                instance.set_wire_label(n + i, dff_init_labels[2 * slot as usize]);
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
                Dispatch::Table {
                    invert_a,
                    invert_b,
                    invert_out,
                } => {
                    let row =
                        instance.feed_table_gate(in1, in2, out, invert_a, invert_b, invert_out);
                    rows.push([row[0].into(), row[1].into()]);
                }
                Dispatch::FreeXor { invert_out } => {
                    instance.feed_xor_gate(in1, in2, out, invert_out)
                }
                Dispatch::FreeNot => instance.feed_not_gate(in1, out),
                Dispatch::Fixed { value } => instance.feed_fixed_gate(value, out),
                Dispatch::Latch => instance.feed_latch_gate(in1, out),
            }
        }
    }

    debug_assert_eq!(rows.len() as u64, instance.table_gates_fed());

    let mut output_labels = vec![[[0u8; 16]; 2]; circuit.output_wires().len()];
    instance.get_label_pairs(circuit.output_wires(), &mut output_labels);

    Ok(GarbledOutputs {
        table: GarbledTable::new(rows),
        output_labels,
    })
}
