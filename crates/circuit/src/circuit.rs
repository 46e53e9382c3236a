//! The circuit aggregate shared by the garbler and the evaluator.

use anyhow::{Result, ensure};

use crate::{Dispatch, GarbledGate};

/// A topologically sorted boolean circuit with optional sequential state.
///
/// Wire index space: `[0, n)` primary inputs (the first `g` supplied by the
/// garbler), `[n, n+p)` DFF state wires, `[n+p, r)` gate outputs, with gate
/// `j` defining wire `n + p + j`. Construction validates the whole structure
/// once; the engines scan the gate array with no per-gate checks.
///
/// The topology is immutable after construction. Garbling never mutates it —
/// each run produces its own [`GarbledTable`](crate::GarbledTable) — so one
/// circuit value can back any number of independent garbled instances. All
/// owned arrays are released on drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GarbledCircuit {
    n: u32,
    g: u32,
    p: u32,
    m: u32,
    q: u32,
    c: u32,
    r: u32,
    table_gates: u32,
    gates: Vec<GarbledGate>,
    outputs: Vec<u32>,
    dff_data: Vec<u32>,
    dff_init: Vec<u32>,
    global_key: [u8; 16],
}

impl GarbledCircuit {
    /// Builds and validates a circuit.
    ///
    /// * `n` — number of primary inputs, of which the first `g` belong to
    ///   the garbler.
    /// * `cycles` — number of sequential cycles to run (1 for combinational
    ///   circuits).
    /// * `global_key` — per-circuit key for the dual-key cipher, shared by
    ///   both parties. Distinct from the garbler-secret Free-XOR offset,
    ///   which is never stored here.
    /// * `gates` — topologically sorted; gate `j` must define wire `n+p+j`
    ///   and read only wires below it.
    /// * `outputs` — the `m` wire indices exposed as circuit outputs.
    /// * `dff_data` — `D`: for each DFF, the wire whose label is latched
    ///   into the state wire at every cycle boundary.
    /// * `dff_init` — `I`: for each DFF, the initial-label slot (`< p`)
    ///   feeding the state wire in cycle 0.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        n: u32,
        g: u32,
        cycles: u32,
        global_key: [u8; 16],
        gates: Vec<GarbledGate>,
        outputs: Vec<u32>,
        dff_data: Vec<u32>,
        dff_init: Vec<u32>,
    ) -> Result<Self> {
        ensure!(cycles >= 1, "cycle count must be at least 1");
        ensure!(g <= n, "garbler input count {g} exceeds input count {n}");
        ensure!(
            dff_data.len() == dff_init.len(),
            "D array length {} does not match I array length {}",
            dff_data.len(),
            dff_init.len()
        );

        let p = u32::try_from(dff_data.len())?;
        let q = u32::try_from(gates.len())?;
        let m = u32::try_from(outputs.len())?;
        let r64 = u64::from(n) + u64::from(p) + u64::from(q);
        let r = u32::try_from(r64)?;

        let mut table_gates = 0u32;
        for (j, gate) in gates.iter().enumerate() {
            let expected = n + p + j as u32;
            ensure!(
                gate.output == expected,
                "gate {j} defines wire {} but topological order requires wire {expected}",
                gate.output
            );
            match gate.gate_type.dispatch() {
                Dispatch::Table { .. } | Dispatch::FreeXor { .. } => {
                    ensure!(
                        gate.input0 < gate.output && gate.input1 < gate.output,
                        "gate {j} reads a wire not yet defined"
                    );
                }
                Dispatch::FreeNot | Dispatch::Latch => {
                    ensure!(
                        gate.input0 < gate.output,
                        "gate {j} reads a wire not yet defined"
                    );
                }
                Dispatch::Fixed { .. } => {}
            }
            if gate.gate_type.consumes_table() {
                table_gates += 1;
            }
        }

        for (i, &o) in outputs.iter().enumerate() {
            ensure!(o < r, "output {i} references wire {o} outside [0, {r})");
        }
        for (i, &d) in dff_data.iter().enumerate() {
            ensure!(d < r, "DFF {i} data wire {d} outside [0, {r})");
        }
        for (i, &slot) in dff_init.iter().enumerate() {
            ensure!(
                slot < p,
                "DFF {i} initial-label slot {slot} outside [0, {p})"
            );
        }

        Ok(GarbledCircuit {
            n,
            g,
            p,
            m,
            q,
            c: cycles,
            r,
            table_gates,
            gates,
            outputs,
            dff_data,
            dff_init,
            global_key,
        })
    }

    /// Number of primary inputs (`n`).
    pub fn num_inputs(&self) -> u32 {
        self.n
    }

    /// Number of garbler-supplied inputs (`g`), the first `g` of the `n`.
    pub fn num_garbler_inputs(&self) -> u32 {
        self.g
    }

    /// Number of DFF state elements (`p`).
    pub fn num_dffs(&self) -> u32 {
        self.p
    }

    /// Number of circuit outputs (`m`).
    pub fn num_outputs(&self) -> u32 {
        self.m
    }

    /// Number of gates (`q`).
    pub fn num_gates(&self) -> u32 {
        self.q
    }

    /// Number of sequential cycles (`c`).
    pub fn cycles(&self) -> u32 {
        self.c
    }

    /// Total number of wires (`r = n + p + q`).
    pub fn num_wires(&self) -> u32 {
        self.r
    }

    /// Number of gates that consume garbled-table rows.
    pub fn table_gates(&self) -> u32 {
        self.table_gates
    }

    /// Garbled-table rows a full run produces: one per table gate per cycle.
    pub fn table_rows(&self) -> usize {
        self.table_gates as usize * self.c as usize
    }

    /// The topologically sorted gate array.
    pub fn gates(&self) -> &[GarbledGate] {
        &self.gates
    }

    /// Output wire indices.
    pub fn output_wires(&self) -> &[u32] {
        &self.outputs
    }

    /// `D`: per-DFF data wire indices.
    pub fn dff_data(&self) -> &[u32] {
        &self.dff_data
    }

    /// `I`: per-DFF initial-label slots.
    pub fn dff_init(&self) -> &[u32] {
        &self.dff_init
    }

    /// The per-circuit dual-key-cipher key.
    pub fn global_key(&self) -> [u8; 16] {
        self.global_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GateType;

    const KEY: [u8; 16] = [7u8; 16];

    fn and_example() -> GarbledCircuit {
        GarbledCircuit::new(
            2,
            1,
            1,
            KEY,
            vec![GarbledGate::new(GateType::And, 0, 1, 2)],
            vec![2],
            vec![],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn test_counts() {
        let ckt = and_example();
        assert_eq!(ckt.num_inputs(), 2);
        assert_eq!(ckt.num_garbler_inputs(), 1);
        assert_eq!(ckt.num_dffs(), 0);
        assert_eq!(ckt.num_outputs(), 1);
        assert_eq!(ckt.num_gates(), 1);
        assert_eq!(ckt.num_wires(), 3);
        assert_eq!(ckt.table_gates(), 1);
        assert_eq!(ckt.table_rows(), 1);
    }

    #[test]
    fn test_rejects_zero_cycles() {
        let err = GarbledCircuit::new(1, 0, 0, KEY, vec![], vec![], vec![], vec![]);
        assert!(err.is_err());
    }

    #[test]
    fn test_rejects_garbler_inputs_exceeding_inputs() {
        let err = GarbledCircuit::new(1, 2, 1, KEY, vec![], vec![], vec![], vec![]);
        assert!(err.is_err());
    }

    #[test]
    fn test_rejects_non_topological_output_wire() {
        // Gate 0 must define wire 2, not wire 3.
        let err = GarbledCircuit::new(
            2,
            0,
            1,
            KEY,
            vec![GarbledGate::new(GateType::And, 0, 1, 3)],
            vec![3],
            vec![],
            vec![],
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_rejects_forward_reference() {
        // Gate 0 reads its own output wire.
        let err = GarbledCircuit::new(
            1,
            0,
            1,
            KEY,
            vec![GarbledGate::new(GateType::Xor, 0, 1, 1)],
            vec![1],
            vec![],
            vec![],
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_rejects_out_of_range_output() {
        let err = GarbledCircuit::new(
            2,
            0,
            1,
            KEY,
            vec![GarbledGate::new(GateType::And, 0, 1, 2)],
            vec![3],
            vec![],
            vec![],
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_rejects_mismatched_dff_arrays() {
        let err = GarbledCircuit::new(1, 0, 2, KEY, vec![], vec![], vec![0], vec![]);
        assert!(err.is_err());
    }

    #[test]
    fn test_rejects_dff_init_slot_out_of_range() {
        // One DFF; slot 1 is outside [0, 1).
        let err = GarbledCircuit::new(
            1,
            0,
            2,
            KEY,
            vec![GarbledGate::unary(GateType::Not, 1, 2)],
            vec![2],
            vec![2],
            vec![1],
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_sequential_counts() {
        // One DFF fed back through an inverter: a 1-bit toggle.
        let ckt = GarbledCircuit::new(
            0,
            0,
            4,
            KEY,
            vec![GarbledGate::unary(GateType::Not, 0, 1)],
            vec![1],
            vec![1],
            vec![0],
        )
        .unwrap();
        assert_eq!(ckt.num_dffs(), 1);
        assert_eq!(ckt.num_wires(), 2);
        assert_eq!(ckt.cycles(), 4);
        assert_eq!(ckt.table_rows(), 0);
    }

    #[test]
    fn test_fixed_gate_needs_no_inputs() {
        let ckt = GarbledCircuit::new(
            0,
            0,
            1,
            KEY,
            vec![GarbledGate::fixed(GateType::FixedOne, 0)],
            vec![0],
            vec![],
            vec![],
        )
        .unwrap();
        assert_eq!(ckt.table_gates(), 0);
    }
}
