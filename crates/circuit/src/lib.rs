//! Circuit data model for the garnet garbling and evaluation engines.
//!
//! This crate defines the shared representation both parties hold: the
//! topologically sorted gate array, the wire-index space, the sequential
//! (DFF) metadata, and the garbled-table artifact with its byte-level
//! transport contract.
//!
//! All structural validation happens up front at construction, so the
//! engines can scan the gate array without per-gate checks.

pub mod circuit;
pub mod gate;
pub mod gate_type;
pub mod table;

pub use circuit::GarbledCircuit;
pub use gate::GarbledGate;
pub use gate_type::{Dispatch, GateType, codes};
pub use table::GarbledTable;
