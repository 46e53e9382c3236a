//! Garbling, evaluation and cleartext execution engines for garnet circuits.
//!
//! The scheme is Free-XOR with point-and-permute and the two-row half-gates
//! construction (ZRE15) over 128-bit labels, with table masks drawn from a
//! tweakable AES-based hash keyed per circuit.
//!
//! Both engines are strictly sequential single-pass scans over the
//! topologically sorted gate array: garbling holds a `label0` per wire,
//! evaluation holds exactly one label per wire, and neither performs any
//! I/O — the garbled table is an owned artifact whose transport belongs to
//! the caller.
//!
//! Requires a CPU with AES and NEON/SSE2 support.

pub mod dkc;
pub mod eval;
pub mod exec;
pub mod garb;
pub mod labels;
pub mod translate;
pub mod types;

// Architecture-specific intrinsics
#[cfg(target_arch = "aarch64")]
pub mod aarch64;

#[cfg(target_arch = "x86_64")]
pub mod x86_64;

// Re-export the primary surface at the crate root
pub use dkc::Dkc;
pub use eval::{EvaluationInstanceImpl as EvaluationInstance, evaluate};
pub use exec::execute;
pub use garb::{GarbledOutputs, GarblingInstanceImpl as GarblingInstance, garble};
pub use labels::{generate_delta, generate_label_pairs};
pub use translate::{decode_outputs, select_labels};
pub use types::{Ciphertext, Label};
