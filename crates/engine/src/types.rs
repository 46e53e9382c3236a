//! Architecture-agnostic Label and Ciphertext types.
//!
//! These wrap the architecture-specific 128-bit SIMD types (uint8x16_t on
//! ARM, __m128i on x86) and convert to plain byte arrays at API boundaries.
//! Labels are only ever combined by XOR or fed through the dual-key cipher;
//! no other arithmetic exists on them.

use std::mem::transmute;

// Architecture-specific inner type
#[cfg(target_arch = "aarch64")]
pub(crate) type Inner = std::arch::aarch64::uint8x16_t;

#[cfg(target_arch = "x86_64")]
pub(crate) type Inner = std::arch::x86_64::__m128i;

// Constants for Label::zero() and Label::one()
const LABEL_ZERO_BYTES: [u8; 16] = [98u8; 16];
const LABEL_ONE_BYTES: [u8; 16] = [25u8; 16];

/// A 128-bit wire label.
///
/// Each wire has two labels, one per boolean value, with
/// `label1 = label0 XOR delta` for the circuit-wide Free-XOR offset. The
/// garbler's working space stores `label0`; the evaluator holds exactly one
/// label per wire and cannot tell which of the two it is.
#[derive(Debug, Clone, Copy)]
pub struct Label(pub(crate) Inner);

impl Label {
    /// The public constant label produced by a fixed-zero gate.
    pub fn zero() -> Self {
        Label::from(LABEL_ZERO_BYTES)
    }

    /// The public constant label produced by a fixed-one gate.
    pub fn one() -> Self {
        Label::from(LABEL_ONE_BYTES)
    }
}

impl Default for Label {
    fn default() -> Self {
        Label::from([0u8; 16])
    }
}

impl From<[u8; 16]> for Label {
    fn from(bytes: [u8; 16]) -> Self {
        Label(unsafe { transmute::<[u8; 16], Inner>(bytes) })
    }
}

impl From<Label> for [u8; 16] {
    fn from(label: Label) -> Self {
        unsafe { transmute::<Inner, [u8; 16]>(label.0) }
    }
}

/// A 128-bit garbled-table ciphertext.
///
/// AND-family gates produce two per gate (the generator and evaluator
/// half-gate rows); free gates produce none.
#[derive(Debug, Clone, Copy)]
pub struct Ciphertext(pub(crate) Inner);

impl Default for Ciphertext {
    fn default() -> Self {
        Ciphertext::from([0u8; 16])
    }
}

impl From<[u8; 16]> for Ciphertext {
    fn from(bytes: [u8; 16]) -> Self {
        Ciphertext(unsafe { transmute::<[u8; 16], Inner>(bytes) })
    }
}

impl From<Ciphertext> for [u8; 16] {
    fn from(ciphertext: Ciphertext) -> Self {
        unsafe { transmute::<Inner, [u8; 16]>(ciphertext.0) }
    }
}

/// XOR of two byte-level labels, for the cold paths that work on `[u8; 16]`.
pub(crate) fn xor_bytes(a: &[u8; 16], b: &[u8; 16]) -> [u8; 16] {
    let mut out = [0u8; 16];
    for i in 0..16 {
        out[i] = a[i] ^ b[i];
    }
    out
}
