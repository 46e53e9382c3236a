//! x86_64-specific intrinsics and AES implementation.
//!
//! This module contains the architecture-specific low-level operations. All
//! higher-level logic (garbling, evaluation, execution) is in the unified
//! modules.

use std::arch::x86_64::*;
use std::mem::transmute;

pub(crate) mod key_schedule;

// Re-export the unified types
pub use crate::types::{Ciphertext, Label};

/// Extract the point-and-permute bit (LSB) from a label.
///
/// # Safety
///
/// The caller must ensure that the CPU supports the `sse2` target feature.
#[inline]
pub unsafe fn get_permute_bit(label: __m128i) -> bool {
    let bytes: [u8; 16] = unsafe { transmute(label) };
    (bytes[0] & 1) == 1
}

/// XOR two 128-bit values.
///
/// # Safety
///
/// The caller must ensure that the CPU supports the `sse2` target feature.
#[inline]
pub unsafe fn xor128(a: __m128i, b: __m128i) -> __m128i {
    unsafe { _mm_xor_si128(a, b) }
}

/// Convert a gate index to a tweak value.
///
/// # Safety
///
/// The caller must ensure that the CPU supports the `sse2` target feature.
#[inline]
pub unsafe fn index_to_tweak(index: u64) -> __m128i {
    let mut bytes = [0u8; 16];
    bytes[0..8].copy_from_slice(&index.to_le_bytes());
    unsafe { transmute(bytes) }
}

/// Expand a circuit's global key into an AES-128 round-key schedule.
///
/// # Safety
///
/// The caller must ensure that the CPU supports the `aes`, `ssse3` and
/// `sse2` target features.
#[target_feature(enable = "aes")]
#[target_feature(enable = "ssse3")]
#[target_feature(enable = "sse2")]
pub unsafe fn expand_key(key: [u8; 16]) -> [__m128i; 11] {
    unsafe { key_schedule::expand_key(transmute::<[u8; 16], __m128i>(key)) }
}

/// AES-128 encryption using x86 AES-NI instructions.
///
/// This follows the x86 AES-NI instruction pattern:
/// - Initial whitening: XOR with round key 0
/// - Rounds 1-9: AESENC (full round with MixColumns)
/// - Round 10: AESENCLAST (final round without MixColumns)
///
/// # Safety
///
/// The caller must ensure that the CPU supports the `aes` and `sse2` target
/// features.
#[target_feature(enable = "aes")]
#[target_feature(enable = "sse2")]
pub unsafe fn aes_encrypt(round_keys: &[__m128i; 11], block: __m128i) -> __m128i {
    unsafe {
        // Initial whitening: XOR with first round key
        let mut state = _mm_xor_si128(block, round_keys[0]);

        // Rounds 1-9: Full rounds with MixColumns
        for &key in &round_keys[1..10] {
            state = _mm_aesenc_si128(state, key);
        }

        // Round 10: Final round without MixColumns
        _mm_aesenclast_si128(state, round_keys[10])
    }
}

/// TCCR hash function via keyed AES: H(x, tweak) = AES(AES(x) ⊕ tweak) ⊕ AES(x).
///
/// Tweakable circular correlation robust (TCCR) hash function.
/// Referenced from Section 7.4 of GKWY20 <https://eprint.iacr.org/2019/074>,
/// keyed by the circuit's global key instead of a fixed constant so both
/// parties of one circuit derive matching values.
///
/// # Safety
///
/// The caller must ensure that the CPU supports the `aes` and `sse2` target
/// features.
#[target_feature(enable = "aes")]
#[target_feature(enable = "sse2")]
pub unsafe fn hash(round_keys: &[__m128i; 11], x: __m128i, tweak: __m128i) -> __m128i {
    unsafe {
        let aes_x = aes_encrypt(round_keys, x);
        xor128(aes_encrypt(round_keys, xor128(aes_x, tweak)), aes_x)
    }
}
