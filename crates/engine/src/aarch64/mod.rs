//! Aarch64-specific intrinsics and AES implementation.
//!
//! This module contains only the architecture-specific low-level operations.
//! All higher-level logic (garbling, evaluation, execution) is in the unified
//! modules.

use std::arch::aarch64::*;
use std::mem::transmute;

pub(crate) mod key_schedule;

// Re-export the unified types
pub use crate::types::{Ciphertext, Label};

/// Extract the point-and-permute bit (LSB) from a label.
///
/// # Safety
///
/// The caller must ensure that the CPU supports the `neon` target feature.
#[inline]
pub unsafe fn get_permute_bit(label: uint8x16_t) -> bool {
    let bytes: [u8; 16] = unsafe { transmute(label) };
    (bytes[0] & 1) == 1
}

/// XOR two 128-bit values.
///
/// # Safety
///
/// The caller must ensure that the CPU supports the `neon` target feature.
#[inline]
pub unsafe fn xor128(a: uint8x16_t, b: uint8x16_t) -> uint8x16_t {
    unsafe { veorq_u8(a, b) }
}

/// Convert a gate index to a tweak value.
///
/// # Safety
///
/// The caller must ensure that the CPU supports the `neon` target feature.
#[inline]
pub unsafe fn index_to_tweak(index: u64) -> uint8x16_t {
    let mut bytes = [0u8; 16];
    bytes[0..8].copy_from_slice(&index.to_le_bytes());
    unsafe { transmute(bytes) }
}

/// Expand a circuit's global key into an AES-128 round-key schedule.
///
/// The expansion itself is software (NEON has no keygenassist counterpart)
/// and runs once per circuit.
///
/// # Safety
///
/// The caller must ensure that the CPU supports the `neon` target feature.
#[target_feature(enable = "neon")]
pub unsafe fn expand_key(key: [u8; 16]) -> [uint8x16_t; 11] {
    let expanded = key_schedule::expand_key(key);
    unsafe { transmute::<[[u8; 16]; 11], [uint8x16_t; 11]>(expanded) }
}

/// AES-128 encryption using ARM NEON crypto extensions.
///
/// This follows the reference implementation pattern:
/// - Rounds 0-8: AESE (SubBytes + ShiftRows + AddRoundKey) + AESMC (MixColumns)
/// - Round 9: AESE only (no MixColumns)
/// - Round 10: Final XOR with last round key
///
/// # Safety
///
/// The caller must ensure that the CPU supports the `aes` and `neon` target
/// features.
#[target_feature(enable = "aes")]
#[target_feature(enable = "neon")]
pub unsafe fn aes_encrypt(round_keys: &[uint8x16_t; 11], block: uint8x16_t) -> uint8x16_t {
    unsafe {
        let mut state = block;

        // Rounds 0-8: AES single round encryption + Mix columns
        for key in round_keys.iter().take(9) {
            state = vaeseq_u8(state, *key);
            state = vaesmcq_u8(state);
        }

        // Round 9: AES single round encryption (no MixColumns)
        state = vaeseq_u8(state, round_keys[9]);

        // Round 10: Final add (bitwise XOR with last round key)
        veorq_u8(state, round_keys[10])
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
/// The caller must ensure that the CPU supports the `aes` and `neon` target
/// features.
#[target_feature(enable = "aes")]
#[target_feature(enable = "neon")]
pub unsafe fn hash(round_keys: &[uint8x16_t; 11], x: uint8x16_t, tweak: uint8x16_t) -> uint8x16_t {
    unsafe {
        let aes_x = aes_encrypt(round_keys, x);
        xor128(aes_encrypt(round_keys, xor128(aes_x, tweak)), aes_x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aes::Aes128;
    use aes::cipher::{BlockEncrypt, KeyInit};
    use rand::RngCore;

    #[test]
    fn test_aes_encrypt_matches_aes_crate() {
        let num_tests = 1000;
        let mut rng = rand::rng();
        for i in 0..num_tests {
            let mut key = [0u8; 16];
            let mut plaintext = [0u8; 16];
            rng.fill_bytes(&mut key);
            rng.fill_bytes(&mut plaintext);

            let round_keys = unsafe { expand_key(key) };
            let ciphertext: [u8; 16] = unsafe {
                transmute(aes_encrypt(
                    &round_keys,
                    transmute::<[u8; 16], uint8x16_t>(plaintext),
                ))
            };

            let cipher = Aes128::new(&key.into());
            let mut expected_ciphertext = plaintext.into();
            cipher.encrypt_block(&mut expected_ciphertext);

            assert_eq!(ciphertext, &expected_ciphertext[..], "failed at test {}", i);
        }
    }
}
