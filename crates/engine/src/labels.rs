//! Label generation: fresh label pairs under one Free-XOR offset.

use rand_chacha::ChaCha20Rng;
use rand_chacha::rand_core::RngCore;

use crate::types::xor_bytes;

/// Draws a fresh Free-XOR offset (the garbler secret R).
///
/// The low bit is forced to 1: point-and-permute needs every wire's two
/// labels to differ in the selector bit, and the global offset is the only
/// place that can be guaranteed. The offset must never be reused across
/// logically distinct garbling sessions.
pub fn generate_delta(rng: &mut ChaCha20Rng) -> [u8; 16] {
    let mut delta = [0u8; 16];
    rng.fill_bytes(&mut delta);
    delta[0] |= 1;
    delta
}

/// Generates `count` label pairs, interleaved: position `2i` holds a fresh
/// random `label0` for wire `i`, position `2i + 1` holds
/// `label0 XOR delta`.
///
/// Primary inputs and DFF initial values are generated by the same routine
/// with the same delta — sequential state wires live in the same Free-XOR
/// space as the inputs.
pub fn generate_label_pairs(
    rng: &mut ChaCha20Rng,
    delta: [u8; 16],
    count: usize,
) -> Vec<[u8; 16]> {
    let mut labels = Vec::with_capacity(2 * count);
    for _ in 0..count {
        let mut label0 = [0u8; 16];
        rng.fill_bytes(&mut label0);
        labels.push(label0);
        labels.push(xor_bytes(&label0, &delta));
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;

    #[test]
    fn test_delta_has_permute_bit_set() {
        let mut rng = ChaCha20Rng::from_seed([0u8; 32]);
        for _ in 0..64 {
            let delta = generate_delta(&mut rng);
            assert_eq!(delta[0] & 1, 1);
        }
    }

    #[test]
    fn test_pairs_respect_offset() {
        let mut rng = ChaCha20Rng::from_seed([1u8; 32]);
        let delta = generate_delta(&mut rng);
        let labels = generate_label_pairs(&mut rng, delta, 8);
        assert_eq!(labels.len(), 16);
        for pair in labels.chunks_exact(2) {
            assert_eq!(pair[1], xor_bytes(&pair[0], &delta));
            assert_ne!(pair[0], pair[1]);
            // The selector bits of a pair always differ.
            assert_ne!(pair[0][0] & 1, pair[1][0] & 1);
        }
    }

    #[test]
    fn test_seed_determinism() {
        let mut a = ChaCha20Rng::from_seed([2u8; 32]);
        let mut b = ChaCha20Rng::from_seed([2u8; 32]);
        let delta_a = generate_delta(&mut a);
        let delta_b = generate_delta(&mut b);
        assert_eq!(delta_a, delta_b);
        assert_eq!(
            generate_label_pairs(&mut a, delta_a, 4),
            generate_label_pairs(&mut b, delta_b, 4)
        );
    }

    #[test]
    fn test_labels_are_distinct() {
        let mut rng = ChaCha20Rng::from_seed([3u8; 32]);
        let delta = generate_delta(&mut rng);
        let labels = generate_label_pairs(&mut rng, delta, 32);
        for (i, a) in labels.iter().enumerate() {
            for b in &labels[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
