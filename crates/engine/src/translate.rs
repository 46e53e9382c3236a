//! Protocol-boundary translation between labels and plaintext bits.
//!
//! Nothing in here runs inside the engines: selection happens before a run
//! and decoding after one, both on byte-level labels.

use anyhow::{Result, bail, ensure};
use bitvec::vec::BitVec;

/// Selects one label per wire from interleaved `(label0, label1)` pairs.
///
/// This is the garbler-side encoding of plaintext bits. In a deployed
/// two-party protocol the evaluator's own input labels arrive through
/// oblivious transfer instead; that layer sits above this crate.
pub fn select_labels(pairs: &[[u8; 16]], values: &BitVec) -> Result<Vec<[u8; 16]>> {
    ensure!(
        pairs.len() == 2 * values.len(),
        "expected {} labels for {} values, got {}",
        2 * values.len(),
        values.len(),
        pairs.len()
    );
    Ok(values
        .iter()
        .enumerate()
        .map(|(i, value)| pairs[2 * i + usize::from(*value)])
        .collect())
}

/// Maps recovered output labels back to plaintext bits by comparing against
/// the garbler's output pairs.
///
/// A recovered label matching neither element of its pair is the one
/// observable symptom of garbler/evaluator desynchronization — a table the
/// evaluator was never actually sent, a corrupted row, or labels generated
/// under a different offset. The engines themselves produce no signal for
/// this; it surfaces only here.
pub fn decode_outputs(pairs: &[[[u8; 16]; 2]], recovered: &[[u8; 16]]) -> Result<BitVec> {
    ensure!(
        pairs.len() == recovered.len(),
        "expected {} recovered labels, got {}",
        pairs.len(),
        recovered.len()
    );

    let mut bits = BitVec::with_capacity(recovered.len());
    for (i, (pair, label)) in pairs.iter().zip(recovered).enumerate() {
        if label == &pair[0] {
            bits.push(false);
        } else if label == &pair[1] {
            bits.push(true);
        } else {
            bail!("output {i}: recovered label matches neither output label");
        }
    }
    Ok(bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_picks_by_bit() {
        let pairs = vec![[1u8; 16], [2u8; 16], [3u8; 16], [4u8; 16]];
        let mut values = BitVec::new();
        values.push(true);
        values.push(false);
        let selected = select_labels(&pairs, &values).unwrap();
        assert_eq!(selected, vec![[2u8; 16], [3u8; 16]]);
    }

    #[test]
    fn test_select_rejects_length_mismatch() {
        let pairs = vec![[1u8; 16]];
        let mut values = BitVec::new();
        values.push(true);
        assert!(select_labels(&pairs, &values).is_err());
    }

    #[test]
    fn test_decode_roundtrip() {
        let pairs = vec![[[1u8; 16], [2u8; 16]], [[3u8; 16], [4u8; 16]]];
        let recovered = vec![[2u8; 16], [3u8; 16]];
        let bits = decode_outputs(&pairs, &recovered).unwrap();
        assert!(bits[0]);
        assert!(!bits[1]);
    }

    #[test]
    fn test_decode_rejects_foreign_label() {
        let pairs = vec![[[1u8; 16], [2u8; 16]]];
        let recovered = vec![[9u8; 16]];
        assert!(decode_outputs(&pairs, &recovered).is_err());
    }
}
