//! The dual-key cipher: the keyed tweakable hash both engines draw their
//! table masks from.

use crate::types::{Inner, Label};

#[cfg(target_arch = "aarch64")]
use crate::aarch64::{expand_key, hash, index_to_tweak};

#[cfg(target_arch = "x86_64")]
use crate::x86_64::{expand_key, hash, index_to_tweak};

/// Dual-key cipher for one circuit.
///
/// Expands the circuit's global key into an AES-128 round-key schedule once,
/// then serves `H(x, tweak) = AES(AES(x) ⊕ tweak) ⊕ AES(x)` — the TCCR
/// construction of GKWY20 §7.4 keyed per circuit. Gate input labels enter as
/// `x`; the gate index enters as the tweak (each AND-family gate uses
/// `2·ctr` for its generator half and `2·ctr + 1` for its evaluator half).
///
/// The cipher is a pure function: identical labels and tweak produce an
/// identical output, which is what lets garbler and evaluator derive
/// matching masks independently. There is no failure mode at this layer —
/// any mismatch surfaces downstream as an undecodable output label.
///
/// # Safety
///
/// Constructing or using a `Dkc` requires a CPU with AES and NEON/SSE2
/// support.
#[derive(Debug)]
pub struct Dkc {
    round_keys: [Inner; 11],
}

impl Dkc {
    /// Schedules the circuit's global key.
    pub fn new(global_key: [u8; 16]) -> Self {
        Dkc {
            round_keys: unsafe { expand_key(global_key) },
        }
    }

    /// Hash on the raw SIMD representation, for the gate loops.
    #[inline]
    pub(crate) fn hash_raw(&self, x: Inner, tweak: Inner) -> Inner {
        unsafe { hash(&self.round_keys, x, tweak) }
    }

    /// `H(x, tweak)` on label values.
    pub fn hash(&self, x: Label, tweak: u64) -> Label {
        Label(self.hash_raw(x.0, unsafe { index_to_tweak(tweak) }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aes::Aes128;
    use aes::cipher::{BlockEncrypt, KeyInit};
    use rand::RngCore;

    fn hash_via_aes_crate(key: [u8; 16], x: [u8; 16], tweak: u64) -> [u8; 16] {
        let cipher = Aes128::new(&key.into());
        let encrypt = |input: [u8; 16]| -> [u8; 16] {
            let mut block = input.into();
            cipher.encrypt_block(&mut block);
            block.into()
        };

        let aes_x = encrypt(x);
        let mut inner = aes_x;
        inner[0..8]
            .iter_mut()
            .zip(tweak.to_le_bytes())
            .for_each(|(b, t)| *b ^= t);
        let outer = encrypt(inner);

        let mut out = [0u8; 16];
        for i in 0..16 {
            out[i] = outer[i] ^ aes_x[i];
        }
        out
    }

    #[test]
    fn test_hash_matches_reference_composition() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let mut key = [0u8; 16];
            let mut x = [0u8; 16];
            rng.fill_bytes(&mut key);
            rng.fill_bytes(&mut x);
            let tweak = rng.next_u64();

            let dkc = Dkc::new(key);
            let got: [u8; 16] = dkc.hash(Label::from(x), tweak).into();
            assert_eq!(got, hash_via_aes_crate(key, x, tweak));
        }
    }

    #[test]
    fn test_deterministic_across_instances() {
        let key = [0x42u8; 16];
        let a = Dkc::new(key);
        let b = Dkc::new(key);
        let x = Label::from([0x13u8; 16]);
        let left: [u8; 16] = a.hash(x, 7).into();
        let right: [u8; 16] = b.hash(x, 7).into();
        assert_eq!(left, right);
    }

    #[test]
    fn test_tweak_separates_outputs() {
        let dkc = Dkc::new([0x42u8; 16]);
        let x = Label::from([0x13u8; 16]);
        let h0: [u8; 16] = dkc.hash(x, 0).into();
        let h1: [u8; 16] = dkc.hash(x, 1).into();
        assert_ne!(h0, h1);
    }

    #[test]
    fn test_key_separates_outputs() {
        let x = Label::from([0x13u8; 16]);
        let h0: [u8; 16] = Dkc::new([0u8; 16]).hash(x, 0).into();
        let h1: [u8; 16] = Dkc::new([1u8; 16]).hash(x, 0).into();
        assert_ne!(h0, h1);
    }
}
