//! AES key scheduling for the per-circuit DKC key.
//!
//! Port of EMP Toolkit: <https://github.com/emp-toolkit/emp-tool/blob/master/emp-tool/utils/aes_opt.h>,
//! specialized to a single AES-128 key. Runs once per circuit, so it is not
//! on the hot path.

use core::arch::x86_64::*;

#[inline]
#[target_feature(enable = "aes,ssse3,sse2")]
unsafe fn ks_round(rd_key: &mut [__m128i; 11], con: __m128i, con3: __m128i, mask: __m128i, r: usize) {
    debug_assert!((1..=10).contains(&r));

    unsafe {
        let mut key = rd_key[r - 1];

        // x2 = shuffle(key, mask)
        let x2 = _mm_shuffle_epi8(key, mask);

        // aux = aesenclast(x2, con)
        let aux = _mm_aesenclast_si128(x2, con);

        // globAux = key << 32 (per 64-bit lane), then key ^= globAux
        let mut glob_aux = _mm_slli_epi64(key, 32);
        key = _mm_xor_si128(glob_aux, key);

        // globAux = shuffle(key, con3), then key ^= globAux
        glob_aux = _mm_shuffle_epi8(key, con3);
        key = _mm_xor_si128(glob_aux, key);

        // rd_key[r] = aux ^ key
        rd_key[r] = _mm_xor_si128(aux, key);
    }
}

/// AES-128 key scheduling via AES-NI.
#[inline]
#[target_feature(enable = "aes,ssse3,sse2")]
pub(crate) unsafe fn expand_key(user_key: __m128i) -> [__m128i; 11] {
    unsafe {
        let mut con = _mm_set_epi32(1, 1, 1, 1);
        let mut con2 = _mm_set_epi32(0x1b, 0x1b, 0x1b, 0x1b);
        let con3 = _mm_set_epi32(
            0x07060504,
            0x07060504,
            0x0ffffffffu32 as i32,
            0x0ffffffffu32 as i32,
        );
        let mask = _mm_set_epi32(0x0c0f0e0d, 0x0c0f0e0d, 0x0c0f0e0d, 0x0c0f0e0d);

        let mut rd_key = [_mm_setzero_si128(); 11];
        rd_key[0] = user_key;

        for r in 1..=8 {
            ks_round(&mut rd_key, con, con3, mask, r);
            con = _mm_slli_epi32(con, 1);
        }

        // rounds 9 and 10 use con2
        ks_round(&mut rd_key, con2, con3, mask, 9);
        con2 = _mm_slli_epi32(con2, 1);
        ks_round(&mut rd_key, con2, con3, mask, 10);

        rd_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use std::mem::transmute;

    #[test]
    fn test_fips197_key_expansion() {
        // skip if host CPU can't run AES-NI (important if you run x86 under Rosetta on weird setups)
        if !(std::is_x86_feature_detected!("aes") && std::is_x86_feature_detected!("ssse3")) {
            eprintln!("Skipping: AES/SSSE3 not detected");
            return;
        }

        // FIPS-197 Appendix A.1 key expansion for 2b7e1516...
        let key = hex!("2b7e151628aed2a6abf7158809cf4f3c");
        let expected: [[u8; 16]; 10] = [
            hex!("a0fafe1788542cb123a339392a6c7605"),
            hex!("f2c295f27a96b9435935807a7359f67f"),
            hex!("3d80477d4716fe3e1e237e446d7a883b"),
            hex!("ef44a541a8525b7fb671253bdb0bad00"),
            hex!("d4d1c6f87c839d87caf2b8bc11f915bc"),
            hex!("6d88a37a110b3efddbf98641ca0093fd"),
            hex!("4e54f70e5f5fc9f384a64fb24ea6dc4f"),
            hex!("ead27321b58dbad2312bf5607f8d292f"),
            hex!("ac7766f319fadc2128d12941575c006e"),
            hex!("d014f9a8c9ee2589e13f0cc8b6630ca6"),
        ];

        unsafe {
            let rd_key = expand_key(transmute::<[u8; 16], __m128i>(key));
            assert_eq!(transmute::<__m128i, [u8; 16]>(rd_key[0]), key);
            for (r, want) in expected.iter().enumerate() {
                let got = transmute::<__m128i, [u8; 16]>(rd_key[r + 1]);
                assert_eq!(&got, want, "round key {} mismatch", r + 1);
            }
        }
    }
}
