//! Random hex identifier generator.

use rand::Rng;

/// Number of hex digits in a transaction, block, miner or sidecar hash.
pub const HASH_HEX_LEN: usize = 32;

/// Number of hex digits in a sender or receiver address.
pub const ADDRESS_HEX_LEN: usize = 16;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Generate `0x` followed by `len` random lowercase hex digits.
pub fn random_hex<R: Rng>(rng: &mut R, len: usize) -> String {
    let mut out = String::with_capacity(len + 2);
    out.push_str("0x");
    for _ in 0..len {
        out.push(HEX_DIGITS[rng.gen_range(0..HEX_DIGITS.len())] as char);
    }
    out
}

/// Check that `value` is `0x` followed by exactly `len` lowercase hex digits.
pub fn is_prefixed_hex(value: &str, len: usize) -> bool {
    match value.strip_prefix("0x") {
        Some(digits) => {
            digits.len() == len
                && digits
                    .bytes()
                    .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_hex_shape() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let hash = random_hex(&mut rng, HASH_HEX_LEN);
            assert!(is_prefixed_hex(&hash, HASH_HEX_LEN), "bad hash: {hash}");

            let address = random_hex(&mut rng, ADDRESS_HEX_LEN);
            assert!(
                is_prefixed_hex(&address, ADDRESS_HEX_LEN),
                "bad address: {address}"
            );
        }
    }

    #[test]
    fn test_random_hex_deterministic() {
        let mut rng1 = StdRng::seed_from_u64(7);
        let mut rng2 = StdRng::seed_from_u64(7);

        assert_eq!(
            random_hex(&mut rng1, HASH_HEX_LEN),
            random_hex(&mut rng2, HASH_HEX_LEN)
        );
    }

    #[test]
    fn test_is_prefixed_hex() {
        assert!(is_prefixed_hex("0x0123456789abcdef", 16));
        assert!(!is_prefixed_hex("0x0123456789ABCDEF", 16));
        assert!(!is_prefixed_hex("0123456789abcdef", 16));
        assert!(!is_prefixed_hex("0x0123", 16));
        assert!(!is_prefixed_hex("0x0123456789abcdeg", 16));
    }
}
