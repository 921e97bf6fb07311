//! Variable-length quantity coding for delta times

use crate::error::{Error, Result};

/// Maximum encoded size of a delta time
pub const MAX_BYTES: usize = 4;

/// Largest delta time encodable in MAX_BYTES
pub const MAX_DELTA: u64 = 0x0FFF_FFFF;

/// Encode a delta time as a big-endian variable-length quantity: 7
/// data bits per byte, continuation bit set on every byte but the
/// last. Deltas above MAX_DELTA do not fit the addressable range and
/// fail.
pub fn encode(delta: u64) -> Result<Vec<u8>> {
    if delta > MAX_DELTA {
        return Err(Error::DeltaOverflow(delta));
    }

    let mut bytes = vec![(delta & 0x7F) as u8];
    let mut rest = delta >> 7;
    while rest > 0 {
        bytes.push((rest & 0x7F) as u8 | 0x80);
        rest >>= 7;
    }
    bytes.reverse();
    Ok(bytes)
}

/// Decode a variable-length quantity from the head of `data`,
/// returning the value and the number of bytes consumed. None when
/// the data runs out before a terminating byte.
pub fn decode(data: &[u8]) -> Option<(u64, usize)> {
    let mut value = 0u64;
    for (i, &byte) in data.iter().take(MAX_BYTES).enumerate() {
        value = (value << 7) | (byte & 0x7F) as u64;
        if byte & 0x80 == 0 {
            return Some((value, i + 1));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_byte() {
        assert_eq!(encode(0).unwrap(), vec![0x00]);
        assert_eq!(encode(127).unwrap(), vec![0x7F]);
    }

    #[test]
    fn test_two_bytes() {
        assert_eq!(encode(128).unwrap(), vec![0x81, 0x00]);
        assert_eq!(encode(240).unwrap(), vec![0x81, 0x70]);
        assert_eq!(encode(16383).unwrap(), vec![0xFF, 0x7F]);
    }

    #[test]
    fn test_three_bytes() {
        assert_eq!(encode(16384).unwrap(), vec![0x81, 0x80, 0x00]);
        assert_eq!(encode(2097151).unwrap(), vec![0xFF, 0xFF, 0x7F]);
    }

    #[test]
    fn test_four_bytes() {
        assert_eq!(encode(2097152).unwrap(), vec![0x81, 0x80, 0x80, 0x00]);
        assert_eq!(encode(MAX_DELTA).unwrap(), vec![0xFF, 0xFF, 0xFF, 0x7F]);
    }

    #[test]
    fn test_encode_overflow() {
        assert!(matches!(
            encode(MAX_DELTA + 1),
            Err(crate::Error::DeltaOverflow(_))
        ));
    }

    #[test]
    fn test_round_trip() {
        for delta in [0, 127, 128, 16383, 16384, 2097151, MAX_DELTA] {
            let bytes = encode(delta).unwrap();
            assert_eq!(decode(&bytes), Some((delta, bytes.len())));
        }
    }

    #[test]
    fn test_decode_unterminated() {
        assert_eq!(decode(&[0x80]), None);
        assert_eq!(decode(&[0xFF, 0xFF, 0xFF, 0xFF]), None);
        assert_eq!(decode(&[]), None);
    }
}
