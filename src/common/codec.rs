use tracing::debug;

use super::bitstream::BitStream;
use super::error::{QRError, QRResult};
use super::metadata::{ECLevel, Version, MAX_VERSION};

// Byte mode encoder
//------------------------------------------------------------------------------

const MODE_BYTE: u16 = 0b0100;
const MODE_BIT_LEN: usize = 4;
const PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];

/// Encodes `data` as a byte mode stream into the smallest version that fits
/// at the given error correction level.
pub fn encode(data: &[u8], ecl: ECLevel) -> QRResult<(BitStream, Version)> {
    if data.is_empty() {
        return Err(QRError::EmptyData);
    }
    let ver = fit_version(data.len(), ecl)?;
    debug!(version = ver.number(), "smallest fitting version selected");
    Ok((encode_with_version(data, ver, ecl)?, ver))
}

/// Encodes `data` into a fixed version, failing if it does not fit.
pub fn encode_with_version(data: &[u8], ver: Version, ecl: ECLevel) -> QRResult<BitStream> {
    if data.is_empty() {
        return Err(QRError::EmptyData);
    }
    let bit_capacity = ver.data_bit_capacity(ecl);
    if encoded_bit_len(data.len(), ver) > bit_capacity {
        return Err(QRError::DataTooLong);
    }

    let mut out = BitStream::new(bit_capacity);
    push_header(data.len(), ver, &mut out);
    push_byte_data(data, &mut out);
    push_terminator(&mut out);
    pad_remaining_capacity(&mut out);

    debug_assert!(out.len() == bit_capacity, "Padded stream must fill the data capacity");
    Ok(out)
}

/// Bits required for a byte mode segment of `len` bytes: mode indicator,
/// character count field and the data itself.
fn encoded_bit_len(len: usize, ver: Version) -> usize {
    MODE_BIT_LEN + ver.char_count_bits() + 8 * len
}

fn fit_version(len: usize, ecl: ECLevel) -> QRResult<Version> {
    (1..=MAX_VERSION)
        .map(Version::new_unchecked)
        .find(|v| encoded_bit_len(len, *v) <= v.data_bit_capacity(ecl))
        .ok_or(QRError::DataTooLong)
}

fn push_header(char_count: usize, ver: Version, out: &mut BitStream) {
    let count_bits = ver.char_count_bits();
    debug_assert!(
        char_count < (1 << count_bits),
        "Char count exceeds field width: Count {char_count}, Bits {count_bits}"
    );

    out.push_bits(MODE_BYTE, MODE_BIT_LEN);
    out.push_bits(char_count as u16, count_bits);
}

fn push_byte_data(data: &[u8], out: &mut BitStream) {
    for &b in data {
        out.push_bits(b as u16, 8);
    }
}

fn push_terminator(out: &mut BitStream) {
    let remaining = out.capacity() - out.len();
    out.push_bits(0, remaining.min(4));
}

fn pad_remaining_capacity(out: &mut BitStream) {
    // Zero fill up to the next codeword boundary
    let offset = out.len() & 7;
    if offset > 0 {
        out.push_bits(0, 8 - offset);
    }

    let remaining_codewords = (out.capacity() - out.len()) >> 3;
    for pc in PADDING_CODEWORDS.iter().copied().cycle().take(remaining_codewords) {
        out.push_bits(pc as u16, 8);
    }
}

#[cfg(test)]
mod codec_tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn test_encode_single_byte() {
        let ver = Version::new(1).unwrap();
        let bs = encode_with_version(b"A", ver, ECLevel::L).unwrap();
        // 0100 | 00000001 | 01000001 | 0000 terminator, then padding codewords
        let data = bs.data();
        assert_eq!(&data[..3], &[0x40, 0x14, 0x10]);
        assert_eq!(data.len(), ver.data_codewords(ECLevel::L));
        for (i, &b) in data[3..].iter().enumerate() {
            assert_eq!(b, PADDING_CODEWORDS[i & 1]);
        }
    }

    #[test]
    fn test_encode_fills_capacity_exactly() {
        for (text, ecl) in [("https://example.com", ECLevel::H), ("x", ECLevel::L)] {
            let (bs, ver) = encode(text.as_bytes(), ecl).unwrap();
            assert_eq!(bs.len(), ver.data_bit_capacity(ecl));
        }
    }

    #[test_case(1, ECLevel::L, 1)]
    #[test_case(17, ECLevel::L, 1)]
    #[test_case(18, ECLevel::L, 2)]
    #[test_case(2953, ECLevel::L, 40)]
    #[test_case(1273, ECLevel::H, 40)]
    fn test_fit_version(len: usize, ecl: ECLevel, expected: u8) {
        assert_eq!(fit_version(len, ecl).unwrap().number(), expected);
    }

    #[test]
    fn test_capacity_boundary() {
        let max = "a".repeat(2953);
        assert!(encode(max.as_bytes(), ECLevel::L).is_ok());

        let over = "a".repeat(2954);
        assert_eq!(encode(over.as_bytes(), ECLevel::L).unwrap_err(), QRError::DataTooLong);
    }

    #[test]
    fn test_empty_data_rejected() {
        assert_eq!(encode(b"", ECLevel::M).unwrap_err(), QRError::EmptyData);
    }

    #[test]
    fn test_wide_char_count_field() {
        // Version 10 and up use a 16 bit character count
        let data = "a".repeat(300);
        let (bs, ver) = encode(data.as_bytes(), ECLevel::L).unwrap();
        assert!(ver.number() >= 10);
        // 0100 | 0000000100101100 -> 0x40 0x12 0xC_
        assert_eq!(bs.data()[0], 0x40);
        assert_eq!(bs.data()[1], 0x12);
        assert_eq!(bs.data()[2] >> 4, 0xC);
    }
}
