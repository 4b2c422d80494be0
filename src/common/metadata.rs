use std::fmt::{Display, Error, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{QRError, QRResult};

// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ECLevel {
    L = 0,
    M = 1,
    Q = 2,
    H = 3,
}

impl ECLevel {
    /// Bit pair used in the format information word.
    pub(crate) fn format_bits(self) -> u32 {
        match self {
            Self::L => 0b01,
            Self::M => 0b00,
            Self::Q => 0b11,
            Self::H => 0b10,
        }
    }
}

impl Display for ECLevel {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let c = match self {
            Self::L => "L",
            Self::M => "M",
            Self::Q => "Q",
            Self::H => "H",
        };
        f.write_str(c)
    }
}

impl FromStr for ECLevel {
    type Err = QRError;
    fn from_str(s: &str) -> QRResult<Self> {
        match s {
            "L" | "l" => Ok(Self::L),
            "M" | "m" => Ok(Self::M),
            "Q" | "q" => Ok(Self::Q),
            "H" | "h" => Ok(Self::H),
            _ => Err(QRError::InvalidECLevel),
        }
    }
}

// Version
//------------------------------------------------------------------------------

pub const MAX_VERSION: u8 = 40;

/// QR symbol version 1-40. Side length in modules is `4 * v + 17`.
#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord)]
pub struct Version(u8);

impl Version {
    pub fn new(v: u8) -> QRResult<Self> {
        match v {
            1..=MAX_VERSION => Ok(Self(v)),
            _ => Err(QRError::InvalidVersion),
        }
    }

    pub(crate) const fn new_unchecked(v: u8) -> Self {
        Self(v)
    }

    pub const fn number(self) -> u8 {
        self.0
    }

    pub const fn width(self) -> usize {
        self.0 as usize * 4 + 17
    }

    pub fn total_codewords(self) -> usize {
        TOTAL_CODEWORDS[self.0 as usize]
    }

    pub(crate) fn ecc_per_block(self, ecl: ECLevel) -> usize {
        ECC_PER_BLOCK[self.0 as usize][ecl as usize]
    }

    pub(crate) fn block_count(self, ecl: ECLevel) -> usize {
        BLOCK_COUNT[self.0 as usize][ecl as usize]
    }

    pub fn data_codewords(self, ecl: ECLevel) -> usize {
        self.total_codewords() - self.ecc_per_block(ecl) * self.block_count(ecl)
    }

    pub fn data_bit_capacity(self, ecl: ECLevel) -> usize {
        self.data_codewords(ecl) << 3
    }

    /// Block layout as (short size, short count, long size, long count).
    /// Long blocks carry exactly one more data codeword than short ones.
    pub(crate) fn data_codewords_per_block(self, ecl: ECLevel) -> (usize, usize, usize, usize) {
        let blocks = self.block_count(ecl);
        let data = self.data_codewords(ecl);
        let short = data / blocks;
        let long_count = data % blocks;
        (short, blocks - long_count, short + 1, long_count)
    }

    /// Character count field width for byte mode.
    pub(crate) const fn char_count_bits(self) -> usize {
        if self.0 < 10 {
            8
        } else {
            16
        }
    }

    pub(crate) fn alignment_pattern(self) -> &'static [i16] {
        ALIGNMENT_POSITIONS[self.0 as usize]
    }

    /// 18-bit version information word, BCH(18, 6). Only defined for v7+.
    pub(crate) fn info(self) -> u32 {
        debug_assert!(self.0 >= 7, "No version info below version 7");

        let data = self.0 as u32;
        let mut rem = data << 12;
        for i in (0..6).rev() {
            if rem & (1 << (i + 12)) != 0 {
                rem ^= VERSION_INFO_POLY << i;
            }
        }
        (data << 12) | (rem & 0xFFF)
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        write!(f, "{}", self.0)
    }
}

// Format information
//------------------------------------------------------------------------------

pub(crate) const FORMAT_INFO_BIT_LEN: usize = 15;
pub(crate) const VERSION_INFO_BIT_LEN: usize = 18;

const FORMAT_INFO_POLY: u32 = 0x537;
const FORMAT_INFO_MASK: u32 = 0x5412;
const VERSION_INFO_POLY: u32 = 0x1F25;

/// 15-bit format information word: EC level bits and mask pattern,
/// BCH(15, 5) protected and XORed with the fixed mask.
pub(crate) fn format_info(ecl: ECLevel, mask: u8) -> u32 {
    debug_assert!(mask < 8, "Invalid masking pattern");

    let data = (ecl.format_bits() << 3) | mask as u32;
    let mut rem = data << 10;
    for i in (0..5).rev() {
        if rem & (1 << (i + 10)) != 0 {
            rem ^= FORMAT_INFO_POLY << i;
        }
    }
    ((data << 10) | (rem & 0x3FF)) ^ FORMAT_INFO_MASK
}

// Placement coordinates, (row, col) with negative values wrapping from the
// far edge. Listed least significant bit first.
//------------------------------------------------------------------------------

pub(crate) static FORMAT_INFO_COORDS_MAIN: [(i16, i16); 15] = [
    (0, 8),
    (1, 8),
    (2, 8),
    (3, 8),
    (4, 8),
    (5, 8),
    (7, 8),
    (8, 8),
    (8, 7),
    (8, 5),
    (8, 4),
    (8, 3),
    (8, 2),
    (8, 1),
    (8, 0),
];

pub(crate) static FORMAT_INFO_COORDS_SIDE: [(i16, i16); 15] = [
    (8, -1),
    (8, -2),
    (8, -3),
    (8, -4),
    (8, -5),
    (8, -6),
    (8, -7),
    (8, -8),
    (-7, 8),
    (-6, 8),
    (-5, 8),
    (-4, 8),
    (-3, 8),
    (-2, 8),
    (-1, 8),
];

pub(crate) static VERSION_INFO_COORDS_BL: [(i16, i16); 18] = [
    (-11, 0),
    (-10, 0),
    (-9, 0),
    (-11, 1),
    (-10, 1),
    (-9, 1),
    (-11, 2),
    (-10, 2),
    (-9, 2),
    (-11, 3),
    (-10, 3),
    (-9, 3),
    (-11, 4),
    (-10, 4),
    (-9, 4),
    (-11, 5),
    (-10, 5),
    (-9, 5),
];

pub(crate) static VERSION_INFO_COORDS_TR: [(i16, i16); 18] = [
    (0, -11),
    (0, -10),
    (0, -9),
    (1, -11),
    (1, -10),
    (1, -9),
    (2, -11),
    (2, -10),
    (2, -9),
    (3, -11),
    (3, -10),
    (3, -9),
    (4, -11),
    (4, -10),
    (4, -9),
    (5, -11),
    (5, -10),
    (5, -9),
];

// Capacity tables, ISO/IEC 18004. Index 0 is a placeholder so tables are
// addressed by version number directly.
//------------------------------------------------------------------------------

static TOTAL_CODEWORDS: [usize; 41] = [
    0, 26, 44, 70, 100, 134, 172, 196, 242, 292, 346, 404, 466, 532, 581, 655, 733, 815, 901, 991,
    1085, 1156, 1258, 1364, 1474, 1588, 1706, 1828, 1921, 2051, 2185, 2323, 2465, 2611, 2761, 2876,
    3034, 3196, 3362, 3532, 3706,
];

// EC codewords per block, [L, M, Q, H] per version.
static ECC_PER_BLOCK: [[usize; 4]; 41] = [
    [0, 0, 0, 0],
    [7, 10, 13, 17],
    [10, 16, 22, 28],
    [15, 26, 18, 22],
    [20, 18, 26, 16],
    [26, 24, 18, 22],
    [18, 16, 24, 28],
    [20, 18, 18, 26],
    [24, 22, 22, 26],
    [30, 22, 20, 24],
    [18, 26, 24, 28],
    [20, 30, 28, 24],
    [24, 22, 26, 28],
    [26, 22, 24, 22],
    [30, 24, 20, 24],
    [22, 24, 30, 24],
    [24, 28, 24, 30],
    [28, 28, 28, 28],
    [30, 26, 28, 28],
    [28, 26, 26, 26],
    [28, 26, 30, 28],
    [28, 26, 28, 30],
    [28, 28, 30, 24],
    [30, 28, 30, 30],
    [30, 28, 30, 30],
    [26, 28, 30, 30],
    [28, 28, 28, 30],
    [30, 28, 30, 30],
    [30, 28, 30, 30],
    [30, 28, 30, 30],
    [30, 28, 30, 30],
    [30, 28, 30, 30],
    [30, 28, 30, 30],
    [30, 28, 30, 30],
    [30, 28, 30, 30],
    [30, 28, 30, 30],
    [30, 28, 30, 30],
    [30, 28, 30, 30],
    [30, 28, 30, 30],
    [30, 28, 30, 30],
    [30, 28, 30, 30],
];

// Number of error correction blocks, [L, M, Q, H] per version.
static BLOCK_COUNT: [[usize; 4]; 41] = [
    [0, 0, 0, 0],
    [1, 1, 1, 1],
    [1, 1, 1, 1],
    [1, 1, 2, 2],
    [1, 2, 2, 4],
    [1, 2, 4, 4],
    [2, 4, 4, 4],
    [2, 4, 6, 5],
    [2, 4, 6, 6],
    [2, 5, 8, 8],
    [4, 5, 8, 8],
    [4, 5, 8, 11],
    [4, 8, 10, 11],
    [4, 9, 12, 16],
    [4, 9, 16, 16],
    [6, 10, 12, 18],
    [6, 10, 17, 16],
    [6, 11, 16, 19],
    [6, 13, 18, 21],
    [7, 14, 21, 25],
    [8, 16, 20, 25],
    [8, 17, 23, 25],
    [9, 17, 23, 34],
    [9, 18, 25, 30],
    [10, 20, 27, 32],
    [12, 21, 29, 35],
    [12, 23, 34, 37],
    [12, 25, 34, 40],
    [13, 26, 35, 42],
    [14, 28, 38, 45],
    [15, 29, 40, 48],
    [16, 31, 43, 51],
    [17, 33, 45, 54],
    [18, 35, 48, 57],
    [19, 37, 51, 60],
    [19, 38, 53, 63],
    [20, 40, 56, 66],
    [21, 43, 59, 70],
    [22, 45, 62, 74],
    [24, 47, 65, 77],
    [25, 49, 68, 81],
];

// Alignment pattern center coordinates per version.
static ALIGNMENT_POSITIONS: [&[i16]; 41] = [
    &[],
    &[],
    &[6, 18],
    &[6, 22],
    &[6, 26],
    &[6, 30],
    &[6, 34],
    &[6, 22, 38],
    &[6, 24, 42],
    &[6, 26, 46],
    &[6, 28, 50],
    &[6, 30, 54],
    &[6, 32, 58],
    &[6, 34, 62],
    &[6, 26, 46, 66],
    &[6, 26, 48, 70],
    &[6, 26, 50, 74],
    &[6, 30, 54, 78],
    &[6, 30, 56, 82],
    &[6, 30, 58, 86],
    &[6, 34, 62, 90],
    &[6, 28, 50, 72, 94],
    &[6, 26, 50, 74, 98],
    &[6, 30, 54, 78, 102],
    &[6, 28, 54, 80, 106],
    &[6, 32, 58, 84, 110],
    &[6, 30, 58, 86, 114],
    &[6, 34, 62, 90, 118],
    &[6, 26, 50, 74, 98, 122],
    &[6, 30, 54, 78, 102, 126],
    &[6, 26, 52, 78, 104, 130],
    &[6, 30, 56, 82, 108, 134],
    &[6, 34, 60, 86, 112, 138],
    &[6, 30, 58, 86, 114, 142],
    &[6, 34, 62, 90, 118, 146],
    &[6, 30, 54, 78, 102, 126, 150],
    &[6, 24, 50, 76, 102, 128, 154],
    &[6, 28, 54, 80, 106, 132, 158],
    &[6, 32, 58, 84, 110, 136, 162],
    &[6, 26, 54, 82, 110, 138, 166],
    &[6, 30, 58, 86, 114, 142, 170],
];

#[cfg(test)]
mod metadata_tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn test_version_bounds() {
        assert!(Version::new(0).is_err());
        assert!(Version::new(41).is_err());
        assert_eq!(Version::new(1).unwrap().width(), 21);
        assert_eq!(Version::new(40).unwrap().width(), 177);
    }

    #[test_case(1, ECLevel::L, 19)]
    #[test_case(1, ECLevel::H, 9)]
    #[test_case(10, ECLevel::M, 216)]
    #[test_case(17, ECLevel::M, 507)]
    #[test_case(40, ECLevel::L, 2956)]
    #[test_case(40, ECLevel::H, 1276)]
    fn test_data_codewords(v: u8, ecl: ECLevel, expected: usize) {
        assert_eq!(Version::new(v).unwrap().data_codewords(ecl), expected);
    }

    #[test]
    fn test_block_layout_accounts_for_all_data() {
        for v in 1..=MAX_VERSION {
            let ver = Version::new(v).unwrap();
            for ecl in [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H] {
                let (s, sc, l, lc) = ver.data_codewords_per_block(ecl);
                assert_eq!(s * sc + l * lc, ver.data_codewords(ecl));
                assert_eq!(sc + lc, ver.block_count(ecl));
                if lc > 0 {
                    assert_eq!(l, s + 1);
                }
            }
        }
    }

    #[test]
    fn test_block_layout_v5_quartile() {
        let ver = Version::new(5).unwrap();
        assert_eq!(ver.data_codewords_per_block(ECLevel::Q), (15, 2, 16, 2));
    }

    // Reference words from the published format information table
    #[test_case(ECLevel::M, 0, 0x5412)]
    #[test_case(ECLevel::L, 0, 0x77C4)]
    #[test_case(ECLevel::L, 4, 0x662F)]
    #[test_case(ECLevel::H, 7, 0x083B)]
    fn test_format_info(ecl: ECLevel, mask: u8, expected: u32) {
        assert_eq!(format_info(ecl, mask), expected);
    }

    #[test]
    fn test_version_info() {
        assert_eq!(Version::new(7).unwrap().info(), 0x07C94);
        for v in 7..=MAX_VERSION {
            let info = Version::new(v).unwrap().info();
            assert_eq!(info >> 12, v as u32);
        }
    }

    #[test]
    fn test_alignment_positions_fit_symbol() {
        for v in 2..=MAX_VERSION {
            let ver = Version::new(v).unwrap();
            let poses = ver.alignment_pattern();
            assert_eq!(poses.first(), Some(&6));
            assert_eq!(*poses.last().unwrap() as usize, ver.width() - 7);
        }
    }

    #[test]
    fn test_ec_level_round_trip() {
        for (s, ecl) in [("L", ECLevel::L), ("M", ECLevel::M), ("Q", ECLevel::Q), ("H", ECLevel::H)]
        {
            assert_eq!(s.parse::<ECLevel>().unwrap(), ecl);
            assert_eq!(ecl.to_string(), s);
        }
        assert!("X".parse::<ECLevel>().is_err());
    }
}
