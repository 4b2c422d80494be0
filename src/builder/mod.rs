mod ec;
mod symbol;

pub use symbol::{ModuleGrid, Symbol};

use std::ops::Deref;

use tracing::debug;

use crate::common::{
    codec::{encode, encode_with_version},
    error::QRResult,
    mask::{apply_best_mask, MaskPattern},
    metadata::{ECLevel, Version},
    BitStream,
};

/// Builds a QR symbol from raw bytes.
///
/// The version is auto-selected as the smallest that fits unless pinned, and
/// the mask is chosen by penalty score unless pinned.
pub struct SymbolBuilder<'a> {
    data: &'a [u8],
    version: Option<Version>,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
}

impl<'a> SymbolBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, version: None, ec_level: ECLevel::M, mask: None }
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }
}

impl SymbolBuilder<'_> {
    pub fn build(&self) -> QRResult<Symbol> {
        let ecl = self.ec_level;

        let (encoded, version) = match self.version {
            Some(v) => (encode_with_version(self.data, v, ecl)?, v),
            None => encode(self.data, ecl)?,
        };
        debug!(version = version.number(), %ecl, len = self.data.len(), "data encoded");

        // Compute error correction codewords, then interleave data and ec
        // blocks into the final payload
        let (data_blocks, ecc_blocks) = ec::ecc(encoded.data(), version, ecl);
        let mut payload = BitStream::new(version.total_codewords() << 3);
        payload.extend(&Self::interleave(&data_blocks));
        payload.extend(&Self::interleave(&ecc_blocks));

        let mut symbol = Symbol::new(version, ecl);
        symbol.draw_function_patterns();
        symbol.draw_encoding_region(&payload);

        let mask = match self.mask {
            Some(m) => {
                symbol.apply_mask(m);
                m
            }
            None => apply_best_mask(&mut symbol),
        };
        debug!(mask = *mask, "mask applied");

        Ok(symbol)
    }

    pub(crate) fn interleave<T: Copy, V: Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
        let max_block_size = blocks.iter().map(|b| b.len()).max().expect("Blocks is empty");
        let total_size = blocks.iter().map(|b| b.len()).sum::<usize>();
        let mut res = Vec::with_capacity(total_size);
        for i in 0..max_block_size {
            for b in blocks {
                if i < b.len() {
                    res.push(b[i]);
                }
            }
        }
        res
    }
}
