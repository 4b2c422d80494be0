use super::metadata::Version;

// Zig-zag traversal of the encoding region
//------------------------------------------------------------------------------

/// Walks the symbol in vertical two-module column pairs from the bottom right,
/// alternating upward and downward, skipping the vertical timing column.
/// Yields every cell; callers skip the ones occupied by function patterns.
pub(crate) struct EncRegionIter {
    w: i16,
    // Right column of the current pair
    col: i16,
    row: i16,
    upward: bool,
    // 0 = right cell of the pair, 1 = left cell
    side: i16,
}

impl EncRegionIter {
    pub fn new(version: Version) -> Self {
        let w = version.width() as i16;
        Self { w, col: w - 1, row: w - 1, upward: true, side: 0 }
    }
}

impl Iterator for EncRegionIter {
    type Item = (i16, i16);

    fn next(&mut self) -> Option<(i16, i16)> {
        if self.col < 0 {
            return None;
        }
        let res = (self.row, self.col - self.side);

        if self.side == 0 {
            self.side = 1;
            return Some(res);
        }
        self.side = 0;

        let at_end = if self.upward { self.row == 0 } else { self.row == self.w - 1 };
        if at_end {
            self.upward = !self.upward;
            self.col -= 2;
            if self.col == 6 {
                // Vertical timing column
                self.col -= 1;
            }
        } else {
            self.row += if self.upward { -1 } else { 1 };
        }
        Some(res)
    }
}
