use crate::common::iter::EncRegionIter;
use crate::common::mask::MaskPattern;
use crate::common::metadata::{
    format_info, ECLevel, Version, FORMAT_INFO_BIT_LEN, FORMAT_INFO_COORDS_MAIN,
    FORMAT_INFO_COORDS_SIDE, VERSION_INFO_BIT_LEN, VERSION_INFO_COORDS_BL, VERSION_INFO_COORDS_TR,
};
use crate::common::BitStream;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum Module {
    Empty,
    Func(bool),
    Format(bool),
    Version(bool),
    Data(bool),
}

impl Module {
    fn is_dark(self) -> bool {
        match self {
            Module::Empty => false,
            Module::Func(d) | Module::Format(d) | Module::Version(d) | Module::Data(d) => d,
        }
    }
}

/// A fully drawn QR symbol. Built by [`SymbolBuilder`](crate::SymbolBuilder);
/// identical input always produces an identical symbol.
#[derive(Debug, Clone)]
pub struct Symbol {
    grid: Vec<Module>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mask: Option<MaskPattern>,
}

// Construction and access
//------------------------------------------------------------------------------

impl Symbol {
    pub(crate) fn new(ver: Version, ecl: ECLevel) -> Self {
        let w = ver.width();
        Self { grid: vec![Module::Empty; w * w], w, ver, ecl, mask: None }
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|m| m.is_dark()).count()
    }

    // Negative coordinates wrap from the far edge, so format and version
    // info placement can address both symbol corners with one table.
    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        debug_assert!(-w <= r && r < w, "Row out of bounds: {r}");
        debug_assert!(-w <= c && c < w, "Column out of bounds: {c}");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r * w + c) as usize
    }

    pub(crate) fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    pub(crate) fn set(&mut self, r: i16, c: i16, module: Module) {
        let index = self.coord_to_index(r, c);
        self.grid[index] = module;
    }

    pub(crate) fn is_dark(&self, r: i16, c: i16) -> bool {
        self.get(r, c).is_dark()
    }

    /// Collapses the typed grid into the plain dark-module matrix consumed by
    /// the rasterizer.
    pub fn to_module_grid(&self) -> ModuleGrid {
        debug_assert!(self.mask.is_some(), "Symbol has not been masked");

        let w = self.w;
        let mut dark = vec![false; w * w];
        for (i, m) in self.grid.iter().enumerate() {
            dark[i] = m.is_dark();
        }
        ModuleGrid { side: w, dark }
    }

    #[cfg(test)]
    pub(crate) fn to_debug_str(&self) -> String {
        let w = self.w as i16;
        let mut res = String::with_capacity((w * (w + 1)) as usize);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                let c = match self.get(i, j) {
                    Module::Empty => '.',
                    Module::Func(true) => 'f',
                    Module::Func(false) => 'F',
                    Module::Format(true) => 'm',
                    Module::Format(false) => 'M',
                    Module::Version(true) => 'v',
                    Module::Version(false) => 'V',
                    Module::Data(true) => 'd',
                    Module::Data(false) => 'D',
                };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }
}

// Function patterns
//------------------------------------------------------------------------------

impl Symbol {
    pub(crate) fn draw_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_timing_patterns();
        self.draw_alignment_patterns();
        // Dark module above the bottom left finder
        self.set(-8, 8, Module::Func(true));
    }

    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, -4);
        self.draw_finder_pattern_at(-4, 3);
    }

    // 7x7 finder ringed by a one-module separator, clipped at the edges
    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        let (top, bottom): (i16, i16) = if r > 0 { (-3, 4) } else { (-4, 3) };
        let (left, right): (i16, i16) = if c > 0 { (-3, 4) } else { (-4, 3) };
        for i in top..=bottom {
            for j in left..=right {
                let dark = match (i.abs(), j.abs()) {
                    (4, _) | (_, 4) => false,
                    (3, _) | (_, 3) => true,
                    (2, _) | (_, 2) => false,
                    _ => true,
                };
                self.set(r + i, c + j, Module::Func(dark));
            }
        }
    }

    fn draw_timing_patterns(&mut self) {
        let w = self.w as i16;
        for x in 8..w - 8 {
            let dark = x & 1 == 0;
            self.set(6, x, Module::Func(dark));
            self.set(x, 6, Module::Func(dark));
        }
    }

    fn draw_alignment_patterns(&mut self) {
        let w = self.w as i16;
        let poses = self.ver.alignment_pattern();
        for &r in poses {
            for &c in poses {
                // The three finder corners host no alignment pattern
                if (r == 6 && (c == 6 || c == w - 7)) || (r == w - 7 && c == 6) {
                    continue;
                }
                for i in -2i16..=2 {
                    for j in -2i16..=2 {
                        let dark = (i == 0 && j == 0) || i.abs() == 2 || j.abs() == 2;
                        self.set(r + i, c + j, Module::Func(dark));
                    }
                }
            }
        }
    }
}

// Format and version info
//------------------------------------------------------------------------------

impl Symbol {
    // Claims the format cells before data placement; the real word is drawn
    // once the mask is chosen
    fn reserve_format_area(&mut self) {
        self.draw_format_info((1 << FORMAT_INFO_BIT_LEN) - 1);
    }

    fn draw_format_info(&mut self, info: u32) {
        self.draw_number(info, FORMAT_INFO_BIT_LEN, Module::Format, &FORMAT_INFO_COORDS_MAIN);
        self.draw_number(info, FORMAT_INFO_BIT_LEN, Module::Format, &FORMAT_INFO_COORDS_SIDE);
    }

    fn draw_version_info(&mut self) {
        if self.ver.number() < 7 {
            return;
        }
        let info = self.ver.info();
        self.draw_number(info, VERSION_INFO_BIT_LEN, Module::Version, &VERSION_INFO_COORDS_BL);
        self.draw_number(info, VERSION_INFO_BIT_LEN, Module::Version, &VERSION_INFO_COORDS_TR);
    }

    // Coords are listed least significant bit first
    fn draw_number(
        &mut self,
        number: u32,
        bit_len: usize,
        to_module: fn(bool) -> Module,
        coords: &[(i16, i16)],
    ) {
        debug_assert!(coords.len() == bit_len, "Coordinate count doesn't match bit length");

        for (i, &(r, c)) in coords.iter().enumerate() {
            let bit = (number >> i) & 1 == 1;
            self.set(r, c, to_module(bit));
        }
    }
}

// Encoding region
//------------------------------------------------------------------------------

impl Symbol {
    pub(crate) fn draw_encoding_region(&mut self, payload: &BitStream) {
        self.reserve_format_area();
        self.draw_version_info();
        self.draw_payload(payload);

        debug_assert!(
            !self.grid.contains(&Module::Empty),
            "Empty module left after encoding region was drawn"
        );
    }

    fn draw_payload(&mut self, payload: &BitStream) {
        let mut coords = EncRegionIter::new(self.ver);
        for bit in payload {
            for (r, c) in coords.by_ref() {
                if self.get(r, c) == Module::Empty {
                    self.set(r, c, Module::Data(bit));
                    break;
                }
            }
        }

        // Whatever the traversal still finds empty are the remainder bits
        for (r, c) in coords {
            if self.get(r, c) == Module::Empty {
                self.set(r, c, Module::Data(false));
            }
        }
    }

    /// Flips data modules under the mask predicate and stamps the matching
    /// format information word.
    pub(crate) fn apply_mask(&mut self, pattern: MaskPattern) {
        let mask_fn = pattern.mask_function();
        let w = self.w as i16;
        for r in 0..w {
            for c in 0..w {
                if mask_fn(r, c) {
                    if let Module::Data(dark) = self.get(r, c) {
                        self.set(r, c, Module::Data(!dark));
                    }
                }
            }
        }
        self.mask = Some(pattern);
        self.draw_format_info(format_info(self.ecl, *pattern));
    }
}

// Module grid
//------------------------------------------------------------------------------

/// Square matrix of dark-module flags, the encoder's output and the
/// rasterizer's input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleGrid {
    side: usize,
    dark: Vec<bool>,
}

impl ModuleGrid {
    pub fn side(&self) -> usize {
        self.side
    }

    pub fn get(&self, r: usize, c: usize) -> bool {
        debug_assert!(r < self.side && c < self.side, "Module out of bounds: {r} {c}");
        self.dark[r * self.side + c]
    }

    #[cfg(test)]
    pub(crate) fn from_fn(side: usize, f: impl Fn(usize, usize) -> bool) -> Self {
        let mut dark = vec![false; side * side];
        for r in 0..side {
            for c in 0..side {
                dark[r * side + c] = f(r, c);
            }
        }
        Self { side, dark }
    }
}



#[cfg(test)]
mod info_tests {
    use super::{Module, Symbol};
    use crate::common::mask::MaskPattern;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_format_info_cells_reserved() {
        let mut sym = Symbol::new(Version::new(1).unwrap(), ECLevel::L);
        sym.reserve_format_area();
        let format_cells =
            sym.grid.iter().filter(|m| matches!(**m, Module::Format(_))).count();
        // Two copies of 15 bits share the (8, 8) region corner cell count
        assert_eq!(format_cells, 30);
    }

    #[test]
    fn test_format_info_word_m0() {
        // Format word for (M, mask 0) is 0x5412: 101010000010010, LSB first
        // along row 8 then up column 8
        let mut sym = Symbol::new(Version::new(1).unwrap(), ECLevel::M);
        sym.apply_mask(MaskPattern::new(0));
        // Bit 14 (1) lands at (8, 0); bit 0 (0) at (0, 8)
        assert_eq!(sym.get(8, 0), Module::Format(true));
        assert_eq!(sym.get(0, 8), Module::Format(false));
        // Second copy: bit 0 at (8, -1), bit 14 at (-1, 8)
        assert_eq!(sym.get(8, -1), Module::Format(false));
        assert_eq!(sym.get(-1, 8), Module::Format(true));
    }

    #[test]
    fn test_version_info_absent_below_v7() {
        let mut sym = Symbol::new(Version::new(6).unwrap(), ECLevel::L);
        sym.draw_version_info();
        assert!(sym.grid.iter().all(|m| !matches!(*m, Module::Version(_))));
    }

    #[test]
    fn test_version_info_v7() {
        // Version info word for v7 is 0x07C94
        let mut sym = Symbol::new(Version::new(7).unwrap(), ECLevel::L);
        sym.draw_version_info();
        let cells = sym.grid.iter().filter(|m| matches!(**m, Module::Version(_))).count();
        assert_eq!(cells, 36);
        // LSB (0) at (-11, 0) and its transpose (0, -11)
        assert_eq!(sym.get(-11, 0), Module::Version(false));
        assert_eq!(sym.get(0, -11), Module::Version(false));
        // Bit 2 (1) at (-9, 0) and (2, -11)... bit layout walks rows fastest
        assert_eq!(sym.get(-9, 0), Module::Version(true));
        assert_eq!(sym.get(0, -9), Module::Version(true));
    }
}
