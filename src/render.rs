use image::{Rgba, RgbaImage};

use crate::builder::ModuleGrid;
use crate::common::error::{QRError, QRResult};

// Rasterizer
//------------------------------------------------------------------------------

/// Maps a module grid to pixels: every module becomes a `module_size` square,
/// ringed by `border` quiet-zone modules of the background color.
///
/// The output is square with side `(grid.side() + 2 * border) * module_size`.
pub fn rasterize(
    grid: &ModuleGrid,
    module_size: u32,
    border: u32,
    fill: Rgba<u8>,
    back: Rgba<u8>,
) -> QRResult<RgbaImage> {
    if module_size < 1 {
        return Err(QRError::InvalidDimensions);
    }

    let side = (grid.side() as u32 + 2 * border) * module_size;
    let mut canvas = RgbaImage::from_pixel(side, side, back);

    for r in 0..grid.side() {
        for c in 0..grid.side() {
            if !grid.get(r, c) {
                continue;
            }
            let y0 = (r as u32 + border) * module_size;
            let x0 = (c as u32 + border) * module_size;
            for y in y0..y0 + module_size {
                for x in x0..x0 + module_size {
                    canvas.put_pixel(x, y, fill);
                }
            }
        }
    }

    Ok(canvas)
}

/// Terminal rendering, one character per module. Light modules and the quiet
/// zone print as full blocks so the symbol scans on dark terminals.
pub fn to_str(grid: &ModuleGrid, border: usize) -> String {
    let side = grid.side() + 2 * border;
    let mut canvas = String::with_capacity(side * (side + 1));
    for i in 0..side {
        for j in 0..side {
            let in_symbol = (border..border + grid.side()).contains(&i)
                && (border..border + grid.side()).contains(&j);
            let dark = in_symbol && grid.get(i - border, j - border);
            canvas.push(if dark { ' ' } else { '█' });
        }
        canvas.push('\n');
    }
    canvas
}
