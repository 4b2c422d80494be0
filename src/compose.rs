use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, RgbaImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::common::error::QRError;

// Logo compositor
//------------------------------------------------------------------------------

/// Fraction of the raster width the logo's longer side is scaled to.
const LOGO_SCALE_DIVISOR: u32 = 5;

/// Where the logo lands on the rasterized symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Anchor {
    /// Top-left paste offset for a `lw` x `lh` logo on a `w` x `h` raster.
    pub(crate) fn offsets(self, (w, h): (u32, u32), (lw, lh): (u32, u32)) -> (i64, i64) {
        let (w, h) = (w as i64, h as i64);
        let (lw, lh) = (lw as i64, lh as i64);
        match self {
            Self::Center => ((w - lw) / 2, (h - lh) / 2),
            Self::TopLeft => (0, 0),
            Self::TopRight => (w - lw, 0),
            Self::BottomLeft => (0, h - lh),
            Self::BottomRight => (w - lw, h - lh),
        }
    }
}

impl std::str::FromStr for Anchor {
    type Err = QRError;
    fn from_str(s: &str) -> Result<Self, QRError> {
        match s {
            "center" => Ok(Self::Center),
            "top-left" => Ok(Self::TopLeft),
            "top-right" => Ok(Self::TopRight),
            "bottom-left" => Ok(Self::BottomLeft),
            "bottom-right" => Ok(Self::BottomRight),
            _ => Err(QRError::InvalidAnchor),
        }
    }
}

impl std::fmt::Display for Anchor {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::Center => "center",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        };
        f.write_str(s)
    }
}

/// Recoverable logo failure: generation proceeds without the overlay.
#[derive(Debug, Error)]
pub enum LogoError {
    #[error("logo file not found: {0}")]
    NotFound(std::path::PathBuf),
    #[error("failed to read or decode logo: {0}")]
    Unreadable(#[from] image::ImageError),
}

/// Reads and decodes the logo image from disk.
pub fn load_logo(path: &Path) -> Result<DynamicImage, LogoError> {
    if !path.is_file() {
        return Err(LogoError::NotFound(path.to_path_buf()));
    }
    Ok(image::open(path)?)
}

/// Alpha-blends `logo` onto a copy of `raster` at the given anchor.
///
/// The logo is downscaled (aspect preserving, Lanczos3) so its longer side is
/// at most a fifth of the raster width; smaller logos are never upscaled.
/// Pixels outside the logo's footprint are untouched. No attempt is made to
/// relate the covered area to the symbol's error correction budget, so a large
/// logo over a low EC level can make the symbol unscannable.
pub fn overlay_logo(raster: &RgbaImage, logo: &DynamicImage, anchor: Anchor) -> RgbaImage {
    let cap = raster.width() / LOGO_SCALE_DIVISOR;
    let (lw, lh) = logo.dimensions();

    let scaled;
    let logo = if lw.max(lh) > cap {
        scaled = logo.resize(cap, cap, FilterType::Lanczos3);
        &scaled
    } else {
        logo
    };

    let mut out = raster.clone();
    let (x, y) = anchor.offsets(out.dimensions(), logo.dimensions());
    imageops::overlay(&mut out, &logo.to_rgba8(), x, y);
    out
}

#[cfg(test)]
mod compose_tests {
    use image::{DynamicImage, Rgba, RgbaImage};
    use imageproc::drawing::draw_filled_circle_mut;
    use test_case::test_case;

    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn solid_logo(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, RED))
    }

    fn white_raster(side: u32) -> RgbaImage {
        RgbaImage::from_pixel(side, side, WHITE)
    }

    #[test_case(Anchor::TopRight, (80, 0))]
    #[test_case(Anchor::BottomLeft, (0, 80))]
    #[test_case(Anchor::TopLeft, (0, 0))]
    #[test_case(Anchor::BottomRight, (80, 80))]
    #[test_case(Anchor::Center, (40, 40))]
    fn test_anchor_offsets(anchor: Anchor, expected: (i64, i64)) {
        assert_eq!(anchor.offsets((100, 100), (20, 20)), expected);
    }

    #[test]
    fn test_overlay_placement_top_right() {
        let raster = white_raster(100);
        let out = overlay_logo(&raster, &solid_logo(20, 20), Anchor::TopRight);
        assert_eq!(*out.get_pixel(80, 0), RED);
        assert_eq!(*out.get_pixel(99, 19), RED);
        // One pixel left of the footprint is untouched
        assert_eq!(*out.get_pixel(79, 0), WHITE);
        assert_eq!(*out.get_pixel(0, 0), WHITE);
    }

    #[test]
    fn test_oversized_logo_capped_to_fifth() {
        let raster = white_raster(200);
        let out = overlay_logo(&raster, &solid_logo(400, 400), Anchor::Center);
        // Scaled to 40x40, centered at (80..120)
        assert_eq!(*out.get_pixel(100, 100), RED);
        assert_eq!(*out.get_pixel(75, 100), WHITE);
        assert_eq!(*out.get_pixel(100, 75), WHITE);
    }

    #[test]
    fn test_small_logo_not_upscaled() {
        let raster = white_raster(500);
        let out = overlay_logo(&raster, &solid_logo(10, 10), Anchor::TopLeft);
        assert_eq!(*out.get_pixel(9, 9), RED);
        assert_eq!(*out.get_pixel(10, 10), WHITE);
    }

    #[test]
    fn test_aspect_ratio_preserved() {
        let raster = white_raster(100);
        // 2:1 logo scales to 20x10
        let out = overlay_logo(&raster, &solid_logo(200, 100), Anchor::TopLeft);
        assert_eq!(*out.get_pixel(19, 9), RED);
        assert_eq!(*out.get_pixel(19, 10), WHITE);
        assert_eq!(*out.get_pixel(20, 9), WHITE);
    }

    #[test]
    fn test_alpha_blending() {
        let raster = white_raster(100);
        // Half-transparent black square blends to gray
        let logo = DynamicImage::ImageRgba8(RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 128])));
        let out = overlay_logo(&raster, &logo, Anchor::TopLeft);
        let px = out.get_pixel(5, 5);
        assert!(px[0] > 100 && px[0] < 150, "expected blended gray, got {px:?}");
        assert_eq!(px[3], 255);
    }

    #[test]
    fn test_transparent_pixels_leave_raster() {
        let raster = white_raster(100);
        let mut logo = RgbaImage::from_pixel(21, 21, Rgba([0, 0, 0, 0]));
        draw_filled_circle_mut(&mut logo, (10, 10), 5, RED);
        let out = overlay_logo(&raster, &DynamicImage::ImageRgba8(logo), Anchor::TopLeft);
        // Center of the circle is red, fully transparent corner stays white
        assert_eq!(*out.get_pixel(10, 10), RED);
        assert_eq!(*out.get_pixel(0, 0), WHITE);
    }

    #[test]
    fn test_load_logo_missing_file() {
        let err = load_logo(std::path::Path::new("/nonexistent/logo.png")).unwrap_err();
        assert!(matches!(err, LogoError::NotFound(_)));
    }

    #[test]
    fn test_anchor_round_trip() {
        for s in ["center", "top-left", "top-right", "bottom-left", "bottom-right"] {
            let anchor: Anchor = s.parse().unwrap();
            assert_eq!(anchor.to_string(), s);
        }
        assert!("middle".parse::<Anchor>().is_err());
    }
}
