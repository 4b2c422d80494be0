use std::path::{Path, PathBuf};

use image::{DynamicImage, Rgba, RgbaImage};
use tracing::{debug, warn};

use crate::builder::SymbolBuilder;
use crate::common::error::QRError;
use crate::common::metadata::ECLevel;
use crate::compose::{self, Anchor, LogoError};
use crate::config::Config;
use crate::error::GenerationError;
use crate::render;

// Pipeline orchestrator
//------------------------------------------------------------------------------

/// Longest side of the preview thumbnail.
const THUMBNAIL_MAX: u32 = 200;

/// One generation's immutable inputs.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub text: String,
    pub error_level: ECLevel,
    /// Pixels per module.
    pub module_size: u32,
    /// Quiet-zone width in modules. Zero still renders, though most scanners
    /// need at least one.
    pub border_modules: u32,
    pub fill: Rgba<u8>,
    pub back: Rgba<u8>,
    pub logo: Option<LogoSpec>,
}

#[derive(Debug, Clone)]
pub struct LogoSpec {
    pub path: PathBuf,
    pub anchor: Anchor,
}

impl GenerationRequest {
    /// A request with the original application's interactive defaults.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            error_level: ECLevel::H,
            module_size: 40,
            border_modules: 4,
            fill: Rgba([0, 0, 0, 255]),
            back: Rgba([255, 255, 255, 255]),
            logo: None,
        }
    }

    /// Builds a request from persisted settings; colors fall back to black on
    /// white if the stored strings no longer parse.
    pub fn from_config(text: impl Into<String>, config: &Config) -> Self {
        let mut req = Self::new(text);
        req.error_level = config.error_level;
        req.fill = config.fill().unwrap_or(Rgba([0, 0, 0, 255]));
        req.back = config.back().unwrap_or(Rgba([255, 255, 255, 255]));
        if config.use_logo {
            if let Some(path) = &config.logo_path {
                req.logo = Some(LogoSpec { path: path.clone(), anchor: config.logo_position });
            }
        }
        req
    }
}

/// The finished artifact: full-resolution image, display thumbnail and any
/// recoverable logo failure.
#[derive(Debug)]
pub struct GenerationOutput {
    pub image: RgbaImage,
    pub thumbnail: RgbaImage,
    pub logo_warning: Option<LogoError>,
}

impl GenerationOutput {
    /// Writes the full-resolution image as PNG. The in-memory image is
    /// untouched, so a failed export can be retried without regenerating.
    pub fn export_png(&self, path: &Path) -> Result<(), GenerationError> {
        self.image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    /// Row-major RGBA8 pixels for clipboard or other external conversion.
    pub fn as_raw_rgba(&self) -> &[u8] {
        self.image.as_raw()
    }
}

/// Runs the full pipeline: validate, encode, rasterize, composite, thumbnail.
///
/// Stateless and deterministic apart from reading the logo file; safe to call
/// from any number of threads on independent requests.
pub fn generate(request: &GenerationRequest) -> Result<GenerationOutput, GenerationError> {
    if request.text.is_empty() {
        return Err(GenerationError::InvalidInput("text must not be empty".into()));
    }
    if request.module_size < 1 {
        return Err(GenerationError::InvalidInput("module size must be at least 1".into()));
    }

    let symbol = SymbolBuilder::new(request.text.as_bytes())
        .ec_level(request.error_level)
        .build()
        .map_err(|e| match e {
            QRError::DataTooLong => GenerationError::CapacityExceeded {
                len: request.text.len(),
                level: request.error_level,
            },
            other => other.into(),
        })?;
    debug!(version = symbol.version().number(), width = symbol.width(), "symbol encoded");

    let grid = symbol.to_module_grid();
    let raster = render::rasterize(
        &grid,
        request.module_size,
        request.border_modules,
        request.fill,
        request.back,
    )?;

    let (image, logo_warning) = match &request.logo {
        Some(spec) => match compose::load_logo(&spec.path) {
            Ok(logo) => (compose::overlay_logo(&raster, &logo, spec.anchor), None),
            Err(e) => {
                warn!(error = %e, "skipping logo overlay");
                (raster, Some(e))
            }
        },
        None => (raster, None),
    };

    // Already-small images pass through; the thumbnail never upscales
    let thumbnail = if image.width().max(image.height()) > THUMBNAIL_MAX {
        DynamicImage::ImageRgba8(image.clone()).thumbnail(THUMBNAIL_MAX, THUMBNAIL_MAX).to_rgba8()
    } else {
        image.clone()
    };

    Ok(GenerationOutput { image, thumbnail, logo_warning })
}

#[cfg(test)]
mod pipeline_tests {
    use super::*;

    fn small_request(text: &str) -> GenerationRequest {
        let mut req = GenerationRequest::new(text);
        req.module_size = 4;
        req
    }

    #[test]
    fn test_empty_text_rejected_before_encoding() {
        let err = generate(&small_request("")).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidInput(_)));
    }

    #[test]
    fn test_zero_module_size_rejected() {
        let mut req = small_request("hello");
        req.module_size = 0;
        let err = generate(&req).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidInput(_)));
    }

    #[test]
    fn test_capacity_exceeded() {
        let req = small_request(&"a".repeat(4000));
        let err = generate(&req).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::CapacityExceeded { len: 4000, level: ECLevel::H }
        ));
    }

    #[test]
    fn test_thumbnail_bounded_and_aspect_preserving() {
        let mut req = small_request("https://example.com");
        req.module_size = 20;
        let out = generate(&req).unwrap();
        assert!(out.image.width() > THUMBNAIL_MAX);
        assert_eq!(out.thumbnail.width(), THUMBNAIL_MAX);
        assert_eq!(out.thumbnail.height(), THUMBNAIL_MAX);
    }

    #[test]
    fn test_small_image_not_upscaled_to_thumbnail() {
        let mut req = small_request("hi");
        req.module_size = 1;
        req.border_modules = 0;
        let out = generate(&req).unwrap();
        assert_eq!(out.thumbnail.width(), out.image.width());
    }

    #[test]
    fn test_missing_logo_is_soft_failure() {
        let mut req = small_request("https://example.com");
        req.logo =
            Some(LogoSpec { path: PathBuf::from("/nonexistent/logo.png"), anchor: Anchor::Center });
        let out = generate(&req).unwrap();
        assert!(matches!(out.logo_warning, Some(LogoError::NotFound(_))));

        // Identical to the logo-free output
        let mut plain = small_request("https://example.com");
        plain.logo = None;
        let plain_out = generate(&plain).unwrap();
        assert_eq!(out.image.as_raw(), plain_out.image.as_raw());
    }

    #[test]
    fn test_raw_rgba_exposed() {
        let out = generate(&small_request("clipboard")).unwrap();
        let expected = (out.image.width() * out.image.height() * 4) as usize;
        assert_eq!(out.as_raw_rgba().len(), expected);
    }
}
