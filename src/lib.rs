//! # qremblem
//!
//! A QR code generator with color styling and alpha-blended logo overlays.
//! Symbols are encoded from scratch: byte-mode data streams, Reed-Solomon
//! error correction, penalty-scored masking and automatic version selection
//! up to version 40.
//!
//! ## Quick start
//!
//! ```rust
//! use qremblem::{generate, GenerationRequest};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut request = GenerationRequest::new("https://example.com");
//! request.module_size = 10;
//! let output = generate(&request)?;
//! output.export_png(std::path::Path::new("qr.png"))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Logo overlays
//!
//! ```rust,no_run
//! use qremblem::{generate, Anchor, GenerationRequest, LogoSpec};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut request = GenerationRequest::new("https://example.com");
//! request.logo = Some(LogoSpec { path: "logo.png".into(), anchor: Anchor::Center });
//! let output = generate(&request)?;
//! if let Some(warning) = &output.logo_warning {
//!     eprintln!("generated without logo: {warning}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The low-level pieces are exposed too: [`SymbolBuilder`] produces a
//! [`ModuleGrid`], [`render::rasterize`] turns it into pixels and
//! [`compose::overlay_logo`] blends a logo in. Each stage is a pure function
//! over its inputs, so identical requests always produce identical images.

pub mod builder;
pub(crate) mod common;
pub mod compose;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod render;

pub use builder::{ModuleGrid, Symbol, SymbolBuilder};
pub use common::error::{QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{ECLevel, Version};
pub use compose::{Anchor, LogoError};
pub use config::Config;
pub use error::GenerationError;
pub use pipeline::{generate, GenerationOutput, GenerationRequest, LogoSpec};
