pub mod bitstream;
pub mod codec;
pub mod error;
pub mod iter;
pub mod mask;
pub mod metadata;

pub use bitstream::BitStream;
pub use error::{QRError, QRResult};
pub use mask::MaskPattern;
pub use metadata::{ECLevel, Version, MAX_VERSION};
