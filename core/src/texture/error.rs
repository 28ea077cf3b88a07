//! Error types for texture creation and pixel access.

use thiserror::Error;

use super::TextureFormat;

/// Errors returned by fallible [`Texture`](super::Texture) operations.
///
/// A failed operation never leaves a partially written texture behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextureError {
    /// Width or height was zero.
    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroSize { width: u32, height: u32 },
    /// A format tag outside the supported set.
    #[error("unknown texture format tag {0}")]
    UnknownFormat(u32),
    /// The pixel buffer could not be allocated.
    #[error("out of memory allocating {bytes} bytes of pixel data")]
    OutOfMemory { bytes: usize },
    /// The operation does not apply to the texture's format.
    #[error("operation not supported for {0:?} textures")]
    FormatMismatch(TextureFormat),
    /// A bulk source held fewer bytes than the texture requires.
    #[error("pixel source too small: expected {expected} bytes, got {actual}")]
    SourceTooSmall { expected: usize, actual: usize },
    /// A pixel coordinate outside the texture.
    #[error("pixel ({x}, {y}) out of bounds for {width}x{height} texture")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TextureError::ZeroSize {
            width: 0,
            height: 4,
        };
        assert_eq!(err.to_string(), "texture dimensions must be non-zero, got 0x4");

        let err = TextureError::FormatMismatch(TextureFormat::Depth32Float);
        assert_eq!(
            err.to_string(),
            "operation not supported for Depth32Float textures"
        );
    }
}
