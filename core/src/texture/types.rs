//! Texture format and pixel storage.

use crate::color::{decode_color, encode_color};
use crate::math::{clamp01, Vec2, Vec4};

use super::TextureError;

/// Color returned when sampling without a bound texture.
pub const FALLBACK_COLOR: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);

/// Pixel format of a [`Texture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureFormat {
    /// 8-bit RGBA channels, linear.
    #[default]
    Rgba8Unorm,
    /// 8-bit RGBA channels, RGB display-encoded (alpha stays linear).
    Rgba8UnormSrgb,
    /// Single 32-bit float depth channel.
    Depth32Float,
}

impl TextureFormat {
    /// Resolve a format from its fixed numeric tag.
    pub fn from_tag(tag: u32) -> Result<Self, TextureError> {
        match tag {
            0 => Ok(Self::Rgba8Unorm),
            1 => Ok(Self::Rgba8UnormSrgb),
            2 => Ok(Self::Depth32Float),
            other => Err(TextureError::UnknownFormat(other)),
        }
    }

    /// The fixed numeric tag of this format.
    pub fn tag(&self) -> u32 {
        match self {
            Self::Rgba8Unorm => 0,
            Self::Rgba8UnormSrgb => 1,
            Self::Depth32Float => 2,
        }
    }

    /// Size in bytes of one pixel.
    pub fn pixel_size(&self) -> usize {
        match self {
            Self::Rgba8Unorm | Self::Rgba8UnormSrgb => 4,
            Self::Depth32Float => std::mem::size_of::<f32>(),
        }
    }

    /// Returns true if RGB channels are stored display-encoded.
    pub fn is_srgb(&self) -> bool {
        matches!(self, Self::Rgba8UnormSrgb)
    }

    /// Returns true if this is the depth format.
    pub fn is_depth(&self) -> bool {
        matches!(self, Self::Depth32Float)
    }
}

#[derive(Clone)]
enum PixelStorage {
    Color(Vec<[u8; 4]>),
    Depth(Vec<f32>),
}

/// A 2D grid of pixels with fixed format and dimensions.
///
/// The first pixel is the bottom-left texel; rows run bottom to top. The
/// pixel buffer always holds exactly `width * height` pixels.
///
/// A texture has a single owner. Share it read-only by wrapping it in an
/// `Arc`; concurrent sampling needs no synchronization, but writes require
/// exclusive access.
#[derive(Clone)]
pub struct Texture {
    format: TextureFormat,
    width: u32,
    height: u32,
    storage: PixelStorage,
}

fn allocate<T: Clone>(count: usize, fill: T, bytes: usize) -> Result<Vec<T>, TextureError> {
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(count)
        .map_err(|_| TextureError::OutOfMemory { bytes })?;
    pixels.resize(count, fill);
    Ok(pixels)
}

impl Texture {
    /// Create a texture with zeroed pixels.
    pub fn create(format: TextureFormat, width: u32, height: u32) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::ZeroSize { width, height });
        }
        let pixel_count = width as usize * height as usize;
        let bytes = pixel_count.saturating_mul(format.pixel_size());
        let storage = match format {
            TextureFormat::Rgba8Unorm | TextureFormat::Rgba8UnormSrgb => {
                PixelStorage::Color(allocate(pixel_count, [0; 4], bytes)?)
            }
            TextureFormat::Depth32Float => PixelStorage::Depth(allocate(pixel_count, 0.0, bytes)?),
        };
        log::trace!("Created {format:?} texture {width}x{height} ({bytes} bytes)");
        Ok(Self {
            format,
            width,
            height,
            storage,
        })
    }

    /// Create a texture from a numeric format tag.
    pub fn create_from_tag(tag: u32, width: u32, height: u32) -> Result<Self, TextureError> {
        Self::create(TextureFormat::from_tag(tag)?, width, height)
    }

    /// Release the texture and its pixel buffer.
    pub fn destroy(self) {
        log::trace!(
            "Destroyed {:?} texture {}x{}",
            self.format,
            self.width,
            self.height
        );
    }

    /// Get the pixel format.
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Get the width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw pixel bytes, `width * height * pixel_size` long.
    pub fn pixels(&self) -> &[u8] {
        match &self.storage {
            PixelStorage::Color(pixels) => bytemuck::cast_slice(pixels),
            PixelStorage::Depth(depths) => bytemuck::cast_slice(depths),
        }
    }

    /// Copy tightly packed RGB data into a color texture.
    ///
    /// Each 3-byte source pixel is expanded to RGBA with alpha forced to 255.
    /// Bytes beyond `width * height * 3` are ignored.
    pub fn set_pixels(&mut self, rgb: &[u8]) -> Result<(), TextureError> {
        let expected = self.pixel_count() * 3;
        let format = self.format;
        let PixelStorage::Color(pixels) = &mut self.storage else {
            return Err(TextureError::FormatMismatch(format));
        };
        if rgb.len() < expected {
            return Err(TextureError::SourceTooSmall {
                expected,
                actual: rgb.len(),
            });
        }
        for (pixel, src) in pixels.iter_mut().zip(rgb.chunks_exact(3)) {
            *pixel = [src[0], src[1], src[2], 0xFF];
        }
        Ok(())
    }

    /// Sample the texel nearest to `uv`.
    ///
    /// Coordinates are clamped to `[0, 1]` (clamp-to-edge). sRGB texels are
    /// converted to linear; depth is replicated to RGB with alpha 1.
    pub fn sample(&self, uv: Vec2) -> Vec4 {
        let u = clamp01(uv.x);
        let v = clamp01(uv.y);
        // u == 1.0 lands on `width`; pull it back onto the last texel.
        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);
        let offset = self.offset(x, y);
        match &self.storage {
            PixelStorage::Color(pixels) => decode_color(pixels[offset], self.format.is_srgb()),
            PixelStorage::Depth(depths) => {
                let depth = depths[offset];
                Vec4::new(depth, depth, depth, 1.0)
            }
        }
    }

    /// Write a shaded color to a color texture.
    ///
    /// The color is clamped and, for sRGB textures, display-encoded.
    pub fn write_color(&mut self, x: u32, y: u32, color: Vec4) -> Result<(), TextureError> {
        let offset = self.checked_offset(x, y)?;
        let srgb = self.format.is_srgb();
        match &mut self.storage {
            PixelStorage::Color(pixels) => {
                pixels[offset] = encode_color(color, srgb);
                Ok(())
            }
            PixelStorage::Depth(_) => Err(TextureError::FormatMismatch(self.format)),
        }
    }

    /// Write a depth value to a depth texture.
    pub fn write_depth(&mut self, x: u32, y: u32, depth: f32) -> Result<(), TextureError> {
        let offset = self.checked_offset(x, y)?;
        match &mut self.storage {
            PixelStorage::Depth(depths) => {
                depths[offset] = depth;
                Ok(())
            }
            PixelStorage::Color(_) => Err(TextureError::FormatMismatch(self.format)),
        }
    }

    /// Read a depth value from a depth texture.
    pub fn depth_at(&self, x: u32, y: u32) -> Result<f32, TextureError> {
        let offset = self.checked_offset(x, y)?;
        match &self.storage {
            PixelStorage::Depth(depths) => Ok(depths[offset]),
            PixelStorage::Color(_) => Err(TextureError::FormatMismatch(self.format)),
        }
    }

    /// Fill every pixel of a color texture with `color`.
    pub fn clear_color(&mut self, color: Vec4) -> Result<(), TextureError> {
        let encoded = encode_color(color, self.format.is_srgb());
        match &mut self.storage {
            PixelStorage::Color(pixels) => {
                pixels.fill(encoded);
                Ok(())
            }
            PixelStorage::Depth(_) => Err(TextureError::FormatMismatch(self.format)),
        }
    }

    /// Fill every pixel of a depth texture with `depth`.
    pub fn clear_depth(&mut self, depth: f32) -> Result<(), TextureError> {
        match &mut self.storage {
            PixelStorage::Depth(depths) => {
                depths.fill(depth);
                Ok(())
            }
            PixelStorage::Color(_) => Err(TextureError::FormatMismatch(self.format)),
        }
    }

    fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        x as usize + y as usize * self.width as usize
    }

    fn checked_offset(&self, x: u32, y: u32) -> Result<usize, TextureError> {
        if x >= self.width || y >= self.height {
            return Err(TextureError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.offset(x, y))
    }
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("format", &self.format)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Sample an optional texture.
///
/// An absent texture samples as [`FALLBACK_COLOR`] (opaque white), so
/// materials can treat "no map bound" as a neutral multiplier.
pub fn sample(texture: Option<&Texture>, uv: Vec2) -> Vec4 {
    texture.map_or(FALLBACK_COLOR, |t| t.sample(uv))
}
