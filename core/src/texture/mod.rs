//! CPU-side texture store.
//!
//! Provides [`Texture`] for holding pixel data in one of the closed set of
//! [`TextureFormat`]s, nearest-neighbor [`sample`]-ing with color-space aware
//! decode, and the direct per-pixel writes used by framebuffer attachments.

mod error;
mod types;

pub use error::TextureError;
pub use types::{sample, Texture, TextureFormat, FALLBACK_COLOR};
