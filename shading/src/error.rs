//! Shading error types.

use thiserror::Error;

use crate::context::{VaryingKind, MAX_VARYINGS};

/// Errors that can occur while running a shading stage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShadingError {
    /// A vertex stage wrote a varying slot the shader context does not have.
    #[error("{kind} varying slot {slot} is out of range (capacity {})", MAX_VARYINGS)]
    SlotOutOfRange { kind: VaryingKind, slot: usize },
}
