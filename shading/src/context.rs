//! Varyings passed from a vertex stage to its fragment stage.
//!
//! A [`ShaderContext`] holds a fixed number of slots for each value kind.
//! The vertex stage fills the slots its fragment stage expects; the
//! rasterizer interpolates every written slot across the triangle with
//! [`ShaderContext::interpolate`] before calling the fragment stage. Slot
//! numbering is private to each vertex/fragment pair.

use std::fmt;
use std::ops::{Add, Mul};

use emberlit_core::math::{Vec2, Vec3, Vec4};

use crate::ShadingError;

/// Number of slots per value kind.
pub const MAX_VARYINGS: usize = 4;

/// Value kind of a varying slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VaryingKind {
    Float,
    Vec2,
    Vec3,
    Vec4,
}

impl fmt::Display for VaryingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Float => "float",
            Self::Vec2 => "vec2",
            Self::Vec3 => "vec3",
            Self::Vec4 => "vec4",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Slots<T> {
    values: [T; MAX_VARYINGS],
    used: [bool; MAX_VARYINGS],
}

impl<T> Slots<T>
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    fn new(zero: T) -> Self {
        Self {
            values: [zero; MAX_VARYINGS],
            used: [false; MAX_VARYINGS],
        }
    }

    fn set(&mut self, kind: VaryingKind, slot: usize, value: T) -> Result<(), ShadingError> {
        if slot >= MAX_VARYINGS {
            return Err(ShadingError::SlotOutOfRange { kind, slot });
        }
        self.values[slot] = value;
        self.used[slot] = true;
        Ok(())
    }

    fn get(&self, slot: usize, zero: T) -> T {
        match self.used.get(slot) {
            Some(true) => self.values[slot],
            _ => zero,
        }
    }

    fn is_set(&self, slot: usize) -> bool {
        self.used.get(slot).copied().unwrap_or(false)
    }

    fn clear(&mut self) {
        self.used = [false; MAX_VARYINGS];
    }

    /// Blend every slot written in `sources[0]`; `weights` must sum to 1.
    fn blend(&mut self, sources: [&Self; 3], weights: [f32; 3]) {
        for slot in 0..MAX_VARYINGS {
            if !sources[0].used[slot] {
                continue;
            }
            self.values[slot] = sources[0].values[slot] * weights[0]
                + sources[1].values[slot] * weights[1]
                + sources[2].values[slot] * weights[2];
            self.used[slot] = true;
        }
    }
}

/// Fixed-capacity slot storage for interpolated shading inputs.
///
/// Reading a slot that was never written, or one past the capacity, yields
/// the zero value of its kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderContext {
    floats: Slots<f32>,
    vec2s: Slots<Vec2>,
    vec3s: Slots<Vec3>,
    vec4s: Slots<Vec4>,
}

impl Default for ShaderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderContext {
    /// Create a context with every slot unused.
    pub fn new() -> Self {
        Self {
            floats: Slots::new(0.0),
            vec2s: Slots::new(Vec2::zeros()),
            vec3s: Slots::new(Vec3::zeros()),
            vec4s: Slots::new(Vec4::zeros()),
        }
    }

    /// Mark every slot unused.
    pub fn clear(&mut self) {
        self.floats.clear();
        self.vec2s.clear();
        self.vec3s.clear();
        self.vec4s.clear();
    }

    /// Write a float varying; fails if `slot >= MAX_VARYINGS`.
    pub fn set_float(&mut self, slot: usize, value: f32) -> Result<(), ShadingError> {
        self.floats.set(VaryingKind::Float, slot, value)
    }

    /// Write a 2-component varying; fails if `slot >= MAX_VARYINGS`.
    pub fn set_vec2(&mut self, slot: usize, value: Vec2) -> Result<(), ShadingError> {
        self.vec2s.set(VaryingKind::Vec2, slot, value)
    }

    /// Write a 3-component varying; fails if `slot >= MAX_VARYINGS`.
    pub fn set_vec3(&mut self, slot: usize, value: Vec3) -> Result<(), ShadingError> {
        self.vec3s.set(VaryingKind::Vec3, slot, value)
    }

    /// Write a 4-component varying; fails if `slot >= MAX_VARYINGS`.
    pub fn set_vec4(&mut self, slot: usize, value: Vec4) -> Result<(), ShadingError> {
        self.vec4s.set(VaryingKind::Vec4, slot, value)
    }

    /// Read a float varying, or zero if the slot is unset or out of range.
    pub fn float(&self, slot: usize) -> f32 {
        self.floats.get(slot, 0.0)
    }

    /// Read a 2-component varying, or zero if unset or out of range.
    pub fn vec2(&self, slot: usize) -> Vec2 {
        self.vec2s.get(slot, Vec2::zeros())
    }

    /// Read a 3-component varying, or zero if unset or out of range.
    pub fn vec3(&self, slot: usize) -> Vec3 {
        self.vec3s.get(slot, Vec3::zeros())
    }

    /// Read a 4-component varying, or zero if unset or out of range.
    pub fn vec4(&self, slot: usize) -> Vec4 {
        self.vec4s.get(slot, Vec4::zeros())
    }

    /// Returns true if the slot of the given kind has been written.
    pub fn is_set(&self, kind: VaryingKind, slot: usize) -> bool {
        match kind {
            VaryingKind::Float => self.floats.is_set(slot),
            VaryingKind::Vec2 => self.vec2s.is_set(slot),
            VaryingKind::Vec3 => self.vec3s.is_set(slot),
            VaryingKind::Vec4 => self.vec4s.is_set(slot),
        }
    }

    /// Perspective-correct interpolation of three vertex contexts.
    ///
    /// `barycentric` are the screen-space weights of the fragment and
    /// `inverse_w` the reciprocal clip-space `w` of each vertex. Each vertex
    /// is weighted by `b_i / w_i`, normalized by the sum of those terms;
    /// with equal `w` this reduces to plain barycentric interpolation. Only
    /// slots written in `vertices[0]` are interpolated.
    ///
    /// If the weight sum is zero or not finite, the barycentric weights are
    /// used as-is.
    pub fn interpolate(
        vertices: [&ShaderContext; 3],
        barycentric: [f32; 3],
        inverse_w: [f32; 3],
    ) -> ShaderContext {
        let over_w = [
            barycentric[0] * inverse_w[0],
            barycentric[1] * inverse_w[1],
            barycentric[2] * inverse_w[2],
        ];
        let sum = over_w[0] + over_w[1] + over_w[2];
        let weights = if sum != 0.0 && sum.is_finite() {
            over_w.map(|w| w / sum)
        } else {
            log::trace!("Degenerate perspective weights {over_w:?}, using barycentric");
            barycentric
        };

        let mut result = ShaderContext::new();
        result
            .floats
            .blend([&vertices[0].floats, &vertices[1].floats, &vertices[2].floats], weights);
        result
            .vec2s
            .blend([&vertices[0].vec2s, &vertices[1].vec2s, &vertices[2].vec2s], weights);
        result
            .vec3s
            .blend([&vertices[0].vec3s, &vertices[1].vec3s, &vertices[2].vec3s], weights);
        result
            .vec4s
            .blend([&vertices[0].vec4s, &vertices[1].vec4s, &vertices[2].vec4s], weights);
        result
    }
}
