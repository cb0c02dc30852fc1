// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The per-slot value published to the renderer.

use crate::math::Vec3;

/// A single bend source as seen by the grass shader.
///
/// The layout is identical to a `vec4<f32>`: `xyz` is the world-space centre
/// and `w` the radius of influence. An all-zero descriptor marks an empty slot.
#[derive(Debug, Default, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct BendDescriptor {
    /// World-space x of the bend centre.
    pub x: f32,
    /// World-space y of the bend centre.
    pub y: f32,
    /// World-space z of the bend centre.
    pub z: f32,
    /// Radius of the bending sphere.
    pub radius: f32,
}

impl BendDescriptor {
    /// The "no bender at this slot" sentinel.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        radius: 0.0,
    };

    /// Creates a descriptor from raw components.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, radius: f32) -> Self {
        Self { x, y, z, radius }
    }

    /// Creates a descriptor from a world-space position and a radius.
    #[inline]
    pub fn from_position(position: Vec3, radius: f32) -> Self {
        Self::new(position.x, position.y, position.z, radius)
    }

    /// Returns the bend centre.
    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Returns `true` if this is the empty-slot sentinel.
    #[inline]
    pub fn is_empty(&self) -> bool {
        *self == Self::ZERO
    }
}
