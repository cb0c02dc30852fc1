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

//! Contracts shared by everything that bends grass.
//!
//! This module defines the abstract "what" of grass bending: the capability a
//! bender must expose ([`GrassBender`]), the per-slot value handed to the
//! renderer ([`BendDescriptor`]), and the seam through which that data leaves
//! the simulation ([`BendDataSink`]). The bookkeeping itself lives in
//! `verdant-bending`.

mod descriptor;
mod error;
mod sink;

pub use self::descriptor::BendDescriptor;
pub use self::error::BendError;
pub use self::sink::BendDataSink;

use crate::math::Vec3;

/// The hard ceiling on how many benders can be published in a single tick.
///
/// Shaders declare the bend array with a fixed length, so every publish has
/// exactly this many slots or fewer.
pub const MAX_BEND_SOURCES: usize = 16;

/// Something that pushes grass aside while it is registered.
///
/// Implementors are queried every tick, so the accessors should be cheap and
/// must reflect the current state of the entity.
pub trait GrassBender {
    /// Current bender position in world space.
    fn position(&self) -> Vec3;

    /// Radius of the grass bending sphere.
    fn bend_radius(&self) -> f32;

    /// Bend source priority.
    ///
    /// When more benders are registered than can be published, lower values
    /// are served first.
    fn priority(&self) -> i32;

    /// Packs the bender's current state into the published layout.
    fn descriptor(&self) -> BendDescriptor {
        BendDescriptor::from_position(self.position(), self.bend_radius())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl GrassBender for Fixed {
        fn position(&self) -> Vec3 {
            Vec3::new(3.0, 2.0, 1.0)
        }

        fn bend_radius(&self) -> f32 {
            0.75
        }

        fn priority(&self) -> i32 {
            -4
        }
    }

    #[test]
    fn test_default_descriptor_packs_position_and_radius() {
        let d = Fixed.descriptor();
        approx::assert_relative_eq!(d.x, 3.0);
        approx::assert_relative_eq!(d.y, 2.0);
        approx::assert_relative_eq!(d.z, 1.0);
        approx::assert_relative_eq!(d.radius, 0.75);
    }

    #[test]
    fn test_bender_is_object_safe() {
        let boxed: Box<dyn GrassBender> = Box::new(Fixed);
        assert_eq!(boxed.priority(), -4);
    }
}
