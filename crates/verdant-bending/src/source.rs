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

//! A ready-made bender whose state can change while it is registered.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use verdant_core::bending::GrassBender;
use verdant_core::math::Vec3;

/// Smallest accepted bend radius.
pub const MIN_BEND_RADIUS: f32 = 0.1;
/// Largest accepted bend radius.
pub const MAX_BEND_RADIUS: f32 = 10.0;
/// Radius used when none is given.
pub const DEFAULT_BEND_RADIUS: f32 = 1.0;

/// A bender with interior-mutable position, radius and priority.
///
/// Meant to be shared as `Rc<BendSource>` between the entity that moves it
/// and the registry that reads it. Changing the priority of a registered
/// source takes effect after [`BenderRegistry::resort`](crate::BenderRegistry::resort).
#[derive(Debug)]
pub struct BendSource {
    position: Cell<Vec3>,
    bend_radius: Cell<f32>,
    priority: Cell<i32>,
}

impl BendSource {
    /// Creates a source at `position` with the default radius and priority 0.
    pub fn new(position: Vec3) -> Self {
        Self {
            position: Cell::new(position),
            bend_radius: Cell::new(DEFAULT_BEND_RADIUS),
            priority: Cell::new(0),
        }
    }

    /// Sets the radius, clamped to [`MIN_BEND_RADIUS`]..=[`MAX_BEND_RADIUS`].
    pub fn with_radius(self, radius: f32) -> Self {
        self.set_bend_radius(radius);
        self
    }

    /// Sets the priority.
    pub fn with_priority(self, priority: i32) -> Self {
        self.set_priority(priority);
        self
    }

    /// Moves the source.
    pub fn set_position(&self, position: Vec3) {
        self.position.set(position);
    }

    /// Moves the source by `delta`.
    pub fn translate(&self, delta: Vec3) {
        self.position.set(self.position.get() + delta);
    }

    /// Changes the radius, clamped to [`MIN_BEND_RADIUS`]..=[`MAX_BEND_RADIUS`].
    /// A NaN radius is ignored.
    pub fn set_bend_radius(&self, radius: f32) {
        if radius.is_nan() {
            log::warn!("Ignoring NaN bend radius");
            return;
        }
        self.bend_radius.set(radius.clamp(MIN_BEND_RADIUS, MAX_BEND_RADIUS));
    }

    /// Changes the priority.
    pub fn set_priority(&self, priority: i32) {
        self.priority.set(priority);
    }
}

impl Default for BendSource {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl GrassBender for BendSource {
    fn position(&self) -> Vec3 {
        self.position.get()
    }

    fn bend_radius(&self) -> f32 {
        self.bend_radius.get()
    }

    fn priority(&self) -> i32 {
        self.priority.get()
    }
}

/// Serializable description of a [`BendSource`], as found in scene files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BendSourceDesc {
    /// Initial world-space position.
    pub position: Vec3,
    /// Bend radius, clamped on construction.
    pub radius: f32,
    /// Priority; lower values are served first.
    pub priority: i32,
}

impl Default for BendSourceDesc {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            radius: DEFAULT_BEND_RADIUS,
            priority: 0,
        }
    }
}

impl From<&BendSourceDesc> for BendSource {
    fn from(desc: &BendSourceDesc) -> Self {
        BendSource::new(desc.position)
            .with_radius(desc.radius)
            .with_priority(desc.priority)
    }
}
