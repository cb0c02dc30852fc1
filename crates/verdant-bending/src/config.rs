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

//! Settings for a [`GrassBendingManager`](crate::GrassBendingManager), loadable from RON.

use serde::{Deserialize, Serialize};
use std::path::Path;
use verdant_core::bending::{BendError, MAX_BEND_SOURCES};

/// Default name of the shader property that receives the bend array.
pub const DEFAULT_PROPERTY_NAME: &str = "_BendData";

/// Configuration of the per-tick publisher.
///
/// Every field has a default, so a config file only needs the values it
/// changes:
///
/// ```ron
/// (
///     capacity: 8,
///     resort_each_tick: true,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BendingConfig {
    /// Number of slots published each tick, at most [`MAX_BEND_SOURCES`].
    pub capacity: usize,
    /// Shader property the bend array is bound to.
    pub property_name: String,
    /// Re-sort the registry before every publish, picking up priority changes.
    pub resort_each_tick: bool,
    /// Drop entries whose bender was destroyed without being removed.
    pub prune_each_tick: bool,
}

impl Default for BendingConfig {
    fn default() -> Self {
        Self {
            capacity: MAX_BEND_SOURCES,
            property_name: DEFAULT_PROPERTY_NAME.to_string(),
            resort_each_tick: false,
            prune_each_tick: true,
        }
    }
}

impl BendingConfig {
    /// Parses and validates a RON document.
    pub fn from_ron_str(source: &str) -> Result<Self, BendError> {
        let config: Self =
            ron::from_str(source).map_err(|e| BendError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BendError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            BendError::InvalidConfig(format!("cannot read '{}': {e}", path.display()))
        })?;
        let config = Self::from_ron_str(&source)?;
        log::info!("Loaded bending config from '{}'", path.display());
        Ok(config)
    }

    /// Serializes to pretty RON.
    pub fn to_ron_string(&self) -> Result<String, BendError> {
        let pretty = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        ron::ser::to_string_pretty(self, pretty).map_err(|e| BendError::InvalidConfig(e.to_string()))
    }

    /// Checks the capacity ceiling and the property name.
    pub fn validate(&self) -> Result<(), BendError> {
        if self.capacity == 0 || self.capacity > MAX_BEND_SOURCES {
            return Err(BendError::InvalidCapacity {
                requested: self.capacity,
                max: MAX_BEND_SOURCES,
            });
        }
        if self.property_name.trim().is_empty() {
            return Err(BendError::InvalidConfig(
                "property_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
