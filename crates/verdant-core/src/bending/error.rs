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

//! Defines the error type for the grass bending subsystem.

use std::fmt;

/// An error raised while registering benders, configuring a manager or
/// publishing bend data.
///
/// Adding an already registered bender and removing an absent one are *not*
/// errors; both are defined no-ops.
#[derive(Debug, Clone, PartialEq)]
pub enum BendError {
    /// A bender handle no longer points at a live bender.
    InvalidReference,
    /// The requested publish capacity is zero or above the hard ceiling.
    InvalidCapacity {
        /// The capacity that was asked for.
        requested: usize,
        /// The largest capacity that is supported.
        max: usize,
    },
    /// A configuration value could not be parsed or is out of range.
    InvalidConfig(String),
    /// A sink refused the bend data.
    Publish {
        /// The shader property the data was destined for.
        property: String,
        /// Why the sink refused it.
        reason: String,
    },
}

impl fmt::Display for BendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BendError::InvalidReference => {
                write!(f, "Bender handle does not refer to a live bender")
            }
            BendError::InvalidCapacity { requested, max } => {
                write!(f, "Invalid bend capacity {requested}: must be in 1..={max}")
            }
            BendError::InvalidConfig(msg) => write!(f, "Invalid bending configuration: {msg}"),
            BendError::Publish { property, reason } => {
                write!(f, "Failed to publish bend data to '{property}': {reason}")
            }
        }
    }
}

impl std::error::Error for BendError {}
