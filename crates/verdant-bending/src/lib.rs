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

//! # Verdant Bending
//!
//! Keeps a priority-ordered set of grass benders and publishes a fixed-size
//! array of bend descriptors once per tick.
//!
//! ```
//! use std::rc::Rc;
//! use verdant_bending::prelude::*;
//!
//! let mut manager = GrassBendingManager::new(BendingConfig::default()).unwrap();
//! let hero = Rc::new(BendSource::new(Vec3::new(2.0, 0.0, 5.0)).with_priority(-1));
//! manager.add_bender(&hero);
//!
//! let mut sink = RecordingSink::new();
//! let report = manager.tick(&mut sink).unwrap();
//! assert_eq!(report.published, 1);
//! assert_eq!(sink.last().len(), MAX_BEND_SOURCES);
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod lifecycle;
pub mod manager;
pub mod registry;
pub mod sinks;
pub mod source;

pub use config::BendingConfig;
pub use lifecycle::{Activation, BenderTrigger, LifecycleEvent, TriggerOutcome};
pub use manager::{GrassBendingManager, TickReport};
pub use registry::BenderRegistry;
pub use sinks::{RecordingSink, StagingBufferSink};
pub use source::{BendSource, BendSourceDesc};

/// Everything needed to drive grass bending from a game loop.
pub mod prelude {
    pub use crate::{
        Activation, BendSource, BendSourceDesc, BenderRegistry, BenderTrigger, BendingConfig,
        GrassBendingManager, LifecycleEvent, RecordingSink, StagingBufferSink, TickReport,
        TriggerOutcome,
    };
    pub use verdant_core::bending::{
        BendDataSink, BendDescriptor, BendError, GrassBender, MAX_BEND_SOURCES,
    };
    pub use verdant_core::math::Vec3;
}
