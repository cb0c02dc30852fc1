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

//! Ties a bender's registration to the lifecycle of the entity carrying it.

use crate::registry::BenderRegistry;
use serde::{Deserialize, Serialize};
use std::rc::{Rc, Weak};
use verdant_core::bending::{BendError, GrassBender};

/// When a bender should be registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Activation {
    /// Bend grass while the entity is rendered by any camera.
    WhenVisible,
    /// Bend grass while the entity is enabled.
    #[default]
    WhenEnabled,
}

/// A lifecycle notification from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The entity started being rendered.
    BecameVisible,
    /// The entity stopped being rendered.
    BecameInvisible,
    /// The entity was enabled.
    Enabled,
    /// The entity was disabled.
    Disabled,
    /// The entity was destroyed.
    Destroyed,
}

/// What a trigger did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The bender was inserted into the registry.
    Registered,
    /// The bender was removed from the registry.
    Unregistered,
    /// Nothing changed: the event does not apply to this activation policy,
    /// or the registry was already in the requested state.
    Ignored,
}

/// Registers and unregisters one bender in response to lifecycle events.
#[derive(Debug, Clone)]
pub struct BenderTrigger {
    bender: Weak<dyn GrassBender>,
    activation: Activation,
}

impl BenderTrigger {
    /// Creates a trigger for `bender` with the given policy.
    pub fn new<B: GrassBender + 'static>(bender: &Rc<B>, activation: Activation) -> Self {
        let bender = Rc::downgrade(bender) as Weak<dyn GrassBender>;
        Self { bender, activation }
    }

    /// Shorthand for [`Activation::WhenVisible`].
    pub fn when_visible<B: GrassBender + 'static>(bender: &Rc<B>) -> Self {
        Self::new(bender, Activation::WhenVisible)
    }

    /// Shorthand for [`Activation::WhenEnabled`].
    pub fn when_enabled<B: GrassBender + 'static>(bender: &Rc<B>) -> Self {
        Self::new(bender, Activation::WhenEnabled)
    }

    /// The policy this trigger follows.
    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Applies `event` to `registry`.
    ///
    /// Fails with [`BendError::InvalidReference`] only when an activating
    /// event arrives after the bender was dropped.
    pub fn handle(
        &self,
        event: LifecycleEvent,
        registry: &mut BenderRegistry,
    ) -> Result<TriggerOutcome, BendError> {
        use LifecycleEvent::*;

        let activate = match (self.activation, event) {
            (Activation::WhenVisible, BecameVisible) | (Activation::WhenEnabled, Enabled) => true,
            (Activation::WhenVisible, BecameInvisible)
            | (Activation::WhenEnabled, Disabled)
            | (_, Destroyed) => false,
            _ => return Ok(TriggerOutcome::Ignored),
        };

        let outcome = if activate {
            if registry.try_add(&self.bender)? {
                TriggerOutcome::Registered
            } else {
                TriggerOutcome::Ignored
            }
        } else if registry.remove_handle(&self.bender) {
            TriggerOutcome::Unregistered
        } else {
            TriggerOutcome::Ignored
        };
        log::trace!("{:?} on {:?} trigger: {:?}", event, self.activation, outcome);
        Ok(outcome)
    }
}
