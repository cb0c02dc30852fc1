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

//! Scripted scene description and the actors built from it.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::rc::Rc;
use verdant_bending::prelude::*;

const BUILTIN_SCENE: &str = include_str!("../scene.ron");

/// One scripted bender.
#[derive(Debug, Clone, Deserialize)]
pub struct ActorDesc {
    pub name: String,
    #[serde(default)]
    pub source: BendSourceDesc,
    #[serde(default)]
    pub activation: Activation,
    /// Movement applied every tick.
    #[serde(default)]
    pub velocity: Vec3,
    /// Ticks at which the actor is activated and deactivated.
    pub active: (u64, u64),
    #[serde(default)]
    pub destroy_at: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scene {
    pub actors: Vec<ActorDesc>,
}

impl Scene {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scene '{}'", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing scene '{}'", path.display()))
    }

    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_SCENE).context("parsing built-in scene")
    }

    fn parse(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }
}

/// A live scene actor: owns its bender until destroyed.
pub struct Actor {
    desc: ActorDesc,
    source: Option<Rc<BendSource>>,
    trigger: BenderTrigger,
}

impl Actor {
    pub fn spawn(desc: ActorDesc) -> Self {
        let source = Rc::new(BendSource::from(&desc.source));
        let trigger = BenderTrigger::new(&source, desc.activation);
        Self {
            desc,
            source: Some(source),
            trigger,
        }
    }

    pub fn name(&self) -> &str {
        &self.desc.name
    }

    /// Advances the actor to `tick`, emitting lifecycle events into `registry`.
    pub fn update(&mut self, tick: u64, registry: &mut BenderRegistry) -> Result<()> {
        let (start, end) = self.desc.active;
        if tick == start {
            self.emit(self.activation_event(), registry)?;
        }
        if tick == end {
            self.emit(self.deactivation_event(), registry)?;
        }
        if self.desc.destroy_at == Some(tick) && self.source.take().is_some() {
            self.emit(LifecycleEvent::Destroyed, registry)?;
        }
        if let Some(source) = &self.source {
            source.translate(self.desc.velocity);
        }
        Ok(())
    }

    fn emit(&self, event: LifecycleEvent, registry: &mut BenderRegistry) -> Result<()> {
        match self.trigger.handle(event, registry) {
            Ok(TriggerOutcome::Ignored) => {}
            Ok(outcome) => log::info!("{}: {:?} -> {:?}", self.name(), event, outcome),
            Err(BendError::InvalidReference) => {
                log::warn!("{}: {:?} after destruction, skipped", self.name(), event)
            }
            Err(e) => return Err(e).with_context(|| format!("actor '{}'", self.name())),
        }
        Ok(())
    }

    fn activation_event(&self) -> LifecycleEvent {
        match self.trigger.activation() {
            Activation::WhenVisible => LifecycleEvent::BecameVisible,
            Activation::WhenEnabled => LifecycleEvent::Enabled,
        }
    }

    fn deactivation_event(&self) -> LifecycleEvent {
        match self.trigger.activation() {
            Activation::WhenVisible => LifecycleEvent::BecameInvisible,
            Activation::WhenEnabled => LifecycleEvent::Disabled,
        }
    }
}
