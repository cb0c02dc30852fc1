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

//! The per-tick driver that turns the registry into shader data.
//!
//! A [`GrassBendingManager`] is owned by the application's main loop. Benders
//! are added and removed at any point during a frame; once all of that
//! frame's changes are applied the loop calls [`GrassBendingManager::tick`],
//! which fills a pre-allocated array and hands it to a [`BendDataSink`].
//!
//! ```text
//! add/remove ...  add/remove ...  ──▶ tick() ──▶ sink.publish("_BendData", [16 × vec4])
//! ```

use crate::config::BendingConfig;
use crate::registry::BenderRegistry;
use std::rc::Rc;
use verdant_core::bending::{
    BendDataSink, BendDescriptor, BendError, GrassBender, MAX_BEND_SOURCES,
};
use verdant_core::telemetry::{MetricId, MetricsResult};
use verdant_telemetry::{
    CounterHandle, GaugeHandle, HistogramHandle, MetricsRegistry, ScopedMetricTimer,
};

const METRIC_NAMESPACE: &str = "bending";

/// Summary of a single [`tick`](GrassBendingManager::tick).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Number of successful ticks so far, this one included.
    pub tick: u64,
    /// Slots holding a real bender.
    pub published: usize,
    /// Live benders in the registry.
    pub registered: usize,
    /// Live benders that did not fit this tick.
    pub overflow: usize,
    /// Entries dropped because their bender no longer exists.
    pub pruned: usize,
}

struct BendingTelemetry {
    registered: GaugeHandle,
    published: GaugeHandle,
    overflow_ticks: CounterHandle,
    tick_time: HistogramHandle,
}

impl BendingTelemetry {
    fn register(metrics: &MetricsRegistry, property: &str) -> MetricsResult<Self> {
        let id = |name: &str| {
            MetricId::new(METRIC_NAMESPACE, name).with_label("property", property)
        };
        Ok(Self {
            registered: metrics.register_gauge(
                id("registered_benders"),
                "Live benders in the registry",
                "benders",
            )?,
            published: metrics.register_gauge(
                id("published_benders"),
                "Benders published in the last tick",
                "benders",
            )?,
            overflow_ticks: metrics.register_counter(
                id("overflow_ticks"),
                "Ticks that had more benders than slots",
            )?,
            tick_time: metrics.register_histogram(
                id("tick_time"),
                "Time spent filling and publishing bend data",
                "ms",
                vec![0.01, 0.05, 0.1, 0.5, 1.0],
            )?,
        })
    }

    fn record(&self, report: &TickReport) -> MetricsResult<()> {
        self.registered.set(report.registered as f64)?;
        self.published.set(report.published as f64)?;
        if report.overflow > 0 {
            self.overflow_ticks.increment()?;
        }
        Ok(())
    }
}

/// Owns the bender registry and publishes its snapshot once per tick.
pub struct GrassBendingManager {
    registry: BenderRegistry,
    bend_data: [BendDescriptor; MAX_BEND_SOURCES],
    config: BendingConfig,
    telemetry: Option<BendingTelemetry>,
    overflowing: bool,
    ticks: u64,
}

impl GrassBendingManager {
    /// Creates a manager after validating `config`.
    pub fn new(config: BendingConfig) -> Result<Self, BendError> {
        config.validate()?;
        log::info!(
            "Grass bending manager publishing {} slot(s) to '{}'",
            config.capacity,
            config.property_name
        );
        Ok(Self {
            registry: BenderRegistry::new(),
            bend_data: [BendDescriptor::ZERO; MAX_BEND_SOURCES],
            config,
            telemetry: None,
            overflowing: false,
            ticks: 0,
        })
    }

    /// Reports registry size, publish count, overflow and tick time to
    /// `metrics`. Registration failures are logged and telemetry stays off.
    pub fn with_telemetry(mut self, metrics: &MetricsRegistry) -> Self {
        match BendingTelemetry::register(metrics, &self.config.property_name) {
            Ok(telemetry) => self.telemetry = Some(telemetry),
            Err(e) => log::warn!("Grass bending telemetry disabled: {e}"),
        }
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &BendingConfig {
        &self.config
    }

    /// Changes how many slots are published from the next tick on.
    pub fn set_capacity(&mut self, capacity: usize) -> Result<(), BendError> {
        let mut config = self.config.clone();
        config.capacity = capacity;
        config.validate()?;
        self.config = config;
        self.bend_data[capacity..].fill(BendDescriptor::ZERO);
        Ok(())
    }

    /// Registers a bender; see [`BenderRegistry::add`].
    pub fn add_bender<B: GrassBender + 'static>(&mut self, bender: &Rc<B>) {
        self.registry.add(bender);
    }

    /// Unregisters a bender; see [`BenderRegistry::remove`].
    pub fn remove_bender<B: GrassBender + 'static>(&mut self, bender: &Rc<B>) -> bool {
        self.registry.remove(bender)
    }

    /// The underlying registry.
    pub fn registry(&self) -> &BenderRegistry {
        &self.registry
    }

    /// Mutable access to the underlying registry, e.g. for lifecycle triggers.
    pub fn registry_mut(&mut self) -> &mut BenderRegistry {
        &mut self.registry
    }

    /// The descriptors published by the last tick, `capacity` long.
    pub fn bend_data(&self) -> &[BendDescriptor] {
        &self.bend_data[..self.config.capacity]
    }

    /// Number of ticks whose publish succeeded.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Fills the bend array from the registry and publishes it to `sink`.
    ///
    /// Call once per tick, after that tick's add/remove calls. Without
    /// telemetry and with `resort_each_tick` off, the bend array is filled
    /// in place and nothing is allocated.
    pub fn tick(&mut self, sink: &mut dyn BendDataSink) -> Result<TickReport, BendError> {
        let _timer = self
            .telemetry
            .as_ref()
            .map(|t| ScopedMetricTimer::new(&t.tick_time));

        let pruned = if self.config.prune_each_tick {
            self.registry.prune()
        } else {
            0
        };
        if self.config.resort_each_tick {
            self.registry.resort();
        }

        let capacity = self.config.capacity;
        let published = self.registry.snapshot_into(&mut self.bend_data[..capacity]);
        let registered = self.registry.live_count();
        let report = TickReport {
            tick: self.ticks + 1,
            published,
            registered,
            overflow: registered - published,
            pruned,
        };

        sink.publish(&self.config.property_name, &self.bend_data[..capacity])?;
        self.ticks = report.tick;

        let overflowing = report.overflow > 0;
        if overflowing != self.overflowing {
            if overflowing {
                log::debug!(
                    "Bender overflow: {} registered, {} slot(s), {} not served",
                    registered,
                    capacity,
                    report.overflow
                );
            } else {
                log::debug!("Bender overflow cleared ({registered} registered)");
            }
            self.overflowing = overflowing;
        }

        if let Some(telemetry) = &self.telemetry {
            if let Err(e) = telemetry.record(&report) {
                log::warn!("Failed to record grass bending metrics: {e}");
            }
        }
        Ok(report)
    }
}

impl std::fmt::Debug for GrassBendingManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrassBendingManager")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("telemetry", &self.telemetry.is_some())
            .field("ticks", &self.ticks)
            .finish()
    }
}
