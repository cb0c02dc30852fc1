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

//! Metric registration and the typed handles used on hot paths.

use crate::backend::{InMemoryBackend, MetricsBackend};
use std::sync::Arc;
use verdant_core::telemetry::{
    Metric, MetricId, MetricType, MetricValue, MetricsError, MetricsResult,
};

/// Registers metrics and answers queries about them.
///
/// Cloning is cheap and clones share storage. Each `register_*` call returns
/// a handle that writes straight to the backend.
#[derive(Debug, Clone)]
pub struct MetricsRegistry {
    backend: Arc<dyn MetricsBackend>,
}

impl MetricsRegistry {
    /// A registry over a fresh [`InMemoryBackend`].
    pub fn new() -> Self {
        Self::with_backend(Arc::new(InMemoryBackend::new()))
    }

    /// A registry over `backend`.
    pub fn with_backend(backend: Arc<dyn MetricsBackend>) -> Self {
        Self { backend }
    }

    fn register(&self, metric: Metric) -> MetricsResult<MetricHandle> {
        let id = metric.id.clone();
        if self.backend.contains(&id) {
            log::debug!("Re-registering metric {id}, previous value discarded");
        }
        self.backend.insert(metric)?;
        Ok(MetricHandle {
            id,
            backend: Arc::clone(&self.backend),
        })
    }

    /// Registers a counter starting at zero.
    pub fn register_counter(
        &self,
        id: MetricId,
        description: impl Into<String>,
    ) -> MetricsResult<CounterHandle> {
        self.register(Metric::counter(id, description)).map(CounterHandle)
    }

    /// Registers a gauge starting at zero.
    pub fn register_gauge(
        &self,
        id: MetricId,
        description: impl Into<String>,
        unit: impl Into<String>,
    ) -> MetricsResult<GaugeHandle> {
        self.register(Metric::gauge(id, description, unit)).map(GaugeHandle)
    }

    /// Registers a histogram with the given bucket upper bounds.
    pub fn register_histogram(
        &self,
        id: MetricId,
        description: impl Into<String>,
        unit: impl Into<String>,
        bounds: Vec<f64>,
    ) -> MetricsResult<HistogramHandle> {
        self.register(Metric::histogram(id, description, unit, bounds)).map(HistogramHandle)
    }

    /// A copy of the metric registered as `id`.
    pub fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric> {
        self.backend.get(id)
    }

    /// Whether `id` is registered.
    pub fn contains_metric(&self, id: &MetricId) -> bool {
        self.backend.contains(id)
    }

    /// Every metric in `namespace`, ordered by id.
    pub fn namespace_metrics(&self, namespace: &str) -> Vec<Metric> {
        let mut metrics: Vec<_> = self
            .backend
            .all()
            .into_iter()
            .filter(|m| m.id.namespace == namespace)
            .collect();
        metrics.sort_by(|a, b| a.id.cmp(&b.id));
        metrics
    }

    /// Number of registered metrics.
    pub fn metric_count(&self) -> usize {
        self.backend.metric_count()
    }

    /// Logs one line per metric at `info`.
    pub fn log_summary(&self) {
        let mut metrics = self.backend.all();
        metrics.sort_by(|a, b| a.id.cmp(&b.id));
        log::info!("{} metric(s):", metrics.len());
        for metric in &metrics {
            match &metric.value {
                MetricValue::Counter(n) => log::info!("  {} = {n}", metric.id),
                MetricValue::Gauge(v) => log::info!("  {} = {v} {}", metric.id, metric.unit),
                MetricValue::Histogram(h) => log::info!(
                    "  {} = {} sample(s), mean {:.4} {}",
                    metric.id,
                    h.count(),
                    h.mean().unwrap_or_default(),
                    metric.unit
                ),
            }
        }
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
struct MetricHandle {
    id: MetricId,
    backend: Arc<dyn MetricsBackend>,
}

impl MetricHandle {
    fn edit<T>(
        &self,
        expected: MetricType,
        mut f: impl FnMut(&mut MetricValue) -> Option<T>,
    ) -> MetricsResult<T> {
        let mut out = None;
        self.backend.update(&self.id, &mut |metric| {
            let found = metric.value.metric_type();
            out = f(&mut metric.value);
            if out.is_some() {
                Ok(())
            } else {
                Err(MetricsError::WrongType { expected, found })
            }
        })?;
        out.ok_or_else(|| MetricsError::NotFound(self.id.clone()))
    }

    fn read<T>(
        &self,
        expected: MetricType,
        f: impl FnOnce(&MetricValue) -> Option<T>,
    ) -> MetricsResult<T> {
        let metric = self.backend.get(&self.id)?;
        let found = metric.value.metric_type();
        f(&metric.value).ok_or(MetricsError::WrongType { expected, found })
    }
}

/// Writes to a registered counter.
#[derive(Debug, Clone)]
pub struct CounterHandle(MetricHandle);

impl CounterHandle {
    /// Adds one and returns the new count.
    pub fn increment(&self) -> MetricsResult<u64> {
        self.add(1)
    }

    /// Adds `n`, saturating, and returns the new count.
    pub fn add(&self, n: u64) -> MetricsResult<u64> {
        self.0.edit(MetricType::Counter, |value| match value {
            MetricValue::Counter(count) => {
                *count = count.saturating_add(n);
                Some(*count)
            }
            _ => None,
        })
    }

    /// The current count.
    pub fn get(&self) -> MetricsResult<u64> {
        self.0.read(MetricType::Counter, MetricValue::as_counter)
    }

    /// The id this handle writes to.
    pub fn id(&self) -> &MetricId {
        &self.0.id
    }
}

/// Writes to a registered gauge.
#[derive(Debug, Clone)]
pub struct GaugeHandle(MetricHandle);

impl GaugeHandle {
    /// Overwrites the value.
    pub fn set(&self, v: f64) -> MetricsResult<()> {
        self.0.edit(MetricType::Gauge, |value| match value {
            MetricValue::Gauge(g) => {
                *g = v;
                Some(())
            }
            _ => None,
        })
    }

    /// The current value.
    pub fn get(&self) -> MetricsResult<f64> {
        self.0.read(MetricType::Gauge, MetricValue::as_gauge)
    }

    /// The id this handle writes to.
    pub fn id(&self) -> &MetricId {
        &self.0.id
    }
}

/// Writes to a registered histogram.
#[derive(Debug, Clone)]
pub struct HistogramHandle(MetricHandle);

impl HistogramHandle {
    /// Records one sample.
    pub fn observe(&self, sample: f64) -> MetricsResult<()> {
        self.0.edit(MetricType::Histogram, |value| match value {
            MetricValue::Histogram(h) => {
                h.record(sample);
                Some(())
            }
            _ => None,
        })
    }

    /// A copy of the full metric.
    pub fn get_metric(&self) -> MetricsResult<Metric> {
        self.0.backend.get(&self.0.id)
    }

    /// The id this handle writes to.
    pub fn id(&self) -> &MetricId {
        &self.0.id
    }
}
