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

//! Where metrics live.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;
use verdant_core::telemetry::{Metric, MetricId, MetricsError, MetricsResult};

/// A thread-safe metric store.
///
/// Writes go through [`update`](Self::update) so a read-modify-write happens
/// under one lock.
pub trait MetricsBackend: Send + Sync + Debug + 'static {
    /// Stores `metric`, replacing any metric with the same id.
    fn insert(&self, metric: Metric) -> MetricsResult<()>;

    /// A copy of the metric registered as `id`.
    fn get(&self, id: &MetricId) -> MetricsResult<Metric>;

    /// Applies `edit` to the metric registered as `id` in place.
    fn update(
        &self,
        id: &MetricId,
        edit: &mut dyn FnMut(&mut Metric) -> MetricsResult<()>,
    ) -> MetricsResult<()>;

    /// Copies of every stored metric, in no particular order.
    fn all(&self) -> Vec<Metric>;

    /// Number of stored metrics.
    fn metric_count(&self) -> usize;

    /// Whether `id` is registered.
    fn contains(&self, id: &MetricId) -> bool {
        self.get(id).is_ok()
    }
}

/// Process-local backend over a `HashMap` behind an `RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    metrics: RwLock<HashMap<MetricId, Metric>>,
}

impl InMemoryBackend {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> MetricsError {
    MetricsError::Backend("metrics lock poisoned".to_string())
}

impl MetricsBackend for InMemoryBackend {
    fn insert(&self, metric: Metric) -> MetricsResult<()> {
        self.metrics
            .write()
            .map_err(poisoned)?
            .insert(metric.id.clone(), metric);
        Ok(())
    }

    fn get(&self, id: &MetricId) -> MetricsResult<Metric> {
        self.metrics
            .read()
            .map_err(poisoned)?
            .get(id)
            .cloned()
            .ok_or_else(|| MetricsError::NotFound(id.clone()))
    }

    fn update(
        &self,
        id: &MetricId,
        edit: &mut dyn FnMut(&mut Metric) -> MetricsResult<()>,
    ) -> MetricsResult<()> {
        let mut metrics = self.metrics.write().map_err(poisoned)?;
        let metric = metrics
            .get_mut(id)
            .ok_or_else(|| MetricsError::NotFound(id.clone()))?;
        edit(metric)?;
        metric.touch();
        Ok(())
    }

    fn all(&self) -> Vec<Metric> {
        match self.metrics.read() {
            Ok(metrics) => metrics.values().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    fn metric_count(&self) -> usize {
        self.metrics.read().map_or(0, |m| m.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdant_core::telemetry::MetricValue;

    #[test]
    fn test_insert_and_get() {
        let backend = InMemoryBackend::new();
        let id = MetricId::new("bending", "registered_benders");
        backend
            .insert(Metric::gauge(id.clone(), "Registered", "benders"))
            .unwrap();

        assert!(backend.contains(&id));
        assert_eq!(backend.get(&id).unwrap().value.as_gauge(), Some(0.0));
        assert_eq!(backend.metric_count(), 1);
        assert_eq!(backend.all().len(), 1);
    }

    #[test]
    fn test_update_in_place() {
        let backend = InMemoryBackend::new();
        let id = MetricId::new("bending", "overflow_ticks");
        backend.insert(Metric::counter(id.clone(), "")).unwrap();

        backend
            .update(&id, &mut |m| {
                m.value = MetricValue::Counter(5);
                Ok(())
            })
            .unwrap();
        assert_eq!(backend.get(&id).unwrap().value.as_counter(), Some(5));
    }

    #[test]
    fn test_missing_metric() {
        let backend = InMemoryBackend::new();
        let id = MetricId::new("bending", "absent");
        assert!(!backend.contains(&id));
        assert_eq!(
            backend.update(&id, &mut |_| Ok(())),
            Err(MetricsError::NotFound(id))
        );
    }

    #[test]
    fn test_failed_edit_is_reported() {
        let backend = InMemoryBackend::new();
        let id = MetricId::new("bending", "tick_time");
        backend.insert(Metric::counter(id.clone(), "")).unwrap();
        let result = backend.update(&id, &mut |_| Err(MetricsError::Backend("nope".into())));
        assert!(matches!(result, Err(MetricsError::Backend(_))));
    }
}
