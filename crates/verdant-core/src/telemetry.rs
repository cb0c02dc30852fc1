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

//! Metric vocabulary for the bending pipeline.
//!
//! Only data types live here; `verdant-telemetry` stores and updates them.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::time::Instant;

/// Namespaced metric name plus dimensional labels, e.g.
/// `bending:published_benders[property=_BendData]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetricId {
    /// Subsystem owning the metric.
    pub namespace: String,
    /// Metric name within the namespace.
    pub name: String,
    /// Labels, ordered by key.
    pub labels: BTreeMap<String, String>,
}

impl MetricId {
    /// An unlabelled id.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            labels: BTreeMap::new(),
        }
    }

    /// Adds or replaces a label.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)?;
        let mut labels = self.labels.iter();
        if let Some((k, v)) = labels.next() {
            write!(f, "[{k}={v}")?;
            for (k, v) in labels {
                write!(f, ",{k}={v}")?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

/// Kind of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    /// Monotonic count.
    Counter,
    /// Last written value.
    Gauge,
    /// Bucketed distribution of samples.
    Histogram,
}

/// Bucketed samples with a bounded window of recent raw values.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    bounds: Vec<f64>,
    counts: Vec<u64>,
    recent: VecDeque<f64>,
    count: u64,
    sum: f64,
}

impl Histogram {
    /// Raw samples kept for inspection; older ones are dropped, bucket counts are not.
    pub const RECENT_SAMPLES: usize = 256;

    /// An empty histogram over the given upper bounds.
    pub fn new(bounds: Vec<f64>) -> Self {
        Self {
            counts: vec![0; bounds.len()],
            bounds,
            recent: VecDeque::new(),
            count: 0,
            sum: 0.0,
        }
    }

    /// Adds a sample. Buckets are cumulative: a sample counts toward every
    /// bound it does not exceed.
    pub fn record(&mut self, sample: f64) {
        for (count, bound) in self.counts.iter_mut().zip(&self.bounds) {
            if sample <= *bound {
                *count += 1;
            }
        }
        if self.recent.len() == Self::RECENT_SAMPLES {
            self.recent.pop_front();
        }
        self.recent.push_back(sample);
        self.count += 1;
        self.sum += sample;
    }

    /// Samples recorded since creation.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean of all samples, if any.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    /// Upper bounds and their cumulative counts.
    pub fn buckets(&self) -> impl Iterator<Item = (f64, u64)> + '_ {
        self.bounds.iter().copied().zip(self.counts.iter().copied())
    }

    /// The most recent raw samples, oldest first.
    pub fn recent(&self) -> &VecDeque<f64> {
        &self.recent
    }
}

/// Current value of a metric.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    /// See [`MetricType::Counter`].
    Counter(u64),
    /// See [`MetricType::Gauge`].
    Gauge(f64),
    /// See [`MetricType::Histogram`].
    Histogram(Histogram),
}

impl MetricValue {
    /// The kind of this value.
    pub fn metric_type(&self) -> MetricType {
        match self {
            Self::Counter(_) => MetricType::Counter,
            Self::Gauge(_) => MetricType::Gauge,
            Self::Histogram(_) => MetricType::Histogram,
        }
    }

    /// The count, if this is a counter.
    pub fn as_counter(&self) -> Option<u64> {
        match self {
            Self::Counter(n) => Some(*n),
            _ => None,
        }
    }

    /// The value, if this is a gauge.
    pub fn as_gauge(&self) -> Option<f64> {
        match self {
            Self::Gauge(v) => Some(*v),
            _ => None,
        }
    }

    /// The distribution, if this is a histogram.
    pub fn as_histogram(&self) -> Option<&Histogram> {
        match self {
            Self::Histogram(h) => Some(h),
            _ => None,
        }
    }
}

/// A stored metric.
#[derive(Debug, Clone)]
pub struct Metric {
    /// Identity.
    pub id: MetricId,
    /// Human-readable meaning.
    pub description: String,
    /// Unit, e.g. `"ms"` or `"benders"`.
    pub unit: String,
    /// Current value.
    pub value: MetricValue,
    /// Time of the last write.
    pub updated_at: Instant,
}

impl Metric {
    fn with_value(
        id: MetricId,
        description: impl Into<String>,
        unit: impl Into<String>,
        value: MetricValue,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            unit: unit.into(),
            value,
            updated_at: Instant::now(),
        }
    }

    /// A counter starting at zero.
    pub fn counter(id: MetricId, description: impl Into<String>) -> Self {
        Self::with_value(id, description, "count", MetricValue::Counter(0))
    }

    /// A gauge starting at zero.
    pub fn gauge(id: MetricId, description: impl Into<String>, unit: impl Into<String>) -> Self {
        Self::with_value(id, description, unit, MetricValue::Gauge(0.0))
    }

    /// An empty histogram.
    pub fn histogram(
        id: MetricId,
        description: impl Into<String>,
        unit: impl Into<String>,
        bounds: Vec<f64>,
    ) -> Self {
        let value = MetricValue::Histogram(Histogram::new(bounds));
        Self::with_value(id, description, unit, value)
    }

    /// Marks the metric as written now.
    pub fn touch(&mut self) {
        self.updated_at = Instant::now();
    }
}

/// Result of a metrics operation.
pub type MetricsResult<T> = Result<T, MetricsError>;

/// Failure of a metrics operation.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricsError {
    /// No metric is registered under this id.
    NotFound(MetricId),
    /// The metric exists with another kind.
    WrongType {
        /// Kind the operation needs.
        expected: MetricType,
        /// Kind that is stored.
        found: MetricType,
    },
    /// The storage layer failed.
    Backend(String),
}

impl fmt::Display for MetricsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "no metric registered as {id}"),
            Self::WrongType { expected, found } => {
                write!(f, "metric is a {found:?}, not a {expected:?}")
            }
            Self::Backend(msg) => write!(f, "metrics backend failure: {msg}"),
        }
    }
}

impl std::error::Error for MetricsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_orders_labels() {
        let id = MetricId::new("bending", "published_benders")
            .with_label("property", "_BendData")
            .with_label("layer", "terrain");
        assert_eq!(
            id.to_string(),
            "bending:published_benders[layer=terrain,property=_BendData]"
        );
        assert_eq!(
            MetricId::new("bending", "overflow_ticks").to_string(),
            "bending:overflow_ticks"
        );
    }

    #[test]
    fn test_relabelling_replaces() {
        let id = MetricId::new("bending", "x")
            .with_label("property", "a")
            .with_label("property", "b");
        assert_eq!(id.labels.len(), 1);
        assert_eq!(id.labels["property"], "b");
    }

    #[test]
    fn test_histogram_buckets_and_window() {
        let mut h = Histogram::new(vec![0.1, 1.0]);
        assert_eq!(h.mean(), None);
        for sample in [0.05, 0.5, 5.0] {
            h.record(sample);
        }
        assert_eq!(h.buckets().collect::<Vec<_>>(), vec![(0.1, 1), (1.0, 2)]);
        assert_eq!(h.count(), 3);
        assert!((h.mean().unwrap() - 5.55 / 3.0).abs() < 1e-9);

        for _ in 0..Histogram::RECENT_SAMPLES {
            h.record(0.0);
        }
        assert_eq!(h.recent().len(), Histogram::RECENT_SAMPLES);
        assert_eq!(h.count(), 3 + Histogram::RECENT_SAMPLES as u64);
    }

    #[test]
    fn test_value_accessors() {
        let counter = MetricValue::Counter(7);
        assert_eq!(counter.metric_type(), MetricType::Counter);
        assert_eq!(counter.as_counter(), Some(7));
        assert_eq!(counter.as_gauge(), None);

        let metric = Metric::histogram(MetricId::new("bending", "tick_time"), "", "ms", vec![]);
        assert_eq!(metric.value.as_histogram().map(Histogram::count), Some(0));
        assert_eq!(metric.unit, "ms");
    }
}
