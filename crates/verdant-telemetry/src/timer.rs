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

//! Timing a scope into a histogram.

use crate::registry::HistogramHandle;
use verdant_core::Stopwatch;

/// Records the lifetime of the guard, in milliseconds, into a histogram.
#[must_use = "the scope is timed until the guard is dropped"]
pub struct ScopedMetricTimer<'a> {
    histogram: &'a HistogramHandle,
    watch: Stopwatch,
}

impl<'a> ScopedMetricTimer<'a> {
    /// Starts timing.
    pub fn new(histogram: &'a HistogramHandle) -> Self {
        Self {
            histogram,
            watch: Stopwatch::new(),
        }
    }
}

impl Drop for ScopedMetricTimer<'_> {
    fn drop(&mut self) {
        let elapsed = self.watch.elapsed_ms_f64();
        if let Err(e) = self.histogram.observe(elapsed) {
            log::warn!("Dropping {elapsed:.3} ms sample for {}: {e}", self.histogram.id());
        }
    }
}
