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

//! Stock [`BendDataSink`] implementations.

use std::collections::HashMap;
use verdant_core::bending::{BendDataSink, BendDescriptor, BendError};

/// Keeps a copy of the most recent publish. Useful headless and in tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    property: Option<String>,
    last: Vec<BendDescriptor>,
    publish_count: u64,
}

impl RecordingSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The property of the last publish, if any.
    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    /// The descriptors of the last publish.
    pub fn last(&self) -> &[BendDescriptor] {
        &self.last
    }

    /// How many times `publish` was called.
    pub fn publish_count(&self) -> u64 {
        self.publish_count
    }
}

impl BendDataSink for RecordingSink {
    fn publish(&mut self, property: &str, data: &[BendDescriptor]) -> Result<(), BendError> {
        if self.property.as_deref() != Some(property) {
            self.property = Some(property.to_string());
        }
        self.last.clear();
        self.last.extend_from_slice(data);
        self.publish_count += 1;
        Ok(())
    }
}

/// Mirrors what a renderer does before a buffer write: one byte staging
/// buffer per shader property, sized on first publish.
///
/// A later publish with a different byte size, e.g. after the manager's
/// capacity changed, reallocates that property's buffer.
#[derive(Debug, Default)]
pub struct StagingBufferSink {
    buffers: HashMap<String, Vec<u8>>,
}

impl StagingBufferSink {
    /// Creates a sink with no buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw bytes staged for `property`.
    pub fn bytes(&self, property: &str) -> Option<&[u8]> {
        self.buffers.get(property).map(Vec::as_slice)
    }

    /// Decodes the staged bytes for `property` back into descriptors.
    pub fn read_descriptors(&self, property: &str) -> Option<Vec<BendDescriptor>> {
        let bytes = self.bytes(property)?;
        Some(
            bytes
                .chunks_exact(std::mem::size_of::<BendDescriptor>())
                .map(bytemuck::pod_read_unaligned)
                .collect(),
        )
    }
}

impl BendDataSink for StagingBufferSink {
    fn publish(&mut self, property: &str, data: &[BendDescriptor]) -> Result<(), BendError> {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        match self.buffers.get_mut(property) {
            Some(staging) if staging.len() == bytes.len() => staging.copy_from_slice(bytes),
            Some(staging) => {
                log::debug!(
                    "Resizing staging buffer for '{property}' from {} to {} bytes",
                    staging.len(),
                    bytes.len()
                );
                staging.clear();
                staging.extend_from_slice(bytes);
            }
            None => {
                log::debug!(
                    "Allocating {} byte staging buffer for '{property}'",
                    bytes.len()
                );
                self.buffers.insert(property.to_string(), bytes.to_vec());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_keeps_last_publish() {
        let mut sink = RecordingSink::new();
        sink.publish("_BendData", &[BendDescriptor::new(1.0, 0.0, 0.0, 1.0)])
            .unwrap();
        sink.publish("_BendData", &[BendDescriptor::ZERO; 2]).unwrap();

        assert_eq!(sink.property(), Some("_BendData"));
        assert_eq!(sink.last(), &[BendDescriptor::ZERO; 2]);
        assert_eq!(sink.publish_count(), 2);
    }

    #[test]
    fn test_staging_sink_stores_bytes() {
        let mut sink = StagingBufferSink::new();
        let data = [
            BendDescriptor::new(1.0, 2.0, 3.0, 0.5),
            BendDescriptor::ZERO,
        ];
        sink.publish("_BendData", &data).unwrap();

        assert_eq!(sink.bytes("_BendData").map(<[u8]>::len), Some(32));
        assert_eq!(sink.read_descriptors("_BendData").unwrap(), data.to_vec());
        assert!(sink.bytes("_Other").is_none());
    }

    #[test]
    fn test_staging_sink_resizes_on_size_change() {
        let mut sink = StagingBufferSink::new();
        sink.publish("_BendData", &[BendDescriptor::ZERO; 4]).unwrap();

        let smaller = [BendDescriptor::new(1.0, 1.0, 1.0, 1.0); 2];
        sink.publish("_BendData", &smaller).unwrap();
        assert_eq!(sink.bytes("_BendData").map(<[u8]>::len), Some(32));
        assert_eq!(sink.read_descriptors("_BendData").unwrap(), smaller.to_vec());

        sink.publish("_BendData", &[BendDescriptor::ZERO; 3]).unwrap();
        assert_eq!(sink.read_descriptors("_BendData").unwrap().len(), 3);
    }
}
