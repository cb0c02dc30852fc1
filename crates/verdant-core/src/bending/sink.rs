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

//! The seam between the bending bookkeeping and whatever renders the grass.

use super::{BendDescriptor, BendError};

/// A consumer of the per-tick bend array.
///
/// A renderer implements this to upload the data to a named uniform array,
/// typically via `bytemuck::cast_slice` followed by a buffer write. The slice
/// always has the configured capacity, empty slots included.
pub trait BendDataSink {
    /// Receives this tick's descriptors for the given shader property.
    fn publish(&mut self, property: &str, data: &[BendDescriptor]) -> Result<(), BendError>;
}

impl<F> BendDataSink for F
where
    F: FnMut(&str, &[BendDescriptor]) -> Result<(), BendError>,
{
    fn publish(&mut self, property: &str, data: &[BendDescriptor]) -> Result<(), BendError> {
        self(property, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_acts_as_sink() {
        let mut seen = 0usize;
        {
            let mut sink = |_: &str, data: &[BendDescriptor]| {
                seen = data.len();
                Ok::<(), BendError>(())
            };
            sink.publish("_BendData", &[BendDescriptor::ZERO; 4]).unwrap();
        }
        assert_eq!(seen, 4);
    }
}
