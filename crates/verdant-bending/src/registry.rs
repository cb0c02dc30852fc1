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

//! The priority-ordered set of active benders.
//!
//! The registry never owns a bender. It holds `Weak` handles and compares
//! them by allocation, so the same entity registered twice is stored once
//! while two entities with identical state are stored twice. Entries are kept
//! sorted by ascending [`GrassBender::priority`], ties in insertion order.

use std::rc::{Rc, Weak};
use verdant_core::bending::{BendDescriptor, BendError, GrassBender};

/// A priority-ordered, identity-keyed collection of benders.
///
/// The collection is unbounded; only [`snapshot_into`](Self::snapshot_into)
/// applies a capacity, and benders that do not fit stay registered.
#[derive(Default)]
pub struct BenderRegistry {
    entries: Vec<Weak<dyn GrassBender>>,
}

impl BenderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a bender. Registering an already present bender is a no-op.
    pub fn add<B: GrassBender + 'static>(&mut self, bender: &Rc<B>) {
        let handle = Rc::downgrade(bender) as Weak<dyn GrassBender>;
        self.insert(handle);
    }

    /// Registers a bender through a non-owning handle.
    ///
    /// Returns `Ok(true)` if the bender was inserted and `Ok(false)` if it was
    /// already present. A handle whose bender has been dropped is rejected with
    /// [`BendError::InvalidReference`] and leaves the registry untouched.
    pub fn try_add(&mut self, bender: &Weak<dyn GrassBender>) -> Result<bool, BendError> {
        if bender.strong_count() == 0 {
            return Err(BendError::InvalidReference);
        }
        Ok(self.insert(bender.clone()))
    }

    /// Unregisters a bender, returning `true` if it was present.
    pub fn remove<B: GrassBender + 'static>(&mut self, bender: &Rc<B>) -> bool {
        let handle = Rc::downgrade(bender) as Weak<dyn GrassBender>;
        self.remove_handle(&handle)
    }

    /// Unregisters a bender by handle, returning `true` if it was present.
    ///
    /// Works for handles whose bender has already been dropped, which is how
    /// destruction is reported.
    pub fn remove_handle(&mut self, bender: &Weak<dyn GrassBender>) -> bool {
        match self.index_of(bender) {
            Some(index) => {
                // `Vec::remove` keeps the remaining entries in order.
                self.entries.remove(index);
                log::trace!("Unregistered bender, {} remaining", self.entries.len());
                true
            }
            None => false,
        }
    }

    /// Returns `true` if the bender is registered.
    pub fn contains<B: GrassBender + 'static>(&self, bender: &Rc<B>) -> bool {
        let handle = Rc::downgrade(bender) as Weak<dyn GrassBender>;
        self.index_of(&handle).is_some()
    }

    /// Number of entries, including any whose bender has been dropped but not
    /// yet [pruned](Self::prune).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries whose bender is still alive.
    pub fn live_count(&self) -> usize {
        self.entries.iter().filter(|e| e.strong_count() > 0).count()
    }

    /// Iterates live benders in publish order.
    pub fn iter(&self) -> impl Iterator<Item = Rc<dyn GrassBender>> + '_ {
        self.entries.iter().filter_map(Weak::upgrade)
    }

    /// Unregisters everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Re-sorts entries by their current priority.
    ///
    /// Ordering is only established on insertion; call this after mutating
    /// the priority of a registered bender.
    pub fn resort(&mut self) {
        self.entries.sort_by_key(priority_key);
    }

    /// Drops entries whose bender no longer exists, returning how many were
    /// removed.
    pub fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.strong_count() > 0);
        let pruned = before - self.entries.len();
        if pruned > 0 {
            log::debug!("Pruned {pruned} dropped bender(s)");
        }
        pruned
    }

    /// Fills `out` with the first `out.len()` live benders in priority order
    /// and pads the rest with [`BendDescriptor::ZERO`].
    ///
    /// Returns how many slots hold a real bender. Does not allocate.
    pub fn snapshot_into(&self, out: &mut [BendDescriptor]) -> usize {
        let mut written = 0;
        for bender in self.iter().take(out.len()) {
            out[written] = bender.descriptor();
            written += 1;
        }
        out[written..].fill(BendDescriptor::ZERO);
        written
    }

    /// Returns exactly `capacity` descriptors; see [`snapshot_into`](Self::snapshot_into).
    pub fn snapshot(&self, capacity: usize) -> Vec<BendDescriptor> {
        let mut out = vec![BendDescriptor::ZERO; capacity];
        self.snapshot_into(&mut out);
        out
    }

    fn insert(&mut self, handle: Weak<dyn GrassBender>) -> bool {
        if self.index_of(&handle).is_some() {
            return false;
        }
        self.entries.push(handle);
        // Stable: equal priorities keep insertion order.
        self.entries.sort_by_key(priority_key);
        log::trace!("Registered bender, {} total", self.entries.len());
        true
    }

    fn index_of(&self, handle: &Weak<dyn GrassBender>) -> Option<usize> {
        self.entries.iter().position(|e| Weak::ptr_eq(e, handle))
    }
}

// Dropped benders sort last so they never shadow a live one.
fn priority_key(entry: &Weak<dyn GrassBender>) -> (bool, i32) {
    match entry.upgrade() {
        Some(bender) => (false, bender.priority()),
        None => (true, 0),
    }
}

impl std::fmt::Debug for BenderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BenderRegistry")
            .field("entries", &self.entries.len())
            .field("live", &self.live_count())
            .finish()
    }
}
