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

use std::rc::Rc;
use verdant_bending::prelude::*;

fn source_at(x: f32, priority: i32) -> Rc<BendSource> {
    Rc::new(BendSource::new(Vec3::new(x, 0.0, 0.0)).with_priority(priority))
}

#[test]
fn test_adding_twice_publishes_once() {
    let mut registry = BenderRegistry::new();
    let a = source_at(3.0, 0);
    registry.add(&a);
    registry.add(&a);

    let out = registry.snapshot(4);
    assert_eq!(out[0], BendDescriptor::new(3.0, 0.0, 0.0, 1.0));
    assert!(out[1..].iter().all(BendDescriptor::is_empty));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_removing_unknown_bender_changes_nothing() {
    let mut registry = BenderRegistry::new();
    let a = source_at(1.0, 0);
    let b = source_at(2.0, 1);
    let stranger = source_at(9.0, -5);
    registry.add(&a);
    registry.add(&b);

    let before = registry.snapshot(MAX_BEND_SOURCES);
    assert!(!registry.remove(&stranger));
    assert_eq!(registry.snapshot(MAX_BEND_SOURCES), before);
}

#[test]
fn test_lower_priority_served_first_with_insertion_order_ties() {
    let mut registry = BenderRegistry::new();
    // (x, priority) inserted in this order.
    let spec = [(0.0, 2), (1.0, 0), (2.0, 2), (3.0, -3), (4.0, 0)];
    let sources: Vec<_> = spec.iter().map(|&(x, p)| source_at(x, p)).collect();
    for source in &sources {
        registry.add(source);
    }

    let xs: Vec<f32> = registry.snapshot(5).iter().map(|d| d.x).collect();
    assert_eq!(xs, vec![3.0, 1.0, 4.0, 0.0, 2.0]);
}

#[test]
fn test_truncation_keeps_everyone_registered() {
    let mut registry = BenderRegistry::new();
    let sources: Vec<_> = (0..5).map(|i| source_at(i as f32, i)).collect();
    for source in &sources {
        registry.add(source);
    }

    let out = registry.snapshot(2);
    assert_eq!(out.len(), 2);
    assert_eq!(registry.len(), 5);

    // Freeing a slot lets the next bender in.
    registry.remove(&sources[0]);
    let xs: Vec<f32> = registry.snapshot(2).iter().map(|d| d.x).collect();
    assert_eq!(xs, vec![1.0, 2.0]);
}

#[test]
fn test_removed_bender_disappears_from_snapshot() {
    let mut registry = BenderRegistry::new();
    let a = source_at(1.0, 0);
    let b = source_at(2.0, 0);
    registry.add(&a);
    registry.add(&b);

    assert!(registry.remove(&a));
    let out = registry.snapshot(2);
    assert_eq!(out[0].x, 2.0);
    assert_eq!(out[1], BendDescriptor::ZERO);
    assert!(out.iter().all(|d| d.x != 1.0));
}

#[test]
fn test_twenty_benders_fill_sixteen_slots_in_order() {
    let mut registry = BenderRegistry::new();
    let sources: Vec<_> = (0..20).map(|i| source_at(i as f32, i)).collect();
    for source in &sources {
        registry.add(source);
    }

    let out = registry.snapshot(MAX_BEND_SOURCES);
    assert_eq!(out.len(), 16);
    for (i, descriptor) in out.iter().enumerate() {
        assert_eq!(*descriptor, BendDescriptor::new(i as f32, 0.0, 0.0, 1.0));
    }
    assert_eq!(registry.len(), 20);
}

#[test]
fn test_empty_registry_publishes_zeros() {
    let registry = BenderRegistry::new();
    let mut out = [BendDescriptor::new(7.0, 7.0, 7.0, 7.0); MAX_BEND_SOURCES];

    assert_eq!(registry.snapshot_into(&mut out), 0);
    assert!(out.iter().all(|d| *d == BendDescriptor::ZERO));
}

#[test]
fn test_registry_accepts_trait_objects() {
    let mut registry = BenderRegistry::new();
    let boxed: Rc<dyn GrassBender> = source_at(5.0, 0);
    let handle = Rc::downgrade(&boxed);

    assert_eq!(registry.try_add(&handle), Ok(true));
    assert_eq!(registry.snapshot(1)[0].x, 5.0);
    assert!(registry.remove_handle(&handle));
    assert!(registry.is_empty());
}

#[test]
fn test_single_slot_falls_back_to_next_priority() {
    let mut registry = BenderRegistry::new();
    let b1 = source_at(1.0, 0);
    let b2 = source_at(2.0, 1);
    registry.add(&b1);
    registry.add(&b2);

    assert_eq!(registry.snapshot(1), vec![BendDescriptor::new(1.0, 0.0, 0.0, 1.0)]);

    registry.remove(&b1);
    assert_eq!(registry.snapshot(1), vec![BendDescriptor::new(2.0, 0.0, 0.0, 1.0)]);
}
