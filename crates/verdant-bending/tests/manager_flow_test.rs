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

use approx::assert_relative_eq;
use std::rc::Rc;
use verdant_bending::prelude::*;
use verdant_core::telemetry::{MetricId, MetricType};
use verdant_telemetry::MetricsRegistry;

#[test]
fn test_triggers_drive_what_the_renderer_sees() {
    verdant_telemetry::logging::init_for_tests();

    // --- 1. ARRANGE ---
    let mut manager = GrassBendingManager::new(BendingConfig::default()).unwrap();
    let mut staging = StagingBufferSink::new();

    let player = Rc::new(BendSource::new(Vec3::new(0.0, 0.0, 0.0)).with_priority(-1));
    let deer = Rc::new(BendSource::new(Vec3::new(5.0, 0.0, 2.0)).with_radius(0.5));
    let player_trigger = BenderTrigger::when_enabled(&player);
    let deer_trigger = BenderTrigger::when_visible(&deer);

    player_trigger
        .handle(LifecycleEvent::Enabled, manager.registry_mut())
        .unwrap();
    deer_trigger
        .handle(LifecycleEvent::BecameVisible, manager.registry_mut())
        .unwrap();

    // --- 2. ACT ---
    player.translate(Vec3::new(1.0, 0.0, 0.0));
    let first = manager.tick(&mut staging).unwrap();

    deer_trigger
        .handle(LifecycleEvent::BecameInvisible, manager.registry_mut())
        .unwrap();
    let second = manager.tick(&mut staging).unwrap();

    // --- 3. ASSERT ---
    assert_eq!(first.published, 2);
    assert_eq!(second.published, 1);
    assert_eq!(second.tick, 2);

    let staged = staging.read_descriptors("_BendData").unwrap();
    assert_eq!(staged.len(), MAX_BEND_SOURCES);
    assert_eq!(staged[0], BendDescriptor::new(1.0, 0.0, 0.0, 1.0));
    assert_eq!(staged[1], BendDescriptor::ZERO, "Invisible deer should be gone");
    assert_eq!(
        staging.bytes("_BendData").map(<[u8]>::len),
        Some(MAX_BEND_SOURCES * 16)
    );
}

#[test]
fn test_staging_follows_capacity_changes() {
    // --- 1. ARRANGE ---
    let mut manager = GrassBendingManager::new(BendingConfig::default()).unwrap();
    let mut staging = StagingBufferSink::new();
    let hare = Rc::new(BendSource::new(Vec3::new(2.0, 0.0, 1.0)));
    manager.add_bender(&hare);
    manager.tick(&mut staging).unwrap();

    // --- 2. ACT ---
    manager.set_capacity(4).unwrap();
    let report = manager.tick(&mut staging).unwrap();

    // --- 3. ASSERT ---
    assert_eq!(report.tick, 2);
    let staged = staging.read_descriptors("_BendData").unwrap();
    assert_eq!(staged.len(), 4);
    assert_eq!(staged[0], BendDescriptor::new(2.0, 0.0, 1.0, 1.0));
    assert_eq!(staging.bytes("_BendData").map(<[u8]>::len), Some(4 * 16));

    // Growing back works too.
    manager.set_capacity(MAX_BEND_SOURCES).unwrap();
    manager.tick(&mut staging).unwrap();
    assert_eq!(
        staging.read_descriptors("_BendData").map(|d| d.len()),
        Some(MAX_BEND_SOURCES)
    );
}

#[test]
fn test_destroyed_bender_is_unregistered() {
    let mut manager = GrassBendingManager::new(BendingConfig::default()).unwrap();
    let mut sink = RecordingSink::new();

    let rock = Rc::new(BendSource::new(Vec3::Z));
    let trigger = BenderTrigger::when_enabled(&rock);
    trigger
        .handle(LifecycleEvent::Enabled, manager.registry_mut())
        .unwrap();
    drop(rock);

    assert_eq!(
        trigger.handle(LifecycleEvent::Destroyed, manager.registry_mut()),
        Ok(TriggerOutcome::Unregistered)
    );
    let report = manager.tick(&mut sink).unwrap();
    assert_eq!(report.registered, 0);
    assert_eq!(report.pruned, 0);
    assert!(sink.last().iter().all(BendDescriptor::is_empty));
}

#[test]
fn test_overflow_recovers_when_benders_leave() {
    let mut manager = GrassBendingManager::new(BendingConfig {
        capacity: 4,
        ..Default::default()
    })
    .unwrap();
    let mut sink = RecordingSink::new();
    let crowd: Vec<_> = (0..6)
        .map(|i| Rc::new(BendSource::new(Vec3::new(i as f32, 0.0, 0.0)).with_priority(i)))
        .collect();
    for bender in &crowd {
        manager.add_bender(bender);
    }

    let crowded = manager.tick(&mut sink).unwrap();
    assert_eq!(crowded.overflow, 2);
    assert_eq!(sink.last()[3].x, 3.0);

    manager.remove_bender(&crowd[0]);
    manager.remove_bender(&crowd[1]);
    let relieved = manager.tick(&mut sink).unwrap();
    assert_eq!(relieved.overflow, 0);
    let xs: Vec<f32> = sink.last().iter().map(|d| d.x).collect();
    assert_eq!(xs, vec![2.0, 3.0, 4.0, 5.0]);
}

#[test]
fn test_config_file_shapes_the_publish() {
    let config = BendingConfig::from_ron_str(
        r#"(
            capacity: 3,
            property_name: "_TrampleData",
        )"#,
    )
    .unwrap();
    let mut manager = GrassBendingManager::new(config).unwrap();
    let mut sink = RecordingSink::new();
    let hoof = Rc::new(BendSource::default());
    manager.add_bender(&hoof);

    let report = manager.tick(&mut sink).unwrap();
    assert_eq!(report.published, 1);
    assert_eq!(sink.property(), Some("_TrampleData"));
    assert_eq!(sink.last().len(), 3);
}

#[test]
fn test_scene_descriptions_become_sources() {
    let descs: Vec<BendSourceDesc> = ron::from_str(
        r#"[
            (position: (x: 1.0, y: 0.0, z: 2.0), radius: 25.0),
            (priority: -2),
        ]"#,
    )
    .unwrap();
    let sources: Vec<Rc<BendSource>> = descs.iter().map(|d| Rc::new(d.into())).collect();

    let mut registry = BenderRegistry::new();
    for source in &sources {
        registry.add(source);
    }
    let out = registry.snapshot(2);
    assert_eq!(out[0], BendDescriptor::new(0.0, 0.0, 0.0, 1.0));
    // Radius is clamped to the supported range.
    assert_relative_eq!(out[1].radius, 10.0);
    assert_relative_eq!(out[1].z, 2.0);
}

#[test]
fn test_telemetry_reports_tick_time() {
    let metrics = MetricsRegistry::new();
    let mut manager = GrassBendingManager::new(BendingConfig::default())
        .unwrap()
        .with_telemetry(&metrics);
    let mut sink = RecordingSink::new();

    for _ in 0..3 {
        manager.tick(&mut sink).unwrap();
    }

    let id = MetricId::new("bending", "tick_time").with_label("property", "_BendData");
    let metric = metrics.get_metric(&id).unwrap();
    assert_eq!(metric.value.metric_type(), MetricType::Histogram);
    assert_eq!(manager.ticks(), 3);
}
