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

// Meadow demo
// Runs a scripted scene through the grass bending manager and logs every tick.

mod scene;

use anyhow::{Context, Result};
use clap::Parser;
use scene::{Actor, Scene};
use std::path::PathBuf;
use verdant_bending::prelude::*;
use verdant_core::Stopwatch;
use verdant_telemetry::MetricsRegistry;

#[derive(Parser, Debug)]
#[command(name = "meadow")]
#[command(about = "Drives grass benders through a scripted meadow scene")]
struct Args {
    /// Bending config (RON); defaults are used when omitted
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Scene file (RON); the built-in scene is used when omitted
    #[arg(short, long, value_name = "PATH")]
    scene: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 12)]
    ticks: u64,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    verdant_telemetry::logging::init(&args.log);

    let config = match &args.config {
        Some(path) => BendingConfig::load(path)?,
        None => BendingConfig::default(),
    };
    let scene = match &args.scene {
        Some(path) => Scene::load(path)?,
        None => Scene::builtin()?,
    };
    log::info!("Meadow scene with {} actor(s)", scene.actors.len());

    let metrics = MetricsRegistry::new();
    let mut manager = GrassBendingManager::new(config)
        .context("creating grass bending manager")?
        .with_telemetry(&metrics);
    let mut staging = StagingBufferSink::new();
    let mut actors: Vec<Actor> = scene.actors.into_iter().map(Actor::spawn).collect();

    let clock = Stopwatch::new();
    for tick in 1..=args.ticks {
        for actor in &mut actors {
            actor.update(tick, manager.registry_mut())?;
        }
        let report = manager.tick(&mut staging)?;
        log::info!(
            "tick {:>3}: {} published, {} registered, {} waiting",
            report.tick,
            report.published,
            report.registered,
            report.overflow
        );
        for (slot, d) in manager.bend_data().iter().enumerate() {
            if !d.is_empty() {
                log::debug!(
                    "  slot {slot}: ({:.2}, {:.2}, {:.2}) r={:.2}",
                    d.x,
                    d.y,
                    d.z,
                    d.radius
                );
            }
        }
    }

    let property = manager.config().property_name.clone();
    let staged = staging
        .bytes(&property)
        .map(<[u8]>::len)
        .unwrap_or_default();
    log::info!(
        "{} tick(s) in {:.3} ms, {staged} byte(s) staged for '{property}' ({} actor(s) scripted)",
        manager.ticks(),
        clock.elapsed_ms_f64(),
        actors.len()
    );
    metrics.log_summary();
    Ok(())
}
