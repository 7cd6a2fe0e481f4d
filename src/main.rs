//! Headless runner.
//!
//! Replays recorded detector frames through the simulation and reports what
//! the cloud did.
//!
//! ```text
//! morphcloud [config.json] [frames.json] [ticks]
//! ```
//!
//! `frames.json` is a list of frames, each `{ "hands": [[{x, y, z} x 21], ...],
//! "manual": "Cube" }` with both fields optional. The recording loops until
//! `ticks` frames have run. Without a recording a built-in sequence is used:
//! open hand, pinch, then no hand. Pass `-` to skip an argument.
//! Set `RUST_LOG=debug` to see shape changes.

use morphcloud::hands::{FINGERTIPS, LANDMARK_COUNT, THUMB_TIP};
use morphcloud::prelude::*;
use morphcloud::time::FrameClock;
use serde::Deserialize;
use std::error::Error;
use std::f32::consts::TAU;
use std::fs;

#[derive(Debug, Default, Deserialize)]
struct RecordedFrame {
    #[serde(default)]
    hands: Vec<Hand>,
    #[serde(default)]
    manual: Option<ShapeId>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn arg(n: usize) -> Option<String> {
    std::env::args().nth(n).filter(|a| a != "-")
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = match arg(1) {
        Some(path) => {
            log::info!("Loading config from {}", path);
            SimConfig::load(&path)?
        }
        None => SimConfig::default(),
    };

    let recording = match arg(2) {
        Some(path) => {
            let json = fs::read_to_string(&path)?;
            let frames: Vec<RecordedFrame> = serde_json::from_str(&json)?;
            log::info!("Loaded {} recorded frames from {}", frames.len(), path);
            frames
        }
        None => demo_recording(),
    };
    if recording.is_empty() {
        return Err("recording holds no frames".into());
    }

    let ticks: usize = match arg(3) {
        Some(n) => n.parse()?,
        None => recording.len(),
    };

    let mut sim = SimulationState::new(&config)?;
    let mut clock = FrameClock::new();

    for recorded in recording.iter().cycle().take(ticks) {
        if let Some(shape) = recorded.manual {
            sim.select_shape(shape);
        }
        let frame = DetectorFrame::new(recorded.hands.clone());
        sim.tick(Some(&frame));
        sim.take_dirty();

        if let Some(fps) = clock.tick() {
            log::info!("{:.0} ticks/s", fps);
        }
    }

    let centroid = sim.centroid();
    println!("=== morphcloud ===");
    println!("Particles:        {}", sim.particle_count());
    println!("Ticks:            {} in {:.2}s", clock.frame(), clock.elapsed());
    println!("Status:           {}", sim.status());
    println!("Active shape:     {}", sim.active_shape());
    println!("Formation factor: {:.4}", sim.formation().factor());
    println!(
        "Centroid:         ({:.3}, {:.3}, {:.3})",
        centroid.x, centroid.y, centroid.z
    );
    Ok(())
}

/// Open hand circling for 120 frames, pinching for 60, then gone for 120.
fn demo_recording() -> Vec<RecordedFrame> {
    let mut frames = Vec::with_capacity(300);

    for i in 0..180 {
        let angle = i as f32 / 180.0 * TAU;
        let center = Landmark::new(0.5 + 0.15 * angle.cos(), 0.5 + 0.15 * angle.sin(), 0.0);
        frames.push(RecordedFrame {
            hands: vec![demo_hand(center, i >= 120)],
            manual: None,
        });
    }
    frames.extend((0..120).map(|_| RecordedFrame::default()));
    frames
}

/// A flat hand with fingertips fanned out around `center`.
fn demo_hand(center: Landmark, pinching: bool) -> Hand {
    let mut landmarks = vec![center; LANDMARK_COUNT];
    for (slot, &tip) in FINGERTIPS.iter().enumerate() {
        let spread = (slot as f32 - 2.0) * 0.04;
        landmarks[tip] = Landmark::new(center.x + spread, center.y - 0.1, -0.05);
    }
    if pinching {
        landmarks[THUMB_TIP] = landmarks[FINGERTIPS[1]];
    }
    Hand::new(landmarks)
}
