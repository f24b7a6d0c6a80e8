//! # Effect Preview
//!
//! Runs an effect headless and prints what it did.
//!
//! ```text
//! effect_preview [EFFECT.toml] [FRAMES]
//! ```
//!
//! Without a path the built-in sparks fountain runs. Frames default to
//! 300 (five seconds at 60 Hz).

use std::env;
use std::error::Error;

use ember::{EffectConfig, EffectRunner, PointBatch};

/// Fixed 60 Hz step.
const DT: f32 = 1.0 / 60.0;

/// Frames run when none are given.
const DEFAULT_FRAMES: u32 = 300;

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let effect = match args.next() {
        Some(path) => EffectConfig::from_toml_file(&path)?,
        None => EffectConfig::default(),
    };
    let frames = match args.next() {
        Some(count) => count.parse::<u32>()?,
        None => DEFAULT_FRAMES,
    };

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                      EFFECT PREVIEW                          ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Effect:   {}", effect.name);
    println!("Capacity: {}", effect.capacity);
    println!("Life:     {:.2}s - {:.2}s", effect.life_min, effect.life_max);
    println!("Frames:   {frames} at 60 Hz");
    println!();

    let batch = PointBatch::new();
    let vertices = batch.buffer();
    let mut system = effect.build()?;
    system.set_mesh(Some(Box::new(batch)));

    let mut runner = EffectRunner::new();
    runner.add(system);

    let mut last_active_frame = None;
    for _ in 0..frames {
        let stats = runner.tick(DT);
        if stats.systems_stepped > 0 {
            last_active_frame = Some(stats.frame);
        }
        if stats.auto_disabled > 0 {
            println!("Frame {}: effect burnt out", stats.frame);
        }
    }

    println!("{}", runner.stats());
    println!();
    match last_active_frame {
        Some(frame) => println!("Last active frame: {frame}"),
        None => println!("Effect never ran (disabled in its file?)"),
    }

    let buffer = vertices.read();
    println!(
        "Vertex buffer:     {} live of {} ({} bytes)",
        buffer.live(),
        buffer.vertices().len(),
        buffer.as_bytes().len()
    );
    Ok(())
}
