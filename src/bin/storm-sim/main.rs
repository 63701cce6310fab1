// storm-sim - Run the storm headless and report what happened
//
// Drives the scene with a fixed frame step, a recording surface and a manual
// clock, so a run is reproducible from its seed.
//
// Usage: cargo run --bin storm-sim -- [--width N] [--height N] [--frames N]
//                                     [--step MS] [--intensity 1-10] [--seed N]
//                                     [--no-rain] [--no-lightning]

use std::cell::Cell;
use std::env;
use std::rc::Rc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use storm_engine::render::Op;
use storm_engine::{ManualTimers, RecordingSurface, SceneConfig, Storm};
use tracing_subscriber::EnvFilter;

struct Args {
    width: f32,
    height: f32,
    frames: u32,
    step: f64,
    intensity: u8,
    seed: u64,
    rain: bool,
    lightning: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            frames: 600,
            step: 16.0,
            intensity: 5,
            seed: 0x5707_8A1D,
            rain: true,
            lightning: true,
        }
    }
}

fn parse_args() -> Args {
    let args: Vec<String> = env::args().collect();
    let mut out = Args::default();

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match args[i].as_str() {
            "--width" => { out.width = value.and_then(|s| s.parse().ok()).unwrap_or(out.width); i += 2; }
            "--height" => { out.height = value.and_then(|s| s.parse().ok()).unwrap_or(out.height); i += 2; }
            "--frames" => { out.frames = value.and_then(|s| s.parse().ok()).unwrap_or(out.frames); i += 2; }
            "--step" => { out.step = value.and_then(|s| s.parse().ok()).unwrap_or(out.step); i += 2; }
            "--intensity" => { out.intensity = value.and_then(|s| s.parse().ok()).unwrap_or(out.intensity); i += 2; }
            "--seed" => { out.seed = value.and_then(|s| s.parse().ok()).unwrap_or(out.seed); i += 2; }
            "--no-rain" => { out.rain = false; i += 1; }
            "--no-lightning" => { out.lightning = false; i += 1; }
            other => {
                eprintln!("ignoring unknown argument {}", other);
                i += 1;
            }
        }
    }
    out
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = parse_args();
    let config = SceneConfig::default()
        .with_intensity(args.intensity)
        .with_rain(args.rain)
        .with_lightning(args.lightning);

    println!(
        "Simulating {} frames at {}x{} (level {}, seed {})...",
        args.frames, args.width, args.height, config.intensity(), args.seed
    );

    let timers = ManualTimers::new();
    let mut storm = Storm::new(
        args.width,
        args.height,
        config,
        ChaCha8Rng::seed_from_u64(args.seed),
        Box::new(timers.clone()),
    );

    let thunder = Rc::new(Cell::new(0u32));
    let claps = thunder.clone();
    storm.set_thunder(Some(Rc::new(move || claps.set(claps.get() + 1))));

    let mut surface = RecordingSurface::new(args.width, args.height);
    let (mut peak_splashes, mut peak_ripples, mut draw_calls) = (0, 0, 0);

    for frame in 0..args.frames {
        surface.clear();
        storm.frame(frame as f64 * args.step, &mut surface);
        timers.advance(args.step);

        let stats = storm.stats();
        peak_splashes = peak_splashes.max(stats.splashes);
        peak_ripples = peak_ripples.max(stats.ripples);
        draw_calls += surface.count(|op| matches!(op, Op::FillPath | Op::StrokePath | Op::FillRect { .. }));
    }

    storm.teardown();
    let stats = storm.stats();

    println!("  Drops:            {}", stats.drops);
    println!("  Puddles:          {}", stats.puddles);
    println!("  Peak splashes:    {}", peak_splashes);
    println!("  Peak ripples:     {}", peak_ripples);
    println!("  Strikes:          {}", stats.strikes);
    println!("  Thunder claps:    {}", thunder.get());
    println!("  Draw calls/frame: {:.1}", draw_calls as f64 / args.frames.max(1) as f64);
    println!("Done!");
}
