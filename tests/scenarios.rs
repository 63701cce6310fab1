// End-to-end storm scenarios driven through the public API.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use storm_engine::sim::{Ground, Impact, Raindrop, MAX_LENGTH, MAX_SPLASHES, THUNDER_MAX_MS, THUNDER_MIN_MS};
use storm_engine::{ManualTimers, RecordingSurface, SceneConfig, Storm};

fn storm(seed: u64) -> (Storm<ChaCha8Rng>, ManualTimers) {
    let timers = ManualTimers::new();
    let storm = Storm::new(
        800.0,
        600.0,
        SceneConfig::default(),
        ChaCha8Rng::seed_from_u64(seed),
        Box::new(timers.clone()),
    );
    (storm, timers)
}

#[test]
fn drops_stay_in_the_column_while_recycling() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let (w, h) = (800.0, 600.0);
    let mut drops: Vec<Raindrop> = (0..100).map(|_| Raindrop::new(w, h, &mut rng)).collect();

    for _ in 0..60 {
        for drop in &mut drops {
            drop.update(h);
            if drop.is_out_of_bounds(h) {
                drop.reset(w, &mut rng);
            }
            assert!(
                drop.y >= -MAX_LENGTH && drop.y <= h + 60.0,
                "drop escaped the column at y = {}",
                drop.y
            );
        }
    }
}

#[test]
fn storm_frames_keep_drops_in_the_column() {
    let timers = ManualTimers::new();
    let config = SceneConfig::default().with_base_drop_count(20).with_intensity(5).with_lightning(false);
    let mut storm = Storm::new(800.0, 600.0, config, ChaCha8Rng::seed_from_u64(17), Box::new(timers.clone()));
    assert_eq!(storm.drops().len(), 100);

    let mut surface = RecordingSurface::new(800.0, 600.0);
    let mut recycled = 0;
    for frame in 0..60 {
        let before: Vec<(f32, f32, f32)> =
            storm.drops().iter().map(|d| (d.y, d.length(), d.terminal_velocity())).collect();

        surface.clear();
        storm.frame(frame as f64 * 16.0, &mut surface);

        for (d, (prev_y, len, v_max)) in storm.drops().iter().zip(before) {
            assert!(d.y >= -MAX_LENGTH && d.y <= 600.0 + 60.0, "drop escaped at y = {}", d.y);
            if d.y < prev_y {
                // Recycled drops went past the bottom edge, not just the ground line
                assert!(prev_y + v_max > 600.0 + len);
                recycled += 1;
            }
        }
        assert!(storm.stats().splashes <= MAX_SPLASHES);
    }
    assert!(recycled > 0);
}

#[test]
fn impact_at_puddle_centre_ripples_and_splashes() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut ground = Ground::new(800.0, 600.0, &mut rng);
    assert!(!ground.puddles().is_empty());

    let (cx, _) = ground.puddles()[0].center();
    let before = ground.splash_count();
    let impact = ground.add_splash(cx, ground.ground_y() + 1.0, &mut rng);

    assert_eq!(impact, Impact::Puddle(0));
    assert_eq!(ground.puddles()[0].ripple_count(), 1);
    let spawned = ground.splash_count() - before;
    assert!((3..=6).contains(&spawned), "spawned {} particles", spawned);
}

#[test]
fn splash_pool_never_exceeds_its_cap() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let mut ground = Ground::new(800.0, 600.0, &mut rng);
    let y = ground.ground_y() + 1.0;

    for i in 0..500 {
        ground.add_splash((i % 800) as f32, y, &mut rng);
        assert!(ground.splash_count() <= MAX_SPLASHES);
    }
}

#[test]
fn thunder_follows_a_strike_within_the_window() {
    let (mut storm, timers) = storm(3);
    let heard = Rc::new(RefCell::new(Vec::new()));

    let (log, clock) = (heard.clone(), timers.clone());
    storm.set_thunder(Some(Rc::new(move || log.borrow_mut().push(clock.now()))));

    storm.trigger_lightning();
    assert_eq!(storm.lightning().strikes(), 1);

    for _ in 0..500 {
        timers.advance(1.0);
    }

    let heard = heard.borrow();
    assert_eq!(heard.len(), 1);
    assert!(heard[0] >= THUNDER_MIN_MS as f64 && heard[0] <= THUNDER_MAX_MS as f64);
}

#[test]
fn teardown_silences_pending_thunder_and_stops_frames() {
    let (mut storm, timers) = storm(5);
    let claps = Rc::new(Cell::new(0));
    let count = claps.clone();
    storm.set_thunder(Some(Rc::new(move || count.set(count.get() + 1))));

    storm.trigger_lightning();
    storm.trigger_lightning();
    storm.teardown();
    timers.advance(1000.0);

    assert_eq!(claps.get(), 0);
    assert!(!storm.is_running());

    let mut surface = RecordingSurface::new(800.0, 600.0);
    storm.frame(16.0, &mut surface);
    assert!(surface.ops().is_empty());
}

#[test]
fn a_running_storm_produces_impacts() {
    let (mut storm, timers) = storm(9);
    let mut surface = RecordingSurface::new(800.0, 600.0);

    for frame in 0..300 {
        surface.clear();
        storm.frame(frame as f64 * 16.0, &mut surface);
        timers.advance(16.0);
        assert!(storm.stats().splashes <= MAX_SPLASHES);
    }

    let stats = storm.stats();
    assert_eq!(stats.drops, SceneConfig::default().drop_count());
    assert!(stats.splashes > 0 || stats.ripples > 0);
    assert!(!surface.ops().is_empty());
}
