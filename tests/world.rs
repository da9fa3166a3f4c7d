// Whole-world scenarios: drive CityWorld the way the hosting page does
// and check the observable contracts.

use cityrain_engine::color::Rgba;
use cityrain_engine::config::{Config, PerfMode};
use cityrain_engine::sim::cars::EXIT_MARGIN;
use cityrain_engine::sim::people::Person;
use cityrain_engine::sim::CityWorld;

fn world(w: u32, h: u32, intensity: u32, night: bool) -> CityWorld {
    CityWorld::new(w, h, Config::new(intensity, night), 0x5EED)
}

fn frame_bytes(world: &CityWorld) -> Vec<u8> {
    // the same view the host blits to its canvas
    unsafe { std::slice::from_raw_parts(world.frame_ptr(), world.frame_len()) }.to_vec()
}

#[test]
fn renders_800x600_with_zero_intensity() {
    let mut world = world(800, 600, 0, false);
    for _ in 0..10 {
        world.tick(16.0);
    }
    assert_eq!(world.rain.count(), 0);
    assert_eq!(world.frame_len(), 800 * 600 * 4);
}

#[test]
fn raindrop_pool_tracks_every_intensity_change() {
    let mut world = world(800, 600, 220, false);
    for target in [220u32, 1000, 77, 0, 40] {
        world.set_rain_intensity(target);
        world.tick(16.0);
        assert_eq!(world.rain.count(), target as usize, "target {target}");
    }
}

#[test]
fn fast_mode_scenario_from_baseline_220() {
    let mut world = world(800, 600, 220, false);
    world.set_perf_mode(PerfMode::Fast);
    assert_eq!(world.config.rain_intensity, 77);
    world.tick(16.0);
    assert_eq!(world.rain.count(), 77);

    world.set_perf_mode(PerfMode::Detailed);
    world.tick(16.0);
    assert_eq!(world.rain.count(), 220);
}

#[test]
fn car_whoosh_fires_exactly_once_per_traversal() {
    let mut world = world(800, 600, 0, false);
    world.init_audio(44_100);
    world.set_sound(true);

    // park every car outside the band, then march one through it
    for car in world.cars.iter_mut() {
        car.x = -500.0;
        car.speed = 0.0;
    }
    world.cars[0].speed = 3.0;
    world.cars[0].x = 200.0;

    let mut fired = 0;
    let mut last_x = world.cars[0].x;
    while world.cars[0].x >= last_x {
        last_x = world.cars[0].x;
        let before = world.audio.active_whooshes();
        world.tick(16.0);
        if world.audio.active_whooshes() > before {
            fired += 1;
            let x = world.cars[0].x;
            assert!(
                x > 800.0 * 0.4 && x < 800.0 * 0.6,
                "whoosh fired outside center band at x={x}"
            );
        }
    }
    // the loop ends when the car recycles past W + margin
    assert_eq!(fired, 1);
    assert!(world.cars[0].x < 0.0);
    assert!(!world.cars[0].whoosh_played);
    assert!(last_x > 800.0 + EXIT_MARGIN - 3.0 * 16.0 * 0.06 - 1.0);
}

#[test]
fn second_traversal_fires_again() {
    let mut world = world(800, 600, 0, false);
    world.init_audio(44_100);
    world.set_sound(true);

    for car in world.cars.iter_mut() {
        car.x = -500.0;
        car.speed = 0.0;
    }
    world.cars[0].speed = 4.0;
    world.cars[0].x = -40.0;

    let mut fired = 0;
    let mut traversals = 0;
    let mut last_x = world.cars[0].x;
    while traversals < 2 {
        let before = world.audio.active_whooshes();
        world.tick(16.0);
        // drain finished voices so the count only ever goes up on trigger
        world.audio.fill(4096);
        if world.audio.active_whooshes() > before {
            fired += 1;
        }
        if world.cars[0].x < last_x {
            traversals += 1;
        }
        last_x = world.cars[0].x;
    }
    assert_eq!(fired, 2);
}

#[test]
fn resize_rebuilds_a_consistent_scene() {
    let mut world = world(640, 480, 150, false);
    world.tick(16.0);

    world.resize(1024, 768);
    assert_eq!(world.frame_len(), 1024 * 768 * 4);
    assert!(world.rain.count() == 0, "pool cleared on regeneration");

    // scene invariants hold for the new extent
    assert_eq!(world.scene.buildings[0].x, 0.0);
    for b in &world.scene.buildings {
        assert!(b.cols >= 2 && b.rows >= 3);
    }
    let last = world.scene.buildings.last().unwrap();
    assert!(last.x + last.w + 36.0 >= 1024.0);

    // next tick refills the pool and renders
    world.tick(16.0);
    assert_eq!(world.rain.count(), 150);
}

#[test]
fn night_toggle_changes_rendered_frame() {
    let mut world = world(320, 240, 0, false);
    world.tick(0.0);
    let day = frame_bytes(&world);

    world.set_night(true);
    world.tick(0.0);
    let night = frame_bytes(&world);
    assert_ne!(day, night);
}

#[test]
fn weather_fetch_overwrites_and_reset_restores_initial_config() {
    let mut world = world(800, 600, 220, false);
    world.apply_weather(r#"{"intensity":320,"isNight":1}"#);
    world.tick(16.0);
    assert_eq!(world.rain.count(), 320);
    assert!(world.config.night);

    // bad responses keep the current configuration
    world.apply_weather("<html>503</html>");
    world.apply_weather("{}");
    assert_eq!(world.config.rain_intensity, 320);

    // reset goes back to the startup configuration, sound off
    world.set_sound(true);
    world.reset();
    assert_eq!(world.config.rain_intensity, 220);
    assert!(!world.config.night);
    assert!(!world.config.sound);
    world.tick(16.0);
    assert_eq!(world.rain.count(), 220);
}

#[test]
fn audio_unsupported_host_never_breaks_the_loop() {
    let mut world = world(400, 300, 100, true);
    world.init_audio(0); // unsupported
    world.set_sound(true);
    for car in world.cars.iter_mut() {
        car.x = 190.0; // inside the band
    }
    for _ in 0..5 {
        world.tick(16.0);
        world.audio.fill(1024);
    }
    assert_eq!(world.audio.out_len(), 0);
    assert_eq!(world.audio.active_whooshes(), 0);
}

#[test]
fn paused_people_freeze_and_resume() {
    let mut world = world(800, 600, 0, false);
    world.people.push(Person {
        x: 300.0,
        y: 390.0,
        tree_x: 300.0,
        umbrella: Rgba::opaque(255, 0, 68),
        size: 1.0,
        dir: 1.0,
        vx: 0.3,
        walk_phase: 0.0,
        pause_time: 10.0,
    });

    let idx = world.people.len() - 1;
    world.tick(16.0);
    assert_eq!(world.people[idx].x, 300.0, "paused walker must not move");
    assert!(world.people[idx].pause_time < 10.0, "pause must count down");

    world.people[idx].pause_time = 0.0;
    world.tick(16.0);
    assert!(world.people[idx].x > 300.0, "walker resumes after the pause");
}
