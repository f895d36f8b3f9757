//! Starlock entry point
//!
//! Native: plays a seeded autoplay session in Infinite mode and logs the
//! results. `starlock [seed] [save_file]`; progress persists when a save file
//! is given. Set `RUST_LOG=debug` for per-lock detail.

#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use starlock::clock::SystemClock;
    use starlock::persistence::{JsonFileStore, KeyValueStore, MemoryStore};
    use starlock::rotation::BandLevels;
    use starlock::{Game, GameEvent, GameMode, delta_angle};

    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Frames to wait for the shape to come around before locking anyway
    const MAX_FRAMES_PER_ATTEMPT: u32 = 600;
    const MAX_ATTEMPTS: u32 = 200;
    /// Timing error of the simulated player, degrees
    const MAX_JITTER: f32 = 18.0;

    pub fn run(seed: u64, save_file: Option<String>) {
        match save_file {
            Some(path) => match JsonFileStore::open(&path) {
                Ok(store) => {
                    log::info!("Using save file {}", path);
                    play(store, seed);
                }
                Err(e) => {
                    log::error!("Could not open save file {}: {}", path, e);
                    std::process::exit(1);
                }
            },
            None => play(MemoryStore::new(), seed),
        }
    }

    fn play<S: KeyValueStore>(store: S, seed: u64) {
        let mut game = Game::new(store, SystemClock::default(), seed);
        game.subscribe(|event: &GameEvent| match event {
            GameEvent::AchievementUnlocked(a) => {
                log::info!("★ {} - {} (+{})", a.title, a.description, a.star_reward)
            }
            GameEvent::MissesChanged { misses, max } => log::info!("Misses {}/{}", misses, max),
            GameEvent::GameOver => log::info!("Game over"),
            _ => {}
        });

        // Player timing is drawn from its own stream so rounds stay seed-stable
        let mut player = Pcg32::seed_from_u64(seed.wrapping_add(1));
        let mut frame: u64 = 0;

        game.start(GameMode::Infinite, 0);
        for attempt in 1..=MAX_ATTEMPTS {
            if !game.mode().is_active() {
                break;
            }
            let Some(target) = game.round().map(|r| r.target.rotation) else {
                break;
            };
            let aim = target + player.random_range(-MAX_JITTER..=MAX_JITTER);

            for _ in 0..MAX_FRAMES_PER_ATTEMPT {
                // Within one frame of travel
                let step = game.rotor().speed() * FRAME_DT;
                if delta_angle(game.rotor().rotation(), aim).abs() <= step {
                    break;
                }
                frame += 1;
                game.advance(FRAME_DT, Some(synthetic_bands(frame)));
            }

            if let Some(result) = game.lock() {
                log::info!(
                    "#{:<3} {:<7} score {:>6}  combo {:>3}",
                    attempt,
                    result.as_str(),
                    game.score().score(),
                    game.score().combo()
                );
            }
        }
        game.quit();

        let score = game.score();
        let achievements = game.achievements();
        log::info!(
            "Final: score {}, max combo {}, accuracy {:.1}% ({} perfect / {} good / {} miss)",
            score.score(),
            score.max_combo(),
            score.accuracy(),
            score.perfect_count(),
            score.good_count(),
            score.miss_count()
        );
        log::info!(
            "Achievements: {}/{} unlocked, {} stars",
            achievements.unlocked_count(),
            achievements.total_achievements(),
            achievements.total_stars()
        );
    }

    /// Slow pulsing "music" so the rotor reacts like it would to a track
    fn synthetic_bands(frame: u64) -> BandLevels {
        let t = frame as f32 * FRAME_DT;
        BandLevels::new(
            0.5 + 0.5 * (t * 2.0).sin(),
            0.25 + 0.25 * (t * 0.5).sin(),
            if frame % 480 == 0 { 0.9 } else { 0.2 },
        )
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(arg) => match arg.parse::<u64>() {
            Ok(seed) => seed,
            Err(_) => {
                eprintln!("usage: starlock [seed] [save_file]");
                std::process::exit(2);
            }
        },
        None => 1,
    };
    let save_file = args.next();

    log::info!("Starlock autoplay starting (seed {})", seed);
    autoplay::run(seed, save_file);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page; nothing to run here
}
