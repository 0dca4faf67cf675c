//! Off Color headless runner
//!
//! Plays one run with a scripted player through the same `tick` loop a UI
//! would drive, then records the result on the local leaderboard.
//!
//! Usage: `off-color [seed] [easy|normal|hard] [color|text]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use off_color::sim::{GameType, MistakeTolerance, PlaySession, RunEvent, TickInput, tick};
    use off_color::{Leaderboards, Settings, platform};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    platform::init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let seed = args
        .first()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| platform::now_ms() as u64);
    let tolerance = args
        .get(1)
        .and_then(|s| MistakeTolerance::from_str(s))
        .unwrap_or_default();
    let game_type = match args.get(2).map(|s| s.as_str()) {
        Some("text") | Some("color+text") => GameType::ColorAndText,
        _ => GameType::ColorOnly,
    };

    let mut store = platform::default_store();
    let settings = Settings::load(store.as_ref());
    let mut boards = Leaderboards::load(store.as_ref());

    let mut session = PlaySession::new(seed, game_type, tolerance, &settings);
    // Player reaction model: ~0.7s per tap, 95% accuracy, occasional hesitation
    let mut player = Pcg32::seed_from_u64(seed ^ 0x9E37_79B9_7F4A_7C15);

    // Retries can repeat; bound the loop
    let mut ticks = 0u32;
    while ticks < 100_000 {
        ticks += 1;
        if !session.is_playing() {
            if session.retry_level() {
                continue;
            }
            break;
        }

        let correct = session
            .board()
            .correct_indices(session.run().game_type(), session.announced());
        let hesitate = player.random_bool(0.05);
        let tap = if hesitate {
            None
        } else if player.random_bool(0.95) {
            correct.first().copied()
        } else {
            (0..off_color::consts::BOARD_SIZE).find(|i| !correct.contains(i))
        };
        let dt = if hesitate { 4.0 } else { player.random_range(0.4..1.0) };

        tick(
            &mut session,
            &TickInput {
                tap,
                ..Default::default()
            },
            dt,
        );

        for event in session.drain_events() {
            match event {
                RunEvent::LevelCompleted { level, committed_points, perfect_bonus } => {
                    log::info!(
                        "L{} cleared: +{} {}",
                        level,
                        committed_points,
                        perfect_bonus.map(|b| format!("(perfect +{})", b)).unwrap_or_default()
                    );
                }
                RunEvent::LevelFailed { level, outcome } => {
                    log::info!("L{} failed: {:?}", level, outcome);
                }
                _ => {}
            }
        }
    }

    let summary = session.summary();
    log::info!(
        "Run over: score {}, level {}, completed {}, perfect {}, mistakes {}, timeouts {}",
        summary.final_score,
        summary.highest_level,
        summary.completed,
        summary.perfect_levels,
        summary.mistakes,
        summary.timeouts
    );

    if let Some(rank) = boards.submit_run(session.run(), platform::now_ms()) {
        log::info!("Leaderboard rank #{} ({})", rank, tolerance.as_str());
        boards.save(store.as_mut(), tolerance);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web shell links the library directly; nothing to run here
}
