//! Dice Golf entry point
//!
//! The browser build is driven from JavaScript through `web::WebGame`. The
//! native binary autoplays a few holes headlessly, printing each course, which
//! is handy for eyeballing the generator and the turn logic.
//!
//! Usage: `dice-golf [seed] [holes]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use dice_golf::consts::SIM_DT;
    use dice_golf::sim::{GameEvent, TurnPhase};
    use dice_golf::{Game, InstantPhysics, Settings};

    /// Give up on a hole after this many strokes
    const STROKE_LIMIT: u32 = 30;
    /// Simulated seconds allowed per hole
    const HOLE_TIME_LIMIT: f32 = 600.0;

    env_logger::init();
    log::info!("Dice Golf (native) starting...");

    let mut args = std::env::args().skip(1);
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            eprintln!("invalid seed: {}", e);
            std::process::exit(2);
        }
        None => 42,
    };
    let holes = match args.next().map(|s| s.parse::<u32>()) {
        Some(Ok(n)) => n.max(1),
        Some(Err(e)) => {
            eprintln!("invalid hole count: {}", e);
            std::process::exit(2);
        }
        None => 3,
    };

    let mut game = match Game::new(seed, InstantPhysics::new()) {
        Ok(game) => game,
        Err(e) => {
            eprintln!("course generation failed: {}", e);
            std::process::exit(1);
        }
    };
    game.apply_settings(&Settings::load());
    game.set_autoplay(true);
    log::info!("Game initialized with seed: {}", seed);

    for hole in 1..=holes {
        if hole > 1 {
            // A hole abandoned mid-stroke has to finish animating first
            game.set_autoplay(false);
            while game.session().is_animating() {
                game.update(SIM_DT);
            }
            game.drain_events();
            game.next_hole();
            game.update(SIM_DT);
            game.set_autoplay(true);
        }
        let session = game.session();
        println!(
            "\nHole {} - par {}  (S tee, O cup)",
            session.hole_number(),
            session.course().par()
        );
        print!("{}", session.grid().to_ascii());

        let mut elapsed = 0.0;
        loop {
            game.update(SIM_DT);
            elapsed += SIM_DT;

            for event in game.drain_events() {
                match event {
                    GameEvent::DiceSettled {
                        values,
                        adjusted,
                        shape,
                        ..
                    } => println!("  rolled {:?} -> {} tiles {}", values, adjusted, shape.code()),
                    GameEvent::BallLanded { at, tile } => {
                        println!("  landed ({}, {}) on {:?}", at.x, at.y, tile)
                    }
                    GameEvent::SlopeRoll { to, .. } => println!("  rolled down to ({}, {})", to.x, to.y),
                    GameEvent::HoledOut(outcome) => println!("  {}", outcome.message),
                    _ => {}
                }
            }

            let session = game.session();
            if session.phase() == TurnPhase::HoleComplete {
                break;
            }
            if session.turn().stroke_count >= STROKE_LIMIT || elapsed >= HOLE_TIME_LIMIT {
                log::warn!("Giving up on hole {} after {} strokes", hole, session.turn().stroke_count);
                break;
            }
        }
    }

    let card = game.session().scorecard();
    if card.is_empty() {
        println!("\nNo holes completed");
        return;
    }
    println!(
        "\nScorecard: {} holes, {} strokes, par {} ({})",
        card.holes_played(),
        card.total_strokes(),
        card.total_par(),
        card.total_label()
    );
    if let Some(best) = card.best_score() {
        println!("Best hole: {:+}", best);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}
