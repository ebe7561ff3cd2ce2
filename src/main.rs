//! Sky Climber headless runner
//!
//! Plays one run with an autopilot standing in for the player, then submits
//! the result to an in-process leaderboard.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use sky_climber::config::GameConfig;
use sky_climber::leaderboard::{Leaderboard, LocalLeaderboard, ScoreSubmission, SubmitOutcome};
use sky_climber::sim::{InputIntent, Snapshot};
use sky_climber::{Session, SimError};

#[derive(Parser)]
#[command(name = "sky-climber", about = "Play one autopiloted Sky Climber run")]
struct Args {
    /// JSON config overriding the default tuning
    config: Option<PathBuf>,

    /// Stop the run after this many ticks (default is five minutes at 60 ticks per second)
    #[arg(long, default_value_t = 60 * 60 * 5)]
    max_ticks: u32,

    /// Seed for platform generation; random when omitted
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Sky Climber (headless) starting...");

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    let mut session = Session::new(config)?;
    match args.seed {
        Some(seed) => session.start_seeded(seed)?,
        None => session.start()?,
    };

    let mut distance = 0;
    let mut ticks = 0;
    while ticks < args.max_ticks {
        let snapshot = session
            .simulation()
            .map(|sim| sim.snapshot())
            .ok_or(SimError::NoActiveRun)?;
        let intent = autopilot(&snapshot, session.config());

        let result = session.tick(intent)?;
        ticks += 1;
        distance = result.distance;
        if result.game_over {
            break;
        }
    }

    if session.final_distance().is_none() {
        log::info!("Autopilot still climbing after {ticks} ticks, stopping");
        session.stop()?;
    }
    println!("Climbed {distance}m in {ticks} ticks");

    let service = LocalLeaderboard::new();
    let mut board = Leaderboard::new();
    board.refresh(&service);
    if board.is_top_ten(distance) {
        let submission = ScoreSubmission::new(distance, "cpu")?;
        match board.submit(&service, &submission) {
            SubmitOutcome::Accepted { rank } => {
                println!("New high score! Rank #{}", rank.unwrap_or(0));
            }
            SubmitOutcome::Rejected => println!("Score was not accepted"),
            SubmitOutcome::Unavailable => println!("Leaderboard unavailable"),
        }
    }

    for (i, entry) in board.entries().iter().enumerate() {
        println!("#{:<2} {:<3} {}m", i + 1, entry.initial, entry.score);
    }
    Ok(())
}

/// Steer toward the platform the player should land on next.
///
/// While rising, aim for the nearest platform above the feet that a full
/// bounce can still reach; while falling (or with nothing in reach), aim for
/// the nearest platform below.
fn autopilot(snapshot: &Snapshot, config: &GameConfig) -> InputIntent {
    let player = &snapshot.player;
    let feet = player.pos.y + player.height;
    let center = player.pos.x + player.width / 2.0;
    let reach = config.player.jump_force * config.player.jump_force / (2.0 * config.player.gravity);

    let above = snapshot
        .platforms
        .iter()
        .filter(|p| p.pos.y < feet && feet - p.pos.y <= reach)
        .min_by(|a, b| b.pos.y.total_cmp(&a.pos.y));
    let below = snapshot
        .platforms
        .iter()
        .filter(|p| p.pos.y >= feet)
        .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

    let target = if player.vel.y < 0.0 { above.or(below) } else { below };
    let Some(target) = target else {
        return InputIntent::IDLE;
    };

    let dx = target.pos.x + target.width / 2.0 - center;
    if dx < -config.player.move_speed {
        InputIntent::LEFT
    } else if dx > config.player.move_speed {
        InputIntent::RIGHT
    } else {
        InputIntent::IDLE
    }
}
