//! Run lifecycle
//!
//! A `Session` is owned by whatever hosts the game (a frame loop, a test, the
//! demo binary). It holds at most one active run and refuses to start a
//! second one on top of it, so a stray start button can never leave two loops
//! stepping the same world.

use crate::config::GameConfig;
use crate::error::{ConfigError, SimError};
use crate::leaderboard::{Leaderboard, LeaderboardService, LeaderboardStatus};
use crate::sim::{InputIntent, Simulation, TickResult};

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// No run, or the last run was stopped
    Idle,
    Running,
    /// The last run ended; `distance` is the final score in meters
    GameOver { distance: u32 },
}

/// What the game over screen shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverReport {
    pub distance: u32,
    /// Whether the distance qualifies for the top 10 (always true when the board is unavailable)
    pub is_top_ten: bool,
    pub leaderboard: LeaderboardStatus,
}

/// Owner of the current run
#[derive(Debug)]
pub struct Session {
    config: GameConfig,
    run: Option<Simulation>,
    phase: RunPhase,
    best_distance: u32,
    runs_started: u32,
}

impl Session {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            run: None,
            phase: RunPhase::Idle,
            best_distance: 0,
            runs_started: 0,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Best distance over all runs in this session
    pub fn best_distance(&self) -> u32 {
        self.best_distance
    }

    pub fn runs_started(&self) -> u32 {
        self.runs_started
    }

    /// The current or last run
    pub fn simulation(&self) -> Option<&Simulation> {
        self.run.as_ref()
    }

    /// Start a fresh run. Fails if one is already running.
    pub fn start(&mut self) -> Result<&Simulation, SimError> {
        self.ensure_not_running()?;
        let sim = Simulation::new(self.config.clone())?;
        Ok(self.install(sim))
    }

    /// Start a fresh run with a fixed generator seed
    pub fn start_seeded(&mut self, seed: u64) -> Result<&Simulation, SimError> {
        self.ensure_not_running()?;
        let sim = Simulation::with_seed(self.config.clone(), seed)?;
        Ok(self.install(sim))
    }

    /// Throw away the current run, if any, and start over
    pub fn restart(&mut self) -> Result<&Simulation, SimError> {
        if self.phase == RunPhase::Running {
            self.stop()?;
        }
        self.start()
    }

    /// End the running run without a game over
    pub fn stop(&mut self) -> Result<(), SimError> {
        if self.phase != RunPhase::Running {
            return Err(SimError::NoActiveRun);
        }
        self.run = None;
        self.phase = RunPhase::Idle;
        log::info!("Run stopped");
        Ok(())
    }

    /// Step the running run
    pub fn tick(&mut self, intent: InputIntent) -> Result<TickResult, SimError> {
        if self.phase != RunPhase::Running {
            return Err(SimError::NoActiveRun);
        }
        let sim = self.run.as_ref().ok_or(SimError::NoActiveRun)?;
        let result = sim.tick(intent)?;

        if result.game_over {
            self.phase = RunPhase::GameOver {
                distance: result.distance,
            };
            if result.distance > self.best_distance {
                self.best_distance = result.distance;
            }
        }
        Ok(result)
    }

    /// Final distance of the last run, once it is over
    pub fn final_distance(&self) -> Option<u32> {
        match self.phase {
            RunPhase::GameOver { distance } => Some(distance),
            _ => None,
        }
    }

    /// Load the leaderboard for the game over screen. A failing service
    /// still yields a report.
    pub fn game_over_report(
        &self,
        board: &mut Leaderboard,
        service: &dyn LeaderboardService,
    ) -> Option<GameOverReport> {
        let distance = self.final_distance()?;
        let status = board.refresh(service);
        Some(GameOverReport {
            distance,
            is_top_ten: board.is_top_ten(distance),
            leaderboard: status,
        })
    }

    fn ensure_not_running(&self) -> Result<(), SimError> {
        if self.phase == RunPhase::Running {
            log::warn!("Refusing to start a second run while one is active");
            return Err(SimError::RunActive);
        }
        Ok(())
    }

    fn install(&mut self, sim: Simulation) -> &Simulation {
        self.runs_started += 1;
        self.phase = RunPhase::Running;
        log::info!("Run {} started", self.runs_started);
        self.run.insert(sim)
    }
}
