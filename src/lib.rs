//! Sky Climber - An endless vertical platformer
//!
//! Core modules:
//! - `sim`: Simulation (physics, landings, platform generation, camera, difficulty)
//! - `session`: Run lifecycle owned by the caller
//! - `leaderboard`: Remote high score board with graceful degradation
//! - `config`: Data-driven game constants

pub mod config;
pub mod error;
pub mod leaderboard;
pub mod session;
pub mod sim;

pub use config::GameConfig;
pub use error::{ConfigError, SimError};
pub use leaderboard::{Leaderboard, LeaderboardService};
pub use session::{RunPhase, Session};
pub use sim::{InputIntent, Simulation, Snapshot, TickResult};

/// Fixed simulation constants that are not part of the tunable config
pub mod consts {
    /// World units per meter of climbed distance
    pub const UNITS_PER_METER: f32 = 10.0;

    /// Attempts the generator makes per missing platform before giving up for this tick
    pub const MAX_PROPOSALS_PER_SLOT: u32 = 8;

    /// Number of entries shown on the leaderboard
    pub const LEADERBOARD_SIZE: usize = 10;

    /// Maximum length of a leaderboard initial
    pub const MAX_INITIAL_LEN: usize = 3;
}
