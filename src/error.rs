//! Error types for the simulation, run session and configuration

use thiserror::Error;

/// Errors raised by the simulation loop and the run session
#[derive(Debug, Error)]
pub enum SimError {
    /// A tick was requested while another tick on the same simulation was running.
    /// The request is dropped without touching state.
    #[error("tick already in progress on this simulation")]
    TickInProgress,

    /// A run was started while another run in the same session is still active
    #[error("a run is already active in this session")]
    RunActive,

    /// The session has no running simulation
    #[error("no active run")]
    NoActiveRun,

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised while loading or validating a [`crate::GameConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("platform width {platform} exceeds canvas width {canvas}")]
    PlatformTooWide { platform: f32, canvas: f32 },

    #[error("platform gap range is inverted: min {min} > max {max}")]
    GapRange { min: f32, max: f32 },

    #[error("minimum live platform count must be at least 1")]
    NoLivePlatforms,

    #[error("{multipliers} speed multipliers given for {milestones} milestones, expected milestones + 1")]
    MultiplierCount { milestones: usize, multipliers: usize },

    #[error("milestones must be strictly ascending")]
    MilestonesUnsorted,

    #[error("speed multipliers must start at 1.0 or more and never decrease")]
    MultipliersDecreasing,

    #[error("moving platform probability {0} is outside [0, 1]")]
    Probability(f64),
}
