//! Simulation module
//!
//! All gameplay logic lives here. Nothing in this module renders, reads
//! input devices or touches the network:
//! - One call to `Simulation::tick` is one discrete step
//! - Input is a plain intent snapshot sampled per tick
//! - Renderers read a cloned `Snapshot`

pub mod camera;
pub mod difficulty;
pub mod physics;
pub mod platforms;
pub mod state;
pub mod tick;

pub use camera::Camera;
pub use difficulty::speed_multiplier;
pub use physics::{InputIntent, Landing};
pub use platforms::PlatformRegistry;
pub use state::{Facing, PlatformEntity, PlatformKind, PlayerEntity, WorldState};
pub use tick::{Simulation, Snapshot, TickResult};
