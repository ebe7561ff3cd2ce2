//! Simulation loop
//!
//! One call to [`Simulation::tick`] advances a run by exactly one discrete
//! step. The caller owns the cadence (frame callback, timer, test loop).
//! Overlapping ticks on the same simulation are refused, never double-stepped.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::difficulty;
use super::physics::{self, InputIntent};
use super::platforms::PlatformRegistry;
use super::state::{PlatformEntity, PlayerEntity, WorldState};
use crate::config::GameConfig;
use crate::error::SimError;

/// Outcome of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickResult {
    pub distance: u32,
    pub speed_multiplier: f32,
    pub game_over: bool,
}

/// Read-only view handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub player: PlayerEntity,
    pub platforms: Vec<PlatformEntity>,
    pub camera_offset: f32,
    pub distance: u32,
    pub speed_multiplier: f32,
    pub game_over: bool,
}

/// Mutable state of a run. Each tick phase touches its own fields.
#[derive(Debug)]
struct RunState {
    player: PlayerEntity,
    platforms: PlatformRegistry,
    world: WorldState,
    rng: Pcg32,
}

impl RunState {
    fn new(config: &GameConfig, mut rng: Pcg32) -> Self {
        let player = PlayerEntity::spawn(config);
        let platforms = PlatformRegistry::seeded(config, &mut rng);
        let base = difficulty::speed_multiplier(0, &config.difficulty);
        let world = WorldState::new(player.pos.y, base);
        Self {
            player,
            platforms,
            world,
            rng,
        }
    }

    fn result(&self) -> TickResult {
        TickResult {
            distance: self.world.distance,
            speed_multiplier: self.world.speed_multiplier,
            game_over: self.world.game_over,
        }
    }

    fn step(&mut self, config: &GameConfig, camera: &Camera, spawn_y: f32, intent: InputIntent) {
        let Self {
            player,
            platforms,
            world,
            rng,
        } = self;
        world.ticks += 1;

        // 1. Integrate player and moving platforms
        physics::integrate(player, intent, &config.player, config.canvas.width);
        platforms.advance(config.canvas.width);

        // 2. Landings
        if let Some(landing) =
            physics::resolve_landing(player, platforms.as_slice(), config.player.jump_force)
        {
            log::trace!("Landed on platform at y={}", landing.surface_y);
        }

        // 3. Camera and distance
        if let Some(offset) = camera.follow(player.pos.y) {
            world.camera_offset = offset;
            world.distance = Camera::distance(world.distance, offset);
        }

        // 4. Best height and climb latch
        world.track_height(player.pos.y, spawn_y);

        // 5. Evict, then 6. top up
        let evicted = platforms.evict_below(
            world.camera_offset,
            config.canvas.height,
            config.platform.eviction_margin,
        );
        let added = platforms.replenish(
            config,
            rng,
            world.speed_multiplier,
            camera.visible_bottom(world.camera_offset),
        );
        if evicted > 0 || added > 0 {
            log::trace!("Recycled platforms: -{evicted} +{added}, {} live", platforms.len());
        }

        // 7. Difficulty
        let multiplier = difficulty::speed_multiplier(world.distance, &config.difficulty);
        if multiplier > world.speed_multiplier {
            log::info!("Speed up to {multiplier:.1}x at {}m", world.distance);
        }
        world.speed_multiplier = multiplier;

        // 8. Termination
        if Camera::is_eliminated(
            player.pos.y,
            world.highest_point,
            world.climbing_started,
            config.fall_limit(),
        ) {
            world.game_over = true;
            log::info!(
                "Game over at {}m after {} ticks",
                world.distance,
                world.ticks
            );
        }
    }
}

/// Releases the busy flag when a tick finishes
struct TickGuard<'a> {
    busy: &'a AtomicBool,
}

impl Drop for TickGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// A single run of the game.
///
/// `tick` takes `&self` so a simulation can be shared with whatever drives
/// it; a busy flag makes overlapping calls fail with
/// [`SimError::TickInProgress`] instead of racing on the run state.
#[derive(Debug)]
pub struct Simulation {
    config: GameConfig,
    camera: Camera,
    spawn_y: f32,
    busy: AtomicBool,
    state: Mutex<RunState>,
}

impl Simulation {
    /// Start a run with an entropy-seeded generator
    pub fn new(config: GameConfig) -> Result<Self, SimError> {
        let rng = Pcg32::from_rng(&mut rand::rng());
        Self::with_rng(config, rng)
    }

    /// Start a run with a fixed generator seed
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, SimError> {
        Self::with_rng(config, Pcg32::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: Pcg32) -> Result<Self, SimError> {
        config.validate()?;
        let state = RunState::new(&config, rng);
        let spawn_y = state.player.pos.y;
        Ok(Self {
            camera: Camera::new(config.canvas.height),
            spawn_y,
            busy: AtomicBool::new(false),
            state: Mutex::new(state),
            config,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Advance the run by one step.
    ///
    /// After game over this is a no-op that keeps reporting the final result.
    pub fn tick(&self, intent: InputIntent) -> Result<TickResult, SimError> {
        let _guard = self.begin_tick()?;
        let mut state = self.state.lock();
        if !state.world.game_over {
            state.step(&self.config, &self.camera, self.spawn_y, intent);
        }
        Ok(state.result())
    }

    fn begin_tick(&self) -> Result<TickGuard<'_>, SimError> {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| {
                log::warn!("Rejected overlapping tick");
                SimError::TickInProgress
            })?;
        Ok(TickGuard { busy: &self.busy })
    }

    /// Whether a tick is currently executing
    pub fn is_ticking(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Latest tick result without advancing
    pub fn result(&self) -> TickResult {
        self.state.lock().result()
    }

    pub fn is_over(&self) -> bool {
        self.state.lock().world.game_over
    }

    /// Copy of everything the renderer draws
    pub fn snapshot(&self) -> Snapshot {
        let state = self.state.lock();
        Snapshot {
            player: state.player.clone(),
            platforms: state.platforms.as_slice().to_vec(),
            camera_offset: state.world.camera_offset,
            distance: state.world.distance,
            speed_multiplier: state.world.speed_multiplier,
            game_over: state.world.game_over,
        }
    }

    /// Copy of the progress tracker
    pub fn world(&self) -> WorldState {
        self.state.lock().world.clone()
    }

    #[cfg(test)]
    fn with_state<T>(&self, f: impl FnOnce(&mut RunState) -> T) -> T {
        f(&mut *self.state.lock())
    }
}
