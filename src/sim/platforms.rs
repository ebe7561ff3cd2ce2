//! Platform registry: seeding, steady-state generation and eviction
//!
//! Platforms are generated upward from the topmost live one and evicted once
//! they scroll far enough below the viewport. The registry tops itself back up
//! to a minimum live count after every eviction pass, discarding any proposal
//! that would land on top of an existing platform.

use rand::Rng;

use super::camera::Camera;
use super::difficulty;
use super::state::PlatformEntity;
use crate::config::GameConfig;
use crate::consts::MAX_PROPOSALS_PER_SLOT;

/// Live platforms of a run, in no particular order
#[derive(Debug, Clone, Default)]
pub struct PlatformRegistry {
    platforms: Vec<PlatformEntity>,
}

impl PlatformRegistry {
    /// Starting layout: a centered static platform under the spawn point and a
    /// stack of static platforms above it
    pub fn seeded<R: Rng>(config: &GameConfig, rng: &mut R) -> Self {
        let platform = &config.platform;
        let mut platforms = Vec::with_capacity(platform.initial_count + 1);

        platforms.push(PlatformEntity::new_static(
            config.canvas.width / 2.0 - platform.width / 2.0,
            platform.initial_y,
            platform,
        ));

        let mut last_y = platform.initial_y;
        for _ in 0..platform.initial_count {
            last_y -= draw_gap(rng, config);
            let x = draw_x(rng, config);
            platforms.push(PlatformEntity::new_static(x, last_y, platform));
        }

        log::debug!("Seeded {} platforms", platforms.len());
        Self { platforms }
    }

    pub fn from_platforms(platforms: Vec<PlatformEntity>) -> Self {
        Self { platforms }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    pub fn as_slice(&self) -> &[PlatformEntity] {
        &self.platforms
    }

    /// Platform with the smallest y, i.e. highest on screen
    pub fn topmost(&self) -> Option<&PlatformEntity> {
        self.platforms
            .iter()
            .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
    }

    /// Step every moving platform
    pub fn advance(&mut self, world_width: f32) {
        for platform in &mut self.platforms {
            platform.advance(world_width);
        }
    }

    /// Whether a live platform sits within `tolerance` of `(x, y)` on both axes
    pub fn is_occupied(&self, x: f32, y: f32, tolerance: f32) -> bool {
        self.platforms
            .iter()
            .any(|p| (p.pos.x - x).abs() < tolerance && (p.pos.y - y).abs() < tolerance)
    }

    /// Remove platforms that scrolled more than the eviction margin below the viewport.
    /// Returns how many were removed.
    pub fn evict_below(&mut self, camera_offset: f32, viewport_height: f32, margin: f32) -> usize {
        let before = self.platforms.len();
        let limit = viewport_height + margin;
        self.platforms
            .retain(|p| Camera::to_screen(p.pos.y, camera_offset) < limit);
        before - self.platforms.len()
    }

    /// Generate platforms until the configured minimum is live again.
    ///
    /// Proposals that collide with a live platform are discarded and retried
    /// with fresh draws. If the retry budget runs out the registry is left
    /// short and the next tick tries again. Returns how many were added.
    pub fn replenish<R: Rng>(
        &mut self,
        config: &GameConfig,
        rng: &mut R,
        multiplier: f32,
        anchor_when_empty: f32,
    ) -> usize {
        let min_live = config.platform.min_live;
        let tolerance = config.platform.dedup_tolerance;
        let mut added = 0;

        while self.platforms.len() < min_live {
            let mut placed = false;

            for attempt in 0..MAX_PROPOSALS_PER_SLOT {
                let base_y = match self.topmost() {
                    Some(top) => top.pos.y,
                    None => {
                        log::warn!(
                            "Platform registry empty, regenerating from y={anchor_when_empty}"
                        );
                        anchor_when_empty
                    }
                };

                let y = base_y - draw_gap(rng, config);
                let x = draw_x(rng, config);

                if self.is_occupied(x, y, tolerance) {
                    log::debug!("Discarded platform proposal at ({x:.1}, {y:.1}), attempt {attempt}");
                    continue;
                }

                let platform = if difficulty::roll_moving(rng, multiplier, &config.difficulty) {
                    let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
                    PlatformEntity::new_moving(x, y, direction, &config.platform)
                } else {
                    PlatformEntity::new_static(x, y, &config.platform)
                };
                self.platforms.push(platform);
                added += 1;
                placed = true;
                break;
            }

            if !placed {
                log::warn!(
                    "Gave up placing platform after {MAX_PROPOSALS_PER_SLOT} proposals; {} of {min_live} live",
                    self.platforms.len()
                );
                break;
            }
        }

        added
    }
}

/// Vertical gap to the next platform, uniform in `[min_gap, max_gap]`
fn draw_gap<R: Rng>(rng: &mut R, config: &GameConfig) -> f32 {
    rng.random_range(config.platform.min_gap..=config.platform.max_gap)
}

/// Left edge uniform across the playable width
fn draw_x<R: Rng>(rng: &mut R, config: &GameConfig) -> f32 {
    rng.random_range(0.0..=config.canvas.width - config.platform.width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PlatformKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn test_seeded_layout() {
        let config = GameConfig::default();
        let registry = PlatformRegistry::seeded(&config, &mut rng());

        assert_eq!(registry.len(), 16);
        let start = &registry.as_slice()[0];
        assert_eq!(start.pos.x, 147.5);
        assert_eq!(start.pos.y, 600.0);
        assert!(registry.as_slice().iter().all(|p| !p.is_moving()));

        // Each platform sits a legal gap above the previous one
        for pair in registry.as_slice().windows(2) {
            let gap = pair[0].pos.y - pair[1].pos.y;
            assert!((60.0..=120.0).contains(&gap), "gap {gap}");
            assert!(pair[1].pos.x >= 0.0 && pair[1].pos.x <= 295.0);
        }
    }

    #[test]
    fn test_replenish_tops_up_above_topmost() {
        let config = GameConfig::default();
        let mut rng = rng();
        let mut registry = PlatformRegistry::from_platforms(vec![PlatformEntity::new_static(
            10.0,
            400.0,
            &config.platform,
        )]);

        let added = registry.replenish(&config, &mut rng, 1.0, 667.0);
        assert_eq!(added, 14);
        assert_eq!(registry.len(), config.platform.min_live);
        assert!(registry.as_slice()[1..].iter().all(|p| p.pos.y < 400.0));
    }

    #[test]
    fn test_replenish_is_noop_at_minimum() {
        let config = GameConfig::default();
        let mut rng = rng();
        let mut registry = PlatformRegistry::seeded(&config, &mut rng);
        assert_eq!(registry.replenish(&config, &mut rng, 3.0, 667.0), 0);
        assert_eq!(registry.len(), 16);
    }

    #[test]
    fn test_replenish_recovers_from_empty_registry() {
        let config = GameConfig::default();
        let mut registry = PlatformRegistry::default();
        registry.replenish(&config, &mut rng(), 1.0, 1000.0);
        assert_eq!(registry.len(), config.platform.min_live);
        assert!(registry.as_slice().iter().all(|p| p.pos.y < 1000.0));
    }

    #[test]
    fn test_colliding_proposals_are_discarded() {
        // Zero gap and a single column: every proposal lands on the topmost platform
        let mut config = GameConfig::default();
        config.canvas.width = config.platform.width;
        config.platform.min_gap = 0.0;
        config.platform.max_gap = 0.0;

        let mut registry = PlatformRegistry::from_platforms(vec![PlatformEntity::new_static(
            0.0,
            100.0,
            &config.platform,
        )]);
        let added = registry.replenish(&config, &mut rng(), 1.0, 667.0);

        assert_eq!(added, 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_eviction_uses_screen_space() {
        let config = GameConfig::default();
        let mut registry = PlatformRegistry::from_platforms(vec![
            PlatformEntity::new_static(0.0, 700.0, &config.platform),
            PlatformEntity::new_static(0.0, 766.0, &config.platform),
            PlatformEntity::new_static(0.0, 767.0, &config.platform),
            PlatformEntity::new_static(0.0, 300.0, &config.platform),
        ]);

        // No scroll: 767 is exactly at height + margin and goes
        assert_eq!(registry.evict_below(0.0, 667.0, 100.0), 1);
        assert_eq!(registry.len(), 3);

        // Scrolled up by 400: only the platform at 300 stays
        assert_eq!(registry.evict_below(400.0, 667.0, 100.0), 2);
        assert_eq!(registry.as_slice()[0].pos.y, 300.0);
    }

    #[test]
    fn test_moving_platforms_generated_at_high_difficulty() {
        let mut config = GameConfig::default();
        config.difficulty.moving_probability = 1.0;
        let mut registry = PlatformRegistry::default();
        registry.replenish(&config, &mut rng(), 2.0, 667.0);

        for platform in registry.as_slice() {
            match platform.kind {
                PlatformKind::Moving {
                    direction,
                    origin_x,
                    ..
                } => {
                    assert!(direction == 1.0 || direction == -1.0);
                    assert_eq!(origin_x, platform.pos.x);
                }
                PlatformKind::Static => panic!("expected only moving platforms"),
            }
        }
    }
}
