//! Difficulty curve
//!
//! Distance climbed selects a step on the milestone ladder. The resulting
//! multiplier is reported to the HUD and decides whether newly generated
//! platforms may be moving ones.

use rand::Rng;

use crate::config::DifficultyConfig;

/// Speed multiplier for a given distance.
///
/// Milestones are scanned from the top down; the first one reached selects
/// the multiplier one slot above it. Below the first milestone the base
/// multiplier applies.
pub fn speed_multiplier(distance: u32, config: &DifficultyConfig) -> f32 {
    let base = config.speed_multipliers.first().copied().unwrap_or(1.0);
    config
        .milestones
        .iter()
        .enumerate()
        .rev()
        .find(|&(_, &milestone)| distance >= milestone)
        .and_then(|(i, _)| config.speed_multipliers.get(i + 1).copied())
        .unwrap_or(base)
}

/// Whether moving platforms may spawn at this multiplier
#[inline]
pub fn moving_platforms_unlocked(multiplier: f32, config: &DifficultyConfig) -> bool {
    multiplier >= config.moving_threshold
}

/// Roll the kind of the next generated platform. Returns true for a moving platform.
pub fn roll_moving<R: Rng>(rng: &mut R, multiplier: f32, config: &DifficultyConfig) -> bool {
    moving_platforms_unlocked(multiplier, config) && rng.random_bool(config.moving_probability)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_base_multiplier_at_zero() {
        let config = DifficultyConfig::default();
        assert_eq!(speed_multiplier(0, &config), 1.0);
        assert_eq!(speed_multiplier(499, &config), 1.0);
    }

    #[test]
    fn test_milestone_steps() {
        let config = DifficultyConfig::default();
        assert_eq!(speed_multiplier(500, &config), 1.3);
        assert_eq!(speed_multiplier(999, &config), 1.3);
        assert_eq!(speed_multiplier(1000, &config), 1.6);
        assert_eq!(speed_multiplier(1499, &config), 1.6);
        assert_eq!(speed_multiplier(1500, &config), 2.0);
        assert_eq!(speed_multiplier(2500, &config), 3.0);
        assert_eq!(speed_multiplier(1_000_000, &config), 3.0);
    }

    #[test]
    fn test_multiplier_is_monotonic() {
        let config = DifficultyConfig::default();
        let mut last = 0.0;
        for distance in (0..4000).step_by(7) {
            let m = speed_multiplier(distance, &config);
            assert!(m >= last, "multiplier dropped at distance {distance}");
            last = m;
        }
    }

    #[test]
    fn test_no_moving_platforms_before_threshold() {
        let config = DifficultyConfig::default();
        let mut rng = Pcg32::seed_from_u64(7);
        assert!((0..500).all(|_| !roll_moving(&mut rng, 1.3, &config)));
    }

    #[test]
    fn test_moving_platforms_mixed_after_threshold() {
        let config = DifficultyConfig::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let moving = (0..1000)
            .filter(|_| roll_moving(&mut rng, 1.6, &config))
            .count();
        // 30% nominal
        assert!((200..400).contains(&moving), "got {moving} moving platforms");
    }
}
