//! Asteroid entities and the spawn factory

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::problem::Problem;
use crate::consts::*;

/// Viewport geometry, pushed in by the host on init and resize.
///
/// Layout only affects asteroids at spawn time; live asteroids keep the
/// `max_size` they were created with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Compact layouts cap asteroid size so it never dwarfs the screen
    pub fn is_compact(&self) -> bool {
        self.width <= COMPACT_BREAKPOINT
    }

    /// Maximum asteroid size for this layout
    pub fn max_asteroid_size(&self) -> f32 {
        if self.is_compact() {
            COMPACT_MAX_SIZE.min(self.width * COMPACT_MAX_FRACTION)
        } else {
            ASTEROID_MAX_SIZE
        }
    }
}

/// A spawned threat bound to one arithmetic problem.
///
/// `size` only ever grows while the asteroid is alive; crossing `max_size`
/// removes it with a life penalty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub id: u32,
    pub problem: Problem,
    pub pos: Vec2,
    pub size: f32,
    /// Per-tick growth multiplier before difficulty scaling
    pub growth_rate: f32,
    pub max_size: f32,
}

impl Asteroid {
    /// Spawn an asteroid carrying `problem` somewhere inside the viewport's
    /// safe rectangle. Returns `None` when no viewport is available yet;
    /// the caller tolerates a temporarily under-populated set.
    pub fn spawn(
        id: u32,
        problem: Problem,
        viewport: Option<Viewport>,
        rng: &mut impl Rng,
    ) -> Option<Self> {
        let viewport = viewport?;
        let max_size = viewport.max_asteroid_size();

        // Safe rectangle keeps a fully-grown asteroid on screen
        let safe_w = (viewport.width - max_size - SPAWN_MARGIN).max(MIN_SAFE_AREA);
        let safe_h = (viewport.height * 0.5)
            .min(viewport.height - max_size - SPAWN_MARGIN)
            .max(MIN_SAFE_AREA);

        let x = rng.random_range(0.0..safe_w) + SPAWN_PADDING;
        let y = rng.random_range(0.0..safe_h) + SPAWN_PADDING;

        Some(Self {
            id,
            problem,
            pos: Vec2::new(x, y),
            size: ASTEROID_START_SIZE,
            growth_rate: BASE_GROWTH_RATE + rng.random_range(0.0..GROWTH_JITTER),
            max_size,
        })
    }

    /// Whether the asteroid has grown past its deadline
    pub fn overflowed(&self) -> bool {
        self.size > self.max_size
    }

    /// Center point (positions are top-left, matching the draw rect)
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Operation;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn problem(rng: &mut Pcg32) -> Problem {
        Problem::generate(Operation::Multiplication, rng)
    }

    #[test]
    fn test_spawn_requires_viewport() {
        let mut rng = Pcg32::seed_from_u64(7);
        let p = problem(&mut rng);
        assert!(Asteroid::spawn(1, p, None, &mut rng).is_none());
    }

    #[test]
    fn test_spawn_inside_safe_rect() {
        let mut rng = Pcg32::seed_from_u64(8);
        let viewport = Viewport::new(1920.0, 1080.0);
        for id in 0..100 {
            let p = problem(&mut rng);
            let a = Asteroid::spawn(id, p, Some(viewport), &mut rng).unwrap();
            assert!(a.pos.x >= SPAWN_PADDING);
            assert!(a.pos.y >= SPAWN_PADDING);
            assert!(a.pos.x <= 1920.0 - ASTEROID_MAX_SIZE - SPAWN_MARGIN + SPAWN_PADDING);
            assert!(a.pos.y <= 540.0 + SPAWN_PADDING);
            assert_eq!(a.size, ASTEROID_START_SIZE);
            assert_eq!(a.max_size, ASTEROID_MAX_SIZE);
            assert!(a.growth_rate >= BASE_GROWTH_RATE);
            assert!(a.growth_rate < BASE_GROWTH_RATE + GROWTH_JITTER);
        }
    }

    #[test]
    fn test_compact_layout_caps_max_size() {
        let narrow = Viewport::new(390.0, 844.0);
        assert!(narrow.is_compact());
        assert_eq!(narrow.max_asteroid_size(), 390.0 * COMPACT_MAX_FRACTION);

        let tablet = Viewport::new(768.0, 1024.0);
        assert!(tablet.is_compact());
        assert_eq!(tablet.max_asteroid_size(), COMPACT_MAX_SIZE);

        let desktop = Viewport::new(1920.0, 1080.0);
        assert!(!desktop.is_compact());
        assert_eq!(desktop.max_asteroid_size(), ASTEROID_MAX_SIZE);
    }

    #[test]
    fn test_tiny_viewport_still_spawns() {
        let mut rng = Pcg32::seed_from_u64(9);
        let viewport = Viewport::new(320.0, 200.0);
        let p = problem(&mut rng);
        // Safe rect floors at MIN_SAFE_AREA even when the math goes negative
        let a = Asteroid::spawn(1, p, Some(viewport), &mut rng).unwrap();
        assert!(a.pos.x >= SPAWN_PADDING);
        assert!(a.pos.x <= MIN_SAFE_AREA + SPAWN_PADDING);
    }
}
