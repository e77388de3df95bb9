//! Math Asteroids - an arcade arithmetic drill
//!
//! Core modules:
//! - `sim`: Deterministic game logic (problems, asteroids, state machine)
//! - `renderer`: 2D canvas drawing surface
//! - `platform`: Frame scheduling abstraction
//! - `highscores`: Best-score persistence
//! - `audio`: Procedural sound effects

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscores;
pub mod platform;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::HighScore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Asteroid size at spawn (pixels)
    pub const ASTEROID_START_SIZE: f32 = 50.0;
    /// Maximum asteroid size on wide layouts
    pub const ASTEROID_MAX_SIZE: f32 = 700.0;
    /// Maximum asteroid size cap on compact layouts
    pub const COMPACT_MAX_SIZE: f32 = 400.0;
    /// Compact-layout fraction of viewport width
    pub const COMPACT_MAX_FRACTION: f32 = 0.8;
    /// Viewport width at or below which the compact layout applies
    pub const COMPACT_BREAKPOINT: f32 = 768.0;

    /// Base per-tick growth multiplier
    pub const BASE_GROWTH_RATE: f32 = 1.002;
    /// Random jitter added to an asteroid's growth rate at spawn
    pub const GROWTH_JITTER: f32 = 0.001;
    /// Growth-rate increase per point of score
    pub const SPEED_PER_POINT: f32 = 0.0005;

    /// Number of asteroids kept in play
    pub const ACTIVE_ASTEROIDS: usize = 3;
    /// Lives at the start of a run
    pub const STARTING_LIVES: i32 = 3;
    /// Screen-shake duration after losing a life (frames)
    pub const SHAKE_FRAMES: i32 = 7;
    /// Shake counter value when idle
    pub const SHAKE_IDLE: i32 = -1;

    /// Answer choices per problem
    pub const CHOICE_COUNT: usize = 4;
    /// Decoy offset range for addition/subtraction/multiplication
    pub const DECOY_SPREAD: i64 = 10;
    /// Decoy offset range for division
    pub const DECOY_SPREAD_DIVISION: i64 = 5;
    /// Cooldown after a wrong answer (milliseconds)
    pub const ANSWER_LOCK_MS: i32 = 1000;

    /// Extra padding subtracted from the spawn rectangle
    pub const SPAWN_MARGIN: f32 = 100.0;
    /// Offset from the viewport edge for spawn positions
    pub const SPAWN_PADDING: f32 = 50.0;
    /// Minimum spawn rectangle dimension
    pub const MIN_SAFE_AREA: f32 = 100.0;

    /// Target reticle radius (pixels)
    pub const RETICLE_RADIUS: f64 = 60.0;
}
