//! Authoritative game state
//!
//! All gameplay state lives here. The state machine is pure and
//! deterministic: seeded RNG, no platform dependencies, mutation only
//! through the operations in `tick`.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::asteroid::{Asteroid, Viewport};
use super::problem::Operation;
use crate::consts::*;

/// Signals emitted by state transitions for the host to act on
/// (audio, persistence, unlock timers). Never blocks the tick path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Target asteroid destroyed by a correct answer
    Correct,
    /// Wrong answer; host should schedule an unlock for this generation
    Incorrect { unlock_generation: u64 },
    /// An asteroid reached max size
    LifeLost,
    /// Lives hit zero; host persists the high score
    GameOver { final_score: u32 },
}

/// Per-tick immutable snapshot handed to the drawing surface
#[derive(Debug, Clone)]
pub struct RenderSnapshot {
    pub asteroids: Vec<Asteroid>,
    pub shake_frames: i32,
    pub answer_locked: bool,
    pub game_over: bool,
}

/// Complete game state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Operation for this run, immutable until reset
    pub operation: Operation,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Active asteroids in spawn order; index 0 is the target
    pub asteroids: Vec<Asteroid>,
    pub score: u32,
    pub lives: i32,
    /// Freezes all time-driven mutation
    pub paused: bool,
    /// Cooldown flag after a wrong answer; submissions are ignored while set
    pub answer_locked: bool,
    /// Bumped on every lock and on reset so stale unlock timers are ignored
    pub lock_generation: u64,
    /// Terminal until reset
    pub game_over: bool,
    /// Frames of screen shake remaining; SHAKE_IDLE when idle
    pub shake_frames: i32,
    /// Spawn geometry; None until the host reports a canvas
    pub viewport: Option<Viewport>,
    next_id: u32,
}

impl GameState {
    /// Create a fresh run with the given seed and operation
    pub fn new(seed: u64, operation: Operation) -> Self {
        Self {
            operation,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            asteroids: Vec::new(),
            score: 0,
            lives: STARTING_LIVES,
            paused: false,
            answer_locked: false,
            lock_generation: 0,
            game_over: false,
            shake_frames: SHAKE_IDLE,
            viewport: None,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Record the current canvas geometry. Only affects future spawns.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Some(Viewport::new(width, height));
    }

    /// The asteroid answer submissions are evaluated against
    pub fn target(&self) -> Option<&Asteroid> {
        self.asteroids.first()
    }

    /// Choices for the current target, for the answer buttons
    pub fn current_choices(&self) -> Option<[i64; CHOICE_COUNT]> {
        self.target().map(|a| a.problem.choices)
    }

    /// Clear the answer lock if `generation` is still current.
    ///
    /// Stale generations (a reset or a later wrong answer happened since the
    /// timer was scheduled) are ignored, so a timer can never unlock a state
    /// it was not scheduled for.
    pub fn clear_answer_lock(&mut self, generation: u64) {
        if self.answer_locked && self.lock_generation == generation {
            self.answer_locked = false;
        }
    }

    /// Return to a fresh running state from any state, including game over.
    /// The asteroid set refills on the next tick.
    pub fn reset(&mut self) {
        self.asteroids.clear();
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.paused = false;
        self.answer_locked = false;
        self.lock_generation += 1;
        self.game_over = false;
        self.shake_frames = SHAKE_IDLE;
    }

    /// Immutable render-ready snapshot for the drawing surface
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            asteroids: self.asteroids.clone(),
            shake_frames: self.shake_frames,
            answer_locked: self.answer_locked,
            game_over: self.game_over,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_restores_fresh_state() {
        let mut state = GameState::new(42, Operation::Addition);
        state.set_viewport(1280.0, 720.0);
        state.score = 17;
        state.lives = 0;
        state.game_over = true;
        state.paused = true;
        state.answer_locked = true;
        state.shake_frames = 5;

        for _ in 0..3 {
            state.reset();
            assert_eq!(state.score, 0);
            assert_eq!(state.lives, STARTING_LIVES);
            assert!(!state.game_over);
            assert!(!state.paused);
            assert!(!state.answer_locked);
            assert_eq!(state.shake_frames, SHAKE_IDLE);
            assert!(state.asteroids.is_empty());
        }
        // Viewport and operation survive a reset
        assert!(state.viewport.is_some());
        assert_eq!(state.operation, Operation::Addition);
    }

    #[test]
    fn test_stale_unlock_generation_ignored() {
        let mut state = GameState::new(1, Operation::Multiplication);
        state.answer_locked = true;
        state.lock_generation = 3;

        state.clear_answer_lock(2);
        assert!(state.answer_locked, "stale generation must not unlock");

        state.clear_answer_lock(3);
        assert!(!state.answer_locked);
    }

    #[test]
    fn test_reset_invalidates_pending_unlock() {
        let mut state = GameState::new(1, Operation::Multiplication);
        state.answer_locked = true;
        let pending = state.lock_generation;

        state.reset();
        // A timer scheduled before the reset fires afterwards: no effect
        state.clear_answer_lock(pending);
        assert!(!state.answer_locked);
        assert_ne!(state.lock_generation, pending);
    }

    #[test]
    fn test_entity_ids_unique() {
        let mut state = GameState::new(5, Operation::Division);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
    }
}
