//! Deterministic game logic
//!
//! Everything gameplay-authoritative lives here. This module must stay pure:
//! - Seeded RNG only
//! - One logical tick per `advance` call
//! - No rendering, audio, or platform dependencies (those react to
//!   `GameEvent`s emitted by the transitions)

pub mod asteroid;
pub mod problem;
pub mod state;
pub mod tick;

pub use asteroid::{Asteroid, Viewport};
pub use problem::{Operation, Problem};
pub use state::{GameEvent, GameState, RenderSnapshot};
pub use tick::{advance, difficulty_multiplier, submit_answer, toggle_pause};
