//! 2D canvas drawing surface
//!
//! Thin wrapper over `CanvasRenderingContext2d`; consumes per-tick
//! immutable snapshots and never touches game state.

pub mod canvas;

pub use canvas::{CanvasRenderer, paint_starfield};
