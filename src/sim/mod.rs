//! Deterministic game core
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Fixed timestep only, animations advance by `dt`
//! - Seeded RNG only
//! - Stable iteration order (row-major grid, fixed neighbour order)
//! - No rendering or platform dependencies

pub mod course;
pub mod dice;
pub mod grid;
pub mod moves;
pub mod region;
pub mod session;
pub mod shot;
pub mod tick;
pub mod tween;

pub use course::{Course, CourseConfig, GenerationError, par_for};
pub use dice::{DiceResult, DiceTray, RollRequest, distance_value, shot_shape};
pub use grid::{Grid, NEIGHBOR_OFFSETS, Position, SlopeDirection, Tile};
pub use moves::{is_path_clear, legal_moves, shot_offset, terrain_adjusted_distance};
pub use session::{
    Celebration, GameEvent, GameSession, HoleOutcome, ScoreName, Snapshot, SoundCue, TurnPhase,
    TurnState, tile_to_world,
};
pub use shot::{DiceKind, ShotShape};
pub use tick::{TickInput, tick};
pub use tween::{Easing, Lerp, Tween};
