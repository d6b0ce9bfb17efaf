//! Dice Golf - miniature golf driven by dice rolls
//!
//! Core modules:
//! - `sim`: Deterministic game core (course generation, move rules, turn state machine)
//! - `physics`: Narrow interface to the dice rigid-body collaborator
//! - `game`: Fixed-timestep runner tying the session to a physics world
//! - `scorecard`: In-session hole results
//! - `settings`: Player preferences
//! - `web`: Browser bindings (wasm32 only)

pub mod game;
pub mod physics;
pub mod scorecard;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use game::Game;
pub use physics::{BodyHandle, DicePhysics, InstantPhysics};
pub use scorecard::Scorecard;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz, matches the dice physics rate)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Course dimensions (tiles)
    pub const GRID_WIDTH: i32 = 16;
    pub const GRID_HEIGHT: i32 = 32;

    /// Upper bound on any random placement loop before generation gives up
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;

    /// Time the dice are left to tumble before their faces are read (seconds)
    pub const DICE_SETTLE_SECS: f32 = 2.5;
    /// Ball flight duration (seconds)
    pub const FLIGHT_SECS: f32 = 0.5;
    /// Peak height of the flight arc above the resting height
    pub const FLIGHT_ARC_HEIGHT: f32 = 2.0;
    /// Pause on a sloped tile before the ball starts rolling (seconds)
    pub const SLOPE_PAUSE_SECS: f32 = 0.5;
    /// Duration of a single one-tile slope roll (seconds)
    pub const SLOPE_ROLL_SECS: f32 = 0.3;
    /// Ball centre height when resting on the ground
    pub const BALL_REST_HEIGHT: f32 = 0.3;

    /// Tracer polyline cap per stroke segment
    pub const MAX_TRACER_POINTS: usize = 50;

    /// Number of distance dice a player may throw at once
    pub const MIN_DICE_AMOUNT: u8 = 1;
    pub const MAX_DICE_AMOUNT: u8 = 12;

    /// Dice spawn layout (world units)
    pub const DICE_DROP_HEIGHT: f32 = 15.0;
    pub const DICE_SPAWN_RADIUS: f32 = 1.5;
}

/// Round to the nearest integer with halves going toward positive infinity.
///
/// Grid geometry (path sampling, shot offsets, tree scatter) is defined with
/// this rounding, so `-0.5` becomes `0` rather than `-1`.
#[inline]
pub fn round_half_up(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}
