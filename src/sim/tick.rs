//! Fixed timestep simulation tick
//!
//! Applies one frame's worth of player input, steps the dice physics and
//! moves the session's animations forward.

use super::dice::DiceTray;
use super::grid::Position;
use super::session::{GameSession, TurnPhase};
use super::shot::DiceKind;
use crate::physics::DicePhysics;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Throw the dice with the selected club
    pub roll: bool,
    pub putt: bool,
    /// Switch club
    pub select_dice: Option<DiceKind>,
    /// Add or remove distance dice
    pub dice_amount_delta: i32,
    /// Clicked tile
    pub select_move: Option<Position>,
    pub next_hole: bool,
    /// Demo mode: the game plays itself
    pub autoplay: bool,
}

impl TickInput {
    /// Clear everything except held modes
    pub fn clear_one_shots(&mut self) {
        *self = Self {
            autoplay: self.autoplay,
            ..Self::default()
        };
    }
}

/// Legal move nearest the cup, first in scan order on ties
fn autoplay_target(session: &GameSession) -> Option<Position> {
    let hole = session.course().hole();
    session
        .legal_moves()
        .iter()
        .copied()
        .min_by_key(|m| m.manhattan(hole))
}

/// Advance the game by one fixed timestep
pub fn tick<P: DicePhysics + ?Sized>(
    session: &mut GameSession,
    tray: &mut DiceTray,
    physics: &mut P,
    input: &TickInput,
    dt: f32,
) {
    let mut input = input.clone();
    if input.autoplay {
        match session.phase() {
            TurnPhase::Idle => input.roll = true,
            TurnPhase::AwaitingMoveSelection => match autoplay_target(session) {
                Some(target) => input.select_move = Some(target),
                None => input.roll = true,
            },
            _ => {}
        }
    }

    if let Some(kind) = input.select_dice {
        session.select_dice_kind(kind);
    }
    if input.dice_amount_delta != 0 {
        session.change_dice_amount(input.dice_amount_delta);
    }

    if input.next_hole {
        match session.next_hole() {
            Ok(true) => tray.clear(physics),
            Ok(false) => {}
            Err(e) => log::error!("Failed to generate next hole: {}", e),
        }
    }

    if input.roll {
        if let Some(request) = session.roll() {
            tray.throw(physics, request, session.ball_world());
        }
    } else if input.putt {
        session.putt();
    }

    // Dice leave the table once the ball is struck
    if let Some(target) = input.select_move {
        if session.select_move(target) {
            tray.clear(physics);
        }
    }

    physics.step(dt);
    if let Some(result) = tray.update(physics, dt) {
        log::debug!("Dice read {:?} / {}", result.values, result.shape.code());
        session.settle_dice(&result.values, result.shape);
    }

    session.advance(dt);
}
