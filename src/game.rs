//! Fixed-timestep runner
//!
//! Owns a session, the dice tray and the physics world, and turns variable
//! frame deltas into 120 Hz simulation ticks. Player actions are queued as
//! one-shot inputs and consumed by the next tick.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::physics::DicePhysics;
use crate::settings::Settings;
use crate::sim::{
    DiceKind, DiceTray, GameEvent, GameSession, GenerationError, Position, Snapshot, TickInput,
    tick,
};

/// A playable game bound to a physics world
pub struct Game<P: DicePhysics> {
    session: GameSession,
    tray: DiceTray,
    physics: P,
    input: TickInput,
    accumulator: f32,
}

impl<P: DicePhysics> Game<P> {
    pub fn new(seed: u64, physics: P) -> Result<Self, GenerationError> {
        let session = GameSession::new(seed)?;
        Ok(Self::from_session(session, seed, physics))
    }

    /// Wrap an existing session. Dice rotations are drawn from a stream
    /// separate from the course generator.
    pub fn from_session(session: GameSession, seed: u64, physics: P) -> Self {
        Self {
            session,
            tray: DiceTray::new(seed.wrapping_add(0x9e37_79b9_7f4a_7c15)),
            physics,
            input: TickInput::default(),
            accumulator: 0.0,
        }
    }

    /// Start from the player's saved club and dice count
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.session.select_dice_kind(settings.club);
        self.session.set_dice_amount(settings.dice_amount);
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn roll(&mut self) {
        self.input.roll = true;
    }

    pub fn putt(&mut self) {
        self.input.putt = true;
    }

    /// Select club by menu number (1-5); other numbers are ignored
    pub fn select_dice(&mut self, number: u8) {
        match DiceKind::from_number(number) {
            Some(kind) => self.input.select_dice = Some(kind),
            None => log::debug!("No club numbered {}", number),
        }
    }

    pub fn change_dice_amount(&mut self, delta: i32) {
        self.input.dice_amount_delta += delta;
    }

    pub fn select_move(&mut self, x: i32, y: i32) {
        self.input.select_move = Some(Position::new(x, y));
    }

    pub fn next_hole(&mut self) {
        self.input.next_hole = true;
    }

    pub fn set_autoplay(&mut self, on: bool) {
        self.input.autoplay = on;
    }

    /// Run simulation ticks for a frame of `dt` seconds
    pub fn update(&mut self, dt: f32) {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.input.clone();
            tick(
                &mut self.session,
                &mut self.tray,
                &mut self.physics,
                &input,
                SIM_DT,
            );
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.clear_one_shots();
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.session.drain_events()
    }

    /// Renderer view including the dice transforms
    pub fn snapshot(&self) -> Snapshot {
        let mut snapshot = self.session.snapshot();
        snapshot.dice = self.tray.transforms(&self.physics);
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::InstantPhysics;
    use crate::sim::TurnPhase;

    const FRAME: f32 = 1.0 / 60.0;

    fn run_frames(game: &mut Game<InstantPhysics>, frames: usize) {
        for _ in 0..frames {
            game.update(FRAME);
        }
    }

    #[test]
    fn test_inputs_are_consumed_once() {
        let mut game = Game::new(5, InstantPhysics::new()).unwrap();
        game.putt();
        run_frames(&mut game, 1);
        assert_eq!(game.session().turn().stroke_count, 1);
        game.putt();
        run_frames(&mut game, 1);
        // Second putt re-strokes from move selection
        assert_eq!(game.session().turn().stroke_count, 2);
        run_frames(&mut game, 5);
        assert_eq!(game.session().turn().stroke_count, 2);
    }

    #[test]
    fn test_long_frames_are_capped() {
        let mut game = Game::new(5, InstantPhysics::new()).unwrap();
        game.roll();
        // A 10 second stall still only advances at most MAX_SUBSTEPS ticks
        game.update(10.0);
        assert_eq!(game.session().phase(), TurnPhase::DiceRolling);
    }

    #[test]
    fn test_roll_settles_and_snapshot_shows_dice() {
        let mut game = Game::new(8, InstantPhysics::new()).unwrap();
        game.change_dice_amount(2);
        game.roll();
        run_frames(&mut game, 1);
        assert_eq!(game.snapshot().dice.len(), 4);
        run_frames(&mut game, 160);
        assert!(matches!(
            game.session().phase(),
            TurnPhase::AwaitingMoveSelection
        ));
        let events = game.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::DiceSettled { values, .. } if values.len() == 3)));
    }

    #[test]
    fn test_select_dice_by_number() {
        let mut game = Game::new(8, InstantPhysics::new()).unwrap();
        game.select_dice(3);
        run_frames(&mut game, 1);
        assert_eq!(game.session().turn().selected_dice_kind, DiceKind::Wedge);
        game.select_dice(9);
        run_frames(&mut game, 1);
        assert_eq!(game.session().turn().selected_dice_kind, DiceKind::Wedge);
    }

    #[test]
    fn test_apply_settings() {
        let mut game = Game::new(8, InstantPhysics::new()).unwrap();
        let settings = Settings {
            club: DiceKind::Chip,
            dice_amount: 5,
            ..Default::default()
        };
        game.apply_settings(&settings);
        assert_eq!(game.session().turn().selected_dice_kind, DiceKind::Chip);
        assert_eq!(game.session().turn().dice_amount, 5);
    }

    #[test]
    fn test_next_hole_clears_dice() {
        let mut game = Game::new(8, InstantPhysics::new()).unwrap();
        game.roll();
        run_frames(&mut game, 200);
        assert!(game.physics().body_count() > 0);
        game.next_hole();
        run_frames(&mut game, 1);
        assert_eq!(game.session().hole_number(), 2);
        assert_eq!(game.physics().body_count(), 0);
    }
}
