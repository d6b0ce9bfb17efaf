//! Turn resolution: one hole from tee to cup
//!
//! `GameSession` owns the course, the ball and the turn state and is the only
//! thing that mutates them. Player actions that are not valid in the current
//! phase are ignored and logged at debug level; they never error.
//!
//! A stroke runs through these phases:
//!
//! ```text
//! Idle -> DiceRolling -> AwaitingMoveSelection -> BallFlying
//!      -> (SlopePause -> SlopeRolling)* -> TurnComplete -> Idle
//!                                                       \-> HoleComplete
//! ```

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::course::{Course, CourseConfig, GenerationError};
use super::dice::RollRequest;
use super::grid::{Grid, Position, SlopeDirection, Tile};
use super::moves::{legal_moves, terrain_adjusted_distance};
use super::shot::{DiceKind, ShotShape};
use super::tween::{Easing, Tween, flight_point};
use crate::consts::*;
use crate::scorecard::Scorecard;

/// Where the current stroke is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Waiting for a roll or putt
    Idle,
    /// Dice are tumbling in the physics world
    DiceRolling,
    /// Legal landing spots are highlighted
    AwaitingMoveSelection,
    BallFlying,
    /// Ball sits on a slope before it starts rolling
    SlopePause,
    SlopeRolling,
    /// Stroke finished; becomes Idle on the next advance
    TurnComplete,
    /// Ball is in the cup
    HoleComplete,
}

/// Per-hole turn bookkeeping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    pub stroke_count: u32,
    pub selected_dice_kind: DiceKind,
    pub dice_amount: u8,
    /// Highest die of the last roll (1 for a putt)
    pub last_roll_distance: Option<u32>,
    /// Distance after the lie adjustment
    pub adjusted_distance: Option<u32>,
    pub last_shot_shape: Option<ShotShape>,
    pub game_over: bool,
}

impl Default for TurnState {
    fn default() -> Self {
        Self {
            stroke_count: 0,
            selected_dice_kind: DiceKind::Driver,
            dice_amount: MIN_DICE_AMOUNT,
            last_roll_distance: None,
            adjusted_distance: None,
            last_shot_shape: None,
            game_over: false,
        }
    }
}

impl TurnState {
    /// Fresh hole, keeping the player's club and dice count
    fn reset_for_new_hole(&mut self) {
        *self = Self {
            selected_dice_kind: self.selected_dice_kind,
            dice_amount: self.dice_amount,
            ..Self::default()
        };
    }
}

/// Audio cue the front-end should play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Hit,
    HoleOut,
    BirdieFanfare,
    ParFanfare,
    BogeyFanfare,
}

impl SoundCue {
    pub fn file(&self) -> &'static str {
        match self {
            SoundCue::Hit => "golf_hit.mp3",
            SoundCue::HoleOut => "hole_out.mp3",
            SoundCue::BirdieFanfare => "birdie_sfx.mp3",
            SoundCue::ParFanfare => "par_sfx.mp3",
            SoundCue::BogeyFanfare => "bogey_sfx.mp3",
        }
    }
}

/// Celebration overlay shown after holing out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Celebration {
    Birdie,
    Par,
    Bogey,
}

impl Celebration {
    pub fn image(&self) -> &'static str {
        match self {
            Celebration::Birdie => "birdie.png",
            Celebration::Par => "par.png",
            Celebration::Bogey => "bogey.png",
        }
    }

    pub fn sound(&self) -> SoundCue {
        match self {
            Celebration::Birdie => SoundCue::BirdieFanfare,
            Celebration::Par => SoundCue::ParFanfare,
            Celebration::Bogey => SoundCue::BogeyFanfare,
        }
    }
}

/// Golf name for a hole score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreName {
    Eagle,
    Birdie,
    Par,
    Bogey,
    DoubleBogey,
    OverPar(u32),
}

impl ScoreName {
    /// Name for strokes relative to par. Anything two or more under counts
    /// as an eagle.
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s <= -2 => ScoreName::Eagle,
            -1 => ScoreName::Birdie,
            0 => ScoreName::Par,
            1 => ScoreName::Bogey,
            2 => ScoreName::DoubleBogey,
            s => ScoreName::OverPar(s as u32),
        }
    }

    pub fn celebration(&self) -> Option<Celebration> {
        match self {
            ScoreName::Eagle | ScoreName::Birdie => Some(Celebration::Birdie),
            ScoreName::Par => Some(Celebration::Par),
            ScoreName::Bogey => Some(Celebration::Bogey),
            ScoreName::DoubleBogey | ScoreName::OverPar(_) => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ScoreName::Eagle => "Eagle! Outstanding!".to_string(),
            ScoreName::Birdie => "Birdie! Excellent!".to_string(),
            ScoreName::Par => "Par! Great job!".to_string(),
            ScoreName::Bogey => "Bogey. Not bad!".to_string(),
            ScoreName::DoubleBogey => "Double Bogey. Keep trying!".to_string(),
            ScoreName::OverPar(n) => format!("{} over par. Practice makes perfect!", n),
        }
    }
}

/// Result of a finished hole
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleOutcome {
    pub strokes: u32,
    pub par: u32,
    /// strokes - par
    pub score: i32,
    pub name: ScoreName,
    pub celebration: Option<Celebration>,
    pub message: String,
}

impl HoleOutcome {
    pub fn new(strokes: u32, par: u32) -> Self {
        let score = strokes as i32 - par as i32;
        let name = ScoreName::from_score(score);
        Self {
            strokes,
            par,
            score,
            name,
            celebration: name.celebration(),
            message: format!("Hole in {} strokes! {}", strokes, name.message()),
        }
    }
}

/// Something the front-end may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    HoleGenerated {
        hole_number: u32,
        par: u32,
        tee: Position,
        hole: Position,
    },
    DiceRequested(RollRequest),
    DiceSettled {
        values: Vec<u8>,
        distance: u32,
        adjusted: u32,
        shape: ShotShape,
    },
    Putt,
    BallStruck {
        from: Position,
        to: Position,
    },
    BallLanded {
        at: Position,
        tile: Tile,
    },
    TeeRetired {
        at: Position,
    },
    SlopeRoll {
        from: Position,
        to: Position,
        direction: SlopeDirection,
    },
    SlopeStop {
        at: Position,
    },
    TurnComplete {
        strokes: u32,
    },
    HoledOut(HoleOutcome),
    Celebrate(Celebration),
}

impl GameEvent {
    pub fn sound(&self) -> Option<SoundCue> {
        match self {
            GameEvent::BallStruck { .. } | GameEvent::SlopeRoll { .. } => Some(SoundCue::Hit),
            GameEvent::HoledOut(_) => Some(SoundCue::HoleOut),
            GameEvent::Celebrate(c) => Some(c.sound()),
            _ => None,
        }
    }
}

/// Read-only view handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub width: i32,
    pub height: i32,
    /// Row-major
    pub tiles: Vec<Tile>,
    pub colors: Vec<u32>,
    pub slopes: Vec<Option<SlopeDirection>>,
    pub ball: Position,
    pub ball_world: Vec3,
    pub tee: Position,
    pub hole: Position,
    pub hole_number: u32,
    pub moves: Vec<Position>,
    pub tracers: Vec<Vec<Vec3>>,
    pub strokes: u32,
    pub par: u32,
    pub phase: TurnPhase,
    pub last_roll: Option<u32>,
    pub adjusted_distance: Option<u32>,
    pub shot_shape: Option<ShotShape>,
    pub dice_kind: DiceKind,
    pub dice_amount: u8,
    pub game_over: bool,
    pub message: Option<String>,
    pub celebration: Option<Celebration>,
    /// Overlay image for `celebration`
    pub celebration_image: Option<String>,
    pub total_label: String,
    /// Die transforms (position, rotation), filled in by the runner
    #[serde(default)]
    pub dice: Vec<(Vec3, glam::Quat)>,
}

/// World-space centre of a resting ball on `pos`
pub fn tile_to_world(pos: Position) -> Vec3 {
    Vec3::new(pos.x as f32, BALL_REST_HEIGHT, pos.y as f32)
}

#[derive(Debug, Clone, Copy)]
enum MotionKind {
    Flight,
    Roll,
}

#[derive(Debug, Clone, Copy)]
struct Motion {
    kind: MotionKind,
    tween: Tween<Vec3>,
    to: Position,
}

/// One player's game: the current hole plus everything carried between holes
#[derive(Debug)]
pub struct GameSession {
    rng: Pcg32,
    config: CourseConfig,
    course: Course,
    hole_number: u32,
    ball: Position,
    ball_world: Vec3,
    turn: TurnState,
    phase: TurnPhase,
    legal_moves: Vec<Position>,
    motion: Option<Motion>,
    slope_pause: f32,
    slope_visited: Vec<Position>,
    tracers: Vec<Vec<Vec3>>,
    tracing: bool,
    events: Vec<GameEvent>,
    scorecard: Scorecard,
    outcome: Option<HoleOutcome>,
}

impl GameSession {
    /// New session on a freshly generated standard course
    pub fn new(seed: u64) -> Result<Self, GenerationError> {
        Self::with_config(seed, CourseConfig::default())
    }

    pub fn with_config(seed: u64, config: CourseConfig) -> Result<Self, GenerationError> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let course = Course::generate(&mut rng, &config)?;
        Ok(Self::build(rng, config, course))
    }

    /// Session on a hand-built course. Later holes are generated from `seed`.
    pub fn from_course(course: Course, seed: u64) -> Self {
        Self::build(Pcg32::seed_from_u64(seed), CourseConfig::default(), course)
    }

    fn build(rng: Pcg32, config: CourseConfig, course: Course) -> Self {
        let ball = course.tee();
        let mut session = Self {
            rng,
            config,
            course,
            hole_number: 1,
            ball,
            ball_world: tile_to_world(ball),
            turn: TurnState::default(),
            phase: TurnPhase::Idle,
            legal_moves: Vec::new(),
            motion: None,
            slope_pause: 0.0,
            slope_visited: Vec::new(),
            tracers: Vec::new(),
            tracing: false,
            events: Vec::new(),
            scorecard: Scorecard::new(),
            outcome: None,
        };
        session.announce_hole();
        session
    }

    fn announce_hole(&mut self) {
        log::info!(
            "Hole {}: par {}, tee {:?}, cup {:?}",
            self.hole_number,
            self.course.par(),
            self.course.tee(),
            self.course.hole()
        );
        self.events.push(GameEvent::HoleGenerated {
            hole_number: self.hole_number,
            par: self.course.par(),
            tee: self.course.tee(),
            hole: self.course.hole(),
        });
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn grid(&self) -> &Grid {
        self.course.grid()
    }

    pub fn ball(&self) -> Position {
        self.ball
    }

    /// Interpolated ball centre, including flight height
    pub fn ball_world(&self) -> Vec3 {
        self.ball_world
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    pub fn hole_number(&self) -> u32 {
        self.hole_number
    }

    pub fn legal_moves(&self) -> &[Position] {
        &self.legal_moves
    }

    pub fn tracers(&self) -> &[Vec<Vec3>] {
        &self.tracers
    }

    pub fn scorecard(&self) -> &Scorecard {
        &self.scorecard
    }

    pub fn outcome(&self) -> Option<&HoleOutcome> {
        self.outcome.as_ref()
    }

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// A roll, flight or slope chain is in progress
    pub fn is_animating(&self) -> bool {
        matches!(
            self.phase,
            TurnPhase::DiceRolling
                | TurnPhase::BallFlying
                | TurnPhase::SlopePause
                | TurnPhase::SlopeRolling
        )
    }

    fn can_strike(&self) -> bool {
        !self.turn.game_over
            && matches!(
                self.phase,
                TurnPhase::Idle | TurnPhase::AwaitingMoveSelection
            )
    }

    /// Ask for a dice throw with the selected club
    pub fn roll(&mut self) -> Option<RollRequest> {
        if !self.can_strike() {
            log::debug!("Roll ignored in {:?}", self.phase);
            return None;
        }
        let request = RollRequest {
            distance_dice: self.turn.dice_amount,
            kind: self.turn.selected_dice_kind,
        };
        self.legal_moves.clear();
        self.phase = TurnPhase::DiceRolling;
        self.events.push(GameEvent::DiceRequested(request));
        Some(request)
    }

    /// Dice have come to rest. The best distance die sets the stroke length.
    ///
    /// An empty throw returns to Idle without costing a stroke.
    pub fn settle_dice(&mut self, values: &[u8], shape: ShotShape) -> bool {
        if self.phase != TurnPhase::DiceRolling {
            log::debug!("Dice result ignored in {:?}", self.phase);
            return false;
        }
        let Some(&best) = values.iter().max() else {
            log::warn!("Dice settled with no distance dice, roll again");
            self.phase = TurnPhase::Idle;
            return false;
        };

        let distance = best as u32;
        let adjusted = terrain_adjusted_distance(self.grid().get(self.ball), distance);
        self.events.push(GameEvent::DiceSettled {
            values: values.to_vec(),
            distance,
            adjusted,
            shape,
        });
        self.begin_stroke(distance, adjusted, shape);
        true
    }

    /// One-tile straight stroke, no dice and no lie adjustment
    pub fn putt(&mut self) -> bool {
        if !self.can_strike() {
            log::debug!("Putt ignored in {:?}", self.phase);
            return false;
        }
        self.events.push(GameEvent::Putt);
        self.begin_stroke(1, 1, ShotShape::Straight);
        true
    }

    fn begin_stroke(&mut self, distance: u32, adjusted: u32, shape: ShotShape) {
        self.turn.stroke_count += 1;
        self.turn.last_roll_distance = Some(distance);
        self.turn.adjusted_distance = Some(adjusted);
        self.turn.last_shot_shape = Some(shape);
        self.legal_moves = legal_moves(self.grid(), self.ball, adjusted, shape);
        self.phase = TurnPhase::AwaitingMoveSelection;
        log::debug!(
            "Stroke {}: distance {} (adjusted {}), {}, {} legal moves",
            self.turn.stroke_count,
            distance,
            adjusted,
            shape.name(),
            self.legal_moves.len()
        );
    }

    /// Hit the ball to one of the highlighted tiles
    pub fn select_move(&mut self, target: Position) -> bool {
        if self.phase != TurnPhase::AwaitingMoveSelection || !self.legal_moves.contains(&target) {
            log::debug!("Move to {:?} ignored in {:?}", target, self.phase);
            return false;
        }
        let tween = Tween::new(
            self.ball_world,
            tile_to_world(target),
            FLIGHT_SECS,
            Easing::QuadOut,
        );
        self.motion = Some(Motion {
            kind: MotionKind::Flight,
            tween,
            to: target,
        });
        self.start_tracer();
        self.legal_moves.clear();
        self.phase = TurnPhase::BallFlying;
        self.events.push(GameEvent::BallStruck {
            from: self.ball,
            to: target,
        });
        true
    }

    pub fn select_dice_kind(&mut self, kind: DiceKind) -> bool {
        if self.turn.game_over || self.is_animating() {
            log::debug!("Club change ignored in {:?}", self.phase);
            return false;
        }
        self.turn.selected_dice_kind = kind;
        true
    }

    /// Set how many distance dice to throw, clamped to the allowed range
    pub fn set_dice_amount(&mut self, amount: u8) -> bool {
        if self.turn.game_over || self.is_animating() {
            log::debug!("Dice count change ignored in {:?}", self.phase);
            return false;
        }
        self.turn.dice_amount = amount.clamp(MIN_DICE_AMOUNT, MAX_DICE_AMOUNT);
        true
    }

    pub fn change_dice_amount(&mut self, delta: i32) -> bool {
        let target = (self.turn.dice_amount as i32 + delta)
            .clamp(MIN_DICE_AMOUNT as i32, MAX_DICE_AMOUNT as i32);
        self.set_dice_amount(target as u8)
    }

    /// Generate the next hole. Returns Ok(false) while a stroke is animating.
    pub fn next_hole(&mut self) -> Result<bool, GenerationError> {
        if self.is_animating() {
            log::debug!("Next hole ignored in {:?}", self.phase);
            return Ok(false);
        }
        self.course = Course::generate(&mut self.rng, &self.config)?;
        self.hole_number += 1;
        self.ball = self.course.tee();
        self.ball_world = tile_to_world(self.ball);
        self.turn.reset_for_new_hole();
        self.phase = TurnPhase::Idle;
        self.legal_moves.clear();
        self.motion = None;
        self.slope_visited.clear();
        self.tracers.clear();
        self.tracing = false;
        self.outcome = None;
        self.announce_hole();
        Ok(true)
    }

    /// Advance animations by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        match self.phase {
            TurnPhase::TurnComplete => self.phase = TurnPhase::Idle,
            TurnPhase::BallFlying | TurnPhase::SlopeRolling => self.advance_motion(dt),
            TurnPhase::SlopePause => {
                self.slope_pause -= dt;
                if self.slope_pause <= 0.0 {
                    self.slope_step();
                }
            }
            _ => {}
        }
    }

    fn advance_motion(&mut self, dt: f32) {
        let Some(motion) = self.motion.as_mut() else {
            log::warn!("{:?} without an active motion", self.phase);
            self.finish_turn();
            return;
        };
        let finished = motion.tween.advance(dt);
        let kind = motion.kind;
        let to = motion.to;
        self.ball_world = match kind {
            MotionKind::Flight => flight_point(&motion.tween),
            MotionKind::Roll => motion.tween.value(),
        };
        self.record_tracer_point();

        if finished {
            self.motion = None;
            self.ball_world = tile_to_world(to);
            self.tracing = false;
            match kind {
                MotionKind::Flight => self.land(to),
                MotionKind::Roll => self.arrive_rolling(to),
            }
        }
    }

    fn land(&mut self, to: Position) {
        let departure = self.ball;
        self.ball = to;
        self.events.push(GameEvent::BallLanded {
            at: to,
            tile: self.grid().get(to),
        });

        if departure == self.course.tee() && self.course.retire_tee() {
            self.events.push(GameEvent::TeeRetired { at: departure });
        }

        if to == self.course.hole() {
            self.hole_out();
        } else if self.grid().slope(to).is_some() {
            self.slope_visited.clear();
            self.slope_visited.push(to);
            self.pause_on_slope();
        } else {
            self.finish_turn();
        }
    }

    fn arrive_rolling(&mut self, to: Position) {
        self.ball = to;
        if to == self.course.hole() {
            self.hole_out();
        } else if self.grid().slope(to).is_some() {
            self.pause_on_slope();
        } else {
            self.finish_turn();
        }
    }

    fn pause_on_slope(&mut self) {
        self.slope_pause = SLOPE_PAUSE_SECS;
        self.phase = TurnPhase::SlopePause;
    }

    /// Roll one tile downhill, or stop if the next tile is blocked, off the
    /// course, or already visited on this chain
    fn slope_step(&mut self) {
        let Some(direction) = self.grid().slope(self.ball) else {
            self.finish_turn();
            return;
        };
        let next = direction.step(self.ball);
        let blocked = match self.grid().try_get(next) {
            None => true,
            Some(tile) => tile.is_hazard(),
        };
        if blocked || self.slope_visited.contains(&next) {
            log::debug!("Slope chain stops at {:?}", self.ball);
            self.events.push(GameEvent::SlopeStop { at: self.ball });
            self.finish_turn();
            return;
        }

        self.slope_visited.push(next);
        self.motion = Some(Motion {
            kind: MotionKind::Roll,
            tween: Tween::new(
                self.ball_world,
                tile_to_world(next),
                SLOPE_ROLL_SECS,
                Easing::Linear,
            ),
            to: next,
        });
        self.start_tracer();
        self.phase = TurnPhase::SlopeRolling;
        self.events.push(GameEvent::SlopeRoll {
            from: self.ball,
            to: next,
            direction,
        });
    }

    fn finish_turn(&mut self) {
        self.slope_visited.clear();
        self.phase = TurnPhase::TurnComplete;
        self.events.push(GameEvent::TurnComplete {
            strokes: self.turn.stroke_count,
        });
    }

    fn hole_out(&mut self) {
        self.slope_visited.clear();
        self.turn.game_over = true;
        self.phase = TurnPhase::HoleComplete;

        let outcome = HoleOutcome::new(self.turn.stroke_count, self.course.par());
        log::info!("{}", outcome.message);
        self.scorecard
            .record(self.hole_number, outcome.par, outcome.strokes);
        self.events.push(GameEvent::HoledOut(outcome.clone()));
        if let Some(celebration) = outcome.celebration {
            self.events.push(GameEvent::Celebrate(celebration));
        }
        self.outcome = Some(outcome);
    }

    fn start_tracer(&mut self) {
        self.tracers.push(vec![self.ball_world]);
        self.tracing = true;
    }

    fn record_tracer_point(&mut self) {
        if !self.tracing {
            return;
        }
        if let Some(tracer) = self.tracers.last_mut() {
            tracer.push(self.ball_world);
            if tracer.len() > MAX_TRACER_POINTS {
                tracer.remove(0);
            }
        }
    }

    /// Renderer view of the current state
    pub fn snapshot(&self) -> Snapshot {
        let grid = self.grid();
        Snapshot {
            width: Grid::WIDTH,
            height: Grid::HEIGHT,
            tiles: grid.tiles().to_vec(),
            colors: grid.tiles().iter().map(Tile::color).collect(),
            slopes: grid.slopes().to_vec(),
            ball: self.ball,
            ball_world: self.ball_world,
            tee: self.course.tee(),
            hole: self.course.hole(),
            hole_number: self.hole_number,
            moves: self.legal_moves.clone(),
            tracers: self.tracers.clone(),
            strokes: self.turn.stroke_count,
            par: self.course.par(),
            phase: self.phase,
            last_roll: self.turn.last_roll_distance,
            adjusted_distance: self.turn.adjusted_distance,
            shot_shape: self.turn.last_shot_shape,
            dice_kind: self.turn.selected_dice_kind,
            dice_amount: self.turn.dice_amount,
            game_over: self.turn.game_over,
            message: self.outcome.as_ref().map(|o| o.message.clone()),
            celebration: self.outcome.as_ref().and_then(|o| o.celebration),
            celebration_image: self
                .outcome
                .as_ref()
                .and_then(|o| o.celebration)
                .map(|c| c.image().to_string()),
            total_label: self.scorecard.total_label(),
            dice: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: f32 = 1.0 / 120.0;

    fn open_course(tee: Position, hole: Position) -> Course {
        Course::new(Grid::new(), tee, hole)
    }

    fn run_until_settled(session: &mut GameSession) {
        for _ in 0..10_000 {
            if !session.is_animating() {
                return;
            }
            session.advance(STEP);
        }
        panic!("animation never finished: {:?}", session.phase());
    }

    /// Roll, settle on `values`, hit to `target` and play the stroke out
    fn stroke_to(session: &mut GameSession, values: &[u8], target: Position) {
        assert!(session.roll().is_some());
        assert!(session.settle_dice(values, ShotShape::Straight));
        assert!(
            session.select_move(target),
            "{:?} not in {:?}",
            target,
            session.legal_moves()
        );
        run_until_settled(session);
    }

    #[test]
    fn test_new_session_starts_on_tee() {
        let mut session = GameSession::new(42).unwrap();
        assert_eq!(session.ball(), session.course().tee());
        assert_eq!(session.phase(), TurnPhase::Idle);
        assert_eq!(session.turn().stroke_count, 0);
        let events = session.drain_events();
        assert!(matches!(events[0], GameEvent::HoleGenerated { hole_number: 1, .. }));
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_roll_settle_and_terrain_adjustment() {
        let tee = Position::new(5, 28);
        let mut session = GameSession::from_course(open_course(tee, Position::new(5, 5)), 1);
        let request = session.roll().unwrap();
        assert_eq!(request.distance_dice, 1);
        assert_eq!(request.kind, DiceKind::Driver);
        assert_eq!(session.phase(), TurnPhase::DiceRolling);

        // Tee lie adds one
        assert!(session.settle_dice(&[3, 5, 4], ShotShape::Straight));
        assert_eq!(session.turn().stroke_count, 1);
        assert_eq!(session.turn().last_roll_distance, Some(5));
        assert_eq!(session.turn().adjusted_distance, Some(6));
        assert_eq!(
            session.legal_moves(),
            &[Position::new(5, 22), Position::new(11, 22), Position::new(11, 28)]
        );
    }

    #[test]
    fn test_empty_throw_costs_nothing() {
        let mut session =
            GameSession::from_course(open_course(Position::new(5, 28), Position::new(5, 5)), 1);
        session.roll();
        assert!(!session.settle_dice(&[], ShotShape::Straight));
        assert_eq!(session.phase(), TurnPhase::Idle);
        assert_eq!(session.turn().stroke_count, 0);
    }

    #[test]
    fn test_flight_lands_retires_tee_and_completes_turn() {
        let tee = Position::new(5, 28);
        let mut session = GameSession::from_course(open_course(tee, Position::new(5, 5)), 1);
        stroke_to(&mut session, &[5], Position::new(5, 22));

        assert_eq!(session.ball(), Position::new(5, 22));
        assert_eq!(session.grid().get(tee), Tile::Fairway);
        assert_eq!(session.phase(), TurnPhase::TurnComplete);
        session.advance(STEP);
        assert_eq!(session.phase(), TurnPhase::Idle);

        let events = session.drain_events();
        assert!(events.contains(&GameEvent::TeeRetired { at: tee }));
        assert!(events.iter().any(|e| matches!(e, GameEvent::TurnComplete { strokes: 1 })));
        assert_eq!(session.tracers().len(), 1);
        assert!(session.tracers()[0].len() <= MAX_TRACER_POINTS);
        assert!((session.ball_world() - tile_to_world(Position::new(5, 22))).length() < 1e-5);
    }

    #[test]
    fn test_ball_peaks_mid_flight() {
        let tee = Position::new(5, 28);
        let mut session = GameSession::from_course(open_course(tee, Position::new(5, 5)), 1);
        session.roll();
        session.settle_dice(&[5], ShotShape::Straight);
        session.select_move(Position::new(5, 22));
        for _ in 0..30 {
            session.advance(STEP);
        }
        let mid = session.ball_world();
        assert!(mid.y > BALL_REST_HEIGHT + 1.9);
        assert_eq!(session.phase(), TurnPhase::BallFlying);
    }

    #[test]
    fn test_putt_is_one_straight_tile() {
        let tee = Position::new(5, 28);
        let mut session = GameSession::from_course(open_course(tee, Position::new(5, 5)), 1);
        assert!(session.putt());
        assert_eq!(session.turn().stroke_count, 1);
        assert_eq!(session.turn().adjusted_distance, Some(1));
        assert_eq!(session.turn().last_shot_shape, Some(ShotShape::Straight));
        assert_eq!(session.legal_moves().len(), 8);
        assert!(session.legal_moves().iter().all(|m| m.chebyshev(tee) == 1));
    }

    #[test]
    fn test_reroll_from_move_selection() {
        let mut session =
            GameSession::from_course(open_course(Position::new(5, 28), Position::new(5, 5)), 1);
        session.roll();
        session.settle_dice(&[4], ShotShape::Straight);
        assert!(session.roll().is_some());
        assert!(session.legal_moves().is_empty());
        session.settle_dice(&[2], ShotShape::Straight);
        assert_eq!(session.turn().stroke_count, 2);
    }

    #[test]
    fn test_invalid_inputs_are_ignored() {
        let mut session =
            GameSession::from_course(open_course(Position::new(5, 28), Position::new(5, 5)), 1);
        // Nothing to select yet
        assert!(!session.select_move(Position::new(5, 22)));
        // No dice in the air
        assert!(!session.settle_dice(&[4], ShotShape::Straight));

        session.roll();
        assert!(session.roll().is_none());
        assert!(!session.putt());
        assert!(!session.select_dice_kind(DiceKind::Wedge));
        assert!(!session.change_dice_amount(1));
        assert_eq!(session.next_hole(), Ok(false));

        session.settle_dice(&[5], ShotShape::Straight);
        // Not a highlighted tile
        assert!(!session.select_move(Position::new(0, 0)));
        assert_eq!(session.phase(), TurnPhase::AwaitingMoveSelection);
        assert_eq!(session.turn().stroke_count, 1);
    }

    #[test]
    fn test_dice_amount_clamps() {
        let mut session =
            GameSession::from_course(open_course(Position::new(5, 28), Position::new(5, 5)), 1);
        assert!(session.change_dice_amount(-3));
        assert_eq!(session.turn().dice_amount, MIN_DICE_AMOUNT);
        assert!(session.change_dice_amount(50));
        assert_eq!(session.turn().dice_amount, MAX_DICE_AMOUNT);
        assert!(session.set_dice_amount(0));
        assert_eq!(session.turn().dice_amount, MIN_DICE_AMOUNT);
        assert!(session.select_dice_kind(DiceKind::Putter));
        assert_eq!(session.roll().map(|r| r.kind), Some(DiceKind::Putter));
    }

    #[test]
    fn test_slope_chain_rolls_until_flat() {
        let tee = Position::new(5, 28);
        let mut course = open_course(tee, Position::new(5, 5));
        let grid = course.grid_mut();
        grid.set_slope(Position::new(5, 22), SlopeDirection::East);
        grid.set_slope(Position::new(6, 22), SlopeDirection::East);
        let mut session = GameSession::from_course(course, 1);

        session.roll();
        session.settle_dice(&[5], ShotShape::Straight);
        session.select_move(Position::new(5, 22));
        for _ in 0..65 {
            session.advance(STEP);
        }
        assert_eq!(session.phase(), TurnPhase::SlopePause);
        run_until_settled(&mut session);

        assert_eq!(session.ball(), Position::new(7, 22));
        assert_eq!(session.phase(), TurnPhase::TurnComplete);
        let rolls = session
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::SlopeRoll { .. }))
            .count();
        assert_eq!(rolls, 2);
        // One tracer for the flight plus one per roll
        assert_eq!(session.tracers().len(), 3);
    }

    #[test]
    fn test_slope_stops_before_water_and_edge() {
        let mut course = open_course(Position::new(5, 28), Position::new(5, 5));
        let grid = course.grid_mut();
        grid.set_slope(Position::new(5, 22), SlopeDirection::North);
        grid.set(Position::new(5, 21), Tile::Water);
        let mut session = GameSession::from_course(course, 1);
        stroke_to(&mut session, &[5], Position::new(5, 22));
        assert_eq!(session.ball(), Position::new(5, 22));
        assert!(session.drain_events().contains(&GameEvent::SlopeStop {
            at: Position::new(5, 22)
        }));

        let mut course = open_course(Position::new(14, 28), Position::new(5, 5));
        course
            .grid_mut()
            .set_slope(Position::new(15, 28), SlopeDirection::East);
        let mut session = GameSession::from_course(course, 1);
        session.putt();
        assert!(session.select_move(Position::new(15, 28)));
        run_until_settled(&mut session);
        assert_eq!(session.ball(), Position::new(15, 28));
        assert_eq!(session.phase(), TurnPhase::TurnComplete);
    }

    #[test]
    fn test_mutual_slopes_terminate() {
        let mut course = open_course(Position::new(5, 28), Position::new(5, 5));
        let grid = course.grid_mut();
        let a = Position::new(5, 22);
        let b = Position::new(6, 22);
        grid.set_slope(a, SlopeDirection::East);
        grid.set_slope(b, SlopeDirection::West);
        let mut session = GameSession::from_course(course, 1);
        stroke_to(&mut session, &[5], a);

        assert_eq!(session.ball(), b);
        assert_eq!(session.phase(), TurnPhase::TurnComplete);
        let rolls = session
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::SlopeRoll { .. }))
            .count();
        assert_eq!(rolls, 1);
    }

    #[test]
    fn test_slope_into_cup_holes_out() {
        let hole = Position::new(5, 21);
        let mut course = open_course(Position::new(5, 28), hole);
        course
            .grid_mut()
            .set_slope(Position::new(5, 22), SlopeDirection::North);
        let mut session = GameSession::from_course(course, 1);
        stroke_to(&mut session, &[5], Position::new(5, 22));
        assert_eq!(session.ball(), hole);
        assert_eq!(session.phase(), TurnPhase::HoleComplete);
        assert!(session.turn().game_over);
    }

    #[test]
    fn test_hole_out_scores_and_blocks_play() {
        // Manhattan 6 -> par 3
        let tee = Position::new(5, 28);
        let hole = Position::new(5, 22);
        let mut session = GameSession::from_course(open_course(tee, hole), 1);
        assert_eq!(session.course().par(), 3);
        stroke_to(&mut session, &[5], hole);

        assert_eq!(session.phase(), TurnPhase::HoleComplete);
        let outcome = session.outcome().unwrap().clone();
        assert_eq!(outcome.score, -2);
        assert_eq!(outcome.name, ScoreName::Eagle);
        assert_eq!(outcome.message, "Hole in 1 strokes! Eagle! Outstanding!");
        assert_eq!(outcome.celebration, Some(Celebration::Birdie));
        assert_eq!(session.scorecard().holes_played(), 1);
        assert_eq!(
            session.snapshot().celebration_image.as_deref(),
            Some("birdie.png")
        );

        let events = session.drain_events();
        let sounds: Vec<SoundCue> = events.iter().filter_map(GameEvent::sound).collect();
        assert_eq!(
            sounds,
            vec![SoundCue::Hit, SoundCue::HoleOut, SoundCue::BirdieFanfare]
        );

        assert!(session.roll().is_none());
        assert!(!session.putt());
        assert!(!session.select_dice_kind(DiceKind::Chip));
        // Holed out stays put
        session.advance(STEP);
        assert_eq!(session.phase(), TurnPhase::HoleComplete);
    }

    #[test]
    fn test_score_names() {
        let cases = [
            (1, 4, ScoreName::Eagle, "Eagle! Outstanding!", Some(Celebration::Birdie)),
            (2, 4, ScoreName::Eagle, "Eagle! Outstanding!", Some(Celebration::Birdie)),
            (3, 4, ScoreName::Birdie, "Birdie! Excellent!", Some(Celebration::Birdie)),
            (4, 4, ScoreName::Par, "Par! Great job!", Some(Celebration::Par)),
            (5, 4, ScoreName::Bogey, "Bogey. Not bad!", Some(Celebration::Bogey)),
            (6, 4, ScoreName::DoubleBogey, "Double Bogey. Keep trying!", None),
            (9, 4, ScoreName::OverPar(5), "5 over par. Practice makes perfect!", None),
        ];
        for (strokes, par, name, suffix, celebration) in cases {
            let outcome = HoleOutcome::new(strokes, par);
            assert_eq!(outcome.name, name);
            assert_eq!(outcome.celebration, celebration);
            assert_eq!(
                outcome.message,
                format!("Hole in {} strokes! {}", strokes, suffix)
            );
        }
    }

    #[test]
    fn test_next_hole_resets_turn() {
        let mut session = GameSession::new(7).unwrap();
        let first = session.course().clone();
        session.select_dice_kind(DiceKind::Wedge);
        session.set_dice_amount(4);
        session.putt();
        assert_eq!(session.turn().stroke_count, 1);

        assert_eq!(session.next_hole(), Ok(true));
        assert_ne!(session.course(), &first);
        assert_eq!(session.hole_number(), 2);
        assert_eq!(session.ball(), session.course().tee());
        assert_eq!(session.turn().stroke_count, 0);
        assert!(!session.turn().game_over);
        assert_eq!(session.turn().last_roll_distance, None);
        assert_eq!(session.turn().last_shot_shape, None);
        assert!(session.legal_moves().is_empty());
        assert!(session.tracers().is_empty());
        // Club and dice count carry over
        assert_eq!(session.turn().selected_dice_kind, DiceKind::Wedge);
        assert_eq!(session.turn().dice_amount, 4);
    }

    #[test]
    fn test_same_seed_same_holes() {
        let mut a = GameSession::new(1234).unwrap();
        let mut b = GameSession::new(1234).unwrap();
        assert_eq!(a.course(), b.course());
        a.next_hole().unwrap();
        b.next_hole().unwrap();
        assert_eq!(a.course(), b.course());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut session =
            GameSession::from_course(open_course(Position::new(5, 28), Position::new(5, 5)), 1);
        session.putt();
        let snap = session.snapshot();
        assert_eq!(snap.tiles.len(), 512);
        assert_eq!(snap.colors[0], Tile::Rough.color());
        assert_eq!(snap.moves, session.legal_moves());
        assert_eq!(snap.phase, TurnPhase::AwaitingMoveSelection);
        assert_eq!(snap.strokes, 1);
        assert_eq!(snap.message, None);
        let json = serde_json::to_string(&snap).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.ball, snap.ball);
    }
}
