//! Dice throws and reading settled faces
//!
//! A die body is a cube whose local face normals are the six signed axes. Once
//! the physics world has settled, whichever normal points most nearly up
//! decides the face.

use std::f32::consts::TAU;

use glam::{EulerRot, Quat, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::shot::{DiceKind, ShotShape};
use crate::consts::{DICE_DROP_HEIGHT, DICE_SETTLE_SECS, DICE_SPAWN_RADIUS};
use crate::physics::{BodyHandle, DicePhysics, DieBodyDesc};

/// Local face normals in resolution order; ties go to the earliest entry
const FACE_NORMALS: [Vec3; 6] = [
    Vec3::X,
    Vec3::NEG_X,
    Vec3::Y,
    Vec3::NEG_Y,
    Vec3::Z,
    Vec3::NEG_Z,
];

/// Face number (1-6) printed on each normal of a distance die
const DISTANCE_FACE_BY_NORMAL: [u8; 6] = [3, 4, 1, 6, 2, 5];

const SHOT_BY_NORMAL: [ShotShape; 6] = [
    ShotShape::Slice,
    ShotShape::Hook,
    ShotShape::Straight,
    ShotShape::Straight,
    ShotShape::Fade,
    ShotShape::Draw,
];

/// Index into `FACE_NORMALS` of the normal pointing most nearly up
pub fn up_normal_index(rotation: Quat) -> usize {
    let mut best = 0;
    let mut best_dot = f32::NEG_INFINITY;
    for (i, normal) in FACE_NORMALS.iter().enumerate() {
        let dot = (rotation * *normal).dot(Vec3::Y);
        if dot > best_dot {
            best = i;
            best_dot = dot;
        }
    }
    best
}

/// Face number (1-6) showing on a settled distance die
pub fn distance_face(rotation: Quat) -> u8 {
    DISTANCE_FACE_BY_NORMAL[up_normal_index(rotation)]
}

/// Value a settled distance die of `kind` shows
pub fn distance_value(kind: DiceKind, rotation: Quat) -> u8 {
    kind.faces()[(distance_face(rotation) - 1) as usize]
}

/// Shape a settled shot die shows
pub fn shot_shape(rotation: Quat) -> ShotShape {
    SHOT_BY_NORMAL[up_normal_index(rotation)]
}

/// What the session asks the front-end to throw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollRequest {
    pub distance_dice: u8,
    pub kind: DiceKind,
}

/// Faces read off a settled throw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceResult {
    pub values: Vec<u8>,
    pub shape: ShotShape,
}

/// Bookkeeping for the dice currently in the physics world.
///
/// Dice stay on the table after they are read and are removed when the
/// next throw starts or the tray is cleared.
#[derive(Debug)]
pub struct DiceTray {
    rng: Pcg32,
    desc: DieBodyDesc,
    kind: DiceKind,
    distance_dice: Vec<BodyHandle>,
    shot_die: Option<BodyHandle>,
    settle_remaining: Option<f32>,
}

impl DiceTray {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            desc: DieBodyDesc::default(),
            kind: DiceKind::default(),
            distance_dice: Vec::new(),
            shot_die: None,
            settle_remaining: None,
        }
    }

    /// A throw is in the air and has not been read yet
    pub fn is_settling(&self) -> bool {
        self.settle_remaining.is_some()
    }

    pub fn body_count(&self) -> usize {
        self.distance_dice.len() + self.shot_die.iter().count()
    }

    fn random_rotation(&mut self) -> Quat {
        let a = self.rng.random_range(0.0..TAU);
        let b = self.rng.random_range(0.0..TAU);
        let c = self.rng.random_range(0.0..TAU);
        Quat::from_euler(EulerRot::XYZ, a, b, c)
    }

    /// Drop a fresh set of dice above `center`: distance dice on a ring, the
    /// shot die in the middle. Any dice from the previous throw are removed.
    pub fn throw<P: DicePhysics + ?Sized>(
        &mut self,
        physics: &mut P,
        request: RollRequest,
        center: Vec3,
    ) {
        self.clear(physics);
        self.kind = request.kind;

        let count = request.distance_dice.max(1);
        for i in 0..count {
            let angle = i as f32 / count as f32 * TAU;
            let position = Vec3::new(
                center.x + angle.cos() * DICE_SPAWN_RADIUS,
                DICE_DROP_HEIGHT,
                center.z + angle.sin() * DICE_SPAWN_RADIUS,
            );
            let rotation = self.random_rotation();
            let handle = physics.create_body(&self.desc, position, rotation);
            self.distance_dice.push(handle);
        }

        let rotation = self.random_rotation();
        let position = Vec3::new(center.x, DICE_DROP_HEIGHT, center.z);
        self.shot_die = Some(physics.create_body(&self.desc, position, rotation));

        self.settle_remaining = Some(DICE_SETTLE_SECS);
        log::debug!("Threw {} x {} plus shot die", count, self.kind.name());
    }

    /// Count down the settle delay. Returns the faces once, when it expires.
    pub fn update<P: DicePhysics + ?Sized>(&mut self, physics: &P, dt: f32) -> Option<DiceResult> {
        let remaining = self.settle_remaining.as_mut()?;
        *remaining -= dt;
        if *remaining > 0.0 {
            return None;
        }
        self.settle_remaining = None;
        Some(self.read(physics))
    }

    /// Faces currently showing
    pub fn read<P: DicePhysics + ?Sized>(&self, physics: &P) -> DiceResult {
        let values = self
            .distance_dice
            .iter()
            .map(|&h| distance_value(self.kind, physics.orientation(h)))
            .collect();
        let shape = self
            .shot_die
            .map(|h| shot_shape(physics.orientation(h)))
            .unwrap_or_default();
        DiceResult { values, shape }
    }

    /// Remove every die from the world and forget any pending read
    pub fn clear<P: DicePhysics + ?Sized>(&mut self, physics: &mut P) {
        for handle in self.distance_dice.drain(..) {
            physics.remove_body(handle);
        }
        if let Some(handle) = self.shot_die.take() {
            physics.remove_body(handle);
        }
        self.settle_remaining = None;
    }

    /// World transforms of every die, distance dice first
    pub fn transforms<P: DicePhysics + ?Sized>(&self, physics: &P) -> Vec<(Vec3, Quat)> {
        self.distance_dice
            .iter()
            .chain(self.shot_die.iter())
            .map(|&h| (physics.position(h), physics.orientation(h)))
            .collect()
    }
}
