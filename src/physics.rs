//! Narrow interface to the dice rigid-body simulation
//!
//! The real physics engine lives outside the crate (in the browser it is a
//! JavaScript world driven through `web::PhysicsBridge`). The game only ever
//! spawns dice, steps the world and reads orientations back.

use std::collections::BTreeMap;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Opaque id of a body inside the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Shape and material of a die body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DieBodyDesc {
    pub half_extents: Vec3,
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl Default for DieBodyDesc {
    /// 2x2x2 box
    fn default() -> Self {
        Self {
            half_extents: Vec3::splat(1.0),
            density: 2.0,
            friction: 0.5,
            restitution: 0.75,
        }
    }
}

/// Rigid-body world the dice are thrown into
pub trait DicePhysics {
    fn create_body(&mut self, desc: &DieBodyDesc, position: Vec3, rotation: Quat) -> BodyHandle;
    fn step(&mut self, dt: f32);
    fn orientation(&self, handle: BodyHandle) -> Quat;
    fn position(&self, handle: BodyHandle) -> Vec3;
    fn remove_body(&mut self, handle: BodyHandle);
}

#[derive(Debug, Clone, Copy)]
struct InstantBody {
    position: Vec3,
    rotation: Quat,
    rest_height: f32,
}

/// Physics stand-in for headless play and tests.
///
/// Dice never tumble: each one drops straight to the ground on the first step
/// and keeps the rotation it was spawned with, so the spawn rotation decides
/// the face that comes up.
#[derive(Debug, Default)]
pub struct InstantPhysics {
    bodies: BTreeMap<BodyHandle, InstantBody>,
    next_id: u32,
}

impl InstantPhysics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

impl DicePhysics for InstantPhysics {
    fn create_body(&mut self, desc: &DieBodyDesc, position: Vec3, rotation: Quat) -> BodyHandle {
        let handle = BodyHandle(self.next_id);
        self.next_id += 1;
        self.bodies.insert(
            handle,
            InstantBody {
                position,
                rotation,
                rest_height: desc.half_extents.y,
            },
        );
        handle
    }

    fn step(&mut self, _dt: f32) {
        for body in self.bodies.values_mut() {
            body.position.y = body.rest_height;
        }
    }

    fn orientation(&self, handle: BodyHandle) -> Quat {
        match self.bodies.get(&handle) {
            Some(body) => body.rotation,
            None => {
                log::warn!("Orientation requested for unknown body {:?}", handle);
                Quat::IDENTITY
            }
        }
    }

    fn position(&self, handle: BodyHandle) -> Vec3 {
        self.bodies
            .get(&handle)
            .map(|b| b.position)
            .unwrap_or(Vec3::ZERO)
    }

    fn remove_body(&mut self, handle: BodyHandle) {
        self.bodies.remove(&handle);
    }
}
