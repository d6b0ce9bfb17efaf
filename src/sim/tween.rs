//! Time-driven interpolation for ball animations
//!
//! A `Tween` is advanced by the fixed simulation timestep, never by reading a
//! clock, so replaying the same inputs gives the same ball path.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::{BALL_REST_HEIGHT, FLIGHT_ARC_HEIGHT};

/// Easing curves, named after the tweening library conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    #[default]
    Linear,
    /// Quadratic ease-out: fast start, gentle stop
    QuadOut,
}

impl Easing {
    /// Map linear progress `t` in `[0, 1]` onto the curve
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

/// Values a tween can interpolate between
pub trait Lerp: Copy {
    fn lerp_to(self, end: Self, t: f32) -> Self;
}

impl Lerp for Vec3 {
    fn lerp_to(self, end: Self, t: f32) -> Self {
        self.lerp(end, t)
    }
}

/// `start` to `end` over `duration` seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tween<T> {
    pub start: T,
    pub end: T,
    pub duration: f32,
    pub easing: Easing,
    elapsed: f32,
}

impl<T: Lerp> Tween<T> {
    pub fn new(start: T, end: T, duration: f32, easing: Easing) -> Self {
        Self {
            start,
            end,
            duration,
            easing,
            elapsed: 0.0,
        }
    }

    /// Move time forward. Returns true once the tween has finished.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.is_finished()
    }

    /// Linear progress in `[0, 1]`
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Eased value at the current time
    pub fn value(&self) -> T {
        self.sample(self.progress())
    }

    /// Eased value at linear progress `t`
    pub fn sample(&self, t: f32) -> T {
        self.start.lerp_to(self.end, self.easing.apply(t))
    }
}

/// Ball position along a stroke's flight.
///
/// Horizontal travel eases out; height follows a half sine over linear time so
/// the apex sits at the midpoint of the flight.
pub fn flight_point(flight: &Tween<Vec3>) -> Vec3 {
    let t = flight.progress();
    let mut p = flight.value();
    p.y = BALL_REST_HEIGHT + FLIGHT_ARC_HEIGHT * (t * std::f32::consts::PI).sin();
    p
}
