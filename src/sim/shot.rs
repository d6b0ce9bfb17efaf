//! Clubs (distance dice) and shot shapes

use serde::{Deserialize, Serialize};

/// Lateral curve applied to a stroke's landing spot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShotShape {
    #[default]
    Straight,
    Draw,
    Fade,
    Slice,
    Hook,
}

impl ShotShape {
    pub const ALL: [ShotShape; 5] = [
        ShotShape::Straight,
        ShotShape::Draw,
        ShotShape::Fade,
        ShotShape::Slice,
        ShotShape::Hook,
    ];

    /// Faces of the shot-shape die (the same for every club)
    pub const DIE_FACES: [ShotShape; 6] = [
        ShotShape::Straight,
        ShotShape::Straight,
        ShotShape::Draw,
        ShotShape::Fade,
        ShotShape::Slice,
        ShotShape::Hook,
    ];

    /// Signed sideways offset in tiles: negative curves left of the flight
    /// line, positive curves right
    pub fn lateral_offset(&self) -> i32 {
        match self {
            ShotShape::Straight => 0,
            ShotShape::Draw => -1,
            ShotShape::Fade => 1,
            ShotShape::Slice => 2,
            ShotShape::Hook => -2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShotShape::Straight => "Straight",
            ShotShape::Draw => "Draw",
            ShotShape::Fade => "Fade",
            ShotShape::Slice => "Slice",
            ShotShape::Hook => "Hook",
        }
    }

    /// Three-letter code for the HUD
    pub fn code(&self) -> &'static str {
        match self {
            ShotShape::Straight => "STR",
            ShotShape::Draw => "DRW",
            ShotShape::Fade => "FAD",
            ShotShape::Slice => "SLC",
            ShotShape::Hook => "HOK",
        }
    }
}

/// Club selection; each club is a six-sided die with its own faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DiceKind {
    #[default]
    Driver,
    LongIron,
    Wedge,
    Chip,
    Putter,
}

impl DiceKind {
    pub const ALL: [DiceKind; 5] = [
        DiceKind::Driver,
        DiceKind::LongIron,
        DiceKind::Wedge,
        DiceKind::Chip,
        DiceKind::Putter,
    ];

    /// Face values, indexed by face number minus one
    pub fn faces(&self) -> [u8; 6] {
        match self {
            DiceKind::Driver => [4, 5, 6, 7, 8, 10],
            DiceKind::LongIron => [3, 3, 3, 4, 4, 5],
            DiceKind::Wedge => [2, 2, 2, 3, 3, 3],
            DiceKind::Chip => [1, 1, 1, 2, 2, 2],
            DiceKind::Putter => [1, 1, 1, 1, 1, 2],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DiceKind::Driver => "Driver",
            DiceKind::LongIron => "Long iron shot",
            DiceKind::Wedge => "Wedge shot",
            DiceKind::Chip => "Chip shot",
            DiceKind::Putter => "Putter",
        }
    }

    /// Club by its 1-based menu number
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(DiceKind::Driver),
            2 => Some(DiceKind::LongIron),
            3 => Some(DiceKind::Wedge),
            4 => Some(DiceKind::Chip),
            5 => Some(DiceKind::Putter),
            _ => None,
        }
    }
}
