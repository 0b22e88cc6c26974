//! Pad color codes.
//!
//! The Midi Fighter 3D picks an LED color from the note-on velocity.

use serde::{Deserialize, Serialize};

use crate::illumination::Illumination;

/// Velocity palette indices used by the default mapping.
pub mod colors {
    pub const PURPLE: u8 = 91;
    pub const GREEN: u8 = 55;
    /// Lowest non-zero velocity. The device falls back to its idle color.
    pub const IDLE: u8 = 1;
}

/// Velocity sent for each illumination class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorPalette {
    pub root:   u8,
    pub member: u8,
    pub blank:  u8,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            root:   colors::PURPLE,
            member: colors::GREEN,
            blank:  colors::IDLE,
        }
    }
}

impl ColorPalette {
    pub fn encode(&self, illumination: Illumination) -> u8 {
        match illumination {
            Illumination::Root   => self.root,
            Illumination::Member => self.member,
            Illumination::Blank  => self.blank,
        }
    }

    /// First value that does not fit in a 7-bit velocity, if any.
    pub fn invalid_value(&self) -> Option<u8> {
        [self.root, self.member, self.blank].into_iter().find(|&v| v > 127)
    }
}
