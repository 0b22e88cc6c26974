use std::collections::BTreeMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::scale::{Root, Scale};

/// How a single pad lights up for the current root and scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Illumination {
    Root,
    Member,
    Blank,
}

/// Pad addresses the controller exposes, `low` inclusive, `high` exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PadRange {
    pub low:  u8,
    pub high: u8,
}

impl PadRange {
    pub fn new(low: u8, high: u8) -> Self {
        Self { low, high }
    }

    pub fn notes(self) -> Range<u8> {
        self.low..self.high
    }

    pub fn is_empty(self) -> bool {
        self.low >= self.high
    }
}

impl Default for PadRange {
    /// Notes 36 (C2) through 99, the 4x4x4 banks of a Midi Fighter 3D.
    fn default() -> Self {
        Self { low: 36, high: 100 }
    }
}

/// Classify a single pad.
///
/// The interval is taken with a Euclidean remainder so that pitch classes
/// below the root still land in 0..12.
pub fn classify(root: Root, scale: &Scale, pad: u8) -> Illumination {
    let pitch_class = pad % 12;
    if pitch_class == root.pitch_class() {
        return Illumination::Root;
    }
    let interval = (pitch_class as i16 - root.pitch_class() as i16).rem_euclid(12) as u8;
    if scale.contains(interval) {
        Illumination::Member
    } else {
        Illumination::Blank
    }
}

/// Classify every pad in `pads`. An empty range gives an empty map.
pub fn illuminate(root: Root, scale: &Scale, pads: PadRange) -> BTreeMap<u8, Illumination> {
    pads.notes().map(|pad| (pad, classify(root, scale, pad))).collect()
}
