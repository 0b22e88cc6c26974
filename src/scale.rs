use serde::{Deserialize, Serialize};

// ── Roots ─────────────────────────────────────────────────────────────────────

/// One of the twelve pitch classes a scale can be built on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Root {
    #[default]
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl Root {
    pub const ALL: [Root; 12] = [
        Self::C,
        Self::Cs,
        Self::D,
        Self::Ds,
        Self::E,
        Self::F,
        Self::Fs,
        Self::G,
        Self::Gs,
        Self::A,
        Self::As,
        Self::B,
    ];

    /// `None` unless `pc` is in 0..12.
    pub fn from_pitch_class(pc: u8) -> Option<Self> {
        Self::ALL.get(pc as usize).copied()
    }

    pub fn pitch_class(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::C  => "C",
            Self::Cs => "C#/Db",
            Self::D  => "D",
            Self::Ds => "D#/Eb",
            Self::E  => "E",
            Self::F  => "F",
            Self::Fs => "F#/Gb",
            Self::G  => "G",
            Self::Gs => "G#/Ab",
            Self::A  => "A",
            Self::As => "A#/Bb",
            Self::B  => "B",
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self as usize + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self as usize + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

// ── Scale definitions ─────────────────────────────────────────────────────────

/// Built-in scale table: name and semitone intervals from the root (root = 0).
pub const BUILTIN: [(&str, &[u8]); 7] = [
    ("Major",            &[0, 2, 4, 5, 7, 9, 11]),
    ("Natural Minor",    &[0, 2, 3, 5, 7, 8, 10]),
    ("Major Pentatonic", &[0, 2, 4, 7, 9]),
    ("Minor Pentatonic", &[0, 3, 5, 7, 10]),
    ("Blues",            &[0, 3, 5, 6, 7, 10]),
    ("Dorian",           &[0, 2, 3, 5, 7, 9, 10]),
    ("Mixolydian",       &[0, 2, 4, 5, 7, 9, 10]),
];

/// Raw scale entry as it appears in the config file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleDef {
    pub name: String,
    pub intervals: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScaleError {
    #[error("scale has no intervals")]
    Empty,

    #[error("interval {0} is outside 0..12")]
    OutOfRange(u8),

    #[error("interval {0} is listed more than once")]
    Duplicate(u8),

    #[error("intervals do not include the root (0)")]
    MissingRoot,
}

/// A validated scale. Intervals are kept as a 12-bit set, bit `n` = `n` semitones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scale {
    name: String,
    intervals: u16,
}

impl Scale {
    pub fn new(name: impl Into<String>, intervals: &[u8]) -> Result<Self, ScaleError> {
        if intervals.is_empty() {
            return Err(ScaleError::Empty);
        }
        let mut set = 0u16;
        for &iv in intervals {
            if iv >= 12 {
                return Err(ScaleError::OutOfRange(iv));
            }
            if set & (1 << iv) != 0 {
                return Err(ScaleError::Duplicate(iv));
            }
            set |= 1 << iv;
        }
        if set & 1 == 0 {
            return Err(ScaleError::MissingRoot);
        }
        Ok(Self { name: name.into(), intervals: set })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `true` if `interval` semitones above the root belongs to the scale.
    pub fn contains(&self, interval: u8) -> bool {
        interval < 12 && self.intervals & (1 << interval) != 0
    }

    /// Intervals in ascending order.
    pub fn intervals(&self) -> Vec<u8> {
        (0..12).filter(|&iv| self.contains(iv)).collect()
    }
}

impl TryFrom<&ScaleDef> for Scale {
    type Error = ScaleError;

    fn try_from(def: &ScaleDef) -> Result<Self, Self::Error> {
        Scale::new(def.name.clone(), &def.intervals)
    }
}

pub fn builtin_defs() -> Vec<ScaleDef> {
    BUILTIN
        .iter()
        .map(|(name, intervals)| ScaleDef { name: name.to_string(), intervals: intervals.to_vec() })
        .collect()
}

// ── Table ─────────────────────────────────────────────────────────────────────

/// Immutable, non-empty list of validated scales. Built once at startup.
#[derive(Clone, Debug)]
pub struct ScaleTable {
    scales: Vec<Scale>,
}

impl ScaleTable {
    /// Returns `None` for an empty list.
    pub fn new(scales: Vec<Scale>) -> Option<Self> {
        if scales.is_empty() { None } else { Some(Self { scales }) }
    }

    pub fn len(&self) -> usize {
        self.scales.len()
    }

    pub fn get(&self, index: usize) -> Option<&Scale> {
        self.scales.get(index)
    }

    /// Like `get`, but an index past the end yields the last scale.
    pub fn get_clamped(&self, index: usize) -> &Scale {
        &self.scales[index.min(self.scales.len() - 1)]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scale> {
        self.scales.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.scales.iter().map(Scale::name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_root() -> impl Strategy<Value = Root> {
        (0u8..12).prop_map(|pc| Root::from_pitch_class(pc).unwrap())
    }

    #[test]
    fn test_root_wraps() {
        assert_eq!(Root::B.next(), Root::C);
        assert_eq!(Root::C.prev(), Root::B);
        assert_eq!(Root::Cs.name(), "C#/Db");
        assert_eq!(Root::from_pitch_class(12), None);
    }

    #[test]
    fn test_builtin_scales_validate() {
        for def in builtin_defs() {
            let scale = Scale::try_from(&def).unwrap();
            assert_eq!(scale.intervals(), def.intervals, "{}", def.name);
        }
    }

    #[test]
    fn test_malformed_scales() {
        assert_eq!(Scale::new("x", &[]), Err(ScaleError::Empty));
        assert_eq!(Scale::new("x", &[0, 12]), Err(ScaleError::OutOfRange(12)));
        assert_eq!(Scale::new("x", &[0, 4, 4]), Err(ScaleError::Duplicate(4)));
        assert_eq!(Scale::new("x", &[2, 4, 7]), Err(ScaleError::MissingRoot));
    }

    #[test]
    fn test_intervals_are_unordered_on_input() {
        let scale = Scale::new("Triad", &[7, 0, 4]).unwrap();
        assert_eq!(scale.intervals(), vec![0, 4, 7]);
        assert!(scale.contains(4));
        assert!(!scale.contains(5));
        assert!(!scale.contains(200));
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(ScaleTable::new(Vec::new()).is_none());
    }

    #[test]
    fn test_table_lookup() {
        let table = ScaleTable::new(builtin_defs().iter().map(|d| Scale::try_from(d).unwrap()).collect())
            .unwrap();
        assert_eq!(table.len(), BUILTIN.len());
        assert_eq!(table.get(0).map(Scale::name), Some("Major"));
        assert_eq!(table.get(99), None);
        assert_eq!(table.get_clamped(99).name(), "Mixolydian");
        assert!(table.iter().all(|s| s.contains(0)));
    }

    proptest! {
        #[test]
        fn next_twelve_times_is_identity(root in any_root()) {
            let mut r = root;
            for _ in 0..12 { r = r.next(); }
            prop_assert_eq!(r, root);
        }

        #[test]
        fn prev_twelve_times_is_identity(root in any_root()) {
            let mut r = root;
            for _ in 0..12 { r = r.prev(); }
            prop_assert_eq!(r, root);
        }

        #[test]
        fn next_undoes_prev(root in any_root()) {
            prop_assert_eq!(root.prev().next(), root);
            prop_assert_eq!(root.next().prev(), root);
        }

        #[test]
        fn next_steps_one_semitone(root in any_root()) {
            prop_assert_eq!(root.next().pitch_class(), (root.pitch_class() + 1) % 12);
        }
    }
}
