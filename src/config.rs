//! Configuration schema and loader
//!
//! Everything is optional in the YAML file; missing fields fall back to the
//! Midi Fighter 3D defaults. Example:
//!
//! ```yaml
//! device_name: "Midi Fighter 3D"
//! channel: 2
//! pads: { low: 36, high: 100 }
//! colors: { root: 91, member: 55, blank: 1 }
//! scales:
//!   - name: Major
//!     intervals: [0, 2, 4, 5, 7, 9, 11]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::ColorPalette;
use crate::illumination::PadRange;
use crate::scale::{builtin_defs, Scale, ScaleDef, ScaleError, ScaleTable};

pub const DEFAULT_DEVICE_NAME: &str = "Midi Fighter 3D";
/// Channel 3 on the device, zero-indexed.
pub const DEFAULT_CHANNEL: u8 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output port name, exact or case-insensitive substring
    pub device_name: String,
    /// Zero-indexed MIDI channel the pads listen on
    pub channel: u8,
    pub pads: PadRange,
    pub colors: ColorPalette,
    pub scales: Vec<ScaleDef>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device_name: DEFAULT_DEVICE_NAME.to_string(),
            channel: DEFAULT_CHANNEL,
            pads: PadRange::default(),
            colors: ColorPalette::default(),
            scales: builtin_defs(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("MIDI channel {0} is out of range (0-15)")]
    Channel(u8),

    #[error("Pad range {low}..{high} is invalid")]
    PadRange { low: u8, high: u8 },

    #[error("Color velocity {0} is out of range (0-127)")]
    Color(u8),

    #[error("No scales defined")]
    NoScales,

    #[error("Malformed scale definition '{name}': {source}")]
    MalformedScale {
        name: String,
        #[source]
        source: ScaleError,
    },
}

/// Validated configuration handed to the controller.
#[derive(Debug, Clone)]
pub struct Settings {
    pub device_name: String,
    pub channel: u8,
    pub pads: PadRange,
    pub colors: ColorPalette,
    pub scales: ScaleTable,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        log::info!("Loading config from {:?}", path);
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!(
            "Loaded config: device '{}', channel {}, {} scale(s)",
            config.device_name,
            config.channel,
            config.scales.len()
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<Settings, ConfigError> {
        if self.channel > 15 {
            return Err(ConfigError::Channel(self.channel));
        }
        if self.pads.low > self.pads.high || self.pads.high > 128 {
            return Err(ConfigError::PadRange { low: self.pads.low, high: self.pads.high });
        }
        if let Some(v) = self.colors.invalid_value() {
            return Err(ConfigError::Color(v));
        }

        let scales = self
            .scales
            .iter()
            .map(|def| {
                Scale::try_from(def).map_err(|source| ConfigError::MalformedScale {
                    name: def.name.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let scales = ScaleTable::new(scales).ok_or(ConfigError::NoScales)?;

        Ok(Settings {
            device_name: self.device_name.clone(),
            channel: self.channel,
            pads: self.pads,
            colors: self.colors,
            scales,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_validate() {
        let settings = Config::default().validate().unwrap();
        assert_eq!(settings.device_name, "Midi Fighter 3D");
        assert_eq!(settings.channel, 2);
        assert_eq!(settings.pads, PadRange::new(36, 100));
        assert_eq!(settings.scales.len(), 7);
        assert_eq!(settings.scales.get(1).unwrap().name(), "Natural Minor");
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let config: Config = serde_yaml::from_str(include_str!("../config.example.yaml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "device_name: Launchpad\npads:\n  high: 52").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.device_name, "Launchpad");
        assert_eq!(config.channel, DEFAULT_CHANNEL);
        assert_eq!(config.pads, PadRange::new(36, 52));
        assert_eq!(config.scales, builtin_defs());
    }

    #[test]
    fn test_custom_scale_table() {
        let yaml = "scales:\n  - name: Whole Tone\n    intervals: [0, 2, 4, 6, 8, 10]\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        let settings = config.validate().unwrap();
        assert_eq!(settings.scales.names(), vec!["Whole Tone"]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_bad_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "channel: [not, a, number]").unwrap();
        assert!(matches!(Config::load(file.path()), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_rejects_scale_without_root() {
        let config = Config {
            scales: vec![ScaleDef { name: "Broken".to_string(), intervals: vec![2, 4, 7] }],
            ..Config::default()
        };
        match config.validate() {
            Err(ConfigError::MalformedScale { name, source }) => {
                assert_eq!(name, "Broken");
                assert_eq!(source, ScaleError::MissingRoot);
            }
            other => panic!("unexpected: {:?}", other.map(|s| s.device_name)),
        }
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let config = Config { channel: 16, ..Config::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Channel(16))));

        let config = Config { pads: PadRange::new(60, 40), ..Config::default() };
        assert!(matches!(config.validate(), Err(ConfigError::PadRange { .. })));

        let config = Config { pads: PadRange::new(0, 129), ..Config::default() };
        assert!(matches!(config.validate(), Err(ConfigError::PadRange { .. })));

        let config = Config { scales: Vec::new(), ..Config::default() };
        assert!(matches!(config.validate(), Err(ConfigError::NoScales)));

        let colors = ColorPalette { blank: 128, ..ColorPalette::default() };
        let config = Config { colors, ..Config::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Color(128))));
    }
}
