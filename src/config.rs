//! Serializable effect configuration.
//!
//! Configurations are stored as RON:
//!
//! ```ron
//! (
//!     stacks: [
//!         (stack_count: 3, start_offset: (0.0, 0.0), end_offset: (3.0, -3.0)),
//!     ],
//!     main: (show: true, dilate: 0.1),
//!     curve: (enabled: true, bend: (scale: 2.0)),
//! )
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::curve::{BendSettings, KeyframeCurve};
use crate::error::ConfigError;
use crate::stack::{MainLayer, StackConfig};

/// Curve-bending part of the effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveSettings {
    pub enabled: bool,
    pub curve: KeyframeCurve,
    pub bend: BendSettings,
}

impl Default for CurveSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            curve: KeyframeCurve::arc(),
            bend: BendSettings::default(),
        }
    }
}

impl CurveSettings {
    pub fn approx_eq(&self, other: &Self, tolerance: f32) -> bool {
        self.enabled == other.enabled
            && self.bend.stabilize_baseline == other.bend.stabilize_baseline
            && (self.bend.scale - other.bend.scale).abs() <= tolerance
            && (self.bend.reference_width - other.bend.reference_width).abs() <= tolerance
            && self.curve.approx_eq(&other.curve, tolerance)
    }
}

/// Everything the caller controls about a stacked-text effect.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// Stack groups in declaration order; later entries are drawn further back.
    pub stacks: Vec<StackConfig>,
    pub main: MainLayer,
    pub curve: CurveSettings,
}

impl EffectConfig {
    pub fn from_ron_str(s: &str) -> Result<Self, ConfigError> {
        ron::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_ron_str(&text)?;
        log::info!(
            "Loaded effect config from {} ({} stacks)",
            path.display(),
            config.stacks.len()
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn partial_config_fills_defaults() {
        let config = EffectConfig::from_ron_str(
            "(stacks: [(stack_count: 3, end_offset: (3.0, -3.0))], main: (dilate: 0.1))",
        )
        .unwrap();
        assert_eq!(config.stacks.len(), 1);
        assert_eq!(config.stacks[0].stack_count, 3);
        assert!(config.stacks[0].enabled);
        assert_eq!(config.stacks[0].end_offset, Vec2::new(3.0, -3.0));
        assert!(config.main.show);
        assert_eq!(config.main.dilate, 0.1);
        assert!(!config.curve.enabled);
    }

    #[test]
    fn pretty_output_parses_back() {
        let config = EffectConfig {
            stacks: vec![StackConfig::default(), StackConfig::default()],
            curve: CurveSettings {
                enabled: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let text = config.to_ron_string().unwrap();
        assert_eq!(EffectConfig::from_ron_str(&text).unwrap(), config);
    }

    #[test]
    fn malformed_config_is_a_parse_error() {
        let result = EffectConfig::from_ron_str("(stacks: 5)");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = EffectConfig::load("/definitely/not/here.ron");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
