//! Stack layer configuration and the combined mesh builder.
//!
//! A stack is a group of duplicated, offset and colored copies of the glyph
//! mesh drawn behind the main text. Each [`StackConfig`] describes one group;
//! [`StackMeshBuilder`] turns the list of groups plus the main layer into one
//! [`CombinedMesh`](crate::mesh::CombinedMesh).

mod builder;

pub use builder::{StackMeshBuilder, MAX_VERTICES};

use std::borrow::Cow;

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

use crate::color::{Gradient, WHITE};

/// Largest number of sub-layers a single configuration may request.
pub const MAX_STACK_COUNT: u32 = 6;

/// Share of the edge-parameter range handed to the shader. The rest is
/// headroom against the distance-field encoding limits.
pub const EDGE_PARAM_HEADROOM: f32 = 0.85;

/// Color used for the main layer when it hides its own vertex colors and
/// there is no stack to borrow a color from.
pub const FALLBACK_MAIN_COLOR: Vec4 = WHITE;

/// One group of stacked sub-layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    pub enabled: bool,
    /// Number of sub-layers, in `1..=MAX_STACK_COUNT`.
    pub stack_count: u32,
    /// Sub-layer color, sampled from the first (0) to the last (1) sub-layer.
    pub color: Gradient,
    pub start_offset: Vec2,
    pub end_offset: Vec2,
    /// Edge blur, in `[0, 1]`.
    pub softness: f32,
    /// Edge grow (positive) or shrink (negative), in `[-1, 1]`.
    pub dilate: f32,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            stack_count: 1,
            color: Gradient::default(),
            start_offset: Vec2::ZERO,
            end_offset: Vec2::new(2.0, -2.0),
            softness: 0.0,
            dilate: 0.0,
        }
    }
}

impl StackConfig {
    pub fn is_valid(&self) -> bool {
        self.stack_count >= 1
    }

    /// Number of sub-layers this configuration contributes to the mesh.
    pub fn layer_count(&self) -> usize {
        if self.enabled {
            self.stack_count as usize
        } else {
            0
        }
    }

    /// Interpolation parameter of the 1-based sub-layer `index`.
    ///
    /// Sub-layer 1 maps to 0 and the last one to 1. A single sub-layer maps to 1.
    pub fn interpolation(&self, index: u32) -> f32 {
        if self.stack_count <= 1 {
            1.0
        } else {
            (index.saturating_sub(1)) as f32 / (self.stack_count - 1) as f32
        }
    }

    /// Offset of the sub-layer at interpolation parameter `t`.
    pub fn offset_at(&self, t: f32) -> Vec2 {
        self.start_offset.lerp(self.end_offset, t)
    }

    /// Normalized `(dilate, softness)` shared by every sub-layer.
    pub fn edge_params(&self) -> Vec2 {
        normalize_edge_params(self.dilate, self.softness)
    }

    /// Compare with a tolerance on every floating value.
    pub fn approx_eq(&self, other: &Self, tolerance: f32) -> bool {
        self.enabled == other.enabled
            && self.stack_count == other.stack_count
            && self.start_offset.abs_diff_eq(other.start_offset, tolerance)
            && self.end_offset.abs_diff_eq(other.end_offset, tolerance)
            && (self.softness - other.softness).abs() <= tolerance
            && (self.dilate - other.dilate).abs() <= tolerance
            && self.color.approx_eq(&other.color, tolerance)
    }
}

/// Settings of the frontmost, unshifted text layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainLayer {
    /// Keep the glyph mesh's own vertex colors. When off, the main layer is
    /// painted with a flat fallback color.
    pub show: bool,
    pub dilate: f32,
    pub softness: f32,
}

impl Default for MainLayer {
    fn default() -> Self {
        Self {
            show: true,
            dilate: 0.0,
            softness: 0.0,
        }
    }
}

impl MainLayer {
    pub fn edge_params(&self) -> Vec2 {
        normalize_edge_params(self.dilate, self.softness)
    }

    pub fn approx_eq(&self, other: &Self, tolerance: f32) -> bool {
        self.show == other.show
            && (self.dilate - other.dilate).abs() <= tolerance
            && (self.softness - other.softness).abs() <= tolerance
    }
}

/// Scale `(dilate, softness)` so their sum never exceeds the shader's range.
///
/// Both are divided by `max(dilate + softness, 1)` and then by the
/// [`EDGE_PARAM_HEADROOM`] factor.
pub fn normalize_edge_params(dilate: f32, softness: f32) -> Vec2 {
    let total = (dilate + softness).max(1.0);
    Vec2::new(
        dilate / total * EDGE_PARAM_HEADROOM,
        softness / total * EDGE_PARAM_HEADROOM,
    )
}

/// Total layers in the combined mesh: every enabled sub-layer plus the main layer.
pub fn total_layers(stacks: &[StackConfig]) -> usize {
    1 + stacks.iter().map(StackConfig::layer_count).sum::<usize>()
}

/// Replace every invalid configuration with the canonical default.
///
/// Returns the input untouched when everything is valid, otherwise a
/// corrected copy the caller may persist.
pub fn validate_stacks(stacks: &[StackConfig]) -> Cow<'_, [StackConfig]> {
    if stacks.iter().all(StackConfig::is_valid) {
        return Cow::Borrowed(stacks);
    }
    let repaired = stacks
        .iter()
        .enumerate()
        .map(|(index, config)| {
            if config.is_valid() {
                config.clone()
            } else {
                log::warn!(
                    "Stack {} has stack_count {}, resetting it to defaults",
                    index,
                    config.stack_count
                );
                StackConfig::default()
            }
        })
        .collect();
    Cow::Owned(repaired)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_scales_linearly_below_one() {
        let p = normalize_edge_params(0.2, 0.4);
        assert!((p.x - 0.2 * EDGE_PARAM_HEADROOM).abs() < 1e-6);
        assert!((p.y - 0.4 * EDGE_PARAM_HEADROOM).abs() < 1e-6);

        let half = normalize_edge_params(0.1, 0.2);
        assert!((p.x - 2.0 * half.x).abs() < 1e-6);
        assert!((p.y - 2.0 * half.y).abs() < 1e-6);
    }

    #[test]
    fn normalization_divides_by_sum_from_one() {
        let p = normalize_edge_params(0.4, 0.8);
        assert!((p.x - 0.4 / 1.2 * EDGE_PARAM_HEADROOM).abs() < 1e-6);
        assert!((p.y - 0.8 / 1.2 * EDGE_PARAM_HEADROOM).abs() < 1e-6);

        let q = normalize_edge_params(0.25, 0.75);
        assert!((q.x - 0.25 * EDGE_PARAM_HEADROOM).abs() < 1e-6);
        assert!((q.y - 0.75 * EDGE_PARAM_HEADROOM).abs() < 1e-6);
    }

    #[test]
    fn normalization_is_bounded_above_one() {
        for (dilate, softness) in [(1.0, 1.0), (0.5, 0.5), (3.0, 0.0), (0.7, 0.9), (1.0, 0.25)] {
            let p = normalize_edge_params(dilate, softness);
            assert!(p.x.abs() + p.y.abs() <= EDGE_PARAM_HEADROOM + 1e-6);
        }
        let p = normalize_edge_params(1.0, 1.0);
        assert!((p.x - 0.425).abs() < 1e-6);
        assert!((p.y - 0.425).abs() < 1e-6);
    }

    #[test]
    fn interpolation_parameters() {
        let config = StackConfig {
            stack_count: 3,
            ..Default::default()
        };
        assert_eq!(config.interpolation(1), 0.0);
        assert_eq!(config.interpolation(2), 0.5);
        assert_eq!(config.interpolation(3), 1.0);

        let single = StackConfig::default();
        assert_eq!(single.interpolation(1), 1.0);
        assert_eq!(single.offset_at(1.0), single.end_offset);
    }

    #[test]
    fn disabled_configs_add_no_layers() {
        let stacks = vec![
            StackConfig {
                stack_count: 3,
                ..Default::default()
            },
            StackConfig {
                enabled: false,
                stack_count: 5,
                ..Default::default()
            },
        ];
        assert_eq!(total_layers(&stacks), 4);
        assert_eq!(total_layers(&[]), 1);
    }

    #[test]
    fn valid_stacks_are_borrowed() {
        let stacks = vec![StackConfig::default()];
        assert!(matches!(validate_stacks(&stacks), Cow::Borrowed(_)));
    }

    #[test]
    fn invalid_stack_is_reset_to_default() {
        let stacks = vec![
            StackConfig {
                stack_count: 4,
                dilate: 0.5,
                ..Default::default()
            },
            StackConfig {
                stack_count: 0,
                softness: 0.7,
                start_offset: Vec2::new(9.0, 9.0),
                ..Default::default()
            },
        ];
        let repaired = validate_stacks(&stacks);
        assert!(matches!(repaired, Cow::Owned(_)));
        assert_eq!(repaired[0], stacks[0]);
        assert_eq!(repaired[1], StackConfig::default());

        // Repairing the repaired list changes nothing.
        assert!(matches!(validate_stacks(&repaired), Cow::Borrowed(_)));
    }

    #[test]
    fn approx_eq_ignores_tiny_drift() {
        let a = StackConfig::default();
        let mut b = a.clone();
        b.softness += 1e-7;
        assert!(a.approx_eq(&b, 1e-5));
        b.stack_count = 2;
        assert!(!a.approx_eq(&b, 1e-5));
    }
}
