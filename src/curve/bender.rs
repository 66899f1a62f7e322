//! Bends glyph quads so a line of text follows a shaping curve.
//!
//! Each visible character quad is lifted to the curve height at its
//! horizontal midpoint and rotated to match the local curve tangent, pivoting
//! around the midpoint of its baseline so glyph shapes stay rigid.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::Curve;
use crate::error::{StackError, StackResult};
use crate::glyph::{CharacterInfo, VERTICES_PER_QUAD};

/// Finite-difference step used to approximate the curve tangent.
pub const TANGENT_STEP: f32 = 1e-4;

/// Curve height per unit of width and unit of `scale`.
const HEIGHT_FACTOR: f32 = 0.1;

/// Tuning for a bend pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BendSettings {
    /// Vertical displacement multiplier.
    pub scale: f32,
    /// When positive, overrides the horizontal extent used for normalization,
    /// keeping arcs consistent across text lengths.
    pub reference_width: f32,
    /// Subtract the curve's midpoint height so the block stays vertically centered.
    pub stabilize_baseline: bool,
}

impl Default for BendSettings {
    fn default() -> Self {
        Self {
            scale: 1.0,
            reference_width: 0.0,
            stabilize_baseline: true,
        }
    }
}

/// Horizontal extent used to map glyph midpoints into `[0, 1]`.
#[derive(Debug, Clone, Copy)]
struct HorizontalBounds {
    min: f32,
    max: f32,
}

impl HorizontalBounds {
    fn width(&self) -> f32 {
        self.max - self.min
    }

    /// Widen symmetrically to `width` if that is looser than the current extent.
    fn widened_to(self, width: f32) -> Self {
        if width <= self.width() {
            return self;
        }
        let center = (self.min + self.max) * 0.5;
        Self {
            min: center - width * 0.5,
            max: center + width * 0.5,
        }
    }

    fn normalize(&self, x: f32) -> f32 {
        let width = self.width();
        if width <= f32::EPSILON {
            0.5
        } else {
            (x - self.min) / width
        }
    }
}

/// Computes per-vertex displacements that bend glyph quads along a curve.
///
/// The offset buffer is kept between calls and only grows.
#[derive(Debug, Default)]
pub struct CurveBender {
    offsets: Vec<Vec3>,
}

impl CurveBender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offsets from the last successful pass, one per source vertex.
    pub fn offsets(&self) -> &[Vec3] {
        &self.offsets
    }

    /// Compute one displacement per vertex of `positions`.
    ///
    /// Vertices not belonging to a visible character keep a zero offset.
    /// Characters whose quad lies outside `positions` are skipped.
    ///
    /// Fails with [`StackError::EmptySource`] when the mesh is not populated
    /// or no character is visible.
    pub fn compute_offsets<C: Curve + ?Sized>(
        &mut self,
        characters: &[CharacterInfo],
        positions: &[Vec3],
        curve: &C,
        settings: &BendSettings,
    ) -> StackResult<&[Vec3]> {
        if positions.is_empty() {
            return Err(StackError::EmptySource);
        }

        let bounds = visible_bounds(characters, positions).ok_or(StackError::EmptySource)?;

        let reference_width = settings.reference_width.max(0.0);
        let bounds = bounds.widened_to(reference_width);
        let extent = if reference_width > 0.0 {
            reference_width
        } else {
            bounds.width()
        };
        let height_scale = extent * settings.scale * HEIGHT_FACTOR;

        let baseline_offset = if settings.stabilize_baseline {
            curve.evaluate(0.5) * height_scale
        } else {
            0.0
        };

        self.offsets.clear();
        self.offsets.resize(positions.len(), Vec3::ZERO);

        for (index, character) in characters.iter().enumerate() {
            if !character.visible {
                continue;
            }
            let Some(range) = quad_range(character, positions.len()) else {
                log::debug!(
                    "Skipping character {} with vertex range outside the glyph mesh",
                    index
                );
                continue;
            };

            let corners = &positions[range.clone()];
            let pivot = Vec3::new((corners[0].x + corners[2].x) * 0.5, character.baseline, 0.0);

            let x0 = bounds.normalize(pivot.x);
            let x1 = x0 + TANGENT_STEP;
            let y0 = curve.evaluate(1.0 - x0) * height_scale;
            let y1 = curve.evaluate(1.0 - x1) * height_scale;

            let tangent = Vec3::new(TANGENT_STEP * bounds.width(), y1 - y0, 0.0);
            let angle = tangent_angle(tangent);

            let transform = Mat4::from_rotation_translation(
                Quat::from_rotation_z(angle),
                Vec3::new(0.0, y0 - baseline_offset, 0.0),
            );

            for (offset, corner) in self.offsets[range].iter_mut().zip(corners) {
                let local = *corner - pivot;
                *offset = transform.transform_point3(local) - local;
            }
        }

        Ok(&self.offsets)
    }

    /// Add the last computed offsets to `positions`.
    pub fn apply(&self, positions: &mut [Vec3]) {
        for (position, offset) in positions.iter_mut().zip(&self.offsets) {
            *position += *offset;
        }
    }
}

fn quad_range(character: &CharacterInfo, vertex_count: usize) -> Option<std::ops::Range<usize>> {
    let start = character.vertex_index as usize;
    let end = start.checked_add(VERTICES_PER_QUAD)?;
    (end <= vertex_count).then_some(start..end)
}

fn visible_bounds(characters: &[CharacterInfo], positions: &[Vec3]) -> Option<HorizontalBounds> {
    let mut bounds: Option<HorizontalBounds> = None;
    for character in characters.iter().filter(|c| c.visible) {
        let Some(range) = quad_range(character, positions.len()) else {
            continue;
        };
        for corner in &positions[range] {
            let b = bounds.get_or_insert(HorizontalBounds {
                min: corner.x,
                max: corner.x,
            });
            b.min = b.min.min(corner.x);
            b.max = b.max.max(corner.x);
        }
    }
    bounds
}

/// Signed angle between the +X axis and `tangent`, in radians.
///
/// Positive when the cross product with +X points along +Z, i.e. when the
/// curve rises.
fn tangent_angle(tangent: Vec3) -> f32 {
    tangent.y.atan2(tangent.x)
}
