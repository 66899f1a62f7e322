//! The stacked-text effect: change detection plus the bend-then-build pass.
//!
//! [`StackedTextEffect`] is driven by the host once per frame (typically right
//! before rendering). It compares the current inputs against a snapshot of
//! the last build and only rebuilds the combined mesh when something changed.
//! Failures never propagate: the last good mesh stays available and the
//! failure is reported through [`UpdateOutcome::Skipped`].

use std::borrow::Cow;

use glam::Vec3;

use crate::config::{CurveSettings, EffectConfig};
use crate::curve::CurveBender;
use crate::error::{StackError, StackResult};
use crate::glyph::CharacterInfo;
use crate::mesh::{CombinedMesh, SourceMesh};
use crate::stack::{validate_stacks, MainLayer, StackConfig, StackMeshBuilder};

/// Tolerance for floating-point comparisons in change detection.
pub const CHANGE_TOLERANCE: f32 = 1e-5;

/// Shaped text handed over by the text engine for one update.
#[derive(Debug, Clone, Copy)]
pub struct ShapedText<'a> {
    pub text: &'a str,
    pub mesh: &'a SourceMesh,
    pub characters: &'a [CharacterInfo],
    pub world_scale: Vec3,
}

/// Result of [`StackedTextEffect::update`].
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// Nothing changed; the previous mesh is still valid.
    Unchanged,
    /// The combined mesh was rebuilt.
    Rebuilt,
    /// A rebuild was needed but failed; the previous mesh (if any) is kept.
    Skipped(StackError),
}

/// Inputs of the last build, used to decide whether a rebuild is needed.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectSnapshot {
    pub text: String,
    pub stacks: Vec<StackConfig>,
    pub main: MainLayer,
    pub curve: CurveSettings,
    pub world_scale: Vec3,
}

impl EffectSnapshot {
    fn capture(config: &EffectConfig, shaped: &ShapedText<'_>) -> Self {
        Self {
            text: shaped.text.to_owned(),
            stacks: config.stacks.clone(),
            main: config.main,
            curve: config.curve.clone(),
            world_scale: shaped.world_scale,
        }
    }

    /// Whether `config` and `shaped` still describe this snapshot.
    pub fn matches(&self, config: &EffectConfig, shaped: &ShapedText<'_>) -> bool {
        self.text == shaped.text
            && self
                .world_scale
                .abs_diff_eq(shaped.world_scale, CHANGE_TOLERANCE)
            && self.main.approx_eq(&config.main, CHANGE_TOLERANCE)
            && self.curve.approx_eq(&config.curve, CHANGE_TOLERANCE)
            && self.stacks.len() == config.stacks.len()
            && self
                .stacks
                .iter()
                .zip(&config.stacks)
                .all(|(a, b)| a.approx_eq(b, CHANGE_TOLERANCE))
    }
}

/// Owns an effect configuration and keeps its combined mesh up to date.
#[derive(Debug, Default)]
pub struct StackedTextEffect {
    config: EffectConfig,
    snapshot: Option<EffectSnapshot>,
    force_rebuild: bool,
    working: SourceMesh,
    bender: CurveBender,
    builder: StackMeshBuilder,
    has_mesh: bool,
}

impl StackedTextEffect {
    pub fn new(config: EffectConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    /// Mutable access to the configuration. Edits are picked up by the next
    /// [`update`](Self::update) through change detection.
    pub fn config_mut(&mut self) -> &mut EffectConfig {
        &mut self.config
    }

    /// Replace the whole stack list and force the next update to rebuild.
    pub fn set_stacks(&mut self, stacks: Vec<StackConfig>) {
        self.config.stacks = stacks;
        self.force_rebuild = true;
    }

    /// Force the next update to rebuild, e.g. after the output mesh was
    /// replaced or detached by the host.
    pub fn invalidate(&mut self) {
        self.force_rebuild = true;
    }

    /// The last successfully built mesh, if any.
    pub fn mesh(&self) -> Option<&CombinedMesh> {
        self.has_mesh.then(|| self.builder.mesh())
    }

    /// Whether `shaped` differs from the inputs of the last build.
    pub fn needs_rebuild(&self, shaped: &ShapedText<'_>) -> bool {
        self.force_rebuild
            || !self
                .snapshot
                .as_ref()
                .is_some_and(|snapshot| snapshot.matches(&self.config, shaped))
    }

    /// Rebuild the combined mesh if any input changed.
    pub fn update(&mut self, shaped: &ShapedText<'_>) -> UpdateOutcome {
        if !self.needs_rebuild(shaped) {
            return UpdateOutcome::Unchanged;
        }

        if let Cow::Owned(repaired) = validate_stacks(&self.config.stacks) {
            self.config.stacks = repaired;
        }

        match self.rebuild(shaped) {
            Ok(()) => {
                self.has_mesh = true;
                self.remember(shaped);
                UpdateOutcome::Rebuilt
            }
            Err(StackError::EmptySource) => {
                // Shaping may not be ready yet; retry on the next update.
                log::debug!("Skipping stacked text rebuild: no glyphs available");
                UpdateOutcome::Skipped(StackError::EmptySource)
            }
            Err(err) => {
                log::warn!("Stacked text mesh not updated: {}", err);
                self.remember(shaped);
                UpdateOutcome::Skipped(err)
            }
        }
    }

    fn remember(&mut self, shaped: &ShapedText<'_>) {
        self.snapshot = Some(EffectSnapshot::capture(&self.config, shaped));
        self.force_rebuild = false;
    }

    fn rebuild(&mut self, shaped: &ShapedText<'_>) -> StackResult<()> {
        self.working.copy_from(shaped.mesh);

        let curve = &self.config.curve;
        if curve.enabled {
            self.bender.compute_offsets(
                shaped.characters,
                &self.working.positions,
                &curve.curve,
                &curve.bend,
            )?;
            self.bender.apply(&mut self.working.positions);
        }

        self.builder.build(&self.working, &self.config.stacks, &self.config.main)?;
        Ok(())
    }
}
