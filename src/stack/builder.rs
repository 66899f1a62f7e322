//! Assembles the combined stacked-text mesh.

use glam::Vec2;

use super::{total_layers, validate_stacks, MainLayer, StackConfig, FALLBACK_MAIN_COLOR};
use crate::error::{StackError, StackResult};
use crate::mesh::{CombinedMesh, LayerKind, SourceMesh};

/// Vertex ceiling for one combined draw call.
pub const MAX_VERTICES: usize = 65000;

/// Builds a [`CombinedMesh`] from a glyph mesh and a list of stack configurations.
///
/// Layers are emitted back to front: configurations in reverse declaration
/// order (the last declared is furthest back), then the main layer on top.
/// Within a configuration, sub-layer 1 (at `start_offset`) comes first and
/// the last sub-layer (at `end_offset`) last.
///
/// The output buffers are owned by the builder and reused between builds.
#[derive(Debug, Default)]
pub struct StackMeshBuilder {
    mesh: CombinedMesh,
}

impl StackMeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mesh from the last successful build.
    pub fn mesh(&self) -> &CombinedMesh {
        &self.mesh
    }

    /// Build the combined mesh.
    ///
    /// Invalid configurations are replaced by the default for this build; use
    /// [`validate_stacks`] beforehand to persist the repair. On error the
    /// previous output is left untouched.
    pub fn build(
        &mut self,
        source: &SourceMesh,
        stacks: &[StackConfig],
        main: &MainLayer,
    ) -> StackResult<&CombinedMesh> {
        if source.is_empty() {
            return Err(StackError::EmptySource);
        }
        source.validate()?;

        let stacks = validate_stacks(stacks);

        let layers = total_layers(&stacks);
        let requested = source.vertex_count() * layers;
        if requested > MAX_VERTICES {
            return Err(StackError::VertexLimitExceeded {
                requested,
                limit: MAX_VERTICES,
            });
        }

        self.mesh.reset(requested, source.index_count() * layers, layers);

        for (index, config) in stacks.iter().enumerate().rev() {
            if !config.enabled {
                continue;
            }
            let edge_params = config.edge_params();
            for sub_layer in 1..=config.stack_count {
                let t = config.interpolation(sub_layer);
                self.mesh.push_layer(
                    source,
                    LayerKind::Stack {
                        config: index,
                        sub_layer,
                        t,
                    },
                    config.offset_at(t),
                    Some(config.color.sample(t)),
                    edge_params,
                );
            }
        }

        let main_color = if main.show {
            None
        } else {
            Some(
                stacks
                    .first()
                    .map(|config| config.color.sample(0.0))
                    .unwrap_or(FALLBACK_MAIN_COLOR),
            )
        };
        self.mesh.push_layer(
            source,
            LayerKind::Main,
            Vec2::ZERO,
            main_color,
            main.edge_params(),
        );

        log::debug!(
            "Built stacked mesh: {} layers, {} vertices, {} triangles",
            layers,
            self.mesh.vertex_count(),
            self.mesh.triangle_count()
        );

        Ok(&self.mesh)
    }
}
