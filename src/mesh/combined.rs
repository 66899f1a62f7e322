//! Output buffers of the stack builder.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};

use super::layout::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};
use super::source::SourceMesh;

/// Interleaved vertex read by the stacked-text shader.
///
/// The shader reads `(dilate, softness)` from `uv3` at location
/// [`StackVertex::EDGE_PARAMS_LOCATION`], `x` being dilate and `y` softness.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct StackVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub uv0: [f32; 2],
    pub uv1: [f32; 2],
    pub uv3: [f32; 2],
}

impl StackVertex {
    pub const EDGE_PARAMS_LOCATION: u32 = 4;

    pub fn layout() -> VertexBufferLayout {
        VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: VertexStepMode::Vertex,
            attributes: vec![
                VertexAttribute {
                    location: 0,
                    format: VertexFormat::Float32x3,
                    offset: 0,
                },
                VertexAttribute {
                    location: 1,
                    format: VertexFormat::Float32x4,
                    offset: 12,
                },
                VertexAttribute {
                    location: 2,
                    format: VertexFormat::Float32x2,
                    offset: 28,
                },
                VertexAttribute {
                    location: 3,
                    format: VertexFormat::Float32x2,
                    offset: 36,
                },
                VertexAttribute {
                    location: Self::EDGE_PARAMS_LOCATION,
                    format: VertexFormat::Float32x2,
                    offset: 44,
                },
            ],
        }
    }
}

/// Which part of the effect a block of vertices belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayerKind {
    /// Sub-layer of a stack configuration.
    Stack {
        /// Index of the configuration in declaration order.
        config: usize,
        /// 1-based sub-layer number.
        sub_layer: u32,
        /// Interpolation parameter used for color and offset.
        t: f32,
    },
    /// The unshifted text drawn in front of every stack.
    Main,
}

/// Vertex and index range of one layer inside a [`CombinedMesh`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerRange {
    pub kind: LayerKind,
    pub first_vertex: usize,
    pub vertex_count: usize,
    pub first_index: usize,
    pub index_count: usize,
    pub offset: Vec2,
}

/// All layers of the effect in draw order, back to front.
#[derive(Debug, Clone, Default)]
pub struct CombinedMesh {
    positions: Vec<Vec3>,
    colors: Vec<Vec4>,
    uv0: Vec<Vec2>,
    uv1: Vec<Vec2>,
    uv3: Vec<Vec2>,
    indices: Vec<u32>,
    layers: Vec<LayerRange>,
}

impl CombinedMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> &[Vec4] {
        &self.colors
    }

    pub fn uv0(&self) -> &[Vec2] {
        &self.uv0
    }

    pub fn uv1(&self) -> &[Vec2] {
        &self.uv1
    }

    /// Edge parameters `(dilate, softness)` per vertex.
    pub fn uv3(&self) -> &[Vec2] {
        &self.uv3
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn layers(&self) -> &[LayerRange] {
        &self.layers
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of vertices the buffers can hold without reallocating.
    pub fn vertex_capacity(&self) -> usize {
        self.positions
            .capacity()
            .min(self.colors.capacity())
            .min(self.uv0.capacity())
            .min(self.uv1.capacity())
            .min(self.uv3.capacity())
    }

    pub fn index_capacity(&self) -> usize {
        self.indices.capacity()
    }

    /// Clear all buffers, keeping their allocations, and make sure they can
    /// hold the given counts.
    pub(crate) fn reset(&mut self, vertex_count: usize, index_count: usize, layer_count: usize) {
        self.positions.clear();
        self.colors.clear();
        self.uv0.clear();
        self.uv1.clear();
        self.uv3.clear();
        self.indices.clear();
        self.layers.clear();

        self.positions.reserve(vertex_count);
        self.colors.reserve(vertex_count);
        self.uv0.reserve(vertex_count);
        self.uv1.reserve(vertex_count);
        self.uv3.reserve(vertex_count);
        self.indices.reserve(index_count);
        self.layers.reserve(layer_count);
    }

    /// Append a copy of `source` translated by `offset`.
    ///
    /// `color` replaces every vertex color when set; otherwise the source
    /// colors are kept.
    pub(crate) fn push_layer(
        &mut self,
        source: &SourceMesh,
        kind: LayerKind,
        offset: Vec2,
        color: Option<Vec4>,
        edge_params: Vec2,
    ) {
        let first_vertex = self.positions.len();
        let first_index = self.indices.len();
        let shift = offset.extend(0.0);

        self.positions.extend(source.positions.iter().map(|p| *p + shift));
        match color {
            Some(color) => self
                .colors
                .extend(std::iter::repeat(color).take(source.vertex_count())),
            None => self.colors.extend_from_slice(&source.colors),
        }
        self.uv0.extend_from_slice(&source.uv0);
        self.uv1.extend_from_slice(&source.uv1);
        self.uv3
            .extend(std::iter::repeat(edge_params).take(source.vertex_count()));

        let base = first_vertex as u32;
        self.indices.extend(source.indices.iter().map(|i| i + base));

        self.layers.push(LayerRange {
            kind,
            first_vertex,
            vertex_count: source.vertex_count(),
            first_index,
            index_count: source.index_count(),
            offset,
        });
    }

    /// Interleave the streams into `out`, replacing its contents.
    pub fn write_vertices(&self, out: &mut Vec<StackVertex>) {
        out.clear();
        out.reserve(self.vertex_count());
        for i in 0..self.vertex_count() {
            out.push(StackVertex {
                position: self.positions[i].to_array(),
                color: self.colors[i].to_array(),
                uv0: self.uv0[i].to_array(),
                uv1: self.uv1[i].to_array(),
                uv3: self.uv3[i].to_array(),
            });
        }
    }

    /// Get index data as bytes
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
