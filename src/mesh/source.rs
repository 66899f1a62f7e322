//! The flat glyph mesh consumed by the stack builder.

use glam::{Vec2, Vec3, Vec4};

use crate::error::{StackError, StackResult};

/// Glyph mesh as handed over by text shaping: parallel vertex streams plus
/// a triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceMesh {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Vec4>,
    pub uv0: Vec<Vec2>,
    pub uv1: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl SourceMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Check stream lengths and index bounds.
    pub fn validate(&self) -> StackResult<()> {
        let count = self.positions.len();
        for (name, len) in [
            ("colors", self.colors.len()),
            ("uv0", self.uv0.len()),
            ("uv1", self.uv1.len()),
        ] {
            if len != count {
                return Err(StackError::MalformedSource(format!(
                    "{} has {} entries, expected {}",
                    name, len, count
                )));
            }
        }
        if self.indices.len() % 3 != 0 {
            return Err(StackError::MalformedSource(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }
        if let Some(&bad) = self.indices.iter().find(|&&i| i as usize >= count) {
            return Err(StackError::MalformedSource(format!(
                "index {} out of range for {} vertices",
                bad, count
            )));
        }
        Ok(())
    }

    /// Copy `other` into `self`, reusing existing allocations.
    pub fn copy_from(&mut self, other: &SourceMesh) {
        self.positions.clone_from(&other.positions);
        self.colors.clone_from(&other.colors);
        self.uv0.clone_from(&other.uv0);
        self.uv1.clone_from(&other.uv1);
        self.indices.clone_from(&other.indices);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> SourceMesh {
        SourceMesh {
            positions: vec![Vec3::ZERO; 4],
            colors: vec![Vec4::ONE; 4],
            uv0: vec![Vec2::ZERO; 4],
            uv1: vec![Vec2::ZERO; 4],
            indices: vec![0, 1, 2, 2, 3, 0],
        }
    }

    #[test]
    fn valid_quad() {
        let mesh = quad();
        assert!(mesh.validate().is_ok());
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn mismatched_streams_are_rejected() {
        let mut mesh = quad();
        mesh.uv1.pop();
        assert!(matches!(mesh.validate(), Err(StackError::MalformedSource(_))));
    }

    #[test]
    fn partial_triangle_is_rejected() {
        let mut mesh = quad();
        mesh.indices.push(1);
        assert!(matches!(mesh.validate(), Err(StackError::MalformedSource(_))));
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut mesh = quad();
        mesh.indices[4] = 4;
        assert!(matches!(mesh.validate(), Err(StackError::MalformedSource(_))));
    }

    #[test]
    fn copy_from_keeps_capacity() {
        let mut target = SourceMesh::new();
        target.positions.reserve(64);
        let capacity = target.positions.capacity();
        target.copy_from(&quad());
        assert_eq!(target, quad());
        assert_eq!(target.positions.capacity(), capacity);
    }
}
