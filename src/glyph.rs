//! Per-character glyph data and a simple monospace glyph layout.
//!
//! Real text shaping lives outside this crate. [`GlyphLayout`] produces the
//! same shape of data a shaper hands over (one quad per visible character,
//! plus [`CharacterInfo`] records) and is used by the demo, tests and
//! benchmarks.

use glam::{Vec2, Vec3, Vec4};

use crate::color::WHITE;
use crate::mesh::SourceMesh;

/// Number of vertices in a glyph quad.
pub const VERTICES_PER_QUAD: usize = 4;

/// Triangle list for one quad, relative to its first vertex.
///
/// Corner order is baseline-left, top-left, top-right, baseline-right.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// What the text shaper reports about one character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterInfo {
    pub character: char,
    /// Whether the character has a quad in the glyph mesh.
    pub visible: bool,
    /// Index of the quad's first vertex.
    pub vertex_index: u32,
    /// Baseline height of the character's line.
    pub baseline: f32,
    /// Atlas / material the quad belongs to.
    pub material_index: u32,
}

/// Output of [`GlyphLayout::layout`].
#[derive(Debug, Clone, Default)]
pub struct TextLayout {
    pub mesh: SourceMesh,
    pub characters: Vec<CharacterInfo>,
}

/// Fixed-advance glyph layout on the XY plane, growing right and down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphLayout {
    /// Horizontal distance between character origins.
    pub advance: f32,
    /// Width of each glyph quad, centered in its advance cell.
    pub glyph_width: f32,
    /// Height of each glyph quad above the baseline.
    pub ascent: f32,
    /// Vertical distance between baselines.
    pub line_height: f32,
    /// Baseline-left of the first character.
    pub origin: Vec2,
    /// Vertex color of every glyph.
    pub color: Vec4,
    /// Atlas cells per row used for uv0 lookup.
    pub atlas_columns: u32,
}

impl Default for GlyphLayout {
    fn default() -> Self {
        Self {
            advance: 10.0,
            glyph_width: 8.0,
            ascent: 12.0,
            line_height: 16.0,
            origin: Vec2::ZERO,
            color: WHITE,
            atlas_columns: 16,
        }
    }
}

impl GlyphLayout {
    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    /// Lay out `text`, one quad per non-whitespace character.
    pub fn layout(&self, text: &str) -> TextLayout {
        let mut out = TextLayout::default();
        let bearing = (self.advance - self.glyph_width) * 0.5;
        let columns = self.atlas_columns.max(1);
        let cell = 1.0 / columns as f32;

        let mut pen = self.origin;
        for character in text.chars() {
            if character == '\n' {
                out.characters.push(CharacterInfo {
                    character,
                    visible: false,
                    vertex_index: out.mesh.vertex_count() as u32,
                    baseline: pen.y,
                    material_index: 0,
                });
                pen.x = self.origin.x;
                pen.y -= self.line_height;
                continue;
            }

            let visible = !character.is_whitespace();
            let vertex_index = out.mesh.vertex_count() as u32;
            out.characters.push(CharacterInfo {
                character,
                visible,
                vertex_index,
                baseline: pen.y,
                material_index: 0,
            });

            if visible {
                let left = pen.x + bearing;
                let right = left + self.glyph_width;
                let bottom = pen.y;
                let top = pen.y + self.ascent;

                let code = character as u32 % (columns * columns);
                let u = (code % columns) as f32 * cell;
                let v = (code / columns) as f32 * cell;

                let corners = [
                    (Vec3::new(left, bottom, 0.0), Vec2::new(u, v + cell)),
                    (Vec3::new(left, top, 0.0), Vec2::new(u, v)),
                    (Vec3::new(right, top, 0.0), Vec2::new(u + cell, v)),
                    (Vec3::new(right, bottom, 0.0), Vec2::new(u + cell, v + cell)),
                ];
                for (position, uv) in corners {
                    out.mesh.positions.push(position);
                    out.mesh.colors.push(self.color);
                    out.mesh.uv0.push(uv);
                    out.mesh.uv1.push(Vec2::new(pen.x - self.origin.x, 0.0));
                }
                out.mesh.indices.extend(QUAD_INDICES.iter().map(|i| vertex_index + i));
            }

            pen.x += self.advance;
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_quad_per_visible_character() {
        let layout = GlyphLayout::default().layout("AB C");
        assert_eq!(layout.characters.len(), 4);
        assert_eq!(layout.mesh.vertex_count(), 12);
        assert_eq!(layout.mesh.indices.len(), 18);
        assert!(!layout.characters[2].visible);
        assert_eq!(layout.characters[3].vertex_index, 8);
        assert!(layout.mesh.validate().is_ok());
    }

    #[test]
    fn quads_are_centered_in_cells() {
        let layout = GlyphLayout::default().layout("A");
        let p = &layout.mesh.positions;
        assert_eq!(p[0], Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(p[1], Vec3::new(1.0, 12.0, 0.0));
        assert_eq!(p[2], Vec3::new(9.0, 12.0, 0.0));
        assert_eq!(p[3], Vec3::new(9.0, 0.0, 0.0));
    }

    #[test]
    fn origin_and_color_are_applied() {
        let red = Vec4::new(1.0, 0.0, 0.0, 1.0);
        let layout = GlyphLayout::default()
            .with_origin(Vec2::new(20.0, 5.0))
            .with_color(red)
            .layout("AB\nC");
        let p = &layout.mesh.positions;
        assert_eq!(p[0], Vec3::new(21.0, 5.0, 0.0));
        assert_eq!(layout.characters[0].baseline, 5.0);
        // uv1 measures the pen position from the line start.
        assert_eq!(layout.mesh.uv1[4], Vec2::new(10.0, 0.0));
        // New lines restart at the origin column.
        assert_eq!(p[8], Vec3::new(21.0, -11.0, 0.0));
        assert!(layout.mesh.colors.iter().all(|c| *c == red));
    }

    #[test]
    fn newline_moves_baseline_down() {
        let layout = GlyphLayout::default().layout("A\nB");
        assert_eq!(layout.characters[0].baseline, 0.0);
        assert_eq!(layout.characters[2].baseline, -16.0);
        assert_eq!(layout.mesh.positions[4].x, 1.0);
    }

    #[test]
    fn whitespace_only_text_is_empty() {
        let layout = GlyphLayout::default().layout("  \n ");
        assert!(layout.mesh.is_empty());
        assert!(layout.characters.iter().all(|c| !c.visible));
    }
}
