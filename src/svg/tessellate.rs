//! Glyph outline tessellation.
//!
//! dvisvgm emits every glyph as a closed outline; `GlyphTessellator` fills each one into a
//! `Mesh2D` with lyon's `FillTessellator`. One tessellator is meant to be reused across all
//! paths of a document so the tessellator state and output buffers are allocated once.
//!
//! Winding matters: TeX fonts are drawn for non-zero winding, which is the default here.

use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, FillVertexConstructor,
    VertexBuffers,
};

use crate::scene::Mesh2D;
use crate::tex::TexError;

/// - `tolerance`: max distance between a curve and its flattening, in SVG units.
/// - `fill_rule`: NonZero for TeX glyphs.
#[derive(Debug, Copy, Clone)]
pub struct TessellateOptions {
    pub tolerance: f32,
    pub fill_rule: FillRule,
}

impl Default for TessellateOptions {
    fn default() -> Self {
        Self {
            tolerance: 0.02,
            fill_rule: FillRule::NonZero,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlyphVertex {
    pub position: [f32; 2],
}

struct GlyphVertexCtor;

impl FillVertexConstructor<GlyphVertex> for GlyphVertexCtor {
    fn new_vertex(&mut self, v: FillVertex) -> GlyphVertex {
        GlyphVertex {
            position: v.position().to_array(),
        }
    }
}

pub struct GlyphTessellator {
    fill: FillOptions,
    tess: FillTessellator,
    buffers: VertexBuffers<GlyphVertex, u16>,
}

impl GlyphTessellator {
    pub fn new(opts: TessellateOptions) -> Self {
        Self {
            fill: FillOptions::tolerance(opts.tolerance).with_fill_rule(opts.fill_rule),
            tess: FillTessellator::new(),
            buffers: VertexBuffers::new(),
        }
    }

    /// Fill one outline. A path without area gives an empty mesh.
    pub fn tessellate(&mut self, path: &Path) -> Result<Mesh2D, TexError> {
        self.buffers.vertices.clear();
        self.buffers.indices.clear();

        self.tess
            .tessellate_path(
                path,
                &self.fill,
                &mut BuffersBuilder::new(&mut self.buffers, GlyphVertexCtor),
            )
            .map_err(|e| TexError::Tessellation(format!("{e:?}")))?;

        Ok(Mesh2D {
            positions: bytemuck::cast_slice::<GlyphVertex, [f32; 2]>(&self.buffers.vertices)
                .to_vec(),
            indices: self.buffers.indices.clone(),
        })
    }
}

impl Default for GlyphTessellator {
    fn default() -> Self {
        Self::new(TessellateOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyon::math::point;

    fn rect_path(x: f32, w: f32, h: f32) -> Path {
        let mut b = Path::builder();
        b.begin(point(x, 0.0));
        b.line_to(point(x + w, 0.0));
        b.line_to(point(x + w, h));
        b.line_to(point(x, h));
        b.close();
        b.build()
    }

    #[test]
    fn rectangle_becomes_two_triangles() {
        let mesh = GlyphTessellator::default()
            .tessellate(&rect_path(0.0, 2.0, 1.0))
            .unwrap();
        assert_eq!(mesh.indices.len(), 6);
        assert!(mesh.positions.iter().all(|p| p[0] >= 0.0 && p[0] <= 2.0));
    }

    #[test]
    fn reuse_does_not_leak_previous_output() {
        let mut tess = GlyphTessellator::default();
        tess.tessellate(&rect_path(0.0, 1.0, 1.0)).unwrap();
        let second = tess.tessellate(&rect_path(5.0, 1.0, 1.0)).unwrap();
        assert_eq!(second.indices.len(), 6);
        assert!(second.positions.iter().all(|p| p[0] >= 5.0));
    }

    #[test]
    fn empty_path_yields_empty_mesh() {
        let path = Path::builder().build();
        let mesh = GlyphTessellator::default().tessellate(&path).unwrap();
        assert!(!mesh.is_drawable());
    }
}
