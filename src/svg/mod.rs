//! SVG import: vector-path files → ordered path shapes → leaf mobjects.
//!
//! This is the parser side of the TeX pipeline. The renderer (`tex::engine`) produces an SVG
//! file; this module turns it into one `PathShape` per `<path>` in document order, which the
//! shape builder tessellates into leaf `Mobject2D`s.
//!
//! Conventions:
//! - Each path's absolute transform (including `<use>` placement, resolved by usvg) is baked
//!   into its points, so every shape lives in one shared coordinate space.
//! - SVG is y-down; points are flipped to y-up to match `scene`.
//! - Images and text nodes are skipped (dvisvgm is run with `--no-fonts`, so glyphs arrive
//!   as paths).

pub mod tessellate;

use std::path::Path as FsPath;

use lyon::math::point as lyon_point;
use lyon::path::Path;
use usvg::tiny_skia_path::{PathSegment, Transform};

use crate::scene::{Mesh2D, Mobject2D, Rgba};
use crate::tex::TexError;
use tessellate::GlyphTessellator;

/// One vector path from an SVG document.
#[derive(Debug, Clone)]
pub struct PathShape {
    /// Outline in scene orientation (y-up), SVG user units.
    pub path: Path,
    /// Solid fill, if the SVG specified one.
    pub fill: Option<Rgba>,
    /// All end/control points of the outline; bounds fallback for degenerate paths.
    pub points: Vec<[f32; 2]>,
}

impl PathShape {
    /// Tessellate into a leaf mobject.
    ///
    /// A path that tessellates to no triangles (e.g. a zero-width rule) keeps its points as
    /// an undrawn point set so it still takes part in layout.
    pub fn to_leaf(&self, tess: &mut GlyphTessellator) -> Result<Mobject2D, TexError> {
        let mut mesh = tess.tessellate(&self.path)?;
        if mesh.positions.is_empty() {
            mesh = Mesh2D {
                positions: self.points.clone(),
                indices: Vec::new(),
            };
        }

        Ok(Mobject2D::new("glyph")
            .with_mesh(mesh)
            .with_fill(self.fill.unwrap_or(Rgba::WHITE)))
    }
}

/// Parse an SVG file into path shapes, in document order.
pub fn parse_svg_file(path: &FsPath) -> Result<Vec<PathShape>, TexError> {
    let data = std::fs::read(path)?;
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(&data, &opts)?;
    let shapes = collect_tree(&tree);
    log::debug!("svg: parsed {} path(s) from {}", shapes.len(), path.display());
    Ok(shapes)
}

/// Parse SVG text into path shapes, in document order.
pub fn parse_svg_str(svg: &str) -> Result<Vec<PathShape>, TexError> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &opts)?;
    Ok(collect_tree(&tree))
}

fn collect_tree(tree: &usvg::Tree) -> Vec<PathShape> {
    let mut out = Vec::new();
    walk_group(tree.root(), &mut out);
    out
}

fn walk_group(group: &usvg::Group, out: &mut Vec<PathShape>) {
    for node in group.children() {
        match node {
            usvg::Node::Group(child) => walk_group(child, out),
            usvg::Node::Path(path) => {
                if !path.is_visible() {
                    continue;
                }
                out.push(convert_path(path));
            }
            usvg::Node::Image(_) => {
                log::warn!("svg: skipping embedded image node");
            }
            usvg::Node::Text(_) => {
                log::warn!("svg: skipping text node (expected outlined glyphs)");
            }
        }
    }
}

fn convert_path(path: &usvg::Path) -> PathShape {
    let xf = path.abs_transform();
    let map = |p: usvg::tiny_skia_path::Point| map_point(xf, p.x, p.y);

    let mut b = Path::builder();
    let mut points = Vec::new();
    let mut started = false;

    for segment in path.data().segments() {
        match segment {
            PathSegment::MoveTo(p) => {
                if started {
                    b.close();
                }
                let p = map(p);
                points.push(p);
                b.begin(lyon_point(p[0], p[1]));
                started = true;
            }
            PathSegment::LineTo(p) => {
                let p = map(p);
                if !started {
                    b.begin(lyon_point(p[0], p[1]));
                    started = true;
                }
                points.push(p);
                b.line_to(lyon_point(p[0], p[1]));
            }
            PathSegment::QuadTo(p1, p) => {
                let (p1, p) = (map(p1), map(p));
                if !started {
                    b.begin(lyon_point(p1[0], p1[1]));
                    started = true;
                }
                points.extend([p1, p]);
                b.quadratic_bezier_to(lyon_point(p1[0], p1[1]), lyon_point(p[0], p[1]));
            }
            PathSegment::CubicTo(p1, p2, p) => {
                let (p1, p2, p) = (map(p1), map(p2), map(p));
                if !started {
                    b.begin(lyon_point(p1[0], p1[1]));
                    started = true;
                }
                points.extend([p1, p2, p]);
                b.cubic_bezier_to(
                    lyon_point(p1[0], p1[1]),
                    lyon_point(p2[0], p2[1]),
                    lyon_point(p[0], p[1]),
                );
            }
            PathSegment::Close => {
                if started {
                    b.close();
                    started = false;
                }
            }
        }
    }

    if started {
        b.close();
    }

    PathShape {
        path: b.build(),
        fill: path.fill().and_then(fill_to_rgba),
        points,
    }
}

/// Apply the SVG absolute transform, then flip y.
#[inline]
fn map_point(xf: Transform, x: f32, y: f32) -> [f32; 2] {
    let nx = xf.sx * x + xf.kx * y + xf.tx;
    let ny = xf.ky * x + xf.sy * y + xf.ty;
    [nx, -ny]
}

fn fill_to_rgba(fill: &usvg::Fill) -> Option<Rgba> {
    match fill.paint() {
        usvg::Paint::Color(c) => Some(
            Rgba::from_rgb8(c.red, c.green, c.blue).with_alpha(fill.opacity().get()),
        ),
        _ => None,
    }
}
