//! Single-string shape building: normalize → render → parse → leaves.

use crate::scene::{Aabb2, Affine2, Mobject2D, Rgba};
use crate::svg::{self, tessellate::{GlyphTessellator, TessellateOptions}};
use crate::tex::engine::TexRenderer;
use crate::tex::normalize::normalize;
use crate::tex::{TexConfig, TexError, TexKind};

/// Scale from SVG points (dvisvgm output) to world units when no height is requested.
pub const TEX_MOB_SCALE_FACTOR: f32 = 0.05;

/// The options a single-string render understands.
///
/// Built from a `TexConfig` with `TryFrom`, which validates the values it carries over.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleStringConfig {
    pub alignment: String,
    pub kind: TexKind,
    pub should_center: bool,
    pub height: Option<f32>,
    pub fill: Rgba,
    pub fill_opacity: f32,
    pub organize_left_to_right: bool,
    pub tolerance: f32,
}

impl Default for SingleStringConfig {
    fn default() -> Self {
        Self {
            alignment: String::new(),
            kind: TexKind::Formula,
            should_center: true,
            height: None,
            fill: Rgba::WHITE,
            fill_opacity: 1.0,
            organize_left_to_right: false,
            tolerance: 0.02,
        }
    }
}

impl TryFrom<&TexConfig> for SingleStringConfig {
    type Error = TexError;

    fn try_from(config: &TexConfig) -> Result<Self, TexError> {
        config.validate()?;
        Ok(Self {
            alignment: config.alignment.clone(),
            kind: config.kind,
            should_center: config.should_center,
            height: config.height,
            fill: config.fill,
            fill_opacity: config.fill_opacity,
            organize_left_to_right: config.organize_left_to_right,
            tolerance: config.tolerance,
        })
    }
}

/// One rendered string: its leaves in render order, post-processed.
#[derive(Debug, Clone)]
pub struct SingleStringTex {
    pub tex: String,
    pub leaves: Vec<Mobject2D>,
}

impl SingleStringTex {
    pub fn bounds(&self) -> Aabb2 {
        self.leaves
            .iter()
            .fold(Aabb2::empty(), |acc, leaf| acc.union(leaf.bounds()))
    }
}

/// Renders markup through a `TexRenderer` and parses the result into leaf shapes.
#[derive(Debug, Clone)]
pub struct ShapeBuilder<R> {
    renderer: R,
}

impl<R: TexRenderer> ShapeBuilder<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Render `markup` and return one leaf per vector path, in render order.
    ///
    /// Leaves are in raw SVG units (y flipped); no centering or scaling.
    pub fn build(
        &self,
        markup: &str,
        alignment: &str,
        kind: TexKind,
        tolerance: f32,
    ) -> Result<Vec<Mobject2D>, TexError> {
        let normalized = normalize(markup, alignment);
        let file = self.renderer.render(&normalized, kind)?;
        let mut tess = GlyphTessellator::new(TessellateOptions {
            tolerance,
            ..Default::default()
        });
        svg::parse_svg_file(&file)?
            .iter()
            .map(|shape| shape.to_leaf(&mut tess))
            .collect()
    }

    /// Number of leaves `build(markup, "", kind, _)` would return, without tessellating.
    pub fn count(&self, markup: &str, kind: TexKind) -> Result<usize, TexError> {
        let normalized = normalize(markup, "");
        let file = self.renderer.render(&normalized, kind)?;
        Ok(svg::parse_svg_file(&file)?.len())
    }

    /// Build and post-process a whole string: center, scale, color, optional x-sort.
    pub fn build_single(
        &self,
        tex: &str,
        config: &SingleStringConfig,
    ) -> Result<SingleStringTex, TexError> {
        let mut single = SingleStringTex {
            tex: tex.to_string(),
            leaves: self.build(tex, &config.alignment, config.kind, config.tolerance)?,
        };
        post_process(&mut single, config);
        log::debug!(
            "tex: built {:?} into {} leaf shape(s)",
            single.tex,
            single.leaves.len()
        );
        Ok(single)
    }
}

fn post_process(single: &mut SingleStringTex, config: &SingleStringConfig) {
    let bounds = single.bounds();

    let mut xf = Affine2::IDENTITY;
    let mut about = bounds.center();
    if config.should_center {
        xf = Affine2::translate(-about[0], -about[1]);
        about = [0.0, 0.0];
    }

    let factor = match config.height {
        Some(height) if bounds.height() > f32::EPSILON => height / bounds.height(),
        Some(_) => 1.0,
        None => TEX_MOB_SCALE_FACTOR,
    };
    xf = Affine2::scale_about(factor, about).mul(xf);

    let fill = config.fill.with_alpha(config.fill_opacity);
    for leaf in &mut single.leaves {
        leaf.apply_transform(xf);
        leaf.set_color(fill);
        leaf.set_fill_opacity(fill.a);
    }

    if config.organize_left_to_right {
        sort_left_to_right(&mut single.leaves);
    }
}

/// Stable-sort mobjects by the x coordinate of their centers.
pub fn sort_left_to_right(mobjects: &mut [Mobject2D]) {
    mobjects.sort_by(|a, b| {
        a.bounds().center()[0]
            .total_cmp(&b.bounds().center()[0])
    });
}
