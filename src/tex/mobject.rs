//! `TexObject`: a formula or text whose parts can be addressed by substring.
//!
//! Construction runs the whole pipeline:
//! 1. segment the caller's strings around `substrings_to_isolate` and the color-map keys,
//! 2. join them with `arg_separator` and render the result once (centered, scaled, colored),
//! 3. measure every segment and partition the render into groups,
//! 4. apply `tex_to_color_map`, then optionally sort the groups left to right.
//!
//! Layout methods act on all groups at once; the query methods forward to
//! `ExpressionTree`. Mutators return `&mut Self` so calls chain.

use crate::scene::{Aabb2, Affine2, Mobject2D, ORIGIN, Rgba, next_to_delta, to_edge_delta};
use crate::tex::assemble::{ExpressionTree, SubstringGroup, assemble};
use crate::tex::builder::{ShapeBuilder, SingleStringConfig};
use crate::tex::engine::TexRenderer;
use crate::tex::query::{ColorKey, ColorMap, MatchOptions};
use crate::tex::segment::segment;
use crate::tex::{TexError, TexKind};

/// Options recognized when building a `TexObject`.
///
/// `formula()` (the default) mirrors display math; `prose()` mirrors centered text mode.
#[derive(Debug, Clone, PartialEq)]
pub struct TexConfig {
    /// Prepended to the whole expression before rendering (e.g. `\centering`).
    pub alignment: String,
    /// Joins the caller's strings. A single space also trims every segment.
    pub arg_separator: String,
    pub kind: TexKind,
    pub substrings_to_isolate: Vec<String>,
    pub tex_to_color_map: ColorMap,
    pub organize_left_to_right: bool,
    pub should_center: bool,
    /// Target height in world units; `None` scales by `TEX_MOB_SCALE_FACTOR`.
    pub height: Option<f32>,
    pub fill: Rgba,
    pub fill_opacity: f32,
    /// Flattening tolerance for glyph tessellation, in SVG units.
    pub tolerance: f32,
}

impl Default for TexConfig {
    fn default() -> Self {
        Self::formula()
    }
}

impl TexConfig {
    pub fn formula() -> Self {
        Self {
            alignment: String::new(),
            arg_separator: " ".to_string(),
            kind: TexKind::Formula,
            substrings_to_isolate: Vec::new(),
            tex_to_color_map: ColorMap::new(),
            organize_left_to_right: false,
            should_center: true,
            height: None,
            fill: Rgba::WHITE,
            fill_opacity: 1.0,
            tolerance: 0.02,
        }
    }

    pub fn prose() -> Self {
        Self {
            alignment: "\\centering".to_string(),
            arg_separator: String::new(),
            kind: TexKind::Prose,
            ..Self::formula()
        }
    }

    pub fn isolate<I>(mut self, substrings: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.substrings_to_isolate
            .extend(substrings.into_iter().map(Into::into));
        self
    }

    pub fn color<K>(mut self, key: K, color: Rgba) -> Result<Self, TexError>
    where
        K: TryInto<ColorKey, Error = TexError>,
    {
        self.tex_to_color_map.insert(key.try_into()?, color);
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), TexError> {
        if let Some(height) = self.height {
            if !height.is_finite() || height <= 0.0 {
                return Err(TexError::InvalidConfig(format!(
                    "height must be positive and finite, got {height}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.fill_opacity) {
            return Err(TexError::InvalidConfig(format!(
                "fill_opacity must be within [0, 1], got {}",
                self.fill_opacity
            )));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(TexError::InvalidConfig(format!(
                "tolerance must be positive and finite, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// A rendered expression split into substring groups.
#[derive(Debug, Clone)]
pub struct TexObject {
    tex_strings: Vec<String>,
    tex_string: String,
    config: TexConfig,
    tree: ExpressionTree,
}

impl TexObject {
    pub fn new<R, S>(
        builder: &ShapeBuilder<R>,
        strings: &[S],
        config: TexConfig,
    ) -> Result<Self, TexError>
    where
        R: TexRenderer,
        S: AsRef<str>,
    {
        let single = SingleStringConfig::try_from(&config)?;

        let tex_strings = segment(
            strings,
            &config.substrings_to_isolate,
            &config.tex_to_color_map.keys(),
            &config.arg_separator,
        )?;
        let tex_string = tex_strings.join(&config.arg_separator);
        let tree = assemble(builder, &tex_string, &tex_strings, &single)?;

        let mut object = Self {
            tex_strings,
            tex_string,
            config,
            tree,
        };
        object
            .tree
            .recolor_by_map(&object.config.tex_to_color_map, MatchOptions::default());
        if object.config.organize_left_to_right {
            object.tree.sort_left_to_right();
        }

        log::debug!(
            "tex: {:?} assembled into {} part(s)",
            object.tex_string,
            object.tree.len()
        );
        Ok(object)
    }

    /// The segmented strings, one per part.
    pub fn tex_strings(&self) -> &[String] {
        &self.tex_strings
    }

    /// The joined expression that was rendered.
    pub fn tex_string(&self) -> &str {
        &self.tex_string
    }

    pub fn config(&self) -> &TexConfig {
        &self.config
    }

    pub fn tree(&self) -> &ExpressionTree {
        &self.tree
    }

    pub fn groups(&self) -> &[SubstringGroup] {
        self.tree.groups()
    }

    pub fn part_mut(&mut self, index: usize) -> Option<&mut SubstringGroup> {
        self.tree.groups_mut().get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn bounds(&self) -> Aabb2 {
        self.tree.bounds()
    }

    fn apply_transform(&mut self, xf: Affine2) -> &mut Self {
        for group in self.tree.groups_mut() {
            group.node_mut().apply_transform(xf);
        }
        self
    }

    pub fn shift(&mut self, delta: [f32; 2]) -> &mut Self {
        self.apply_transform(Affine2::translate(delta[0], delta[1]))
    }

    /// Uniform scale about the center of the whole expression.
    pub fn scale(&mut self, factor: f32) -> &mut Self {
        let about = self.bounds().center();
        self.apply_transform(Affine2::scale_about(factor, about))
    }

    pub fn move_to(&mut self, target: [f32; 2], aligned_edge: [f32; 2]) -> &mut Self {
        let from = self.bounds().critical_point(aligned_edge);
        self.shift([target[0] - from[0], target[1] - from[1]])
    }

    pub fn center(&mut self) -> &mut Self {
        self.move_to(ORIGIN, ORIGIN)
    }

    pub fn next_to(
        &mut self,
        target: Aabb2,
        direction: [f32; 2],
        buff: f32,
        aligned_edge: [f32; 2],
    ) -> &mut Self {
        let delta = next_to_delta(self.bounds(), target, direction, buff, aligned_edge);
        self.shift(delta)
    }

    pub fn to_edge(&mut self, edge: [f32; 2], buff: f32) -> &mut Self {
        let delta = to_edge_delta(self.bounds(), edge, buff);
        self.shift(delta)
    }

    /// Lay the parts out one after another in `direction`.
    pub fn arrange(&mut self, direction: [f32; 2], buff: f32, aligned_edge: [f32; 2]) -> &mut Self {
        let groups = self.tree.groups_mut();
        for i in 1..groups.len() {
            let prev = groups[i - 1].bounds();
            let delta = next_to_delta(groups[i].bounds(), prev, direction, buff, aligned_edge);
            groups[i].node_mut().shift(delta);
        }
        self
    }

    pub fn set_color(&mut self, color: Rgba) -> &mut Self {
        for group in self.tree.groups_mut() {
            group.node_mut().set_color(color);
        }
        self
    }

    pub fn set_fill_opacity(&mut self, opacity: f32) -> &mut Self {
        for group in self.tree.groups_mut() {
            group.node_mut().set_fill_opacity(opacity);
        }
        self
    }

    pub fn get_parts_by_tex(&self, tex: &str, opts: MatchOptions) -> Vec<&SubstringGroup> {
        self.tree.find(tex, opts)
    }

    pub fn get_part_by_tex(&self, tex: &str, opts: MatchOptions) -> Option<&SubstringGroup> {
        self.tree.find_one(tex, opts)
    }

    pub fn part_by_tex(&self, tex: &str, opts: MatchOptions) -> Result<&SubstringGroup, TexError> {
        self.tree.get_one(tex, opts)
    }

    pub fn set_color_by_tex(&mut self, tex: &str, color: Rgba, opts: MatchOptions) -> &mut Self {
        self.tree.recolor_by(tex, color, opts);
        self
    }

    pub fn set_color_by_tex_to_color_map(
        &mut self,
        map: &ColorMap,
        opts: MatchOptions,
    ) -> &mut Self {
        self.tree.recolor_by_map(map, opts);
        self
    }

    pub fn index_of_part(&self, part: &SubstringGroup) -> Result<usize, TexError> {
        self.tree.index_of(part.id())
    }

    pub fn index_of_part_by_tex(&self, tex: &str, opts: MatchOptions) -> Result<usize, TexError> {
        self.tree.index_of_tex(tex, opts)
    }

    pub fn sort_alphabetically(&mut self) -> &mut Self {
        self.tree.sort_alphabetically();
        self
    }

    /// Root node named after the expression; one child per part, leaves below.
    pub fn into_mobject(self) -> Mobject2D {
        let children = self
            .tree
            .into_groups()
            .into_iter()
            .map(SubstringGroup::into_mobject)
            .collect();
        Mobject2D::group(self.tex_string, children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_differ_in_alignment_separator_and_kind() {
        let formula = TexConfig::default();
        assert_eq!(formula.arg_separator, " ");
        assert_eq!(formula.kind, TexKind::Formula);

        let prose = TexConfig::prose();
        assert_eq!(prose.alignment, "\\centering");
        assert_eq!(prose.arg_separator, "");
        assert_eq!(prose.kind, TexKind::Prose);
    }

    #[test]
    fn validation_rejects_bad_values() {
        let bad_height = TexConfig {
            height: Some(0.0),
            ..TexConfig::formula()
        };
        let bad_opacity = TexConfig {
            fill_opacity: 1.5,
            ..TexConfig::formula()
        };
        let bad_tolerance = TexConfig {
            tolerance: f32::NAN,
            ..TexConfig::formula()
        };
        for config in [bad_height, bad_opacity, bad_tolerance] {
            assert!(matches!(config.validate(), Err(TexError::InvalidConfig(_))));
            assert!(SingleStringConfig::try_from(&config).is_err());
        }
        assert!(TexConfig::prose().validate().is_ok());
    }

    #[test]
    fn builder_methods_collect_isolation_and_colors() {
        let config = TexConfig::formula()
            .isolate(["x", "y"])
            .color("=", Rgba::YELLOW)
            .unwrap();
        assert_eq!(config.substrings_to_isolate, ["x", "y"]);
        assert_eq!(config.tex_to_color_map.keys(), ["="]);
        assert!(TexConfig::formula().color("", Rgba::RED).is_err());
    }
}
