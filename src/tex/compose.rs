//! Presentation helpers built by wrapping a `TexObject`.
//!
//! - `text`: a `TexObject` with the prose preset.
//! - `BulletedList`: one part per item, each with a dot to its left, stacked downward.
//! - `Title`: prose at the top edge of the frame with an optional underline.
//! - `PresetTex`: a fixed formula in a fixed color (`CHECKMARK`, `EXMARK`).

use crate::scene::{
    DOWN, FRAME_WIDTH, LEFT, MED_LARGE_BUFF, MED_SMALL_BUFF, Mobject2D, ORIGIN, Rgba, SMALL_BUFF,
    UP,
};
use crate::tex::TexError;
use crate::tex::builder::ShapeBuilder;
use crate::tex::engine::TexRenderer;
use crate::tex::mobject::{TexConfig, TexObject};
use crate::tex::query::MatchOptions;

/// Text-mode object: centered, separator `""`.
pub fn text<R, S>(builder: &ShapeBuilder<R>, strings: &[S]) -> Result<TexObject, TexError>
where
    R: TexRenderer,
    S: AsRef<str>,
{
    TexObject::new(builder, strings, TexConfig::prose())
}

#[derive(Debug, Clone)]
pub struct BulletOptions {
    /// Vertical gap between items.
    pub buff: f32,
    pub dot_scale_factor: f32,
    pub config: TexConfig,
}

impl Default for BulletOptions {
    fn default() -> Self {
        Self {
            buff: MED_LARGE_BUFF,
            dot_scale_factor: 2.0,
            config: TexConfig {
                alignment: String::new(),
                ..TexConfig::prose()
            },
        }
    }
}

/// Which part of a list to address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartSelector {
    Index(usize),
    /// First part whose tag contains this text.
    Tex(String),
}

impl From<usize> for PartSelector {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for PartSelector {
    fn from(tex: &str) -> Self {
        Self::Tex(tex.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct BulletedList {
    items: TexObject,
}

impl BulletedList {
    pub fn new<R, S>(
        builder: &ShapeBuilder<R>,
        items: &[S],
        opts: BulletOptions,
    ) -> Result<Self, TexError>
    where
        R: TexRenderer,
        S: AsRef<str>,
    {
        let lines: Vec<String> = items
            .iter()
            .map(|item| format!("{}\\\\", item.as_ref()))
            .collect();
        let mut list = TexObject::new(builder, &lines, opts.config)?;

        for index in 0..list.len() {
            let Some(part) = list.part_mut(index) else {
                continue;
            };
            let Some(anchor) = part.first_leaf_bounds() else {
                continue;
            };
            let mut dot = TexObject::new(builder, &["\\cdot"], TexConfig::formula())?;
            dot.scale(opts.dot_scale_factor)
                .next_to(anchor, LEFT, SMALL_BUFF, ORIGIN);
            part.add_to_back(dot.into_mobject());
        }

        list.arrange(DOWN, opts.buff, LEFT).center();
        Ok(Self { items: list })
    }

    pub fn items(&self) -> &TexObject {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut TexObject {
        &mut self.items
    }

    /// Full opacity for the selected part, `opacity` for every other one.
    pub fn fade_all_but(
        &mut self,
        selector: impl Into<PartSelector>,
        opacity: f32,
    ) -> Result<&mut Self, TexError> {
        let len = self.items.len();
        let keep = match selector.into() {
            PartSelector::Index(index) if index < len => index,
            PartSelector::Index(index) => {
                return Err(TexError::PartIndexOutOfRange { index, len });
            }
            PartSelector::Tex(tex) => self
                .items
                .index_of_part_by_tex(&tex, MatchOptions::default())?,
        };

        for index in 0..len {
            if let Some(part) = self.items.part_mut(index) {
                let alpha = if index == keep { 1.0 } else { opacity };
                part.node_mut().set_fill_opacity(alpha);
            }
        }
        Ok(self)
    }

    pub fn into_mobject(self) -> Mobject2D {
        self.items.into_mobject()
    }
}

/// Underline stroke thickness in world units.
const UNDERLINE_THICKNESS: f32 = 0.04;

#[derive(Debug, Clone)]
pub struct TitleOptions {
    pub scale_factor: f32,
    pub include_underline: bool,
    pub underline_width: f32,
    /// Overrides `underline_width`.
    pub match_underline_width_to_text: bool,
    pub underline_buff: f32,
    pub config: TexConfig,
}

impl Default for TitleOptions {
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            include_underline: true,
            underline_width: FRAME_WIDTH - 2.0,
            match_underline_width_to_text: false,
            underline_buff: MED_SMALL_BUFF,
            config: TexConfig::prose(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Title {
    text: TexObject,
    underline: Option<Mobject2D>,
}

impl Title {
    pub fn new<R, S>(
        builder: &ShapeBuilder<R>,
        strings: &[S],
        opts: TitleOptions,
    ) -> Result<Self, TexError>
    where
        R: TexRenderer,
        S: AsRef<str>,
    {
        let mut text = TexObject::new(builder, strings, opts.config)?;
        text.scale(opts.scale_factor).to_edge(UP, MED_LARGE_BUFF);

        let underline = opts.include_underline.then(|| {
            let width = if opts.match_underline_width_to_text {
                text.bounds().width()
            } else {
                opts.underline_width
            };
            let mut line = Mobject2D::line(
                "underline",
                [-0.5 * width, 0.0],
                [0.5 * width, 0.0],
                UNDERLINE_THICKNESS,
            );
            line.next_to(text.bounds(), DOWN, opts.underline_buff, ORIGIN);
            line
        });

        Ok(Self { text, underline })
    }

    pub fn text(&self) -> &TexObject {
        &self.text
    }

    pub fn underline(&self) -> Option<&Mobject2D> {
        self.underline.as_ref()
    }

    pub fn into_mobject(self) -> Mobject2D {
        let mut root = Mobject2D::group("title", vec![self.text.into_mobject()]);
        if let Some(underline) = self.underline {
            root.add_child(underline);
        }
        root
    }
}

/// A fixed formula drawn in a fixed color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetTex {
    pub tex: &'static str,
    pub color: Rgba,
}

impl PresetTex {
    pub const CHECKMARK: Self = Self {
        tex: "\\checkmark",
        color: Rgba::GREEN,
    };
    pub const EXMARK: Self = Self {
        tex: "\\times",
        color: Rgba::RED,
    };

    pub fn build<R: TexRenderer>(&self, builder: &ShapeBuilder<R>) -> Result<TexObject, TexError> {
        let mut object = TexObject::new(builder, &[self.tex], TexConfig::formula())?;
        object.set_color(self.color);
        Ok(object)
    }
}
