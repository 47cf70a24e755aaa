//! TeX → substring-grouped glyph trees.
//!
//! A LaTeX backend only gives back a *flat* list of glyph paths for a whole expression.
//! Callers, however, want to address logical pieces ("the `x^2`", "every `=`") as units.
//! This module bridges the two:
//!
//! 1. `segment` splits the caller's strings so every substring of interest is its own element.
//! 2. `normalize` repairs each string so LaTeX can always render it.
//! 3. `builder` renders a string (via an `engine::TexRenderer`) and parses the SVG into leaves.
//! 4. `assemble` renders the joined expression once, renders every piece alone only to count
//!    its shapes, and slices the flat render into one group per piece. Pieces that draw
//!    nothing get a point placeholder so indexing and layout still see them.
//! 5. `query` finds, recolors, indexes and sorts the groups.
//!
//! `mobject::TexObject` ties the steps together; `compose` builds titles, bulleted lists and
//! preset formulas on top of it.

pub mod assemble;
pub mod builder;
pub mod compose;
pub mod engine;
pub mod error;
pub mod mobject;
pub mod normalize;
pub mod query;
pub mod segment;

pub use assemble::{ExpressionTree, GroupId, SubstringGroup};
pub use builder::{ShapeBuilder, SingleStringConfig, SingleStringTex, TEX_MOB_SCALE_FACTOR};
pub use engine::{LatexRenderer, TexRenderer};
pub use error::TexError;
pub use mobject::{TexConfig, TexObject};
pub use query::{ColorKey, ColorMap, MatchOptions};

/// Which document template the markup is rendered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TexKind {
    /// Display math (`align*`).
    #[default]
    Formula,
    /// Text mode.
    Prose,
}
