//! Renderer seam: markup in, vector-path file out.
//!
//! The rest of the pipeline only needs something that turns a normalized markup string
//! into an SVG file. `LatexRenderer` does this with `latex` + `dvisvgm`; tests plug in
//! renderers that write synthetic SVGs.
//!
//! Contract for implementors:
//! - Deterministic: identical `(markup, kind)` must give an SVG with identical path order.
//!   Substring partitioning relies on this.
//! - Caching is allowed (and encouraged) as long as it is keyed by the full input.
//! - Failures are returned, never retried.

pub mod latex;

use std::path::PathBuf;

use crate::tex::{TexError, TexKind};

pub use latex::LatexRenderer;

pub trait TexRenderer {
    /// Render already-normalized markup to an SVG file and return its path.
    fn render(&self, markup: &str, kind: TexKind) -> Result<PathBuf, TexError>;
}

impl<R: TexRenderer + ?Sized> TexRenderer for &R {
    fn render(&self, markup: &str, kind: TexKind) -> Result<PathBuf, TexError> {
        (**self).render(markup, kind)
    }
}

impl<R: TexRenderer + ?Sized> TexRenderer for Box<R> {
    fn render(&self, markup: &str, kind: TexKind) -> Result<PathBuf, TexError> {
        (**self).render(markup, kind)
    }
}
