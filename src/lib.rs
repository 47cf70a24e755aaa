//! `locus-tex` library crate root.
//!
//! This crate is intended to be used primarily as a **library**. The binary target
//! should stay thin and call into these exported entrypoints.
//!
//! Public API philosophy (for now):
//! - Keep modules public so downstream apps can plug in their own renderer or scene graph.
//! - Provide a couple of stable entrypoints (`latex_builder`, `math_tex`) for the common
//!   "LaTeX on this machine" setup, useful for integration tests / bring-up.

pub mod config;
pub mod scene;
pub mod svg;
pub mod tex;

use tex::{LatexRenderer, ShapeBuilder, TexConfig, TexError, TexObject};

/// A shape builder backed by `latex` + `dvisvgm`, configured from the per-user toolchain
/// file (or defaults).
///
/// Note: This function does **not** initialize logging; callers can decide their own
/// logging setup.
pub fn latex_builder() -> Result<ShapeBuilder<LatexRenderer>, TexError> {
    Ok(ShapeBuilder::new(LatexRenderer::from_user_config()?))
}

/// Build a formula with the default LaTeX toolchain.
///
/// If you want more control (renderer, cache dir, options), use `TexObject::new` with a
/// `ShapeBuilder` of your own.
pub fn math_tex<S: AsRef<str>>(strings: &[S], config: TexConfig) -> Result<TexObject, TexError> {
    TexObject::new(&latex_builder()?, strings, config)
}
