//! Thin binary wrapper for local development.
//!
//! Project direction: `locus-tex` is primarily a **library**.
//! This binary renders one expression through the LaTeX toolchain and logs the resulting
//! part tree, which is handy for checking a TeX install and the SVG cache.
//!
//! Run:
//! - `RUST_LOG=info cargo run -- --isolate x --color "x=#FFFF00" "x^2 + y^2 = 1"`
//! - `--help` lists the flags.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use locus_tex::config::ToolchainConfig;
use locus_tex::scene::Affine2;
use locus_tex::tex::{ColorMap, LatexRenderer, ShapeBuilder, TexConfig, TexObject};

/// Typeset one expression and log its part tree.
#[derive(Parser, Debug)]
#[command(name = "locus-tex")]
#[command(version, about, long_about = None)]
struct Args {
    /// Typeset as prose instead of display math
    #[arg(long)]
    text: bool,

    /// Toolchain config file (default: per-user config, if any)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Substring to isolate as its own part (repeatable)
    #[arg(long, value_name = "SUB")]
    isolate: Vec<String>,

    /// Color for a substring, as TEX=#RRGGBB (repeatable)
    #[arg(long = "color", value_name = "TEX=#RRGGBB")]
    colors: Vec<String>,

    /// Strings joined into the expression
    #[arg(required = true)]
    strings: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    // Keep logging setup in the binary so the library remains unopinionated.
    env_logger::init();

    let args = Args::parse();

    let builder = match &args.config {
        Some(path) => {
            let toolchain = ToolchainConfig::load_from(path)
                .with_context(|| format!("loading toolchain config {}", path.display()))?;
            ShapeBuilder::new(LatexRenderer::new(toolchain))
        }
        None => locus_tex::latex_builder().context("loading toolchain config")?,
    };

    let mut config = if args.text {
        TexConfig::prose()
    } else {
        TexConfig::formula()
    }
    .isolate(args.isolate);
    for entry in &args.colors {
        let (key, color) = ColorMap::parse_entry(entry).context("parsing --color")?;
        config.tex_to_color_map.insert(key, color);
    }

    let object = TexObject::new(&builder, &args.strings, config)
        .with_context(|| format!("building {:?}", args.strings))?;

    let bounds = object.bounds();
    log::info!(
        "{:?}: {} part(s), {:.3} x {:.3} units",
        object.tex_string(),
        object.len(),
        bounds.width(),
        bounds.height()
    );
    for (index, part) in object.groups().iter().enumerate() {
        log::info!(
            "  [{index}] {:?}: {} leaf shape(s){}",
            part.tex(),
            part.leaves().len(),
            if part.is_placeholder() { " (placeholder)" } else { "" }
        );
    }

    let mut items = Vec::new();
    object.into_mobject().flatten(Affine2::IDENTITY, &mut items);
    let triangles: usize = items.iter().map(|item| item.mesh.indices.len() / 3).sum();
    log::info!("{} draw item(s), {triangles} triangle(s)", items.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_flags_collect_in_order() {
        let args = Args::try_parse_from([
            "locus-tex",
            "--isolate",
            "x",
            "--isolate",
            "y",
            "--color",
            "x=#FC6255",
            "x+y",
        ])
        .unwrap();
        assert_eq!(args.isolate, ["x", "y"]);
        assert_eq!(args.colors, ["x=#FC6255"]);
        assert_eq!(args.strings, ["x+y"]);
        assert!(!args.text);
    }

    #[test]
    fn unknown_flags_are_rejected() {
        let err = Args::try_parse_from(["locus-tex", "--colour", "x=#FFFFFF", "x"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn strings_are_required() {
        let err = Args::try_parse_from(["locus-tex", "--text"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }
}
