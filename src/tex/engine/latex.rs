//! `latex` + `dvisvgm` renderer with a content-addressed SVG cache.
//!
//! For each request:
//! 1. Wrap the markup in a document template (formula → `align*`, prose → plain body).
//! 2. Name the job by the SHA-256 of the full document.
//! 3. If `<hash>.svg` exists in `tex_dir`, return it.
//! 4. Otherwise run `latex` (batch mode, halt on error) and `dvisvgm --no-fonts`, writing
//!    the SVG under a temporary name first so a failed conversion never poisons the cache.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use sha2::{Digest, Sha256};

use crate::config::ToolchainConfig;
use crate::tex::engine::TexRenderer;
use crate::tex::{TexError, TexKind};

const PREAMBLE: &str = r"\documentclass[preview]{standalone}
\usepackage[english]{babel}
\usepackage[utf8]{inputenc}
\usepackage[T1]{fontenc}
\usepackage{amsmath}
\usepackage{amssymb}
\usepackage{mathrsfs}
\usepackage{xcolor}
\usepackage{ragged2e}
\linespread{1}
";

/// Lines of the LaTeX log kept in error reports.
const LOG_TAIL_LINES: usize = 20;

#[derive(Debug, Clone)]
pub struct LatexRenderer {
    config: ToolchainConfig,
}

impl LatexRenderer {
    pub fn new(config: ToolchainConfig) -> Self {
        Self { config }
    }

    /// Renderer configured from the per-user toolchain file (or defaults).
    pub fn from_user_config() -> Result<Self, TexError> {
        Ok(Self::new(ToolchainConfig::load()?))
    }

    pub fn config(&self) -> &ToolchainConfig {
        &self.config
    }

    /// Full LaTeX document for `markup`.
    pub fn document(&self, markup: &str, kind: TexKind) -> String {
        let body = match kind {
            TexKind::Formula => format!("\\begin{{align*}}\n{markup}\n\\end{{align*}}"),
            TexKind::Prose => markup.to_string(),
        };
        format!(
            "{PREAMBLE}{}\n\\begin{{document}}\n{body}\n\\end{{document}}\n",
            self.config.preamble
        )
    }

    /// Cached SVG location for a document.
    pub fn svg_path(&self, document: &str) -> PathBuf {
        self.config
            .tex_dir
            .join(format!("{}.svg", content_hash(document)))
    }
}

impl TexRenderer for LatexRenderer {
    fn render(&self, markup: &str, kind: TexKind) -> Result<PathBuf, TexError> {
        let document = self.document(markup, kind);
        let stem = content_hash(&document);
        let dir = &self.config.tex_dir;
        let svg = dir.join(format!("{stem}.svg"));

        if svg.exists() {
            log::debug!("latex: cache hit for {markup:?} ({stem})");
            return Ok(svg);
        }

        log::info!("latex: rendering {markup:?} ({kind:?}) into {}", dir.display());
        fs::create_dir_all(dir)?;

        let tex = dir.join(format!("{stem}.tex"));
        fs::write(&tex, &document)?;

        let mut output_dir = OsString::from("-output-directory=");
        output_dir.push(dir.as_os_str());
        run_tool(
            &self.config.latex,
            [
                OsString::from("-interaction=batchmode"),
                OsString::from("-halt-on-error"),
                output_dir,
                tex.clone().into_os_string(),
            ],
            dir,
            &tex,
            Some(&dir.join(format!("{stem}.log"))),
        )?;

        let dvi = dir.join(format!("{stem}.dvi"));
        let partial = dir.join(format!("{stem}.partial.svg"));
        run_tool(
            &self.config.dvisvgm,
            [
                dvi.clone().into_os_string(),
                OsString::from("-n"),
                OsString::from("-v"),
                OsString::from("0"),
                OsString::from("-o"),
                partial.clone().into_os_string(),
            ],
            dir,
            &dvi,
            None,
        )?;
        fs::rename(&partial, &svg)?;

        Ok(svg)
    }
}

/// Hex SHA-256 prefix used as the job name.
fn content_hash(document: &str) -> String {
    let digest = Sha256::digest(document.as_bytes());
    let hex = format!("{digest:x}");
    hex[..16].to_string()
}

fn run_tool<I>(
    tool: &str,
    args: I,
    cwd: &Path,
    input: &Path,
    log_file: Option<&Path>,
) -> Result<(), TexError>
where
    I: IntoIterator<Item = OsString>,
{
    let output = Command::new(tool)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| TexError::ToolMissing {
            tool: tool.to_string(),
            source,
        })?;

    if output.status.success() {
        return Ok(());
    }

    let log = match log_file.and_then(|p| fs::read_to_string(p).ok()) {
        Some(contents) => tail(&contents, LOG_TAIL_LINES),
        None => tail(&String::from_utf8_lossy(&output.stderr), LOG_TAIL_LINES),
    };

    Err(TexError::ToolFailed {
        tool: tool.to_string(),
        status: output.status.to_string(),
        input: input.to_path_buf(),
        log,
    })
}

fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.lines().collect();
    all[all.len().saturating_sub(lines)..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer_in(dir: &Path) -> LatexRenderer {
        LatexRenderer::new(ToolchainConfig {
            tex_dir: dir.to_path_buf(),
            latex: "locus-tex-no-such-latex".to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn formula_is_wrapped_in_align() {
        let r = renderer_in(Path::new("/tmp"));
        let doc = r.document("x^2", TexKind::Formula);
        assert!(doc.contains("\\begin{align*}\nx^2\n\\end{align*}"));
        assert!(!r.document("x^2", TexKind::Prose).contains("align*"));
    }

    #[test]
    fn job_names_are_content_addressed() {
        let r = renderer_in(Path::new("/tmp"));
        let a = r.svg_path(&r.document("a", TexKind::Formula));
        let b = r.svg_path(&r.document("a", TexKind::Formula));
        let c = r.svg_path(&r.document("a", TexKind::Prose));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn cached_svg_is_returned_without_running_tools() {
        let dir = tempfile::tempdir().unwrap();
        let r = renderer_in(dir.path());
        let expected = r.svg_path(&r.document("y", TexKind::Formula));
        fs::write(&expected, "<svg xmlns=\"http://www.w3.org/2000/svg\"/>").unwrap();

        assert_eq!(r.render("y", TexKind::Formula).unwrap(), expected);
    }

    #[test]
    fn missing_executable_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let r = renderer_in(dir.path());
        match r.render("z", TexKind::Formula) {
            Err(TexError::ToolMissing { tool, .. }) => assert_eq!(tool, "locus-tex-no-such-latex"),
            other => panic!("expected ToolMissing, got {other:?}"),
        }
    }

    #[test]
    fn tail_keeps_last_lines() {
        assert_eq!(tail("a\nb\nc", 2), "b\nc");
        assert_eq!(tail("a", 5), "a");
    }

    #[test]
    #[ignore = "needs latex and dvisvgm on PATH"]
    fn renders_with_real_toolchain() {
        let dir = tempfile::tempdir().unwrap();
        let r = LatexRenderer::new(ToolchainConfig {
            tex_dir: dir.path().to_path_buf(),
            ..Default::default()
        });
        let svg = r.render("x^2", TexKind::Formula).unwrap();
        assert!(!crate::svg::parse_svg_file(&svg).unwrap().is_empty());
    }
}
