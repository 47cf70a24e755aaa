//! Toolchain configuration for the LaTeX renderer.
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no file at all)
//! gives a working setup as long as `latex` and `dvisvgm` are on `PATH`:
//!
//! ```toml
//! tex_dir = "/tmp/locus-tex"
//! latex = "latex"
//! dvisvgm = "dvisvgm"
//! preamble = "\\usepackage{physics}"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::tex::TexError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Working directory for `.tex`/`.dvi` files and the content-addressed SVG cache.
    pub tex_dir: PathBuf,
    /// LaTeX executable producing DVI.
    pub latex: String,
    /// DVI → SVG converter.
    pub dvisvgm: String,
    /// Extra preamble lines appended after the built-in packages.
    pub preamble: String,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            tex_dir: default_tex_dir(),
            latex: "latex".to_string(),
            dvisvgm: "dvisvgm".to_string(),
            preamble: String::new(),
        }
    }
}

impl ToolchainConfig {
    /// Where `load()` looks for a config file.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("locus-tex").join("toolchain.toml"))
    }

    /// Load from the per-user config file if there is one, defaults otherwise.
    pub fn load() -> Result<Self, TexError> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                log::debug!("toolchain: no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, TexError> {
        log::info!("toolchain: loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, TexError> {
        Ok(toml::from_str(contents)?)
    }
}

fn default_tex_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("locus-tex")
        .join("tex")
}
