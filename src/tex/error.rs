use std::path::PathBuf;

use crate::tex::assemble::GroupId;

/// Errors produced by the TeX pipeline.
#[derive(thiserror::Error, Debug)]
pub enum TexError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not run `{tool}`: {source}")]
    ToolMissing {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{tool}` failed ({status}) on {input:?}\n{log}")]
    ToolFailed {
        tool: String,
        status: String,
        input: PathBuf,
        log: String,
    },

    #[error("failed to parse svg: {0}")]
    Svg(#[from] usvg::Error),

    #[error("failed to tessellate glyph outline: {0}")]
    Tessellation(String),

    /// The whole render and the per-substring measurement renders disagree on shape count.
    #[error(
        "substring shape counts ({measured}) do not match the whole render ({flat}) for {tex:?}"
    )]
    ShapeCountMismatch {
        tex: String,
        flat: usize,
        measured: usize,
    },

    #[error("no part matches tex {tex:?}")]
    PartNotFound { tex: String },

    #[error("part index {index} is out of range ({len} parts)")]
    PartIndexOutOfRange { index: usize, len: usize },

    #[error("{0:?} is not part of this expression")]
    GroupNotFound(GroupId),

    #[error("invalid color key: {0}")]
    InvalidColorKey(String),

    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse toolchain config: {0}")]
    Config(#[from] toml::de::Error),
}
