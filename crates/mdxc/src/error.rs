//! CLI error types.

use std::path::PathBuf;

use mdxc_config::ConfigError;
use mdxc_renderer::RenderError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}: invalid document: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{}: {source}", path.display())]
    Render {
        path: PathBuf,
        source: RenderError,
    },

    #[error(
        "{} and {} would both be written to {}",
        first.display(),
        second.display(),
        output.display()
    )]
    OutputCollision {
        output: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("invalid component key {0:?}")]
    ComponentKey(String),

    #[error("{0} diagnostic(s) reported")]
    Diagnostics(usize),
}
