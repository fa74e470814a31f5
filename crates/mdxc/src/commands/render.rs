//! `mdxc render` command implementation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::Args;
use mdxc_config::{CliSettings, Config, OutputFormat};
use mdxc_renderer::{Diagnostic, Output, RenderResult};
use serde::Serialize;

use super::{FallbackArg, FormatArg, Session};
use crate::document::{Document, output_stem};
use crate::error::CliError;
use crate::report::{Reporter, write_stdout};

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Document files (JSON node trees).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory (overrides config; default: stdout).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format (overrides config).
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// What tags with no component render as (overrides config).
    #[arg(long, value_enum)]
    fallback: Option<FallbackArg>,

    /// Path to configuration file (default: auto-discover mdxc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// JSON output file contents.
#[derive(Serialize)]
struct JsonDocument<'a> {
    output: &'a Output,
    diagnostics: &'a [Diagnostic],
}

impl RenderArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let reporter = Reporter::new();

        let cli_settings = CliSettings {
            fallback: self.fallback.map(Into::into),
            output_dir: self.output_dir.clone(),
            format: self.format.map(Into::into),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let session = Session::new(&config)?;
        reporter.config(config.config_path.as_deref());

        let format = config.output_resolved.format;
        let targets: Vec<Option<PathBuf>> = match config.output_resolved.dir.as_deref() {
            Some(dir) => {
                let targets = output_paths(dir, &self.inputs, format)?;
                std::fs::create_dir_all(dir).map_err(|source| CliError::File {
                    path: dir.to_path_buf(),
                    source,
                })?;
                targets.into_iter().map(Some).collect()
            }
            None => vec![None; self.inputs.len()],
        };

        let mut diagnostics = 0;
        for (rendered, target) in session.render_files(&self.inputs).into_iter().zip(targets) {
            let rendered = rendered?;
            let document = &rendered.document;
            diagnostics += reporter.diagnostics(&document.path, &rendered.result.diagnostics);

            let content = serialize(document, &rendered.result, format)?;
            match target {
                Some(path) => {
                    std::fs::write(&path, content).map_err(|source| CliError::File {
                        path: path.clone(),
                        source,
                    })?;
                    reporter.wrote(&document.path, &path);
                }
                None => write_stdout(&content)?,
            }
        }

        reporter.summary("Rendered", self.inputs.len(), diagnostics);
        Ok(())
    }
}

/// Output file for each input, in input order.
///
/// Fails when two inputs would be written to the same file.
fn output_paths(
    dir: &Path,
    inputs: &[PathBuf],
    format: OutputFormat,
) -> Result<Vec<PathBuf>, CliError> {
    let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();
    inputs
        .iter()
        .map(|input| {
            let path = dir.join(format!("{}.{}", output_stem(input), format.extension()));
            if let Some(first) = claimed.insert(path.clone(), input) {
                return Err(CliError::OutputCollision {
                    output: path,
                    first: first.to_path_buf(),
                    second: input.clone(),
                });
            }
            Ok(path)
        })
        .collect()
}

fn serialize(
    document: &Document,
    result: &RenderResult,
    format: OutputFormat,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Html => Ok(result.to_html()),
        OutputFormat::Json => serde_json::to_string_pretty(&JsonDocument {
            output: &result.output,
            diagnostics: &result.diagnostics,
        })
        .map_err(|source| CliError::Json {
            path: document.path.clone(),
            source,
        }),
    }
}
