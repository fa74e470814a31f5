//! `mdxc check` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdxc_config::Config;

use super::Session;
use crate::error::CliError;
use crate::report::Reporter;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Document files (JSON node trees).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Path to configuration file (default: auto-discover mdxc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl CheckArgs {
    /// Render every document and fail if any diagnostic was produced.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let reporter = Reporter::new();

        let config = Config::load(self.config.as_deref(), None)?;
        reporter.config(config.config_path.as_deref());
        let session = Session::new(&config)?;

        let mut diagnostics = 0;
        for rendered in session.render_files(&self.inputs) {
            let rendered = rendered?;
            diagnostics +=
                reporter.diagnostics(&rendered.document.path, &rendered.result.diagnostics);
        }

        reporter.summary("Checked", self.inputs.len(), diagnostics);
        if diagnostics > 0 {
            return Err(CliError::Diagnostics(diagnostics));
        }
        Ok(())
    }
}
