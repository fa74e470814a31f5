//! `mdxc bindings` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdxc_config::Config;
use mdxc_renderer::{BindingTable, ComponentRegistry, default_table};

use super::Session;
use crate::error::CliError;
use crate::report::{Reporter, write_stdout};

/// Arguments for the bindings command.
#[derive(Args)]
pub(crate) struct BindingsArgs {
    /// Path to configuration file (default: auto-discover mdxc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl BindingsArgs {
    /// Print the effective binding table.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), None)?;
        let session = Session::new(&config)?;
        Reporter::new().config(config.config_path.as_deref());

        let table = default_table().merge(&session.components().clone().into());
        write_stdout(&format_table(&table, session.components()))?;
        Ok(())
    }
}

/// One line per binding: key, component name and where the binding comes from.
fn format_table(table: &BindingTable, configured: &ComponentRegistry) -> String {
    table
        .keys()
        .into_iter()
        .map(|key| {
            let source = if configured.get(key).is_some() {
                "config"
            } else {
                "default"
            };
            let name = table.get(key).map_or("", |component| component.name());
            let key = key.to_string();
            format!("{key:<24} {name:<12} {source}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
