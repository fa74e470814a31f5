//! CLI command implementations.

mod bindings;
mod check;
mod render;

use std::path::PathBuf;

use clap::ValueEnum;
use mdxc_config::{Config, Fallback, OutputFormat};
use mdxc_renderer::{ComponentRegistry, FallbackPolicy, RenderResult, Renderer, RendererConfig};
use rayon::prelude::*;

pub(crate) use bindings::BindingsArgs;
pub(crate) use check::CheckArgs;
pub(crate) use render::RenderArgs;

use crate::components::build_registry;
use crate::document::Document;
use crate::error::CliError;

/// Fallback for tags with no component.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum FallbackArg {
    /// Placeholder element around the children.
    Passthrough,
    /// Render nothing.
    Omit,
}

impl From<FallbackArg> for Fallback {
    fn from(arg: FallbackArg) -> Self {
        match arg {
            FallbackArg::Passthrough => Self::Passthrough,
            FallbackArg::Omit => Self::Omit,
        }
    }
}

/// Output format.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum FormatArg {
    Html,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Html => Self::Html,
            FormatArg::Json => Self::Json,
        }
    }
}

/// A document and its render result.
pub(crate) struct Rendered {
    pub(crate) document: Document,
    pub(crate) result: RenderResult,
}

/// Renderer and configured components shared by every document of one run.
pub(crate) struct Session {
    renderer: Renderer,
    components: ComponentRegistry,
}

impl Session {
    pub(crate) fn new(config: &Config) -> Result<Self, CliError> {
        let fallback = match config.render.fallback {
            Fallback::Passthrough => FallbackPolicy::Passthrough,
            Fallback::Omit => FallbackPolicy::Omit,
        };
        let renderer_config = RendererConfig::new()
            .with_fallback(fallback)
            .with_placeholder_element(config.render.placeholder_element.clone())
            .with_max_depth(config.render.max_depth);

        Ok(Self {
            renderer: Renderer::with_config(renderer_config),
            components: build_registry(&config.components)?,
        })
    }

    /// Components declared in the configuration.
    pub(crate) fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    /// Render a document. Document components win over configured ones.
    pub(crate) fn render(&self, document: &Document) -> Result<RenderResult, CliError> {
        let registry = self.components.merged_with(&document.components);
        self.renderer
            .render_document(&document.root, &registry.into())
            .map_err(|source| CliError::Render {
                path: document.path.clone(),
                source,
            })
    }

    /// Load and render documents in parallel. Results keep input order.
    pub(crate) fn render_files(&self, paths: &[PathBuf]) -> Vec<Result<Rendered, CliError>> {
        paths
            .par_iter()
            .map(|path| {
                let document = Document::load(path)?;
                let result = self.render(&document)?;
                Ok(Rendered { document, result })
            })
            .collect()
    }
}
