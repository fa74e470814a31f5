//! Configuration management for mdxc.
//!
//! Parses `mdxc.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `output.dir`
//! - `components.<key>.class`
//!
//! ## Example
//!
//! ```toml
//! [render]
//! fallback = "omit"
//! max_depth = 64
//!
//! [output]
//! dir = "${SITE_DIR:-dist}"
//! format = "html"
//!
//! [components]
//! Note = { element = "aside", class = "note" }
//! "li.inlineCode" = { element = "kbd" }
//! ```

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override fallback policy for unbound tags.
    pub fallback: Option<Fallback>,
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override output format.
    pub format: Option<OutputFormat>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdxc.toml";

/// Tag that always renders its children unchanged.
const RESERVED_TAG: &str = "wrapper";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rendering configuration.
    pub render: RenderConfig,
    /// Output configuration (paths are relative strings from TOML).
    output: OutputConfigRaw,
    /// Components bound in every document, keyed by tag or `parent.tag`.
    pub components: BTreeMap<String, ComponentConfig>,

    /// Resolved output configuration (set after loading).
    #[serde(skip)]
    pub output_resolved: OutputConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// What an element with no bound component renders as.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fallback {
    /// Placeholder element around the element's children.
    #[default]
    Passthrough,
    /// Nothing.
    Omit,
}

/// Rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Fallback for unbound tags.
    pub fallback: Fallback,
    /// Element used for passthrough placeholders.
    pub placeholder_element: String,
    /// Maximum element nesting depth.
    pub max_depth: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fallback: Fallback::Passthrough,
            placeholder_element: "div".to_owned(),
            max_depth: 256,
        }
    }
}

/// Output serialization format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// HTML markup.
    #[default]
    Html,
    /// JSON output tree with diagnostics.
    Json,
}

impl OutputFormat {
    /// File extension for output files.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Json => "json",
        }
    }
}

/// Raw output configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    dir: Option<String>,
    format: Option<OutputFormat>,
}

/// Resolved output configuration with absolute paths.
#[derive(Debug, Default)]
pub struct OutputConfig {
    /// Output directory. `None` writes to stdout.
    pub dir: Option<PathBuf>,
    /// Output format.
    pub format: OutputFormat,
}

/// Component declared in the configuration.
///
/// Renders as `element` with the configured class and attributes merged under
/// the node's own attributes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentConfig {
    /// Element name to emit.
    pub element: String,
    /// CSS class added to every rendered element.
    pub class: Option<String>,
    /// Extra attributes added to every rendered element.
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
}

/// Attribute value in a component declaration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Flag(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`output.dir`").
        field: String,
        /// Error message (e.g., "${`SITE_DIR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require an element name: ASCII letter followed by letters, digits or `-`.
fn require_element_name(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    let mut chars = value.chars();
    let valid_start = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ConfigError::Validation(format!(
            "{field} is not a valid element name: {value:?}"
        )));
    }
    Ok(())
}

/// Tag part of a binding key (`li.inlineCode` -> `inlineCode`).
fn key_tag(key: &str) -> &str {
    match key.split_once('.') {
        Some((parent, tag)) if !parent.is_empty() && !tag.is_empty() => tag,
        _ => key,
    }
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdxc.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails, or
    /// validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Parse configuration from a TOML string.
    ///
    /// Relative paths are resolved against `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, expansion or validation fails.
    pub fn from_toml(content: &str, base_dir: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;
        config.resolve_paths(base_dir);
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(fallback) = settings.fallback {
            self.render.fallback = fallback;
        }
        if let Some(dir) = &settings.output_dir {
            self.output_resolved.dir = Some(dir.clone());
        }
        if let Some(format) = settings.format {
            self.output_resolved.format = format;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));

        let mut config = Self::from_toml(&content, config_dir)?;
        config.config_path = Some(path.to_path_buf());

        tracing::debug!(path = %path.display(), components = config.components.len(), "Loaded configuration");
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_render()?;
        self.validate_components()?;
        Ok(())
    }

    /// Validate render configuration.
    fn validate_render(&self) -> Result<(), ConfigError> {
        require_element_name(&self.render.placeholder_element, "render.placeholder_element")?;

        if self.render.max_depth == 0 {
            return Err(ConfigError::Validation(
                "render.max_depth must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate component declarations.
    fn validate_components(&self) -> Result<(), ConfigError> {
        for (key, component) in &self.components {
            require_non_empty(key, "components key")?;
            if key_tag(key) == RESERVED_TAG {
                return Err(ConfigError::Validation(format!(
                    "components.{key}: `{RESERVED_TAG}` cannot be overridden"
                )));
            }
            require_element_name(&component.element, &format!("components.{key}.element"))?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.output.dir {
            self.output.dir = Some(expand::expand_env(dir, "output.dir")?);
        }

        for (key, component) in &mut self.components {
            if let Some(ref class) = component.class {
                component.class = Some(expand::expand_env(
                    class,
                    &format!("components.{key}.class"),
                )?);
            }
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.output_resolved = OutputConfig {
            dir: self.output.dir.as_deref().map(|dir| config_dir.join(dir)),
            format: self.output.format.unwrap_or_default(),
        };
    }
}
