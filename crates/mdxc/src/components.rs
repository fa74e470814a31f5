//! Components declared in configuration files and documents.

use std::collections::BTreeMap;
use std::str::FromStr;

use mdxc_config::{AttributeValue, ComponentConfig};
use mdxc_renderer::{
    AttrValue, Attributes, BindingKey, Component, ComponentRegistry, Output, component,
};

use crate::error::CliError;

/// Element component with fixed attributes.
///
/// The node's own attributes take precedence over the configured ones.
#[derive(Debug)]
pub(crate) struct ConfiguredElement {
    element: String,
    attributes: Attributes,
}

impl ConfiguredElement {
    pub(crate) fn new(decl: &ComponentConfig) -> Self {
        let mut attributes: Attributes = decl
            .attributes
            .iter()
            .map(|(name, value)| (name.clone(), attr_value(value)))
            .collect();
        if let Some(class) = &decl.class {
            attributes.insert("className".to_owned(), AttrValue::Text(class.clone()));
        }
        Self {
            element: decl.element.clone(),
            attributes,
        }
    }
}

impl Component for ConfiguredElement {
    fn render(&self, attributes: &Attributes, children: Vec<Output>) -> Output {
        let mut merged = self.attributes.clone();
        merged.extend(attributes.iter().map(|(k, v)| (k.clone(), v.clone())));
        Output::element_with(self.element.clone(), merged, children)
    }

    fn name(&self) -> &str {
        &self.element
    }
}

#[allow(clippy::cast_precision_loss)] // Attribute numbers are small
pub(crate) fn attr_value(value: &AttributeValue) -> AttrValue {
    match value {
        AttributeValue::Flag(flag) => AttrValue::Flag(*flag),
        AttributeValue::Integer(n) => AttrValue::Number(*n as f64),
        AttributeValue::Float(n) => AttrValue::Number(*n),
        AttributeValue::Text(s) => AttrValue::Text(s.clone()),
    }
}

/// Build a registry from component declarations keyed by tag or `parent.tag`.
pub(crate) fn build_registry(
    decls: &BTreeMap<String, ComponentConfig>,
) -> Result<ComponentRegistry, CliError> {
    let mut registry = ComponentRegistry::new();
    for (key, decl) in decls {
        let binding = BindingKey::from_str(key).map_err(|_| CliError::ComponentKey(key.clone()))?;
        if binding.tag.is_wrapper() {
            tracing::warn!(key = %binding, "Ignoring component for reserved tag");
            continue;
        }
        registry.insert(binding, component(ConfiguredElement::new(decl)));
    }
    Ok(registry)
}
