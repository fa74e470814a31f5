//! Non-fatal rendering diagnostics.

use std::fmt;

/// Message attached to unbound tag diagnostics.
pub const COMPONENT_NOT_PROVIDED: &str = "component not provided";

/// Kind of recoverable condition encountered while rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "snake_case")
)]
pub enum DiagnosticKind {
    /// Tag has no binding; rendered through the fallback policy.
    UnboundTag,
    /// Unbound element with no children; rendered as nothing.
    MalformedNode,
    /// Element nested deeper than the configured limit; rendered as nothing.
    DepthExceeded,
}

/// A recoverable condition, reported alongside the rendered output.
///
/// # Example
///
/// ```
/// use mdxc_renderer::Diagnostic;
///
/// let diag = Diagnostic::unbound("FbInternalOnly");
/// assert_eq!(diag.as_pair(), ("FbInternalOnly", "component not provided"));
/// assert_eq!(diag.to_string(), "FbInternalOnly: component not provided");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Diagnostic {
    /// Tag the diagnostic refers to.
    pub tag: String,
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// Human-readable description.
    pub message: String,
}

impl Diagnostic {
    /// Diagnostic for a tag with no binding.
    #[must_use]
    pub fn unbound(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            kind: DiagnosticKind::UnboundTag,
            message: COMPONENT_NOT_PROVIDED.to_owned(),
        }
    }

    /// Diagnostic for an unbound element without content.
    #[must_use]
    pub fn malformed(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            kind: DiagnosticKind::MalformedNode,
            message: "component not provided and element has no content".to_owned(),
        }
    }

    /// Diagnostic for an element beyond the nesting limit.
    #[must_use]
    pub fn depth_exceeded(tag: impl Into<String>, max_depth: usize) -> Self {
        Self {
            tag: tag.into(),
            kind: DiagnosticKind::DepthExceeded,
            message: format!("maximum nesting depth ({max_depth}) exceeded"),
        }
    }

    /// `(tag, message)` pair.
    #[must_use]
    pub fn as_pair(&self) -> (&str, &str) {
        (&self.tag, &self.message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.tag, self.message)
    }
}
