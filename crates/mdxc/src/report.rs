//! Terminal reporting for mdxc commands.
//!
//! Status lines and diagnostics go to stderr; rendered documents and binding
//! listings go to stdout so they can be piped.

use std::fmt;
use std::path::Path;

use console::{Style, Term};
use mdxc_renderer::{Diagnostic, DiagnosticKind};

/// Reporter for one command run.
pub(crate) struct Reporter {
    term: Term,
    ok: Style,
    warn: Style,
    fail: Style,
    dim: Style,
}

impl Reporter {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            ok: Style::new().green(),
            warn: Style::new().yellow(),
            fail: Style::new().red().bold(),
            dim: Style::new().dim(),
        }
    }

    /// Configuration file in effect, if one was found.
    pub(crate) fn config(&self, path: Option<&Path>) {
        let line = match path {
            Some(path) => format!("Config: {}", path.display()),
            None => "Config: built-in defaults".to_owned(),
        };
        self.line(&self.dim, &line);
    }

    /// A rendered document written to disk.
    pub(crate) fn wrote(&self, input: &Path, output: &Path) {
        self.line(
            &self.dim,
            &format!("{} -> {}", input.display(), output.display()),
        );
    }

    /// Report the diagnostics of one document. Returns how many there were.
    pub(crate) fn diagnostics(&self, path: &Path, diagnostics: &[Diagnostic]) -> usize {
        for diagnostic in diagnostics {
            tracing::warn!(
                path = %path.display(),
                tag = %diagnostic.tag,
                kind = ?diagnostic.kind,
                "{}",
                diagnostic.message
            );
            self.line(&self.warn, &diagnostic_line(path, diagnostic));
        }
        diagnostics.len()
    }

    /// Final line of a run. Green when clean, yellow otherwise.
    pub(crate) fn summary(&self, verb: &str, documents: usize, diagnostics: usize) {
        let style = if diagnostics == 0 { &self.ok } else { &self.warn };
        self.line(style, &summary_line(verb, documents, diagnostics));
    }

    /// A non-fatal problem with the run itself.
    pub(crate) fn warning(&self, msg: &str) {
        self.line(&self.warn, &format!("warning: {msg}"));
    }

    /// The error that ended the run.
    pub(crate) fn error(&self, err: &dyn fmt::Display) {
        self.line(&self.fail, &format!("error: {err}"));
    }

    fn line(&self, style: &Style, msg: &str) {
        let _ = self.term.write_line(&style.apply_to(msg).to_string());
    }
}

/// Write rendered content to stdout.
pub(crate) fn write_stdout(content: &str) -> std::io::Result<()> {
    Term::stdout().write_line(content)
}

fn kind_label(kind: DiagnosticKind) -> &'static str {
    match kind {
        DiagnosticKind::UnboundTag => "unbound-tag",
        DiagnosticKind::MalformedNode => "malformed-node",
        DiagnosticKind::DepthExceeded => "depth-exceeded",
    }
}

fn diagnostic_line(path: &Path, diagnostic: &Diagnostic) -> String {
    format!(
        "{}: {diagnostic} [{}]",
        path.display(),
        kind_label(diagnostic.kind)
    )
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn summary_line(verb: &str, documents: usize, diagnostics: usize) -> String {
    format!(
        "{verb} {}, {}",
        plural(documents, "document"),
        plural(diagnostics, "diagnostic")
    )
}
