//! Export diagnostics
//!
//! Unresolved attribute types never fail an export. They land in one of two
//! append-only lists kept by [`NotAvailableTracker`], and unexpected
//! per-operation failures are appended to the [`ErrorLog`].

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use super::ElementId;

/// Which bucket an unresolved type belongs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A core type name with no linked definition in the model
    NotLinked,
    /// A type name that is neither a known primitive nor a core type
    Invalid,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::NotLinked => write!(f, "not linked"),
            DiagnosticKind::Invalid => write!(f, "invalid"),
        }
    }
}

/// One unresolved type reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub class_name: String,
    pub attribute_id: ElementId,
    pub attribute_name: String,
    pub type_name: String,
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}: {} type '{}'",
            self.class_name, self.attribute_name, self.kind, self.type_name
        )
    }
}

/// Accumulates unresolved type references for one export run
#[derive(Debug, Clone, Default, Serialize)]
pub struct NotAvailableTracker {
    not_linked: Vec<Diagnostic>,
    invalid: Vec<Diagnostic>,
}

impl NotAvailableTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a core type that has no definition in the model
    pub fn record_unlinked_type(
        &mut self,
        class_name: &str,
        attribute_id: &ElementId,
        attribute_name: &str,
        type_name: &str,
    ) {
        self.record(
            DiagnosticKind::NotLinked,
            class_name,
            attribute_id,
            attribute_name,
            type_name,
        );
    }

    /// Record a type that cannot be resolved at all
    pub fn record_invalid_type(
        &mut self,
        class_name: &str,
        attribute_id: &ElementId,
        attribute_name: &str,
        type_name: &str,
    ) {
        self.record(
            DiagnosticKind::Invalid,
            class_name,
            attribute_id,
            attribute_name,
            type_name,
        );
    }

    pub fn record(
        &mut self,
        kind: DiagnosticKind,
        class_name: &str,
        attribute_id: &ElementId,
        attribute_name: &str,
        type_name: &str,
    ) {
        let diagnostic = Diagnostic {
            class_name: class_name.to_string(),
            attribute_id: attribute_id.clone(),
            attribute_name: attribute_name.to_string(),
            type_name: type_name.to_string(),
            kind,
        };
        debug!(%diagnostic, "Unresolved attribute type");

        match kind {
            DiagnosticKind::NotLinked => self.not_linked.push(diagnostic),
            DiagnosticKind::Invalid => self.invalid.push(diagnostic),
        }
    }

    pub fn not_linked_types(&self) -> &[Diagnostic] {
        &self.not_linked
    }

    pub fn invalid_types(&self) -> &[Diagnostic] {
        &self.invalid
    }

    pub fn len(&self) -> usize {
        self.not_linked.len() + self.invalid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All diagnostics, not-linked first
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.not_linked.iter().chain(self.invalid.iter())
    }
}

/// Error messages from one export run, mirrored to a JSON file
///
/// Every [`record`](ErrorLog::record) rewrites the whole file as a JSON array.
/// Write failures are logged and otherwise ignored.
#[derive(Debug, Clone, Default)]
pub struct ErrorLog {
    path: Option<PathBuf>,
    messages: Vec<String>,
}

impl ErrorLog {
    /// An in-memory log that never touches the filesystem
    pub fn new() -> Self {
        Self::default()
    }

    /// A log mirrored to `path`
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            messages: Vec::new(),
        }
    }

    pub fn record(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
        self.flush();
    }

    /// Write the current messages to the log file, if one is configured
    pub fn flush(&self) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = write_json_array(path, &self.messages) {
            warn!(path = %path.display(), error = %e, "Error writing error log");
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

fn write_json_array(path: &Path, messages: &[String]) -> std::io::Result<()> {
    let payload = serde_json::to_string(messages)?;
    std::fs::write(path, payload)
}
