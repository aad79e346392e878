//! Local, non-fatal findings of a save or load pass.
//!
//! A diagnostic never stops a pass: the offending sub-element is skipped (or
//! emitted best-effort) and the rest of the document is still produced. Every
//! diagnostic is also logged at `warn` level when it is recorded.

use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticKind {
    /// An atom or bond index referenced by a group, stereocenter, selection or
    /// attachment point does not exist.
    DanglingReference,
    /// A rich-text payload or style range did not parse.
    MalformedAnnotation,
    /// A stereo descriptor code or token outside the fixed table.
    UnrecognizedDescriptor,
    /// R-site attachment points are not numbered `1..=n` or point at atoms
    /// that are not neighbours.
    InconsistentAttachmentOrder,
    /// A query-specific atom attribute that cannot be written.
    MalformedQueryAttribute,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DanglingReference => "dangling reference",
            Self::MalformedAnnotation => "malformed annotation",
            Self::UnrecognizedDescriptor => "unrecognized descriptor",
            Self::InconsistentAttachmentOrder => "inconsistent attachment order",
            Self::MalformedQueryAttribute => "malformed query attribute",
        };
        f.write_str(name)
    }
}

/// One recorded finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Path of the offending element, e.g. `mol0/sgroups/2`.
    pub location: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.kind, self.location, self.message)
    }
}

/// Ordered collection of the diagnostics of one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        kind: DiagnosticKind,
        location: impl Into<String>,
        message: impl Into<String>,
    ) {
        let diagnostic = Diagnostic {
            kind,
            location: location.into(),
            message: message.into(),
        };
        warn!(
            kind = %diagnostic.kind,
            location = %diagnostic.location,
            "{}",
            diagnostic.message
        );
        self.entries.push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of diagnostics of the given kind.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    pub fn contains(&self, kind: DiagnosticKind) -> bool {
        self.entries.iter().any(|d| d.kind == kind)
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_records_in_order() {
        let mut diags = Diagnostics::new();
        diags.push(DiagnosticKind::DanglingReference, "mol0/sgroups/0", "atom 999");
        diags.push(DiagnosticKind::UnrecognizedDescriptor, "mol0/stereoCenters/1", "code 1");
        assert_eq!(diags.len(), 2);
        let locations: Vec<&str> = diags.iter().map(|d| d.location.as_str()).collect();
        assert_eq!(locations, vec!["mol0/sgroups/0", "mol0/stereoCenters/1"]);
    }

    #[test]
    fn count_and_contains_filter_by_kind() {
        let mut diags = Diagnostics::new();
        assert!(diags.is_empty());
        diags.push(DiagnosticKind::DanglingReference, "a", "x");
        diags.push(DiagnosticKind::DanglingReference, "b", "y");
        assert_eq!(diags.count(DiagnosticKind::DanglingReference), 2);
        assert!(!diags.contains(DiagnosticKind::MalformedAnnotation));
    }

    #[test]
    fn display_includes_kind_and_location() {
        let mut diags = Diagnostics::new();
        diags.push(DiagnosticKind::InconsistentAttachmentOrder, "mol0/atoms/3", "gap");
        let text = diags.into_vec()[0].to_string();
        assert_eq!(text, "inconsistent attachment order at mol0/atoms/3: gap");
    }
}
