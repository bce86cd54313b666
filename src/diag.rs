//! Diagnostic model shared by the query front-end and the config validators.
//!
//! Parse errors and validation failures are both expressed as [`Diag`]
//! values and rendered through miette against the query source.

use crate::ast::Span;
use miette::{Diagnostic, LabeledSpan, Report, Severity};
use std::fmt;

/// Role of a diagnostic label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelRole {
    Primary,
    Secondary,
}

/// A labeled span within a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagLabel {
    pub span: Span,
    pub message: String,
    pub role: LabelRole,
}

impl DiagLabel {
    /// Creates a new primary label.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            role: LabelRole::Primary,
        }
    }

    /// Creates a new secondary label.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            role: LabelRole::Secondary,
        }
    }
}

/// A structured error diagnostic.
///
/// Captures everything needed to render a report with source context:
/// labeled spans, optional help text and an optional code such as
/// `syntax::unexpected_token` or `config::must_contain_from`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
    pub message: String,
    pub labels: Vec<DiagLabel>,
    pub help: Option<String>,
    pub code: Option<String>,
}

impl Diag {
    /// Creates a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            labels: Vec::new(),
            help: None,
            code: None,
        }
    }

    /// Adds a primary label.
    pub fn with_primary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(DiagLabel::primary(span, message));
        self
    }

    /// Adds a secondary label.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(DiagLabel::secondary(span, message));
        self
    }

    /// Sets the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Sets the diagnostic code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Returns the span of the first primary label, if any.
    pub fn primary_span(&self) -> Option<&Span> {
        self.labels
            .iter()
            .find(|label| label.role == LabelRole::Primary)
            .map(|label| &label.span)
    }
}

impl fmt::Display for Diag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Diag {}

/// Source text a diagnostic is rendered against.
#[derive(Debug, Clone)]
pub struct SourceFile {
    content: String,
    name: Option<String>,
}

impl SourceFile {
    /// Creates a new source from the given content.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            name: None,
        }
    }

    /// Creates a named source, e.g. `"classifier.trainingData"`.
    pub fn with_name(content: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            name: Some(name.into()),
        }
    }

    /// Returns the source content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the source name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Clamps a span to valid bounds within this source.
    pub fn clamp_span(&self, span: &Span) -> Span {
        let len = self.content.len();
        let start = span.start.min(len);
        let end = span.end.min(len).max(start);
        start..end
    }
}

/// Converts diagnostics to miette reports with source context.
pub fn convert_diagnostics_to_reports(diagnostics: &[Diag], source: &SourceFile) -> Vec<Report> {
    diagnostics
        .iter()
        .map(|diag| convert_diag_to_report(diag, source))
        .collect()
}

/// Converts a single diagnostic to a miette report.
///
/// Spans outside the source are clamped rather than rejected.
pub fn convert_diag_to_report(diag: &Diag, source: &SourceFile) -> Report {
    let report = Report::new(RenderedDiagnostic::build(diag, source));
    match source.name() {
        Some(name) => {
            report.with_source_code(miette::NamedSource::new(name, source.content().to_string()))
        }
        None => report.with_source_code(source.content().to_string()),
    }
}

#[derive(Debug)]
struct RenderedDiagnostic {
    message: String,
    code: Option<String>,
    help: Option<String>,
    labels: Vec<LabeledSpan>,
}

impl RenderedDiagnostic {
    fn build(diag: &Diag, source: &SourceFile) -> Self {
        let labels = diag
            .labels
            .iter()
            .map(|label| {
                let clamped = source.clamp_span(&label.span);
                let span = (clamped.start, clamped.end - clamped.start);
                let text = Some(label.message.clone());
                match label.role {
                    LabelRole::Primary => LabeledSpan::new_primary_with_span(text, span),
                    LabelRole::Secondary => LabeledSpan::new_with_span(text, span),
                }
            })
            .collect();

        Self {
            message: diag.message.clone(),
            code: diag.code.clone(),
            help: diag.help.clone(),
            labels,
        }
    }
}

impl fmt::Display for RenderedDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RenderedDiagnostic {}

impl Diagnostic for RenderedDiagnostic {
    fn severity(&self) -> Option<Severity> {
        Some(Severity::Error)
    }

    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.code
            .as_ref()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.labels.is_empty() {
            None
        } else {
            Some(Box::new(self.labels.clone().into_iter()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_labels_help_and_code() {
        let diag = Diag::error("unexpected token")
            .with_primary_label(7..10, "here")
            .with_secondary_label(0..6, "in this SELECT")
            .with_help("remove the trailing comma")
            .with_code("syntax::unexpected_token");

        assert_eq!(diag.labels.len(), 2);
        assert_eq!(diag.primary_span(), Some(&(7..10)));
        assert_eq!(diag.help.as_deref(), Some("remove the trailing comma"));
        assert_eq!(diag.code.as_deref(), Some("syntax::unexpected_token"));
    }

    #[test]
    fn primary_span_skips_secondary_labels() {
        let diag = Diag::error("odd")
            .with_secondary_label(0..1, "context")
            .with_primary_label(4..6, "focus");
        assert_eq!(diag.primary_span(), Some(&(4..6)));
        assert_eq!(Diag::error("bare").primary_span(), None);
    }

    #[test]
    fn clamp_span_stays_in_bounds() {
        let src = SourceFile::new("SELECT");
        assert_eq!(src.clamp_span(&(0..10)), 0..6);
        let inverted = std::ops::Range { start: 3, end: 2 };
        assert_eq!(src.clamp_span(&inverted), 3..3);
        assert_eq!(src.clamp_span(&(10..20)), 6..6);
    }

    #[test]
    fn report_keeps_message_code_and_labels() {
        let source = SourceFile::with_name("SELECT sum(a, b) AS s FROM t", "cfg.query");
        let diag = Diag::error("bad select")
            .with_primary_label(7..21, "not a plain column")
            .with_code("config::plain_column_select");

        let report = convert_diag_to_report(&diag, &source);
        assert_eq!(report.to_string(), "bad select");

        let built = RenderedDiagnostic::build(&diag, &source);
        assert_eq!(built.code.as_deref(), Some("config::plain_column_select"));
        assert_eq!(built.severity(), Some(Severity::Error));
        assert_eq!(built.labels.len(), 1);
        assert!(built.labels[0].primary());
        assert_eq!(built.labels[0].offset(), 7);
        assert_eq!(built.labels[0].len(), 14);
    }

    #[test]
    fn out_of_bounds_labels_do_not_panic() {
        let source = SourceFile::new("short");
        let diag = Diag::error("error").with_primary_label(0..100, "out of bounds");
        let reports = convert_diagnostics_to_reports(&[diag], &source);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].to_string(), "error");
    }
}
