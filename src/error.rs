//! The single failure type raised by config validation.

use crate::ast::Span;
use crate::diag::{Diag, SourceFile, convert_diag_to_report};
use miette::{Diagnostic, LabeledSpan, Report, Severity};
use smol_str::SmolStr;
use std::fmt;

/// A config was rejected by one of its validators.
///
/// Carries the field that failed, the constraint that rejected it, a
/// human-readable message and, when the failure points at a query fragment,
/// that fragment's surface text and span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    field: SmolStr,
    constraint: &'static str,
    message: String,
    surface: Option<String>,
    span: Option<Span>,
}

impl ConfigValidationError {
    /// Creates an error without a source location.
    pub fn new(
        field: impl Into<SmolStr>,
        constraint: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            constraint,
            message: message.into(),
            surface: None,
            span: None,
        }
    }

    /// Attaches the offending query fragment.
    pub fn at(mut self, surface: impl Into<String>, span: Span) -> Self {
        self.surface = Some(surface.into());
        self.span = Some(span);
        self
    }

    /// Name of the rejected field.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Name of the constraint that failed, e.g. `must_contain_from`.
    pub fn constraint(&self) -> &'static str {
        self.constraint
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Surface text of the offending fragment, if any.
    pub fn surface(&self) -> Option<&str> {
        self.surface.as_deref()
    }

    /// Span of the offending fragment in the query source, if any.
    pub fn span(&self) -> Option<&Span> {
        self.span.as_ref()
    }

    /// Diagnostic code, `config::<constraint>`.
    pub fn code(&self) -> String {
        format!("config::{}", self.constraint)
    }

    /// Converts this error into the crate's diagnostic model.
    pub fn to_diag(&self) -> Diag {
        let diag = Diag::error(self.message.clone()).with_code(self.code());
        match &self.span {
            Some(span) => diag.with_primary_label(span.clone(), format!("rejected in {}", self.field)),
            None => diag,
        }
    }

    /// Renders this error against the query text it was raised for.
    pub fn to_report(&self, query_source: &str) -> Report {
        let source = SourceFile::with_name(query_source, self.field.as_str());
        convert_diag_to_report(&self.to_diag(), &source)
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ConfigValidationError {}

impl Diagnostic for ConfigValidationError {
    fn severity(&self) -> Option<Severity> {
        Some(Severity::Error)
    }

    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code()))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span.as_ref()?;
        let label = LabeledSpan::new_primary_with_span(
            Some(format!("rejected in {}", self.field)),
            (span.start, span.end - span.start),
        );
        Some(Box::new(std::iter::once(label)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_message() {
        let err = ConfigValidationError::new(
            "trainingData",
            "must_contain_from",
            "trainingData must contain a FROM clause",
        );
        assert_eq!(err.to_string(), "trainingData must contain a FROM clause");
        assert_eq!(err.field(), "trainingData");
        assert_eq!(err.surface(), None);
        assert!(err.labels().is_none());
    }

    #[test]
    fn located_error_has_label_and_code() {
        let err = ConfigValidationError::new("q", "plain_column_select", "bad clause")
            .at("sum(a,b) AS s", 7..20);
        assert_eq!(err.surface(), Some("sum(a,b) AS s"));
        assert_eq!(err.code(), "config::plain_column_select");

        let labels: Vec<_> = err.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 7);
        assert_eq!(labels[0].len(), 13);

        let diag = err.to_diag();
        assert_eq!(diag.primary_span(), Some(&(7..20)));
        assert_eq!(diag.code.as_deref(), Some("config::plain_column_select"));
    }

    #[test]
    fn report_renders_message() {
        let err = ConfigValidationError::new("q", "plain_column_select", "bad clause")
            .at("sum(a,b) AS s", 7..20);
        let report = err.to_report("SELECT sum(a,b) AS s FROM t");
        assert_eq!(report.to_string(), "bad clause");
    }
}
