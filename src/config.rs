//! Typed surface between entity configs and the validators.
//!
//! Configs are plain application structs. They expose their type name via
//! [`EntityConfig`], and each validated field through an explicit
//! [`Field`] accessor, so no reflection is involved.

use crate::ast::InputQuery;
use std::fmt;
use url::Url;

/// A configuration record for some kind of entity.
pub trait EntityConfig {
    /// Config type name used in diagnostics, e.g. `"classifier.train"`.
    const NAME: &'static str;
}

/// Whether a query field must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applicability {
    Required,
    Optional,
}

/// A config field holding a query.
///
/// Implemented for `InputQuery` (required) and `Option<InputQuery>`
/// (optional; `None` is an absent query and passes every constraint).
pub trait QueryField {
    /// Returns the query, or `None` when absent.
    fn query(&self) -> Option<&InputQuery>;

    /// Whether this field type is required or optional.
    fn applicability() -> Applicability;
}

impl QueryField for InputQuery {
    fn query(&self) -> Option<&InputQuery> {
        Some(self)
    }

    fn applicability() -> Applicability {
        Applicability::Required
    }
}

impl QueryField for Option<InputQuery> {
    fn query(&self) -> Option<&InputQuery> {
        self.as_ref()
    }

    fn applicability() -> Applicability {
        Applicability::Optional
    }
}

/// Accessor pair for one config field: its name and a getter.
pub struct Field<C, F> {
    name: &'static str,
    get: fn(&C) -> &F,
}

impl<C, F> Field<C, F> {
    /// Creates a field accessor.
    pub const fn new(name: &'static str, get: fn(&C) -> &F) -> Self {
        Self { name, get }
    }

    /// The field name as it appears in the config document.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Reads the field's current value.
    pub fn get<'c>(&self, config: &'c C) -> &'c F {
        (self.get)(config)
    }
}

impl<C, F: QueryField> Field<C, F> {
    /// Whether the query behind this field must be present.
    pub fn applicability(&self) -> Applicability {
        F::applicability()
    }
}

impl<C, F> Clone for Field<C, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, F> Copy for Field<C, F> {}

impl<C, F> fmt::Debug for Field<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field").field("name", &self.name).finish()
    }
}

/// Reference to a model file, as configured.
///
/// Kept verbatim so diagnostics can quote exactly what was written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelFileUrl(String);

impl ModelFileUrl {
    /// Wraps a raw reference.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The reference exactly as configured.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the reference is a usable URL.
    ///
    /// The reference must parse as a URL. Network schemes additionally need
    /// an explicit `//host`. `file:` URLs need a non-empty path, where a
    /// relative `file://model.cls` counts through its host part. Whitespace
    /// and control characters are never allowed, even where the URL parser
    /// would strip them.
    pub fn is_valid(&self) -> bool {
        if self.0.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return false;
        }
        let Ok(url) = Url::parse(&self.0) else {
            return false;
        };

        let has_host = url.host_str().is_some_and(|host| !host.is_empty());
        if url.scheme() == "file" {
            return has_host || !url.path().trim_start_matches('/').is_empty();
        }

        // The parser tolerates `http:host` and `http:///host`; require the
        // authority to be written out.
        let written_authority = self
            .0
            .split_once(':')
            .and_then(|(_, rest)| rest.strip_prefix("//"))
            .is_some_and(|authority| !authority.starts_with('/'));
        written_authority && has_host
    }
}

impl fmt::Display for ModelFileUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModelFileUrl {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}
