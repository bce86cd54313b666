//! Structural constraints on config queries.
//!
//! A constraint is a pure rule over one query. It never mutates the query,
//! and it always accepts an absent query: optional fields that were left
//! out have nothing to violate.

mod function;
mod select;
mod statement;

pub use function::{FunctionModelConfig, FunctionModelConsistency};
pub use select::{
    COMPUTED_INNER_ALLOW_LIST, FeaturesLabelSelect, PlainColumnSelect, ScoreLabelSelect,
    contains_named_sub_select,
};
pub use statement::{MustContainFrom, NoGroupByHaving};

use crate::ast::InputQuery;
use crate::error::ConfigValidationError;

/// A rule a query field must satisfy.
///
/// Implementors only provide [`Constraint::check_query`]; absence handling
/// is shared through the provided [`Constraint::check`].
pub trait Constraint: Send + Sync {
    /// Short snake_case name, also used in diagnostic codes.
    fn name(&self) -> &'static str;

    /// Checks a present query. `field` is the config field name used in
    /// messages.
    fn check_query(&self, query: &InputQuery, field: &str) -> Result<(), ConfigValidationError>;

    /// Checks a possibly-absent query. Absent queries always pass.
    fn check(&self, query: Option<&InputQuery>, field: &str) -> Result<(), ConfigValidationError> {
        match query {
            Some(query) => self.check_query(query, field),
            None => Ok(()),
        }
    }
}
