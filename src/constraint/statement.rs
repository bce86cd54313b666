//! Constraints on the statement shape: GROUP BY/HAVING and FROM.

use crate::ast::{InputQuery, cover};
use crate::constraint::Constraint;
use crate::error::ConfigValidationError;

/// Rejects queries with a GROUP BY list or a non-trivial HAVING clause.
///
/// GROUP BY is checked first; when it is present HAVING is not looked at.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGroupByHaving;

impl Constraint for NoGroupByHaving {
    fn name(&self) -> &'static str {
        "no_group_by_having"
    }

    fn check_query(&self, query: &InputQuery, field: &str) -> Result<(), ConfigValidationError> {
        let group_by = query.group_by();
        if let (Some(first), Some(last)) = (group_by.first(), group_by.last()) {
            let span = cover(&first.span(), &last.span());
            return Err(ConfigValidationError::new(
                field,
                self.name(),
                format!("{field} does not support groupBy clause"),
            )
            .at(query.surface(&span), span));
        }

        if let Some(having) = query.having() {
            if !having.is_constant_true() {
                let span = having.span();
                return Err(ConfigValidationError::new(
                    field,
                    self.name(),
                    format!("{field} does not support having clause"),
                )
                .at(query.surface(&span), span));
            }
        }

        Ok(())
    }
}

/// Requires a FROM clause with non-empty surface text.
///
/// A query without any statement has no FROM clause and is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct MustContainFrom;

impl Constraint for MustContainFrom {
    fn name(&self) -> &'static str {
        "must_contain_from"
    }

    fn check_query(&self, query: &InputQuery, field: &str) -> Result<(), ConfigValidationError> {
        match query.from_surface() {
            Some(surface) if !surface.is_empty() => Ok(()),
            _ => Err(ConfigValidationError::new(
                field,
                self.name(),
                format!("{field} must contain a FROM clause"),
            )),
        }
    }
}
