//! Binding constraints to config fields and composing the resulting
//! validators.
//!
//! # Short-circuiting
//!
//! Every layer stops at the first failure: the constraints bound to one
//! field run left to right, and validators composed with
//! [`Validator::then`] run in order. Exactly one error, the first, is ever
//! surfaced for a validation attempt.
//!
//! # Example
//!
//! ```
//! use sql_config_validator::{
//!     EntityConfig, Field, InputQuery, MustContainFrom, NoGroupByHaving, ValidatedConfig,
//!     Validator, validate_config, validate_query,
//! };
//!
//! struct ImportConfig {
//!     input_data: InputQuery,
//! }
//!
//! impl EntityConfig for ImportConfig {
//!     const NAME: &'static str = "import";
//! }
//!
//! impl ValidatedConfig for ImportConfig {
//!     fn validator() -> Validator<Self> {
//!         validate_query(
//!             Field::new("inputData", |c: &ImportConfig| &c.input_data),
//!             &[&NoGroupByHaving, &MustContainFrom],
//!         )
//!     }
//! }
//!
//! let config = ImportConfig {
//!     input_data: InputQuery::from_sql("SELECT 1").unwrap(),
//! };
//! let err = validate_config(&config).unwrap_err();
//! assert_eq!(err.to_string(), "inputData must contain a FROM clause");
//! ```

use crate::config::{EntityConfig, Field, QueryField};
use crate::constraint::{Constraint, FunctionModelConfig, FunctionModelConsistency};
use crate::error::ConfigValidationError;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Outcome of validating a config.
pub type ValidationResult = Result<(), ConfigValidationError>;

/// A reusable check over configs of type `C`.
///
/// Cheap to clone; clones share the same underlying check.
pub struct Validator<C> {
    check: Arc<dyn Fn(&C) -> ValidationResult + Send + Sync>,
}

impl<C: 'static> Validator<C> {
    /// Wraps a check function.
    pub fn new(check: impl Fn(&C) -> ValidationResult + Send + Sync + 'static) -> Self {
        Self {
            check: Arc::new(check),
        }
    }

    /// A validator that accepts everything.
    pub fn accept_all() -> Self {
        Self::new(|_| Ok(()))
    }

    /// Runs this validator against `config`.
    pub fn validate(&self, config: &C) -> ValidationResult {
        (self.check)(config)
    }

    /// Runs `self`, then `next` only if `self` succeeded.
    pub fn then(self, next: Validator<C>) -> Validator<C> {
        Validator::new(move |config: &C| {
            self.validate(config)?;
            next.validate(config)
        })
    }

    /// Composes validators in iteration order.
    pub fn all(validators: impl IntoIterator<Item = Validator<C>>) -> Validator<C> {
        let validators: Vec<_> = validators.into_iter().collect();
        Validator::new(move |config: &C| {
            validators
                .iter()
                .try_for_each(|validator| validator.validate(config))
        })
    }
}

impl<C> Clone for Validator<C> {
    fn clone(&self) -> Self {
        Self {
            check: Arc::clone(&self.check),
        }
    }
}

impl<C> fmt::Debug for Validator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator").finish_non_exhaustive()
    }
}

/// Composes two validators; equivalent to `first.then(second)`.
pub fn chain<C: 'static>(first: Validator<C>, second: Validator<C>) -> Validator<C> {
    first.then(second)
}

/// Binds `constraints` to one query field.
///
/// The returned validator reads the field's current value on every call and
/// applies the constraints left to right, stopping at the first failure.
pub fn validate_query<C, F>(
    field: Field<C, F>,
    constraints: &[&'static dyn Constraint],
) -> Validator<C>
where
    C: 'static,
    F: QueryField + 'static,
{
    let constraints = constraints.to_vec();
    let applicability = field.applicability();
    debug!(
        field = field.name(),
        ?applicability,
        constraints = constraints.len(),
        "bound query constraints"
    );
    Validator::new(move |config: &C| {
        let query = field.get(config).query();
        constraints.iter().try_for_each(|constraint| {
            trace!(
                field = field.name(),
                constraint = constraint.name(),
                ?applicability,
                absent = query.is_none(),
                "checking constraint"
            );
            constraint.check(query, field.name()).inspect_err(|err| {
                debug!(
                    field = field.name(),
                    constraint = constraint.name(),
                    error = err.message(),
                    "constraint failed"
                );
            })
        })
    })
}

/// Validator requiring a valid model file whenever a function is named.
pub fn validate_function<C: FunctionModelConfig + 'static>() -> Validator<C> {
    Validator::new(|config: &C| {
        FunctionModelConsistency
            .check_config(config)
            .inspect_err(|err| {
                debug!(
                    config = C::NAME,
                    constraint = FunctionModelConsistency::NAME,
                    error = err.message(),
                    "constraint failed"
                );
            })
    })
}

/// A config type with a fixed, ordered validation chain.
pub trait ValidatedConfig: EntityConfig + Sized + 'static {
    /// Returns the chain run before an entity is built from this config.
    fn validator() -> Validator<Self>;
}

/// Runs the registered chain for `config`.
pub fn validate_config<C: ValidatedConfig>(config: &C) -> ValidationResult {
    debug!(config = C::NAME, "validating config");
    let result = C::validator().validate(config);
    match &result {
        Ok(()) => debug!(config = C::NAME, "config validated"),
        Err(err) => debug!(config = C::NAME, field = err.field(), "config rejected"),
    }
    result
}

/// State of one validation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationState {
    /// Nothing has run yet.
    Pending,
    /// A constraint failed; terminal.
    Failed(ConfigValidationError),
    /// The whole chain passed; terminal.
    Validated,
}

/// Tracks a single validation attempt for one construction.
///
/// The chain runs at most once: once the attempt is terminal, further calls
/// to [`ValidationAttempt::run`] return the recorded outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationAttempt {
    state: ValidationState,
}

impl ValidationAttempt {
    /// Creates a pending attempt.
    pub fn new() -> Self {
        Self {
            state: ValidationState::Pending,
        }
    }

    /// Current state.
    pub fn state(&self) -> &ValidationState {
        &self.state
    }

    /// Returns true once the attempt has failed or validated.
    pub fn is_terminal(&self) -> bool {
        !matches!(self.state, ValidationState::Pending)
    }

    /// Runs `validator` against `config` if still pending.
    pub fn run<C: 'static>(&mut self, validator: &Validator<C>, config: &C) -> ValidationResult {
        if self.state == ValidationState::Pending {
            self.state = match validator.validate(config) {
                Ok(()) => ValidationState::Validated,
                Err(err) => ValidationState::Failed(err),
            };
        }
        match &self.state {
            ValidationState::Failed(err) => Err(err.clone()),
            ValidationState::Validated | ValidationState::Pending => Ok(()),
        }
    }
}

impl Default for ValidationAttempt {
    fn default() -> Self {
        Self::new()
    }
}
