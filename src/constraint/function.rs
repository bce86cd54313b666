//! Consistency between a config's function name and its model file.

use crate::config::{EntityConfig, ModelFileUrl};
use crate::error::ConfigValidationError;

/// Config types that may name a function backed by a model file.
pub trait FunctionModelConfig: EntityConfig {
    /// Name of the function to create; empty when none is requested.
    fn function_name(&self) -> &str;

    /// Where the trained model is stored.
    fn model_file_url(&self) -> &ModelFileUrl;
}

/// Requires a valid model file whenever a function name is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionModelConsistency;

impl FunctionModelConsistency {
    /// Constraint name used in diagnostic codes.
    pub const NAME: &'static str = "function_model_consistency";

    /// Field reported on failure.
    pub const FIELD: &'static str = "modelFileUrl";

    /// Checks the pair of values for the config type `config_name`.
    pub fn check(
        &self,
        config_name: &str,
        function_name: &str,
        model_file_url: &ModelFileUrl,
    ) -> Result<(), ConfigValidationError> {
        if function_name.is_empty() || model_file_url.is_valid() {
            return Ok(());
        }
        Err(ConfigValidationError::new(
            Self::FIELD,
            Self::NAME,
            format!(
                "{config_name} requires a valid modelFileUrl when specifying a functionName. \
                 modelFileUrl '{model_file_url}' is invalid."
            ),
        ))
    }

    /// Checks a config through its [`FunctionModelConfig`] accessors.
    pub fn check_config<C: FunctionModelConfig>(
        &self,
        config: &C,
    ) -> Result<(), ConfigValidationError> {
        self.check(C::NAME, config.function_name(), config.model_file_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_without_valid_model_is_rejected() {
        let err = FunctionModelConsistency
            .check("classifier.train", "f", &ModelFileUrl::new("not a url"))
            .unwrap_err();
        assert_eq!(err.field(), "modelFileUrl");
        assert_eq!(
            err.message(),
            "classifier.train requires a valid modelFileUrl when specifying a functionName. \
             modelFileUrl 'not a url' is invalid."
        );
    }

    #[test]
    fn no_function_means_no_requirement() {
        assert!(
            FunctionModelConsistency
                .check("classifier.train", "", &ModelFileUrl::new("not a url"))
                .is_ok()
        );
    }

    #[test]
    fn valid_model_is_accepted() {
        assert!(
            FunctionModelConsistency
                .check("classifier.train", "f", &ModelFileUrl::new("file://model.cls"))
                .is_ok()
        );
    }
}
