//! Common test utilities
//!
//! Shared fixtures for the integration tests: sample entity configs with
//! their registered validation chains, plus small parsing helpers.

#![allow(dead_code)]

use sql_config_validator::{
    EntityConfig, FeaturesLabelSelect, Field, FunctionModelConfig, InputQuery, ModelFileUrl,
    MustContainFrom, NoGroupByHaving, PlainColumnSelect, ScoreLabelSelect, ValidatedConfig,
    Validator, parse, validate_function, validate_query,
};

// ============================================================================
// Parsing Helpers
// ============================================================================

/// Parse source into a query, panicking with rendered diagnostics on error.
pub fn query(source: &str) -> InputQuery {
    let result = parse(source);
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics for `{source}`: {}",
        format_diagnostics(&result.diagnostics)
    );
    result.ast.expect("parse produced no query")
}

/// Format diagnostics for display in assertion messages.
pub fn format_diagnostics(diags: &[miette::Report]) -> String {
    diags
        .iter()
        .map(|diag| format!("{diag:?}"))
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// Sample Configs
// ============================================================================

/// Training config for a classifier procedure.
#[derive(Debug, Clone)]
pub struct ClassifierTrainConfig {
    pub training_data: InputQuery,
    pub function_name: String,
    pub model_file_url: ModelFileUrl,
}

impl EntityConfig for ClassifierTrainConfig {
    const NAME: &'static str = "classifier.train";
}

impl FunctionModelConfig for ClassifierTrainConfig {
    fn function_name(&self) -> &str {
        &self.function_name
    }

    fn model_file_url(&self) -> &ModelFileUrl {
        &self.model_file_url
    }
}

impl ValidatedConfig for ClassifierTrainConfig {
    fn validator() -> Validator<Self> {
        validate_query(
            Field::new("trainingData", |c: &ClassifierTrainConfig| &c.training_data),
            &[
                &MustContainFrom,
                &NoGroupByHaving,
                &PlainColumnSelect,
                &FeaturesLabelSelect,
            ],
        )
        .then(validate_function())
    }
}

impl ClassifierTrainConfig {
    pub fn new(training_data: &str) -> Self {
        Self {
            training_data: query(training_data),
            function_name: String::new(),
            model_file_url: ModelFileUrl::default(),
        }
    }
}

/// Accuracy evaluation config with an optional second query.
#[derive(Debug, Clone)]
pub struct AccuracyConfig {
    pub testing_data: InputQuery,
    pub output_dataset: Option<InputQuery>,
}

impl EntityConfig for AccuracyConfig {
    const NAME: &'static str = "classifier.test";
}

impl ValidatedConfig for AccuracyConfig {
    fn validator() -> Validator<Self> {
        Validator::all([
            validate_query(
                Field::new("testingData", |c: &AccuracyConfig| &c.testing_data),
                &[&MustContainFrom, &NoGroupByHaving, &ScoreLabelSelect],
            ),
            validate_query(
                Field::new("outputDataset", |c: &AccuracyConfig| &c.output_dataset),
                &[&MustContainFrom, &PlainColumnSelect],
            ),
        ])
    }
}
