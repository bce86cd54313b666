mod common;

use common::{AccuracyConfig, ClassifierTrainConfig, query};
use sql_config_validator::{
    ConfigValidationError, Constraint, Field, InputQuery, ModelFileUrl, MustContainFrom,
    ValidatedConfig, ValidationAttempt, ValidationResult, ValidationState, validate_config,
    validate_query,
};
use std::sync::atomic::{AtomicUsize, Ordering};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn valid_classifier_config_passes() {
    init_tracing();
    let config = ClassifierTrainConfig::new("SELECT {a, b} AS features, c AS label FROM data");
    assert!(validate_config(&config).is_ok());
}

#[test]
fn first_failing_constraint_wins() {
    init_tracing();
    // Violates MustContainFrom, NoGroupByHaving and FeaturesLabelSelect; only
    // the first bound constraint is reported.
    let config = ClassifierTrainConfig::new("SELECT sum(a) AS s GROUP BY a");
    let err = validate_config(&config).unwrap_err();
    assert_eq!(err.field(), "trainingData");
    assert_eq!(err.constraint(), "must_contain_from");
}

#[test]
fn query_failures_precede_function_check() {
    let mut config = ClassifierTrainConfig::new("SELECT x FROM t");
    config.function_name = "classify".into();
    config.model_file_url = ModelFileUrl::new("nowhere");

    let err = validate_config(&config).unwrap_err();
    assert_eq!(err.constraint(), "features_label_select");

    config.training_data = query("SELECT {x} AS features, y AS label FROM t");
    let err = validate_config(&config).unwrap_err();
    assert_eq!(err.field(), "modelFileUrl");
    assert_eq!(
        err.message(),
        "classifier.train requires a valid modelFileUrl when specifying a functionName. \
         modelFileUrl 'nowhere' is invalid."
    );

    config.model_file_url = ModelFileUrl::new("file://models/classify.cls");
    assert!(validate_config(&config).is_ok());
}

#[test]
fn optional_field_is_validated_only_when_present() {
    let mut config = AccuracyConfig {
        testing_data: query("SELECT s AS score, l AS label FROM t"),
        output_dataset: None,
    };
    assert!(validate_config(&config).is_ok());

    config.output_dataset = Some(query("SELECT a + b AS total FROM results"));
    let err = validate_config(&config).unwrap_err();
    assert_eq!(err.field(), "outputDataset");
    assert_eq!(err.surface(), Some("a + b AS total"));
}

#[test]
fn empty_required_query_lacks_from() {
    let config = AccuracyConfig {
        testing_data: query(""),
        output_dataset: None,
    };
    let err = validate_config(&config).unwrap_err();
    assert_eq!(err.to_string(), "testingData must contain a FROM clause");
}

#[test]
fn validation_is_idempotent() {
    let config = ClassifierTrainConfig::new("SELECT a, sum(b) AS s FROM t");
    let first = validate_config(&config);
    let second = validate_config(&config);
    assert!(first.is_err());
    assert_eq!(first, second);
}

#[test]
fn instrumented_constraint_is_never_invoked_after_failure() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);

    struct Instrumented;
    impl Constraint for Instrumented {
        fn name(&self) -> &'static str {
            "instrumented"
        }
        fn check_query(&self, _: &InputQuery, _: &str) -> ValidationResult {
            CALLS.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    let validator = validate_query(
        Field::new("trainingData", |c: &ClassifierTrainConfig| &c.training_data),
        &[&MustContainFrom, &Instrumented],
    );
    let config = ClassifierTrainConfig::new("SELECT 1");
    assert!(validator.validate(&config).is_err());
    assert!(validator.validate(&config).is_err());
    assert_eq!(CALLS.load(Ordering::SeqCst), 0);
}

#[test]
fn attempt_records_terminal_state() {
    let validator = ClassifierTrainConfig::validator();
    let config = ClassifierTrainConfig::new("SELECT x FROM t HAVING x > 1");

    let mut attempt = ValidationAttempt::new();
    let err = attempt.run(&validator, &config).unwrap_err();
    assert_eq!(err.constraint(), "no_group_by_having");
    assert_eq!(attempt.state(), &ValidationState::Failed(err));
}

#[test]
fn error_renders_against_query_source() {
    let config = ClassifierTrainConfig::new("SELECT {a} AS features, lower(b) AS label FROM t");
    let err: ConfigValidationError = validate_config(&config).unwrap_err();
    assert_eq!(err.span(), Some(&(24..41)));

    let report = err.to_report(config.training_data.source());
    assert_eq!(report.to_string(), err.message());
    let rendered = format!("{report:?}");
    assert!(rendered.contains("config::plain_column_select"), "{rendered}");
}

#[test]
fn validator_is_shared_across_threads() {
    let validator = ClassifierTrainConfig::validator();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let validator = validator.clone();
            std::thread::spawn(move || {
                let source = if i % 2 == 0 {
                    "SELECT {a} AS features, b AS label FROM t"
                } else {
                    "SELECT a FROM t"
                };
                validator
                    .validate(&ClassifierTrainConfig::new(source))
                    .is_ok()
            })
        })
        .collect();

    let outcomes: Vec<bool> = handles
        .into_iter()
        .map(|h| h.join().expect("validation thread panicked"))
        .collect();
    assert_eq!(outcomes, vec![true, false, true, false]);
}
