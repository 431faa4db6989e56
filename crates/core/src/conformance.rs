//! Provider Conformance Checks
//!
//! Runs the behavioural properties every `ExerciseProvider` is expected to
//! honour against a concrete implementation, and collects the results into a
//! serializable report. Implementers call `check_conformance` from their own
//! test suites with the exercise types and levels they claim to support.

use crate::{
    error::ContractError, evaluation::Evaluation, params::Params, provider::ExerciseProvider,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// An `(exercise_type, level)` pair a provider claims to support.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConformanceCase {
    pub exercise_type: String,
    pub level: String,
}

impl ConformanceCase {
    pub fn new(exercise_type: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            exercise_type: exercise_type.into(),
            level: level.into(),
        }
    }
}

impl fmt::Display for ConformanceCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.exercise_type, self.level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    /// The provider generates an exercise for a supported case.
    Generates,
    NonEmptyPrompt,
    /// Present options are non-empty unless the exercise is flagged open-ended.
    OptionsWellFormed,
    /// Evaluation succeeds and its score is finite.
    FiniteScore,
    /// Submitting a plain-string answer as the response is judged correct.
    AnswerSoundness,
    FeedbackReturned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Violation,
    /// A soundness expectation that the contract itself does not guarantee.
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub case: ConformanceCase,
    pub property: Property,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConformanceReport {
    pub cases_checked: usize,
    pub findings: Vec<Finding>,
}

impl ConformanceReport {
    /// True when no finding is a violation. Warnings are allowed.
    pub fn is_conformant(&self) -> bool {
        self.violations().next().is_none()
    }

    pub fn violations(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Violation)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }

    fn record(
        &mut self,
        case: &ConformanceCase,
        property: Property,
        severity: Severity,
        message: impl Into<String>,
    ) {
        let message = message.into();
        debug!(%case, ?property, ?severity, %message, "Conformance finding");
        self.findings.push(Finding {
            case: case.clone(),
            property,
            severity,
            message,
        });
    }
}

/// Checks `provider` against every case and returns the collected findings.
///
/// The provider is only called through the public operations, so any
/// implementation can be checked, including one wrapped in `CheckedProvider`.
pub async fn check_conformance<P>(
    provider: &P,
    cases: &[ConformanceCase],
    params: &Params,
) -> ConformanceReport
where
    P: ExerciseProvider + ?Sized,
{
    let mut report = ConformanceReport::default();
    for case in cases {
        report.cases_checked += 1;
        check_case(provider, case, params, &mut report).await;
    }
    info!(
        cases = report.cases_checked,
        violations = report.violations().count(),
        warnings = report.warnings().count(),
        "Conformance check finished"
    );
    report
}

async fn check_case<P>(
    provider: &P,
    case: &ConformanceCase,
    params: &Params,
    report: &mut ConformanceReport,
) where
    P: ExerciseProvider + ?Sized,
{
    let exercise = match provider
        .generate_exercise(&case.exercise_type, &case.level, params)
        .await
    {
        Ok(exercise) => exercise,
        Err(e) => {
            report.record(
                case,
                Property::Generates,
                Severity::Violation,
                format!("generate_exercise failed: {e:#}"),
            );
            return;
        }
    };

    match exercise.validate() {
        Ok(()) => {}
        Err(e @ ContractError::EmptyPrompt) => {
            report.record(case, Property::NonEmptyPrompt, Severity::Violation, e.to_string())
        }
        Err(e) => report.record(
            case,
            Property::OptionsWellFormed,
            Severity::Violation,
            e.to_string(),
        ),
    }

    let blank = provider.evaluate_response(&exercise, "", params).await;
    check_evaluation(case, "an empty response", blank, report);

    if let Some(answer) = exercise.answer_text() {
        let result = provider.evaluate_response(&exercise, answer, params).await;
        if let Some(evaluation) = check_evaluation(case, "its own answer", result, report) {
            if !evaluation.is_correct {
                report.record(
                    case,
                    Property::AnswerSoundness,
                    Severity::Warning,
                    format!("the exercise's own answer {answer:?} was judged incorrect"),
                );
            }
        }
    }

    if let Err(e) = provider.provide_feedback(&exercise, "", params).await {
        report.record(
            case,
            Property::FeedbackReturned,
            Severity::Violation,
            format!("provide_feedback failed: {e:#}"),
        );
    }
}

fn check_evaluation(
    case: &ConformanceCase,
    what: &str,
    result: anyhow::Result<Evaluation>,
    report: &mut ConformanceReport,
) -> Option<Evaluation> {
    match result {
        Ok(evaluation) => {
            if let Err(e) = evaluation.validate() {
                report.record(
                    case,
                    Property::FiniteScore,
                    Severity::Violation,
                    format!("evaluating {what}: {e}"),
                );
            }
            Some(evaluation)
        }
        Err(e) => {
            report.record(
                case,
                Property::FiniteScore,
                Severity::Violation,
                format!("evaluate_response failed for {what}: {e:#}"),
            );
            None
        }
    }
}

/// Convenience for building cases from string pairs.
pub fn cases<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Vec<ConformanceCase> {
    pairs
        .into_iter()
        .map(|(exercise_type, level)| ConformanceCase::new(exercise_type, level))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{exercise::Exercise, provider::MockExerciseProvider};
    use anyhow::anyhow;

    fn well_behaved() -> MockExerciseProvider {
        let mut mock = MockExerciseProvider::new();
        mock.expect_generate_exercise()
            .returning(|_, _, _| Ok(Exercise::new("The cat ___ on the mat.").with_answer("sat")));
        mock.expect_evaluate_response().returning(|exercise, response, _| {
            if exercise.answer_text() == Some(response) {
                Ok(Evaluation::correct())
            } else {
                Ok(Evaluation::incorrect().with_feedback("Expected: sat"))
            }
        });
        mock.expect_provide_feedback()
            .returning(|_, _, _| Ok("Think about sitting.".to_string()));
        mock
    }

    #[tokio::test]
    async fn test_well_behaved_provider_is_conformant() {
        let provider = well_behaved();
        let report = check_conformance(
            &provider,
            &cases([("fill_blank", "beginner"), ("fill_blank", "advanced")]),
            &Params::new(),
        )
        .await;

        assert_eq!(report.cases_checked, 2);
        assert!(report.findings.is_empty(), "{:?}", report.findings);
        assert!(report.is_conformant());
    }

    #[tokio::test]
    async fn test_generation_failure_is_a_violation() {
        let mut mock = MockExerciseProvider::new();
        mock.expect_generate_exercise()
            .returning(|_, _, _| Err(anyhow!("model offline")));

        let report =
            check_conformance(&mock, &cases([("vocab_quiz", "beginner")]), &Params::new()).await;

        assert!(!report.is_conformant());
        let finding = report.violations().next().unwrap();
        assert_eq!(finding.property, Property::Generates);
        assert!(finding.message.contains("model offline"));
        assert_eq!(finding.case.to_string(), "vocab_quiz/beginner");
    }

    #[tokio::test]
    async fn test_malformed_results_are_reported() {
        let mut mock = MockExerciseProvider::new();
        mock.expect_generate_exercise()
            .returning(|_, _, _| Ok(Exercise::new("Pick one").with_options(Vec::<String>::new())));
        mock.expect_evaluate_response()
            .returning(|_, _, _| Ok(Evaluation::new(false, f64::INFINITY)));
        mock.expect_provide_feedback()
            .returning(|_, _, _| Ok(String::new()));

        let report =
            check_conformance(&mock, &cases([("choice", "beginner")]), &Params::new()).await;

        let properties: Vec<Property> = report.violations().map(|f| f.property).collect();
        assert_eq!(
            properties,
            vec![Property::OptionsWellFormed, Property::FiniteScore]
        );
    }

    #[tokio::test]
    async fn test_unsound_evaluation_is_only_a_warning() {
        let mut mock = MockExerciseProvider::new();
        mock.expect_generate_exercise()
            .returning(|_, _, _| Ok(Exercise::new("Translate 'gato'.").with_answer("cat")));
        mock.expect_evaluate_response()
            .returning(|_, _, _| Ok(Evaluation::incorrect()));
        mock.expect_provide_feedback()
            .returning(|_, _, _| Ok(String::new()));

        let report =
            check_conformance(&mock, &cases([("vocab_quiz", "beginner")]), &Params::new()).await;

        assert!(report.is_conformant());
        let warning = report.warnings().next().unwrap();
        assert_eq!(warning.property, Property::AnswerSoundness);
    }

    #[tokio::test]
    async fn test_feedback_failure_is_a_violation() {
        let mut mock = MockExerciseProvider::new();
        mock.expect_generate_exercise()
            .returning(|_, _, _| Ok(Exercise::new("Hola means...").with_answer("hello")));
        mock.expect_evaluate_response()
            .returning(|_, _, _| Ok(Evaluation::correct()));
        mock.expect_provide_feedback()
            .returning(|_, _, _| Err(anyhow!("rate limited")));

        let report =
            check_conformance(&mock, &cases([("vocab_quiz", "beginner")]), &Params::new()).await;

        let finding = report.violations().next().unwrap();
        assert_eq!(finding.property, Property::FeedbackReturned);
    }

    #[test]
    fn test_report_serialization() {
        let report = ConformanceReport {
            cases_checked: 1,
            findings: vec![Finding {
                case: ConformanceCase::new("fill_blank", "beginner"),
                property: Property::AnswerSoundness,
                severity: Severity::Warning,
                message: "judged incorrect".to_string(),
            }],
        };

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains(r#""property":"answer_soundness""#));
        assert!(json.contains(r#""severity":"warning""#));
    }
}
