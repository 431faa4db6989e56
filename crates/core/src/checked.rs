//! Validating Provider Wrapper
//!
//! `CheckedProvider` sits in front of any `ExerciseProvider` and refuses to
//! pass along results that are not well-formed. A provider that returns an
//! exercise with a blank prompt, or an evaluation with a NaN score, turns
//! into an error the caller can handle instead of a value it must distrust.

use crate::{
    evaluation::Evaluation, exercise::Exercise, params::Params, provider::ExerciseProvider,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, warn};

pub struct CheckedProvider<P> {
    inner: P,
}

impl<P: ExerciseProvider> CheckedProvider<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

#[async_trait]
impl<P: ExerciseProvider> ExerciseProvider for CheckedProvider<P> {
    async fn generate_exercise(
        &self,
        exercise_type: &str,
        level: &str,
        params: &Params,
    ) -> Result<Exercise> {
        let exercise = self
            .inner
            .generate_exercise(exercise_type, level, params)
            .await?;
        if let Err(e) = exercise.validate() {
            warn!(%exercise_type, %level, error = %e, "Provider returned a malformed exercise");
            return Err(e).with_context(|| {
                format!("generate_exercise({exercise_type}, {level}) returned a malformed exercise")
            });
        }
        debug!(%exercise_type, %level, "Exercise passed validation");
        Ok(exercise)
    }

    async fn evaluate_response(
        &self,
        exercise: &Exercise,
        response: &str,
        params: &Params,
    ) -> Result<Evaluation> {
        let evaluation = self
            .inner
            .evaluate_response(exercise, response, params)
            .await?;
        if let Err(e) = evaluation.validate() {
            warn!(error = %e, "Provider returned a malformed evaluation");
            return Err(e).context("evaluate_response returned a malformed evaluation");
        }
        Ok(evaluation)
    }

    async fn provide_feedback(
        &self,
        exercise: &Exercise,
        response: &str,
        params: &Params,
    ) -> Result<String> {
        self.inner.provide_feedback(exercise, response, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ContractError, provider::MockExerciseProvider};

    #[tokio::test]
    async fn test_valid_exercise_passes_through() {
        let mut mock = MockExerciseProvider::new();
        mock.expect_generate_exercise()
            .returning(|_, _, _| Ok(Exercise::new("Translate 'gato'.").with_answer("cat")));

        let provider = CheckedProvider::new(mock);
        let exercise = provider
            .generate_exercise("vocab_quiz", "beginner", &Params::new())
            .await
            .unwrap();

        assert_eq!(exercise.answer_text(), Some("cat"));
    }

    #[tokio::test]
    async fn test_blank_prompt_becomes_error() {
        let mut mock = MockExerciseProvider::new();
        mock.expect_generate_exercise()
            .returning(|_, _, _| Ok(Exercise::new("  ")));

        let provider = CheckedProvider::new(mock);
        let err = provider
            .generate_exercise("fill_blank", "beginner", &Params::new())
            .await
            .unwrap_err();

        assert_eq!(
            err.downcast_ref::<ContractError>(),
            Some(&ContractError::EmptyPrompt)
        );
        assert!(err.to_string().contains("fill_blank"));
    }

    #[tokio::test]
    async fn test_nan_score_becomes_error() {
        let mut mock = MockExerciseProvider::new();
        mock.expect_evaluate_response()
            .returning(|_, _, _| Ok(Evaluation::new(true, f64::NAN)));

        let provider = CheckedProvider::new(mock);
        let err = provider
            .evaluate_response(&Exercise::new("2 + 2?"), "4", &Params::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ContractError>(),
            Some(ContractError::NonFiniteScore(_))
        ));
    }

    #[tokio::test]
    async fn test_inner_errors_are_not_rewritten() {
        let mut mock = MockExerciseProvider::new();
        mock.expect_generate_exercise()
            .returning(|exercise_type, _, _| Err(anyhow::anyhow!("unknown type {exercise_type}")));

        let provider = CheckedProvider::new(mock);
        let err = provider
            .generate_exercise("dictation", "beginner", &Params::new())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "unknown type dictation");
        assert!(err.downcast_ref::<ContractError>().is_none());
    }

    #[tokio::test]
    async fn test_empty_feedback_is_allowed() {
        let mut mock = MockExerciseProvider::new();
        mock.expect_provide_feedback()
            .returning(|_, _, _| Ok(String::new()));

        let provider = CheckedProvider::new(mock);
        let feedback = provider
            .provide_feedback(&Exercise::new("Hola"), "", &Params::new())
            .await
            .unwrap();

        assert!(feedback.is_empty());
        provider.into_inner().checkpoint();
    }
}
