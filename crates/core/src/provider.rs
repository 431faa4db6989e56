//! Exercise Provider Capability
//!
//! This module defines the trait any exercise backend implements, whether it
//! is driven by a small language model, a rule engine, or a static bank. The
//! application layer programs against `ExerciseProvider` and receives a
//! concrete implementation at construction time.

use crate::{evaluation::Evaluation, exercise::Exercise, params::Params};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Generates exercises, evaluates learner responses and gives feedback.
///
/// Every operation is an independent request. None depends on an earlier
/// call, and an exercise produced by one provider instance may be passed to
/// any other. Implementations report failures (unknown exercise type,
/// backend unavailable, malformed input) through the returned `Result`.
/// Callers should treat every call as fallible.
///
/// The `Send + Sync` bound lets a provider live in shared state behind an
/// `Arc<dyn ExerciseProvider>`. It does not imply reentrancy; implementations
/// document their own concurrency behaviour.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExerciseProvider: Send + Sync {
    /// Creates a new exercise.
    ///
    /// # Arguments
    ///
    /// * `exercise_type` - A free-form category tag such as `"fill_blank"`.
    /// * `level` - A free-form proficiency indicator such as `"beginner"`.
    /// * `params` - Implementation-specific options. Unknown keys are ignored.
    ///
    /// # Returns
    ///
    /// An `Exercise` with a non-empty prompt. Repeated calls may return
    /// different exercises.
    async fn generate_exercise(
        &self,
        exercise_type: &str,
        level: &str,
        params: &Params,
    ) -> Result<Exercise>;

    /// Judges a learner's response, which may be any text including empty.
    async fn evaluate_response(
        &self,
        exercise: &Exercise,
        response: &str,
        params: &Params,
    ) -> Result<Evaluation>;

    /// Produces a hint, explanation or correction for the learner. The text
    /// may be empty.
    async fn provide_feedback(
        &self,
        exercise: &Exercise,
        response: &str,
        params: &Params,
    ) -> Result<String>;
}

#[async_trait]
impl<P: ExerciseProvider + ?Sized> ExerciseProvider for Arc<P> {
    async fn generate_exercise(
        &self,
        exercise_type: &str,
        level: &str,
        params: &Params,
    ) -> Result<Exercise> {
        (**self).generate_exercise(exercise_type, level, params).await
    }

    async fn evaluate_response(
        &self,
        exercise: &Exercise,
        response: &str,
        params: &Params,
    ) -> Result<Evaluation> {
        (**self).evaluate_response(exercise, response, params).await
    }

    async fn provide_feedback(
        &self,
        exercise: &Exercise,
        response: &str,
        params: &Params,
    ) -> Result<String> {
        (**self).provide_feedback(exercise, response, params).await
    }
}

#[async_trait]
impl<P: ExerciseProvider + ?Sized> ExerciseProvider for Box<P> {
    async fn generate_exercise(
        &self,
        exercise_type: &str,
        level: &str,
        params: &Params,
    ) -> Result<Exercise> {
        (**self).generate_exercise(exercise_type, level, params).await
    }

    async fn evaluate_response(
        &self,
        exercise: &Exercise,
        response: &str,
        params: &Params,
    ) -> Result<Evaluation> {
        (**self).evaluate_response(exercise, response, params).await
    }

    async fn provide_feedback(
        &self,
        exercise: &Exercise,
        response: &str,
        params: &Params,
    ) -> Result<String> {
        (**self).provide_feedback(exercise, response, params).await
    }
}
