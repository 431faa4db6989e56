//! Bank-Backed Exercise Provider
//!
//! `BankProvider` serves prepared exercises from an `ExerciseBank` and grades
//! responses by comparing them with each exercise's stored answer. It calls no
//! model and no network service, which makes it the provider of choice for
//! tests, demos and offline development.
//!
//! The provider is safe to share between threads: the bank is read-only and
//! each `(exercise_type, level)` rotates on its own atomic cursor. It
//! evaluates any exercise that carries an answer, including exercises
//! produced by other providers, and ignores metadata when grading.

use crate::{
    bank::{ExerciseBank, key},
    config::BankConfig,
    error::BankError,
    matching::{AnswerMatcher, describe},
};
use anyhow::Result;
use async_trait::async_trait;
use lingo_core::{Evaluation, Exercise, ExerciseProvider, Params};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// Selects a specific bank entry (0-based) instead of the next one in rotation.
pub const PARAM_INDEX: &str = "index";

/// When true, feedback on a wrong answer reveals the expected answer.
pub const PARAM_REVEAL_ANSWER: &str = "reveal_answer";

pub struct BankProvider {
    bank: ExerciseBank,
    matcher: AnswerMatcher,
    /// Rotation position per `(exercise_type, level)`, keyed by normalized names.
    cursors: HashMap<(String, String), AtomicUsize>,
}

impl BankProvider {
    pub fn new(bank: ExerciseBank) -> Self {
        let cursors = bank
            .supported_cases()
            .into_iter()
            .map(|(exercise_type, level)| {
                ((exercise_type.to_string(), level.to_string()), AtomicUsize::new(0))
            })
            .collect();
        Self {
            bank,
            matcher: AnswerMatcher::default(),
            cursors,
        }
    }

    pub fn with_matcher(mut self, matcher: AnswerMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Builds a provider from configuration, loading the bank directory if
    /// one is configured and falling back to the bundled bank otherwise.
    pub fn from_config(config: &BankConfig) -> Result<Self, BankError> {
        let bank = match &config.bank_path {
            Some(path) => ExerciseBank::from_dir(path)?,
            None => {
                info!("No exercise bank path configured. Using the bundled bank.");
                ExerciseBank::builtin()
            }
        };
        Ok(Self::new(bank).with_matcher(AnswerMatcher::new(config.case_sensitive)))
    }

    pub fn bank(&self) -> &ExerciseBank {
        &self.bank
    }

    fn select<'a>(
        &self,
        exercise_type: &str,
        level: &str,
        exercises: &'a [Exercise],
        params: &Params,
    ) -> Result<&'a Exercise, BankError> {
        let index = match params.get_u64(PARAM_INDEX) {
            Some(index) => index,
            None => {
                let position = self
                    .cursors
                    .get(&(key(exercise_type), key(level)))
                    .map_or(0, |cursor| cursor.fetch_add(1, Ordering::Relaxed));
                (position % exercises.len()) as u64
            }
        };
        usize::try_from(index)
            .ok()
            .and_then(|i| exercises.get(i))
            .ok_or(BankError::IndexOutOfRange {
                index,
                len: exercises.len(),
            })
    }
}

#[async_trait]
impl ExerciseProvider for BankProvider {
    async fn generate_exercise(
        &self,
        exercise_type: &str,
        level: &str,
        params: &Params,
    ) -> Result<Exercise> {
        let exercises = self.bank.lookup(exercise_type, level)?;
        let mut exercise = self.select(exercise_type, level, exercises, params)?.clone();
        exercise
            .metadata
            .entry("exercise_type".to_string())
            .or_insert_with(|| exercise_type.into());
        exercise
            .metadata
            .entry("level".to_string())
            .or_insert_with(|| level.into());
        debug!(%exercise_type, %level, prompt = %exercise.prompt, "Generated exercise");
        Ok(exercise)
    }

    async fn evaluate_response(
        &self,
        exercise: &Exercise,
        response: &str,
        _params: &Params,
    ) -> Result<Evaluation> {
        let evaluation = if self.matcher.matches(exercise, response)? {
            Evaluation::correct()
        } else {
            let expected = exercise.answer.as_ref().map(describe).unwrap_or_default();
            Evaluation::incorrect().with_feedback(format!("Expected: {expected}"))
        };
        debug!(is_correct = evaluation.is_correct, "Evaluated response");
        Ok(evaluation)
    }

    async fn provide_feedback(
        &self,
        exercise: &Exercise,
        response: &str,
        params: &Params,
    ) -> Result<String> {
        let Some(answer) = exercise.answer.as_ref() else {
            let feedback = match exercise.hint() {
                Some(hint) => hint.to_string(),
                None => "There is no single right answer here. Keep practising!".to_string(),
            };
            return Ok(feedback);
        };
        let expected = describe(answer);

        if self.matcher.matches(exercise, response)? {
            return Ok(format!("Well done! \"{expected}\" is correct."));
        }
        if response.trim().is_empty() {
            return Ok(match exercise.hint() {
                Some(hint) => format!("Give it a try. Hint: {hint}"),
                None => "Give it a try. Type your answer to get feedback.".to_string(),
            });
        }
        if self.matcher.is_near_miss(exercise, response) {
            return Ok("You're close! Check your spelling.".to_string());
        }
        if params.get_bool(PARAM_REVEAL_ANSWER).unwrap_or(false) {
            return Ok(format!("Not quite. The expected answer is \"{expected}\"."));
        }
        Ok(match exercise.hint() {
            Some(hint) => format!("Not quite. Hint: {hint}"),
            None => "Not quite. Try again.".to_string(),
        })
    }
}
