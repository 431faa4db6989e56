use crate::error::ContractError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The verdict on a learner's response to an exercise.
///
/// The scale of `score` is up to the provider, but it is always finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Evaluation {
    pub is_correct: bool,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl Evaluation {
    pub fn new(is_correct: bool, score: f64) -> Self {
        Self {
            is_correct,
            score,
            feedback: None,
        }
    }

    /// A full-marks verdict: correct with a score of `1.0`.
    pub fn correct() -> Self {
        Self::new(true, 1.0)
    }

    /// A zero-score verdict.
    pub fn incorrect() -> Self {
        Self::new(false, 0.0)
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }

    pub fn validate(&self) -> Result<(), ContractError> {
        if !self.score.is_finite() {
            return Err(ContractError::NonFiniteScore(self.score));
        }
        Ok(())
    }
}
