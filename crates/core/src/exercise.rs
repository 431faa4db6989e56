use crate::error::ContractError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Metadata key marking an exercise whose empty `options` list is intentional.
pub const OPEN_ENDED_KEY: &str = "open_ended";

/// Metadata key holding an optional hint string for the learner.
pub const HINT_KEY: &str = "hint";

/// A single unit of learning content shown to a learner.
///
/// Exercises carry no identifier. A caller that needs to pair an exercise
/// with its `Evaluation` keeps both together in its own state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Exercise {
    /// The text presented to the learner.
    pub prompt: String,
    /// Answer choices for selection-style exercises. `None` means the learner
    /// types a free-form response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// The expected response. Its shape depends on the exercise type, so
    /// callers must match on the JSON variant before using it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<Value>,
    /// Auxiliary descriptive data such as difficulty or topic tags.
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl Exercise {
    /// Creates a free-form exercise with no answer and empty metadata.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            options: None,
            answer: None,
            metadata: HashMap::new(),
        }
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_answer(mut self, answer: impl Into<Value>) -> Self {
        self.answer = Some(answer.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// True when the learner picks from a list of choices.
    pub fn is_multiple_choice(&self) -> bool {
        self.options.as_ref().is_some_and(|opts| !opts.is_empty())
    }

    /// The answer, if it is a plain string.
    pub fn answer_text(&self) -> Option<&str> {
        self.answer.as_ref().and_then(Value::as_str)
    }

    /// The `hint` metadata entry, if it is a string.
    pub fn hint(&self) -> Option<&str> {
        self.metadata.get(HINT_KEY).and_then(Value::as_str)
    }

    pub fn is_open_ended(&self) -> bool {
        self.metadata
            .get(OPEN_ENDED_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Checks the structural guarantees every returned exercise must meet.
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.prompt.trim().is_empty() {
            return Err(ContractError::EmptyPrompt);
        }
        if let Some(options) = &self.options {
            if options.is_empty() && !self.is_open_ended() {
                return Err(ContractError::EmptyOptions);
            }
        }
        Ok(())
    }

    /// JSON schema of the exercise shape, for implementers that ask a model
    /// for structured output.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Exercise)
    }
}
