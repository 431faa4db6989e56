use crate::error::BankError;
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use lingo_core::Exercise;
use serde_json::Value;

const MIN_NEAR_MISS_CHARS: usize = 2;

/// Compares learner responses with an exercise's expected answer.
///
/// Text is compared after trimming and collapsing inner whitespace, and
/// case-insensitively unless `case_sensitive` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnswerMatcher {
    pub case_sensitive: bool,
}

impl AnswerMatcher {
    pub fn new(case_sensitive: bool) -> Self {
        Self { case_sensitive }
    }

    pub fn normalize(&self, text: &str) -> String {
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if self.case_sensitive {
            collapsed
        } else {
            collapsed.to_lowercase()
        }
    }

    /// Whether `response` is an accepted answer to `exercise`.
    ///
    /// The response is first compared as given. For multiple-choice exercises
    /// a 1-based option number is then accepted in place of the option text.
    pub fn matches(&self, exercise: &Exercise, response: &str) -> Result<bool, BankError> {
        let answer = exercise.answer.as_ref().ok_or(BankError::MissingAnswer)?;
        if self.matches_value(answer, response) {
            return Ok(true);
        }
        let resolved = self.resolve_option(exercise, response);
        Ok(resolved != response && self.matches_value(answer, resolved))
    }

    /// True when an incorrect response is an in-order subsequence of a text
    /// answer (a misspelling that drops letters) and covers at least half of
    /// it. Responses shorter than two characters never count.
    pub fn is_near_miss(&self, exercise: &Exercise, response: &str) -> bool {
        let Some(answer) = exercise.answer.as_ref() else {
            return false;
        };
        let response = self.normalize(response);
        if response.is_empty() || self.matches_value(answer, &response) {
            return false;
        }
        let given = response.chars().count();
        if given < MIN_NEAR_MISS_CHARS {
            return false;
        }
        let matcher = SkimMatcherV2::default();
        text_answers(answer).iter().any(|candidate| {
            let candidate = self.normalize(candidate);
            given * 2 >= candidate.chars().count()
                && matcher.fuzzy_match(&candidate, &response).is_some()
        })
    }

    fn resolve_option<'a>(&self, exercise: &'a Exercise, response: &'a str) -> &'a str {
        let Some(options) = exercise.options.as_deref() else {
            return response;
        };
        let normalized = self.normalize(response);
        if options.iter().any(|opt| self.normalize(opt) == normalized) {
            return response;
        }
        match response.trim().parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => options[n - 1].as_str(),
            _ => response,
        }
    }

    fn matches_value(&self, answer: &Value, response: &str) -> bool {
        match answer {
            Value::String(expected) => self.normalize(expected) == self.normalize(response),
            Value::Array(accepted) => accepted.iter().any(|a| self.matches_value(a, response)),
            Value::Number(expected) => match (expected.as_f64(), response.trim().parse::<f64>()) {
                (Some(expected), Ok(given)) => expected == given,
                _ => false,
            },
            Value::Bool(expected) => parse_bool(response) == Some(*expected),
            Value::Null | Value::Object(_) => false,
        }
    }
}

fn parse_bool(response: &str) -> Option<bool> {
    match response.trim().to_lowercase().as_str() {
        "true" | "yes" => Some(true),
        "false" | "no" => Some(false),
        _ => None,
    }
}

fn text_answers(answer: &Value) -> Vec<&str> {
    match answer {
        Value::String(s) => vec![s.as_str()],
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

/// Renders an answer for display in feedback text.
pub fn describe(answer: &Value) -> String {
    match answer {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(describe)
            .collect::<Vec<_>>()
            .join(" or "),
        other => other.to_string(),
    }
}
