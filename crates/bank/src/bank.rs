//! Exercise Bank
//!
//! A read-only collection of prepared exercises, indexed by exercise type and
//! then by level. Banks are either the bundled defaults or loaded from a
//! directory holding one `<exercise_type>.json` file per type, where each
//! file maps level names to lists of exercises.

use crate::error::BankError;
use lingo_core::Exercise;
use serde_json::json;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

type LevelMap = HashMap<String, Vec<Exercise>>;

#[derive(Debug, Clone, Default)]
pub struct ExerciseBank {
    entries: HashMap<String, LevelMap>,
}

/// Type and level names are matched case-insensitively, ignoring surrounding whitespace.
pub(crate) fn key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl ExerciseBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bundled bank: `fill_blank` and `vocab_quiz` at `beginner` and
    /// `intermediate` levels.
    pub fn builtin() -> Self {
        let mut bank = Self::new();
        let mut add = |exercise_type: &str, level: &str, exercise: Exercise| {
            bank.entries
                .entry(key(exercise_type))
                .or_default()
                .entry(key(level))
                .or_default()
                .push(exercise);
        };

        add(
            "fill_blank",
            "beginner",
            Exercise::new("The cat ___ on the mat.")
                .with_answer("sat")
                .with_metadata("hint", "Past tense of 'sit'."),
        );
        add(
            "fill_blank",
            "beginner",
            Exercise::new("I ___ a student.")
                .with_answer("am")
                .with_metadata("hint", "First person of 'to be'."),
        );
        add(
            "fill_blank",
            "intermediate",
            Exercise::new("If I ___ you, I would apologise.")
                .with_answer(json!(["were", "was"]))
                .with_metadata("hint", "Second conditional."),
        );
        add(
            "fill_blank",
            "intermediate",
            Exercise::new("She has lived here ___ 2015.")
                .with_answer("since")
                .with_metadata("hint", "A point in time, not a duration."),
        );
        add(
            "vocab_quiz",
            "beginner",
            Exercise::new("What does 'perro' mean?")
                .with_options(["cat", "dog", "bird", "horse"])
                .with_answer("dog")
                .with_metadata("language", "es"),
        );
        add(
            "vocab_quiz",
            "beginner",
            Exercise::new("What does 'manzana' mean?")
                .with_options(["apple", "bread", "water", "cheese"])
                .with_answer("apple")
                .with_metadata("language", "es"),
        );
        add(
            "vocab_quiz",
            "intermediate",
            Exercise::new("What does 'aprovechar' mean?")
                .with_options(["to approve", "to take advantage of", "to prove", "to improve"])
                .with_answer("to take advantage of")
                .with_metadata("language", "es"),
        );
        add(
            "vocab_quiz",
            "intermediate",
            Exercise::new("How many days are in 'una quincena'?")
                .with_answer(15)
                .with_metadata("language", "es"),
        );
        bank
    }

    /// Adds one exercise, rejecting it if it is not well-formed.
    pub fn insert(
        &mut self,
        exercise_type: &str,
        level: &str,
        exercise: Exercise,
    ) -> Result<(), BankError> {
        let (type_key, level_key) = (key(exercise_type), key(level));
        exercise.validate().map_err(|source| BankError::Invalid {
            exercise_type: exercise_type.to_string(),
            level: level.to_string(),
            position: self
                .entries
                .get(&type_key)
                .and_then(|levels| levels.get(&level_key))
                .map_or(0, Vec::len),
            source,
        })?;
        self.entries
            .entry(type_key)
            .or_default()
            .entry(level_key)
            .or_default()
            .push(exercise);
        Ok(())
    }

    /// Builds a bank holding a single exercise type from a JSON object of
    /// `{ "<level>": [<exercise>, ...] }`.
    pub fn from_json_str(exercise_type: &str, json: &str) -> Result<Self, BankError> {
        let mut bank = Self::new();
        bank.extend_from_json_str(exercise_type, json)?;
        Ok(bank)
    }

    pub fn extend_from_json_str(
        &mut self,
        exercise_type: &str,
        json: &str,
    ) -> Result<(), BankError> {
        let levels: HashMap<String, Vec<Exercise>> = serde_json::from_str(json)?;
        for (level, exercises) in levels {
            for exercise in exercises {
                self.insert(exercise_type, &level, exercise)?;
            }
        }
        Ok(())
    }

    /// Loads every `*.json` file in `dir`, using the file stem as the exercise type.
    pub fn from_dir(dir: &Path) -> Result<Self, BankError> {
        let io_err = |source| BankError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut bank = Self::new();
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let Some(exercise_type) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let content = fs::read_to_string(&path).map_err(|source| BankError::Io {
                path: path.clone(),
                source,
            })?;
            bank.extend_from_json_str(exercise_type, &content)?;
            debug!(path = %path.display(), %exercise_type, "Loaded exercise file");
        }
        info!(
            dir = %dir.display(),
            exercise_types = bank.entries.len(),
            exercises = bank.len(),
            "Exercise bank loaded"
        );
        Ok(bank)
    }

    /// The exercises stored for a type and level.
    pub fn lookup(&self, exercise_type: &str, level: &str) -> Result<&[Exercise], BankError> {
        let levels = self
            .entries
            .get(&key(exercise_type))
            .ok_or_else(|| BankError::UnknownExerciseType(exercise_type.to_string()))?;
        levels
            .get(&key(level))
            .filter(|exercises| !exercises.is_empty())
            .map(Vec::as_slice)
            .ok_or_else(|| BankError::UnknownLevel {
                exercise_type: exercise_type.to_string(),
                level: level.to_string(),
            })
    }

    /// Sorted list of the exercise types in the bank.
    pub fn exercise_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Sorted list of the levels stored for `exercise_type`.
    pub fn levels(&self, exercise_type: &str) -> Vec<&str> {
        let mut levels: Vec<&str> = self
            .entries
            .get(&key(exercise_type))
            .map(|levels| levels.keys().map(String::as_str).collect())
            .unwrap_or_default();
        levels.sort_unstable();
        levels
    }

    /// Every `(exercise_type, level)` pair with at least one exercise.
    pub fn supported_cases(&self) -> Vec<(&str, &str)> {
        self.exercise_types()
            .into_iter()
            .flat_map(|exercise_type| {
                self.levels(exercise_type)
                    .into_iter()
                    .filter(move |level| self.lookup(exercise_type, level).is_ok())
                    .map(move |level| (exercise_type, level))
            })
            .collect()
    }

    /// Total number of exercises.
    pub fn len(&self) -> usize {
        self.entries
            .values()
            .flat_map(HashMap::values)
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
