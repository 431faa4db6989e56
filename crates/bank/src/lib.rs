//! Bank-Backed Exercise Provider
//!
//! A deterministic `ExerciseProvider` that serves prepared exercises and
//! grades responses against their stored answers, plus the configuration and
//! logging setup an application needs to run it.

pub mod bank;
pub mod config;
pub mod error;
pub mod matching;
pub mod provider;
pub mod telemetry;

pub use bank::ExerciseBank;
pub use config::BankConfig;
pub use error::BankError;
pub use matching::AnswerMatcher;
pub use provider::BankProvider;
