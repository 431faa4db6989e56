//! Exercise Provider Contract
//!
//! The boundary between a language-learning application and whatever powers
//! its exercises: a small language model, a rule engine, or a static bank.
//! The application holds an `ExerciseProvider` and calls its three
//! operations. Concrete providers live in other crates.

pub mod checked;
pub mod conformance;
pub mod error;
pub mod evaluation;
pub mod exercise;
pub mod params;
pub mod provider;

pub use checked::CheckedProvider;
pub use error::ContractError;
pub use evaluation::Evaluation;
pub use exercise::Exercise;
pub use params::Params;
pub use provider::ExerciseProvider;
