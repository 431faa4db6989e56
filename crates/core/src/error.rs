/// Structural violations of the result shapes returned by a provider.
///
/// Providers report their own failures (unsupported exercise types, backend
/// outages) through `anyhow::Error`. This type only covers results that came
/// back "successfully" but are not well-formed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContractError {
    #[error("exercise prompt is empty")]
    EmptyPrompt,
    #[error("exercise options are empty but the exercise is not flagged open-ended")]
    EmptyOptions,
    #[error("evaluation score is not a finite number: {0}")]
    NonFiniteScore(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_error_display() {
        assert_eq!(
            ContractError::EmptyPrompt.to_string(),
            "exercise prompt is empty"
        );
        assert_eq!(
            ContractError::NonFiniteScore(f64::INFINITY).to_string(),
            "evaluation score is not a finite number: inf"
        );
    }

    #[test]
    fn test_contract_error_downcasts_from_anyhow() {
        let err: anyhow::Error = ContractError::EmptyOptions.into();
        assert_eq!(
            err.downcast_ref::<ContractError>(),
            Some(&ContractError::EmptyOptions)
        );
    }
}
