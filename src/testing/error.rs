use thiserror::Error;

/// Failures reported by the test engines.
///
/// Every variant is raised before any distribution math runs, so a result that makes it back to
/// the caller never carries a `NaN` or infinite statistic.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Fewer observations than the test needs, or paired samples of different length.
    #[error("insufficient sample: {0}")]
    InsufficientSample(String),

    /// Alpha outside (0, 1), an unknown alternative, too few groups or malformed group data.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Zero variance or a zero expected cell count.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// A NaN or infinite observation.
    #[error("non-finite observation at index {index} of {sample}")]
    NonFiniteInput { sample: String, index: usize },
}

pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    pub(crate) fn insufficient(msg: impl Into<String>) -> Self {
        EngineError::InsufficientSample(msg.into())
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        EngineError::InvalidConfiguration(msg.into())
    }

    pub(crate) fn degenerate(msg: impl Into<String>) -> Self {
        EngineError::DegenerateInput(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::insufficient("need at least 2 observations, got 1");
        assert_eq!(
            err.to_string(),
            "insufficient sample: need at least 2 observations, got 1"
        );

        let err = EngineError::NonFiniteInput {
            sample: "before".to_string(),
            index: 3,
        };
        assert_eq!(err.to_string(), "non-finite observation at index 3 of before");
    }
}
