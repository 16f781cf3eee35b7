use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod batch;
pub mod distribution;
pub mod effect;
pub mod error;
pub mod inference;
pub mod result;

pub mod utils;

pub use error::{EngineError, Result};
pub use result::{
    AnovaResult, ChiSquareResult, ConfidenceInterval, GroupMean, GroupProportion, OneSampleResult,
    PairedChanges, PairedResult, TestResult, TestSummary, TwoSampleResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TTestType {
    Student, // Equal variance
    Welch,   // Unequal variance
}

impl TTestType {
    /// Map the `equal variances` switch of a two-sample test onto the test type.
    pub fn from_equal_variances(equal_variances: bool) -> Self {
        if equal_variances {
            TTestType::Student
        } else {
            TTestType::Welch
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alternative {
    TwoSided,
    Less,
    Greater,
}

impl Alternative {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alternative::TwoSided => "two-sided",
            Alternative::Less => "less",
            Alternative::Greater => "greater",
        }
    }
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Alternative {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "two-sided" => Ok(Alternative::TwoSided),
            "less" => Ok(Alternative::Less),
            "greater" => Ok(Alternative::Greater),
            other => Err(EngineError::invalid(format!(
                "unknown alternative '{}', expected two-sided, greater or less",
                other
            ))),
        }
    }
}

/// How p-values (and t critical values) are obtained from a test statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PValueMethod {
    /// Closed-form approximations from [`distribution`]. Significance outcomes are calibrated
    /// against these curves.
    #[default]
    Approximate,
    /// Exact reference distributions from `statrs`, see [`distribution::exact`].
    Exact,
}

/// Significance level, alternative hypothesis and p-value method shared by every test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestConfiguration {
    alpha: f64,
    alternative: Alternative,
    p_value_method: PValueMethod,
}

impl TestConfiguration {
    /// Create a two-sided configuration at the given significance level.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` unless `0 < alpha < 1`.
    pub fn new(alpha: f64) -> Result<Self> {
        validate_alpha(alpha)?;
        Ok(TestConfiguration {
            alpha,
            alternative: Alternative::TwoSided,
            p_value_method: PValueMethod::Approximate,
        })
    }

    pub fn with_alternative(mut self, alternative: Alternative) -> Self {
        self.alternative = alternative;
        self
    }

    pub fn with_p_value_method(mut self, method: PValueMethod) -> Self {
        self.p_value_method = method;
        self
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn alternative(&self) -> Alternative {
        self.alternative
    }

    pub fn p_value_method(&self) -> PValueMethod {
        self.p_value_method
    }

    /// Re-check the alpha invariant. Configurations built through [`TestConfiguration::new`]
    /// always pass; deserialized ones may not.
    pub fn validate(&self) -> Result<()> {
        validate_alpha(self.alpha)
    }
}

impl Default for TestConfiguration {
    fn default() -> Self {
        TestConfiguration {
            alpha: 0.05,
            alternative: Alternative::TwoSided,
            p_value_method: PValueMethod::Approximate,
        }
    }
}

fn validate_alpha(alpha: f64) -> Result<()> {
    if alpha.is_finite() && alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(EngineError::invalid(format!(
            "alpha must lie strictly between 0 and 1, got {}",
            alpha
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_bounds() {
        assert!(TestConfiguration::new(0.05).is_ok());
        assert!(TestConfiguration::new(0.10).is_ok());

        for bad in [0.0, 1.0, -0.05, 1.5, f64::NAN, f64::INFINITY] {
            let err = TestConfiguration::new(bad).unwrap_err();
            assert!(matches!(err, EngineError::InvalidConfiguration(_)), "{}", bad);
        }
    }

    #[test]
    fn test_builder_and_default() {
        let config = TestConfiguration::new(0.01)
            .unwrap()
            .with_alternative(Alternative::Less)
            .with_p_value_method(PValueMethod::Exact);
        assert_eq!(config.alpha(), 0.01);
        assert_eq!(config.alternative(), Alternative::Less);
        assert_eq!(config.p_value_method(), PValueMethod::Exact);

        let default = TestConfiguration::default();
        assert_eq!(default.alpha(), 0.05);
        assert_eq!(default.alternative(), Alternative::TwoSided);
        assert_eq!(default.p_value_method(), PValueMethod::Approximate);
        assert!(default.validate().is_ok());
    }

    #[test]
    fn test_alternative_parsing() {
        assert_eq!("two-sided".parse::<Alternative>().unwrap(), Alternative::TwoSided);
        assert_eq!(" greater ".parse::<Alternative>().unwrap(), Alternative::Greater);
        assert_eq!("less".parse::<Alternative>().unwrap(), Alternative::Less);
        assert!(matches!(
            "sideways".parse::<Alternative>(),
            Err(EngineError::InvalidConfiguration(_))
        ));
        assert_eq!(Alternative::TwoSided.to_string(), "two-sided");
    }

    #[test]
    fn test_t_test_type_from_flag() {
        assert_eq!(TTestType::from_equal_variances(true), TTestType::Student);
        assert_eq!(TTestType::from_equal_variances(false), TTestType::Welch);
    }
}
