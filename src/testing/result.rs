use crate::interpretation::Interpretation;
use crate::testing::{Alternative, TTestType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    /// Symmetric interval `estimate ± margin`.
    pub fn around(estimate: f64, margin: f64) -> Self {
        ConfidenceInterval {
            lower: estimate - margin,
            upper: estimate + margin,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Fields every test reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSummary {
    /// The test statistic (t, F or χ²)
    pub statistic: f64,
    /// Degrees of freedom; fractional for Welch, the between-groups df for ANOVA
    pub degrees_of_freedom: f64,
    pub p_value: f64,
    /// Critical value of the statistic, only reported by t-based tests
    pub critical_value: Option<f64>,
    /// `p_value < alpha`
    pub is_significant: bool,
    pub alpha: f64,
    pub alternative: Alternative,
    /// Cohen's d, η² or Cramér's V depending on the test
    pub effect_size: f64,
    pub confidence_interval: Option<ConfidenceInterval>,
    pub headline: String,
    pub technical_description: String,
}

impl TestSummary {
    /// Summary with significance decided against `alpha`; effect size, critical value, interval
    /// and text are filled in by the builder methods and the interpretation step.
    pub fn new(
        statistic: f64,
        degrees_of_freedom: f64,
        p_value: f64,
        alpha: f64,
        alternative: Alternative,
    ) -> Self {
        TestSummary {
            statistic,
            degrees_of_freedom,
            p_value,
            critical_value: None,
            is_significant: p_value < alpha,
            alpha,
            alternative,
            effect_size: 0.0,
            confidence_interval: None,
            headline: String::new(),
            technical_description: String::new(),
        }
    }

    pub fn with_effect_size(mut self, effect_size: f64) -> Self {
        self.effect_size = effect_size;
        self
    }

    pub fn with_critical_value(mut self, critical_value: f64) -> Self {
        self.critical_value = Some(critical_value);
        self
    }

    pub fn with_confidence_interval(mut self, interval: ConfidenceInterval) -> Self {
        self.confidence_interval = Some(interval);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneSampleResult {
    pub summary: TestSummary,
    pub sample_mean: f64,
    pub population_mean: f64,
    pub sample_std: f64,
    pub standard_error: f64,
    pub n: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoSampleResult {
    pub summary: TestSummary,
    pub t_test_type: TTestType,
    pub mean1: f64,
    pub mean2: f64,
    pub var1: f64,
    pub var2: f64,
    pub standard_error: f64,
    pub n1: usize,
    pub n2: usize,
}

/// Per-subject direction of `after - before`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedChanges {
    pub increased: usize,
    pub decreased: usize,
    pub unchanged: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairedResult {
    pub summary: TestSummary,
    /// Mean of `before - after`
    pub mean_difference: f64,
    pub std_difference: f64,
    pub standard_error: f64,
    pub mean_before: f64,
    pub mean_after: f64,
    pub changes: PairedChanges,
    pub n: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMean {
    pub group: String,
    pub n: usize,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnovaResult {
    pub summary: TestSummary,
    pub group_means: Vec<GroupMean>,
    pub overall_mean: f64,
    pub ss_between: f64,
    pub ss_within: f64,
    pub df_between: usize,
    pub df_within: usize,
    /// Total number of observations
    pub n: usize,
    /// Number of groups
    pub k: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupProportion {
    pub group: String,
    pub successes: u64,
    pub total: u64,
    pub proportion: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChiSquareResult {
    pub summary: TestSummary,
    pub success_label: String,
    pub proportions: Vec<GroupProportion>,
    pub overall_proportion: f64,
    pub cramers_v: f64,
    /// Only for two groups with a non-zero denominator
    pub odds_ratio: Option<f64>,
    /// Only for two groups with a non-zero second proportion
    pub risk_ratio: Option<f64>,
    /// Grand total of observations
    pub n: u64,
}

/// Outcome of one test invocation, one case per test kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TestResult {
    OneSample(OneSampleResult),
    TwoSample(TwoSampleResult),
    Paired(PairedResult),
    Anova(AnovaResult),
    ChiSquare(ChiSquareResult),
}

impl TestResult {
    pub fn summary(&self) -> &TestSummary {
        match self {
            TestResult::OneSample(r) => &r.summary,
            TestResult::TwoSample(r) => &r.summary,
            TestResult::Paired(r) => &r.summary,
            TestResult::Anova(r) => &r.summary,
            TestResult::ChiSquare(r) => &r.summary,
        }
    }

    fn summary_mut(&mut self) -> &mut TestSummary {
        match self {
            TestResult::OneSample(r) => &mut r.summary,
            TestResult::TwoSample(r) => &mut r.summary,
            TestResult::Paired(r) => &mut r.summary,
            TestResult::Anova(r) => &mut r.summary,
            TestResult::ChiSquare(r) => &mut r.summary,
        }
    }

    pub fn statistic(&self) -> f64 {
        self.summary().statistic
    }

    pub fn p_value(&self) -> f64 {
        self.summary().p_value
    }

    pub fn is_significant(&self) -> bool {
        self.summary().is_significant
    }

    pub fn effect_size(&self) -> f64 {
        self.summary().effect_size
    }

    pub fn headline(&self) -> &str {
        &self.summary().headline
    }

    pub fn technical_description(&self) -> &str {
        &self.summary().technical_description
    }

    /// Short name of the test kind, matching the serialized tag.
    pub fn kind(&self) -> &'static str {
        match self {
            TestResult::OneSample(_) => "one_sample",
            TestResult::TwoSample(_) => "two_sample",
            TestResult::Paired(_) => "paired",
            TestResult::Anova(_) => "anova",
            TestResult::ChiSquare(_) => "chi_square",
        }
    }

    pub(crate) fn with_interpretation(mut self, interpretation: Interpretation) -> Self {
        let summary = self.summary_mut();
        summary.headline = interpretation.headline;
        summary.technical_description = interpretation.technical_description;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_interval() {
        let ci = ConfidenceInterval::around(10.0, 2.5);
        assert_eq!(ci.lower, 7.5);
        assert_eq!(ci.upper, 12.5);
        assert_eq!(ci.width(), 5.0);
        assert!(ci.contains(10.0));
        assert!(ci.contains(7.5));
        assert!(!ci.contains(12.6));
    }

    #[test]
    fn test_summary_significance_is_strict() {
        let at_alpha = TestSummary::new(1.0, 4.0, 0.05, 0.05, Alternative::TwoSided);
        assert!(!at_alpha.is_significant);

        let below = TestSummary::new(1.0, 4.0, 0.049, 0.05, Alternative::TwoSided)
            .with_effect_size(0.4)
            .with_critical_value(2.776);
        assert!(below.is_significant);
        assert_eq!(below.effect_size, 0.4);
        assert_eq!(below.critical_value, Some(2.776));
        assert!(below.confidence_interval.is_none());
        assert!(below.headline.is_empty());
    }
}
