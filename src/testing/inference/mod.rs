//! Test engines.
//!
//! Each engine validates its inputs, computes the statistic from descriptive statistics, asks the
//! reference distribution for a p-value, attaches effect sizes and intervals and finally hands the
//! numeric result to the [`interpretation`](crate::interpretation) generator for its text.
//! Engines are pure: the same inputs always yield the same [`TestResult`].

use crate::interpretation;
use crate::testing::distribution::{self, exact};
use crate::testing::{PValueMethod, Result, TestConfiguration, TestResult};

pub mod anova;
pub mod discrete;
pub mod parametric;

pub use anova::{SampleGroup, anova};
pub use discrete::{ProportionGroup, chi_square_test};
pub use parametric::{one_sample_t_test, paired_t_test, two_sample_t_test};

/// Critical value and p-value of a t statistic under the configured method.
pub(crate) fn t_reference(config: &TestConfiguration, t_stat: f64, df: f64) -> Result<(f64, f64)> {
    let alpha = config.alpha();
    let alternative = config.alternative();
    match config.p_value_method() {
        PValueMethod::Approximate => Ok((
            distribution::t_critical_value(alpha, df, alternative),
            distribution::t_p_value(t_stat, df, alternative),
        )),
        PValueMethod::Exact => Ok((
            exact::t_critical_value(alpha, df, alternative)?,
            exact::t_p_value(t_stat, df, alternative)?,
        )),
    }
}

pub(crate) fn f_reference(
    config: &TestConfiguration,
    f_stat: f64,
    df_between: f64,
    df_within: f64,
) -> Result<f64> {
    match config.p_value_method() {
        PValueMethod::Approximate => Ok(distribution::f_p_value(f_stat, df_between, df_within)),
        PValueMethod::Exact => exact::f_p_value(f_stat, df_between, df_within),
    }
}

pub(crate) fn chi_square_reference(
    config: &TestConfiguration,
    chi_sq: f64,
    df: usize,
) -> Result<f64> {
    match config.p_value_method() {
        PValueMethod::Approximate => Ok(distribution::chi_square_p_value(chi_sq, df)),
        PValueMethod::Exact => exact::chi_square_p_value(chi_sq, df),
    }
}

/// Attach headline and technical description.
pub(crate) fn finish(result: TestResult) -> TestResult {
    let text = interpretation::interpret(&result);
    result.with_interpretation(text)
}
