//! Effect sizes and confidence intervals.
//!
//! These are plain formulas over summary statistics. Input validation (sample sizes, zero
//! variance) is the job of the engines in [`inference`](crate::testing::inference); the ratios
//! that can legitimately be undefined for valid data return `Option`.

use crate::testing::ConfidenceInterval;

/// Cohen's d for a one-sample test: `(sample_mean - population_mean) / sample_std`.
pub fn cohens_d_one_sample(sample_mean: f64, population_mean: f64, sample_std: f64) -> f64 {
    (sample_mean - population_mean) / sample_std
}

/// Cohen's d for two independent samples.
///
/// Always standardizes by the pooled standard deviation, also when the test itself was run as
/// Welch's t-test.
///
/// # Arguments
///
/// * `mean1`, `var1`, `n1` - Mean, sample variance and size of group 1
/// * `mean2`, `var2`, `n2` - Mean, sample variance and size of group 2
pub fn cohens_d_two_sample(
    mean1: f64,
    var1: f64,
    n1: usize,
    mean2: f64,
    var2: f64,
    n2: usize,
) -> f64 {
    let n1 = n1 as f64;
    let n2 = n2 as f64;
    let pooled_sd = (((n1 - 1.0) * var1 + (n2 - 1.0) * var2) / (n1 + n2 - 2.0)).sqrt();
    (mean1 - mean2) / pooled_sd
}

/// Cohen's d for paired samples: mean difference over the standard deviation of the differences.
pub fn cohens_d_paired(mean_difference: f64, std_difference: f64) -> f64 {
    mean_difference / std_difference
}

/// Eta-squared, the share of total variation explained by group membership.
pub fn eta_squared(ss_between: f64, ss_within: f64) -> f64 {
    ss_between / (ss_between + ss_within)
}

/// Cramér's V for a k-group proportion table: `sqrt(χ² / (N(k - 1)))`.
pub fn cramers_v(chi_square: f64, n: f64, k: usize) -> f64 {
    let k_minus_one = k.saturating_sub(1) as f64;
    (chi_square / (n * k_minus_one)).sqrt()
}

/// Odds ratio of a 2×2 table: `(s1·f2) / (f1·s2)`.
///
/// `None` when `f1·s2` is zero.
pub fn odds_ratio(successes1: f64, failures1: f64, successes2: f64, failures2: f64) -> Option<f64> {
    let denominator = failures1 * successes2;
    if denominator == 0.0 {
        return None;
    }
    Some((successes1 * failures2) / denominator)
}

/// Risk ratio `p1 / p2`, `None` when `p2` is zero.
pub fn risk_ratio(proportion1: f64, proportion2: f64) -> Option<f64> {
    if proportion2 == 0.0 {
        return None;
    }
    Some(proportion1 / proportion2)
}

/// Interval `estimate ± critical_value · standard_error`.
pub fn confidence_interval(
    estimate: f64,
    critical_value: f64,
    standard_error: f64,
) -> ConfidenceInterval {
    ConfidenceInterval::around(estimate, critical_value * standard_error)
}
