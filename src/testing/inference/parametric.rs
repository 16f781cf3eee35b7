//! Parametric t-tests: one-sample, two-sample (Student or Welch) and paired.
//!
//! All three share the same pipeline: summary statistics, standard error, t statistic, then the
//! configured reference distribution for the critical value and p-value.

use crate::testing::effect;
use crate::testing::inference::{finish, t_reference};
use crate::testing::utils::{self, ensure_finite, ensure_finite_values, ensure_min_len};
use crate::testing::{
    EngineError, OneSampleResult, PairedChanges, PairedResult, Result, TTestType,
    TestConfiguration, TestResult, TestSummary, TwoSampleResult,
};
use tracing::debug;

/// One-sample t-test of a sample mean against a hypothesized population mean.
///
/// The confidence interval `sample_mean ± critical_value · standard_error` is always reported,
/// also for one-sided alternatives.
///
/// # Arguments
///
/// * `sample` - Observations, at least two
/// * `population_mean` - Hypothesized mean μ₀
/// * `config` - Significance level, alternative and p-value method
///
/// # Returns
///
/// `TestResult::OneSample` with the t statistic, p-value, Cohen's d and confidence interval.
///
/// # Errors
///
/// `InsufficientSample` for fewer than two observations, `DegenerateInput` when every
/// observation is identical.
pub fn one_sample_t_test(
    sample: &[f64],
    population_mean: f64,
    config: &TestConfiguration,
) -> Result<TestResult> {
    run_one_sample(sample, population_mean, config)
        .inspect_err(|e| debug!(error = %e, "one-sample t-test rejected"))
}

fn run_one_sample(
    sample: &[f64],
    population_mean: f64,
    config: &TestConfiguration,
) -> Result<TestResult> {
    config.validate()?;
    ensure_finite(sample, "sample")?;
    ensure_min_len(sample, 2, "sample")?;
    if !population_mean.is_finite() {
        return Err(EngineError::invalid(format!(
            "population mean must be finite, got {}",
            population_mean
        )));
    }

    let n = sample.len();
    let sample_mean = utils::mean(sample).ok_or_else(|| EngineError::insufficient("empty sample"))?;
    let sample_std = utils::sample_std(sample)
        .ok_or_else(|| EngineError::insufficient("sample variance needs two observations"))?;
    if sample_std == 0.0 {
        return Err(EngineError::degenerate(
            "sample has zero variance, the standard error vanishes",
        ));
    }

    let standard_error = sample_std / (n as f64).sqrt();
    let t_stat = (sample_mean - population_mean) / standard_error;
    ensure_finite_values(&[
        ("sample mean", sample_mean),
        ("sample standard deviation", sample_std),
        ("t statistic", t_stat),
    ])?;
    let df = (n - 1) as f64;
    let (critical_value, p_value) = t_reference(config, t_stat, df)?;

    let cohens_d = effect::cohens_d_one_sample(sample_mean, population_mean, sample_std);
    let interval = effect::confidence_interval(sample_mean, critical_value, standard_error);
    ensure_finite_values(&[
        ("Cohen's d", cohens_d),
        ("lower confidence bound", interval.lower),
        ("upper confidence bound", interval.upper),
    ])?;

    let summary = TestSummary::new(t_stat, df, p_value, config.alpha(), config.alternative())
        .with_critical_value(critical_value)
        .with_effect_size(cohens_d)
        .with_confidence_interval(interval);

    debug!(
        n,
        t = t_stat,
        df,
        p_value,
        significant = summary.is_significant,
        "one-sample t-test"
    );

    Ok(finish(TestResult::OneSample(OneSampleResult {
        summary,
        sample_mean,
        population_mean,
        sample_std,
        standard_error,
        n,
    })))
}

/// Perform a t-test comparing two independent samples.
///
/// Student's test pools the variances and uses `n1 + n2 - 2` degrees of freedom; Welch's test
/// uses separate variances and the Welch–Satterthwaite df, which may be fractional. Cohen's d is
/// standardized by the pooled standard deviation in both cases.
///
/// # Arguments
///
/// * `sample1` - First sample
/// * `sample2` - Second sample
/// * `config` - Significance level, alternative and p-value method
/// * `test_type` - Type of t-test to perform
///
/// # Returns
///
/// `TestResult::TwoSample` containing the t-statistic, p-value, effect size and an interval for
/// `mean1 - mean2`.
pub fn two_sample_t_test(
    sample1: &[f64],
    sample2: &[f64],
    config: &TestConfiguration,
    test_type: TTestType,
) -> Result<TestResult> {
    run_two_sample(sample1, sample2, config, test_type)
        .inspect_err(|e| debug!(error = %e, ?test_type, "two-sample t-test rejected"))
}

fn run_two_sample(
    sample1: &[f64],
    sample2: &[f64],
    config: &TestConfiguration,
    test_type: TTestType,
) -> Result<TestResult> {
    config.validate()?;
    ensure_finite(sample1, "sample 1")?;
    ensure_finite(sample2, "sample 2")?;
    ensure_min_len(sample1, 2, "sample 1")?;
    ensure_min_len(sample2, 2, "sample 2")?;

    let n1 = sample1.len();
    let n2 = sample2.len();
    let too_small = || EngineError::insufficient("each sample needs two observations");
    let mean1 = utils::mean(sample1).ok_or_else(too_small)?;
    let mean2 = utils::mean(sample2).ok_or_else(too_small)?;
    let var1 = utils::sample_variance(sample1).ok_or_else(too_small)?;
    let var2 = utils::sample_variance(sample2).ok_or_else(too_small)?;

    let n1_f = n1 as f64;
    let n2_f = n2 as f64;
    let (standard_error, df) = match test_type {
        TTestType::Student => {
            let pooled_var = utils::pooled_variance(n1, var1, n2, var2).ok_or_else(too_small)?;
            (
                (pooled_var * (1.0 / n1_f + 1.0 / n2_f)).sqrt(),
                n1_f + n2_f - 2.0,
            )
        }
        TTestType::Welch => {
            let term1 = var1 / n1_f;
            let term2 = var2 / n2_f;
            let combined_var = term1 + term2;
            // Welch-Satterthwaite equation for degrees of freedom
            let df = combined_var * combined_var
                / (term1 * term1 / (n1_f - 1.0) + term2 * term2 / (n2_f - 1.0));
            (combined_var.sqrt(), df)
        }
    };

    if standard_error == 0.0 {
        return Err(EngineError::degenerate(
            "both samples have zero variance, the standard error vanishes",
        ));
    }

    let mean_diff = mean1 - mean2;
    let t_stat = mean_diff / standard_error;
    ensure_finite_values(&[
        ("mean of sample 1", mean1),
        ("mean of sample 2", mean2),
        ("variance of sample 1", var1),
        ("variance of sample 2", var2),
        ("standard error", standard_error),
        ("degrees of freedom", df),
        ("t statistic", t_stat),
    ])?;
    let (critical_value, p_value) = t_reference(config, t_stat, df)?;

    let cohens_d = effect::cohens_d_two_sample(mean1, var1, n1, mean2, var2, n2);
    let interval = effect::confidence_interval(mean_diff, critical_value, standard_error);
    ensure_finite_values(&[
        ("Cohen's d", cohens_d),
        ("lower confidence bound", interval.lower),
        ("upper confidence bound", interval.upper),
    ])?;

    let summary = TestSummary::new(t_stat, df, p_value, config.alpha(), config.alternative())
        .with_critical_value(critical_value)
        .with_effect_size(cohens_d)
        .with_confidence_interval(interval);

    debug!(
        n1,
        n2,
        ?test_type,
        t = t_stat,
        df,
        p_value,
        significant = summary.is_significant,
        "two-sample t-test"
    );

    Ok(finish(TestResult::TwoSample(TwoSampleResult {
        summary,
        t_test_type: test_type,
        mean1,
        mean2,
        var1,
        var2,
        standard_error,
        n1,
        n2,
    })))
}

/// Paired t-test on per-subject differences `before[i] - after[i]`.
///
/// # Arguments
///
/// * `before` - Measurements before treatment
/// * `after` - Measurements after treatment, same subjects in the same order
/// * `config` - Significance level, alternative and p-value method
///
/// # Errors
///
/// `InsufficientSample` when the lengths differ or fewer than two pairs are given,
/// `DegenerateInput` when every difference is identical.
pub fn paired_t_test(
    before: &[f64],
    after: &[f64],
    config: &TestConfiguration,
) -> Result<TestResult> {
    run_paired(before, after, config).inspect_err(|e| debug!(error = %e, "paired t-test rejected"))
}

fn run_paired(before: &[f64], after: &[f64], config: &TestConfiguration) -> Result<TestResult> {
    config.validate()?;
    if before.len() != after.len() {
        return Err(EngineError::insufficient(format!(
            "before and after must have the same length, got {} and {}",
            before.len(),
            after.len()
        )));
    }
    ensure_finite(before, "before")?;
    ensure_finite(after, "after")?;
    ensure_min_len(before, 2, "paired sample")?;

    let differences: Vec<f64> = before.iter().zip(after).map(|(b, a)| b - a).collect();
    let n = differences.len();
    let too_small = || EngineError::insufficient("paired sample needs two pairs");
    let mean_difference = utils::mean(&differences).ok_or_else(too_small)?;
    let std_difference = utils::sample_std(&differences).ok_or_else(too_small)?;
    if std_difference == 0.0 {
        return Err(EngineError::degenerate(
            "all paired differences are identical, the standard error vanishes",
        ));
    }

    let standard_error = std_difference / (n as f64).sqrt();
    let t_stat = mean_difference / standard_error;
    let mean_before = utils::mean(before).ok_or_else(too_small)?;
    let mean_after = utils::mean(after).ok_or_else(too_small)?;
    ensure_finite_values(&[
        ("mean difference", mean_difference),
        ("standard deviation of the differences", std_difference),
        ("t statistic", t_stat),
        ("mean before", mean_before),
        ("mean after", mean_after),
    ])?;
    let df = (n - 1) as f64;
    let (critical_value, p_value) = t_reference(config, t_stat, df)?;

    let cohens_d = effect::cohens_d_paired(mean_difference, std_difference);
    let interval = effect::confidence_interval(mean_difference, critical_value, standard_error);
    ensure_finite_values(&[
        ("Cohen's d", cohens_d),
        ("lower confidence bound", interval.lower),
        ("upper confidence bound", interval.upper),
    ])?;

    let summary = TestSummary::new(t_stat, df, p_value, config.alpha(), config.alternative())
        .with_critical_value(critical_value)
        .with_effect_size(cohens_d)
        .with_confidence_interval(interval);

    let changes = count_changes(before, after);

    debug!(
        n,
        mean_difference,
        t = t_stat,
        df,
        p_value,
        significant = summary.is_significant,
        "paired t-test"
    );

    Ok(finish(TestResult::Paired(PairedResult {
        summary,
        mean_difference,
        std_difference,
        standard_error,
        mean_before,
        mean_after,
        changes,
        n,
    })))
}

fn count_changes(before: &[f64], after: &[f64]) -> PairedChanges {
    before
        .iter()
        .zip(after)
        .fold(PairedChanges::default(), |mut acc, (b, a)| {
            let change = a - b;
            if change > 0.0 {
                acc.increased += 1;
            } else if change < 0.0 {
                acc.decreased += 1;
            } else {
                acc.unchanged += 1;
            }
            acc
        })
}
