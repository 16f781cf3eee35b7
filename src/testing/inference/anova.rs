//! One-way analysis of variance.

use crate::testing::effect;
use crate::testing::inference::{f_reference, finish};
use crate::testing::utils::{self, ensure_finite, ensure_finite_values, ensure_unique_labels};
use crate::testing::{
    Alternative, AnovaResult, EngineError, GroupMean, Result, TestConfiguration, TestResult,
    TestSummary,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A labelled numeric sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleGroup {
    pub label: String,
    pub values: Vec<f64>,
}

impl SampleGroup {
    pub fn new(label: impl Into<String>, values: impl Into<Vec<f64>>) -> Self {
        SampleGroup {
            label: label.into(),
            values: values.into(),
        }
    }
}

/// One-way ANOVA F-test across `k >= 2` groups.
///
/// `F = (SS_between / (k - 1)) / (SS_within / (N - k))`, with η² = SS_between / SS_total as the
/// effect size. The F test is upper-tailed, so the configured alternative is ignored and the
/// result records [`Alternative::Greater`].
///
/// # Arguments
///
/// * `groups` - Labelled samples, labels must be unique
/// * `config` - Significance level and p-value method
///
/// # Errors
///
/// `InvalidConfiguration` for fewer than two groups or duplicate labels, `InsufficientSample` for
/// an empty group or when no within-group degrees of freedom remain, `DegenerateInput` when
/// every group is constant.
pub fn anova(groups: &[SampleGroup], config: &TestConfiguration) -> Result<TestResult> {
    run_anova(groups, config).inspect_err(|e| debug!(error = %e, "ANOVA rejected"))
}

fn run_anova(groups: &[SampleGroup], config: &TestConfiguration) -> Result<TestResult> {
    config.validate()?;
    let k = groups.len();
    if k < 2 {
        return Err(EngineError::invalid(format!(
            "ANOVA needs at least 2 groups, got {}",
            k
        )));
    }
    ensure_unique_labels(groups.iter().map(|g| g.label.as_str()))?;

    let mut group_means = Vec::with_capacity(k);
    for group in groups {
        ensure_finite(&group.values, &group.label)?;
        let mean = utils::mean(&group.values).ok_or_else(|| {
            EngineError::insufficient(format!("group '{}' has no observations", group.label))
        })?;
        let name = format!("mean of group '{}'", group.label);
        ensure_finite_values(&[(name.as_str(), mean)])?;
        group_means.push(GroupMean {
            group: group.label.clone(),
            n: group.values.len(),
            mean,
        });
    }

    let n: usize = group_means.iter().map(|g| g.n).sum();
    if n == k {
        return Err(EngineError::insufficient(
            "every group has a single observation, no within-group degrees of freedom remain",
        ));
    }

    let all_values: Vec<f64> = groups.iter().flat_map(|g| g.values.iter().copied()).collect();
    let overall_mean = utils::mean(&all_values)
        .ok_or_else(|| EngineError::insufficient("no observations"))?;

    let ss_between: f64 = group_means
        .iter()
        .map(|g| g.n as f64 * (g.mean - overall_mean).powi(2))
        .sum();
    let ss_within: f64 = groups
        .iter()
        .zip(&group_means)
        .map(|(group, summary)| utils::sum_of_squares(&group.values, summary.mean))
        .sum();

    if ss_within == 0.0 {
        return Err(EngineError::degenerate(
            "all groups are constant, the within-group variance vanishes",
        ));
    }

    let df_between = k - 1;
    let df_within = n - k;
    let ms_between = ss_between / df_between as f64;
    let ms_within = ss_within / df_within as f64;
    let f_stat = ms_between / ms_within;
    ensure_finite_values(&[
        ("overall mean", overall_mean),
        ("between-group sum of squares", ss_between),
        ("within-group sum of squares", ss_within),
        ("total sum of squares", ss_between + ss_within),
        ("F statistic", f_stat),
    ])?;
    let p_value = f_reference(config, f_stat, df_between as f64, df_within as f64)?;

    let summary = TestSummary::new(
        f_stat,
        df_between as f64,
        p_value,
        config.alpha(),
        Alternative::Greater,
    )
    .with_effect_size(effect::eta_squared(ss_between, ss_within));

    debug!(
        k,
        n,
        f = f_stat,
        df_between,
        df_within,
        p_value,
        significant = summary.is_significant,
        "one-way ANOVA"
    );

    Ok(finish(TestResult::Anova(AnovaResult {
        summary,
        group_means,
        overall_mean,
        ss_between,
        ss_within,
        df_between,
        df_within,
        n,
        k,
    })))
}
