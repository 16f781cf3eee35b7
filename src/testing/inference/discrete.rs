use crate::testing::effect;
use crate::testing::inference::{chi_square_reference, finish};
use crate::testing::utils::{ensure_finite_values, ensure_unique_labels};
use crate::testing::{
    Alternative, ChiSquareResult, EngineError, GroupProportion, Result, TestConfiguration,
    TestResult, TestSummary,
};
use ndarray::{Array2, Axis, Zip};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Success counts of one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProportionGroup {
    pub label: String,
    pub successes: u64,
    pub total: u64,
}

impl ProportionGroup {
    pub fn new(label: impl Into<String>, successes: u64, total: u64) -> Self {
        ProportionGroup {
            label: label.into(),
            successes,
            total,
        }
    }

    pub fn failures(&self) -> u64 {
        self.total.saturating_sub(self.successes)
    }
}

/// Chi-square test of independence between group membership and a success/failure outcome.
///
/// The groups form a k×2 contingency table. Expected counts follow from the row and column
/// totals; the statistic sums `(observed - expected)² / expected` over every cell, with `k - 1`
/// degrees of freedom. Cramér's V is reported as the effect size and, for exactly two groups,
/// the odds ratio and risk ratio of the first group relative to the second.
///
/// # Arguments
///
/// * `groups` - Success counts per group, labels must be unique
/// * `success_label` - Name of the success category, used in the interpretation text
/// * `config` - Significance level and p-value method
///
/// # Errors
///
/// `InvalidConfiguration` for fewer than two groups, duplicate labels or more successes than
/// trials; `InsufficientSample` for a group without trials; `DegenerateInput` when an expected
/// count is zero (every observation is a success, or every one a failure).
pub fn chi_square_test(
    groups: &[ProportionGroup],
    success_label: &str,
    config: &TestConfiguration,
) -> Result<TestResult> {
    run_chi_square(groups, success_label, config)
        .inspect_err(|e| debug!(error = %e, "chi-square test rejected"))
}

fn run_chi_square(
    groups: &[ProportionGroup],
    success_label: &str,
    config: &TestConfiguration,
) -> Result<TestResult> {
    config.validate()?;
    let k = groups.len();
    if k < 2 {
        return Err(EngineError::invalid(format!(
            "chi-square test needs at least 2 groups, got {}",
            k
        )));
    }
    ensure_unique_labels(groups.iter().map(|g| g.label.as_str()))?;
    for group in groups {
        if group.successes > group.total {
            return Err(EngineError::invalid(format!(
                "group '{}' reports {} successes out of {}",
                group.label, group.successes, group.total
            )));
        }
        if group.total == 0 {
            return Err(EngineError::insufficient(format!(
                "group '{}' has no observations",
                group.label
            )));
        }
    }

    let n = checked_sum(groups.iter().map(|g| g.total), "total observations")?;
    let total_successes = checked_sum(groups.iter().map(|g| g.successes), "total successes")?;

    let observed = contingency_table(groups);
    let expected = expected_counts(&observed);
    if expected.iter().any(|&e| e == 0.0) {
        return Err(EngineError::degenerate(
            "an expected cell count is zero, every observation falls in one category",
        ));
    }

    let chi_square = Zip::from(&observed)
        .and(&expected)
        .fold(0.0, |acc, &o, &e| acc + (o - e).powi(2) / e);

    let overall_proportion = total_successes as f64 / n as f64;
    let df = k - 1;
    let p_value = chi_square_reference(config, chi_square, df)?;
    let cramers_v = effect::cramers_v(chi_square, n as f64, k);
    ensure_finite_values(&[("chi-square statistic", chi_square), ("Cramér's V", cramers_v)])?;

    let proportions: Vec<GroupProportion> = groups
        .iter()
        .map(|g| GroupProportion {
            group: g.label.clone(),
            successes: g.successes,
            total: g.total,
            proportion: g.successes as f64 / g.total as f64,
        })
        .collect();

    let (odds_ratio, risk_ratio) = match groups {
        [first, second] => (
            effect::odds_ratio(
                first.successes as f64,
                first.failures() as f64,
                second.successes as f64,
                second.failures() as f64,
            ),
            effect::risk_ratio(proportions[0].proportion, proportions[1].proportion),
        ),
        _ => (None, None),
    };

    let summary = TestSummary::new(
        chi_square,
        df as f64,
        p_value,
        config.alpha(),
        Alternative::Greater,
    )
    .with_effect_size(cramers_v);

    debug!(
        k,
        n,
        chi_square,
        df,
        p_value,
        significant = summary.is_significant,
        "chi-square test of independence"
    );

    Ok(finish(TestResult::ChiSquare(ChiSquareResult {
        summary,
        success_label: success_label.to_string(),
        proportions,
        overall_proportion,
        cramers_v,
        odds_ratio,
        risk_ratio,
        n,
    })))
}

fn checked_sum(mut counts: impl Iterator<Item = u64>, what: &str) -> Result<u64> {
    counts
        .try_fold(0_u64, |acc, count| acc.checked_add(count))
        .ok_or_else(|| EngineError::invalid(format!("{} exceed {}", what, u64::MAX)))
}

/// k×2 table of observed counts, successes in column 0 and failures in column 1.
fn contingency_table(groups: &[ProportionGroup]) -> Array2<f64> {
    Array2::from_shape_fn((groups.len(), 2), |(row, col)| {
        let group = &groups[row];
        if col == 0 {
            group.successes as f64
        } else {
            group.failures() as f64
        }
    })
}

/// Expected counts under independence: `row_total · column_total / N`.
fn expected_counts(observed: &Array2<f64>) -> Array2<f64> {
    let row_totals = observed.sum_axis(Axis(1));
    let col_totals = observed.sum_axis(Axis(0));
    let n = observed.sum();
    Array2::from_shape_fn(observed.dim(), |(row, col)| {
        row_totals[row] * col_totals[col] / n
    })
}
