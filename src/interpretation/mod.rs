//! Plain-language and technical summaries of test results.
//!
//! The text is chosen from fixed templates. Which template applies depends on whether the result
//! is significant, the direction of the effect, the magnitude band of the effect size and, for
//! one-sided t-tests, whether the observed direction matches the tested alternative. The band thresholds live in the tables below so they can be checked on their own.

use crate::testing::{
    Alternative, AnovaResult, ChiSquareResult, OneSampleResult, PairedResult, TTestType,
    TestResult, TestSummary, TwoSampleResult,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Headline and technical description of one result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpretation {
    pub headline: String,
    pub technical_description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectMagnitude {
    VerySmall,
    Small,
    Medium,
    Large,
    VeryLarge,
}

impl EffectMagnitude {
    pub fn label(&self) -> &'static str {
        match self {
            EffectMagnitude::VerySmall => "very small",
            EffectMagnitude::Small => "small",
            EffectMagnitude::Medium => "medium",
            EffectMagnitude::Large => "large",
            EffectMagnitude::VeryLarge => "very large",
        }
    }
}

impl fmt::Display for EffectMagnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Upper bounds (exclusive) of each band, checked in order.
type Bands = [(f64, EffectMagnitude)];

const COHENS_D_BANDS: &Bands = &[
    (0.2, EffectMagnitude::Small),
    (0.5, EffectMagnitude::Medium),
    (0.8, EffectMagnitude::Large),
];

const ETA_SQUARED_BANDS: &Bands = &[
    (0.01, EffectMagnitude::VerySmall),
    (0.06, EffectMagnitude::Small),
    (0.14, EffectMagnitude::Medium),
];

const CRAMERS_V_BANDS: &Bands = &[
    (0.1, EffectMagnitude::Small),
    (0.3, EffectMagnitude::Medium),
];

fn classify(value: f64, bands: &Bands, otherwise: EffectMagnitude) -> EffectMagnitude {
    bands
        .iter()
        .find(|(bound, _)| value < *bound)
        .map(|(_, magnitude)| *magnitude)
        .unwrap_or(otherwise)
}

/// Band of a Cohen's d; the sign is ignored.
pub fn cohens_d_magnitude(d: f64) -> EffectMagnitude {
    classify(d.abs(), COHENS_D_BANDS, EffectMagnitude::VeryLarge)
}

pub fn eta_squared_magnitude(eta_squared: f64) -> EffectMagnitude {
    classify(eta_squared, ETA_SQUARED_BANDS, EffectMagnitude::Large)
}

pub fn cramers_v_magnitude(v: f64) -> EffectMagnitude {
    classify(v, CRAMERS_V_BANDS, EffectMagnitude::Large)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Positive,
    Negative,
    Zero,
}

impl Direction {
    fn of(value: f64) -> Self {
        if value > 0.0 {
            Direction::Positive
        } else if value < 0.0 {
            Direction::Negative
        } else {
            Direction::Zero
        }
    }

    /// A one-sided alternative points the other way than the observed effect.
    fn opposes(self, alternative: Alternative) -> bool {
        matches!(
            (alternative, self),
            (Alternative::Greater, Direction::Negative) | (Alternative::Less, Direction::Positive)
        )
    }
}

/// Word for the direction a one-sided alternative tests, `None` for two-sided tests.
fn tested_side(
    alternative: Alternative,
    greater: &'static str,
    less: &'static str,
) -> Option<&'static str> {
    match alternative {
        Alternative::Greater => Some(greater),
        Alternative::Less => Some(less),
        Alternative::TwoSided => None,
    }
}

const AGAINST_ALTERNATIVE: &str = "the significant result does not support it";

/// Build the headline and technical description for a computed result.
///
/// Any text already present on the result is ignored.
pub fn interpret(result: &TestResult) -> Interpretation {
    let headline = match result {
        TestResult::OneSample(r) => one_sample_headline(r),
        TestResult::TwoSample(r) => two_sample_headline(r),
        TestResult::Paired(r) => paired_headline(r),
        TestResult::Anova(r) => anova_headline(r),
        TestResult::ChiSquare(r) => chi_square_headline(r),
    };
    Interpretation {
        headline,
        technical_description: technical(result),
    }
}

fn one_sample_headline(r: &OneSampleResult) -> String {
    let d = r.summary.effect_size;
    let alternative = r.summary.alternative;
    let direction = Direction::of(r.sample_mean - r.population_mean);
    let side = if r.sample_mean > r.population_mean { "above" } else { "below" };
    match (r.summary.is_significant, direction) {
        (true, direction) if direction.opposes(alternative) => format!(
            "The sample mean ({:.3}) is {} the hypothesized mean ({}), the opposite of the tested alternative ({}); {}.",
            r.sample_mean, side, r.population_mean, alternative, AGAINST_ALTERNATIVE
        ),
        (true, Direction::Positive) | (true, Direction::Negative) => {
            format!(
                "The sample mean ({:.3}) is significantly {} the hypothesized mean ({}), a {} effect (d = {:.3}).",
                r.sample_mean,
                side,
                r.population_mean,
                cohens_d_magnitude(d),
                d
            )
        }
        _ => format!(
            "The sample mean ({:.3}) is not significantly {} the hypothesized mean ({}).",
            r.sample_mean,
            tested_side(alternative, "above", "below").unwrap_or("different from"),
            r.population_mean
        ),
    }
}

fn two_sample_headline(r: &TwoSampleResult) -> String {
    let d = r.summary.effect_size;
    let alternative = r.summary.alternative;
    let side = if r.mean1 > r.mean2 { "higher" } else { "lower" };
    match (r.summary.is_significant, Direction::of(r.mean1 - r.mean2)) {
        (true, direction) if direction.opposes(alternative) => format!(
            "Group 1 mean ({:.3}) is {} than Group 2 mean ({:.3}), the opposite of the tested alternative ({}); {}.",
            r.mean1, side, r.mean2, alternative, AGAINST_ALTERNATIVE
        ),
        (true, Direction::Positive) | (true, Direction::Negative) => {
            format!(
                "Group 1 mean ({:.3}) is significantly {} than Group 2 mean ({:.3}), a {} effect (d = {:.3}).",
                r.mean1,
                side,
                r.mean2,
                cohens_d_magnitude(d),
                d
            )
        }
        _ => match tested_side(alternative, "higher", "lower") {
            Some(side) => format!(
                "Group 1 mean ({:.3}) is not significantly {} than Group 2 mean ({:.3}).",
                r.mean1, side, r.mean2
            ),
            None => format!(
                "Group 1 mean ({:.3}) is not significantly different from Group 2 mean ({:.3}).",
                r.mean1, r.mean2
            ),
        },
    }
}

// mean_difference is before - after, so a positive difference is a decrease
fn paired_headline(r: &PairedResult) -> String {
    let d = r.summary.effect_size;
    let alternative = r.summary.alternative;
    let direction = Direction::of(r.mean_difference);
    let change = match (r.summary.is_significant, direction) {
        (true, direction) if direction.opposes(alternative) => {
            let observed = if direction == Direction::Positive { "a decrease" } else { "an increase" };
            return format!(
                "Values show {} of {:.3} from before to after, the opposite of the tested alternative ({}); {}.",
                observed,
                r.mean_difference.abs(),
                alternative,
                AGAINST_ALTERNATIVE
            );
        }
        (true, Direction::Positive) => "decrease",
        (true, Direction::Negative) => "increase",
        _ => {
            return format!(
                "No significant {} from before to after (mean difference {:.3}).",
                tested_side(alternative, "decrease", "increase").unwrap_or("change"),
                r.mean_difference
            );
        }
    };
    format!(
        "Values show a significant {} of {:.3} from before to after, a {} effect (d = {:.3}).",
        change,
        r.mean_difference.abs(),
        cohens_d_magnitude(d),
        d
    )
}

fn anova_headline(r: &AnovaResult) -> String {
    let eta = r.summary.effect_size;
    if r.summary.is_significant {
        format!(
            "At least one of the {} group means differs significantly from the others, a {} effect (η² = {:.3}).",
            r.k,
            eta_squared_magnitude(eta),
            eta
        )
    } else {
        format!(
            "The {} group means do not differ significantly (η² = {:.3}).",
            r.k, eta
        )
    }
}

fn chi_square_headline(r: &ChiSquareResult) -> String {
    let v = r.cramers_v;
    let magnitude = cramers_v_magnitude(v);
    if !r.summary.is_significant {
        return format!(
            "The {} rate does not differ significantly across the {} groups (V = {:.3}).",
            r.success_label,
            r.proportions.len(),
            v
        );
    }
    match r.proportions.as_slice() {
        [first, second] if first.proportion != second.proportion => {
            let side = if first.proportion > second.proportion { "higher" } else { "lower" };
            format!(
                "{} has a significantly {} {} rate than {} ({:.1}% vs {:.1}%), a {} association (V = {:.3}).",
                first.group,
                side,
                r.success_label,
                second.group,
                first.proportion * 100.0,
                second.proportion * 100.0,
                magnitude,
                v
            )
        }
        groups => format!(
            "The {} rate differs significantly across the {} groups, a {} association (V = {:.3}).",
            r.success_label,
            groups.len(),
            magnitude,
            v
        ),
    }
}

fn test_name(result: &TestResult) -> &'static str {
    match result {
        TestResult::OneSample(_) => "One-sample t-test",
        TestResult::TwoSample(r) => match r.t_test_type {
            TTestType::Student => "Two-sample t-test (pooled variance)",
            TTestType::Welch => "Welch's t-test (unequal variances)",
        },
        TestResult::Paired(_) => "Paired t-test",
        TestResult::Anova(_) => "One-way ANOVA",
        TestResult::ChiSquare(_) => "Chi-square test of independence",
    }
}

fn effect_line(result: &TestResult) -> String {
    let effect = result.effect_size();
    match result {
        TestResult::OneSample(_) | TestResult::TwoSample(_) | TestResult::Paired(_) => format!(
            "Effect size: Cohen's d = {:.3} ({})",
            effect,
            cohens_d_magnitude(effect)
        ),
        TestResult::Anova(_) => format!(
            "Effect size: η² = {:.3} ({})",
            effect,
            eta_squared_magnitude(effect)
        ),
        TestResult::ChiSquare(_) => format!(
            "Effect size: Cramér's V = {:.3} ({})",
            effect,
            cramers_v_magnitude(effect)
        ),
    }
}

fn critical_value_line(summary: &TestSummary) -> Option<String> {
    let cv = summary.critical_value?;
    Some(match summary.alternative {
        Alternative::TwoSided => format!("Critical value: ±{:.3}", cv),
        Alternative::Greater => format!("Critical value: {:.3}", cv),
        Alternative::Less => format!("Critical value: {:.3}", -cv),
    })
}

fn statistic_label(result: &TestResult) -> String {
    let df = result.summary().degrees_of_freedom;
    match result {
        TestResult::Anova(r) => format!("F({}, {})", r.df_between, r.df_within),
        TestResult::ChiSquare(_) => format!("χ²({})", format_df(df)),
        _ => format!("t({})", format_df(df)),
    }
}

fn technical(result: &TestResult) -> String {
    let summary = result.summary();
    let mut lines = vec![
        test_name(result).to_string(),
        format!(
            "{} = {:.3}, p = {:.4}",
            statistic_label(result),
            summary.statistic, summary.p_value
        ),
        format!("α = {}, alternative: {}", summary.alpha, summary.alternative),
    ];

    lines.extend(critical_value_line(summary));
    lines.push(effect_line(result));

    if let Some(ci) = summary.confidence_interval {
        lines.push(format!(
            "{:.0}% CI: [{:.3}, {:.3}]",
            (1.0 - summary.alpha) * 100.0,
            ci.lower,
            ci.upper
        ));
    }

    match result {
        TestResult::Anova(r) => lines.push(format!(
            "Sums of squares: between = {:.3}, within = {:.3}",
            r.ss_between, r.ss_within
        )),
        TestResult::ChiSquare(r) => {
            if let Some(or) = r.odds_ratio {
                lines.push(format!("Odds ratio = {:.3}", or));
            }
            if let Some(rr) = r.risk_ratio {
                lines.push(format!("Risk ratio = {:.3}", rr));
            }
        }
        _ => {}
    }

    lines.push(
        if summary.is_significant {
            "Decision: reject H₀"
        } else {
            "Decision: fail to reject H₀"
        }
        .to_string(),
    );
    lines.join("\n")
}

/// Whole degrees of freedom print as integers, Welch's fractional df with two decimals.
fn format_df(df: f64) -> String {
    if df.fract() == 0.0 {
        format!("{}", df as i64)
    } else {
        format!("{:.2}", df)
    }
}
