//! Reference distributions for the test engines.
//!
//! The functions in this module are closed-form approximations, not integrals of the true
//! Student-t, F or chi-square distributions. Significance outcomes reported by the engines are
//! calibrated against exactly these curves, so they must not be swapped for precise CDFs. The
//! precise versions live in [`exact`] and are only used when a caller opts in through
//! [`PValueMethod::Exact`](crate::testing::PValueMethod::Exact).

use crate::testing::Alternative;
use serde::{Deserialize, Serialize};
use std::f64::consts::{E, PI};

pub mod exact;

/// Normal-approximation cutoffs used once `df >= 30`, keyed by the (possibly halved) alpha.
const NORMAL_CUTOFFS: [(f64, f64); 3] = [(0.005, 2.576), (0.025, 1.96), (0.05, 1.645)];
const NORMAL_CUTOFF_FLOOR: f64 = 1.282;

const T_TABLE_ALPHAS: [f64; 3] = [0.05, 0.025, 0.005];

/// Critical values of Student's t for small df, columns follow [`T_TABLE_ALPHAS`].
const T_TABLE: [(f64, [f64; 3]); 9] = [
    (1.0, [6.314, 12.706, 63.657]),
    (2.0, [2.920, 4.303, 9.925]),
    (3.0, [2.353, 3.182, 5.841]),
    (4.0, [2.132, 2.776, 4.604]),
    (5.0, [2.015, 2.571, 4.032]),
    (10.0, [1.812, 2.228, 3.169]),
    (15.0, [1.753, 2.131, 2.947]),
    (20.0, [1.725, 2.086, 2.845]),
    (25.0, [1.708, 2.060, 2.787]),
];

const FALLBACK_CRITICAL_VALUE: f64 = 1.96;

/// Chi-square critical values for df 1..=4, columns follow [`CHI_SQUARE_ALPHAS`].
const CHI_SQUARE_TABLE: [[f64; 3]; 4] = [
    [3.841, 6.635, 10.828],
    [5.991, 9.210, 13.816],
    [7.815, 11.345, 16.266],
    [9.488, 13.277, 18.467],
];
const CHI_SQUARE_ALPHAS: [f64; 3] = [0.05, 0.01, 0.001];

/// Above this many degrees of freedom the t reference collapses onto the normal curve.
const LARGE_DF: f64 = 30.0;

/// Standard normal CDF via the Zelen & Severo polynomial.
pub fn normal_cdf(z: f64) -> f64 {
    let t = 1.0 / (1.0 + 0.2316419 * z.abs());
    let d = 0.3989423 * (-z * z / 2.0).exp();
    let prob =
        d * t * (0.3193815 + t * (-0.3565638 + t * (1.781478 + t * (-1.821256 + t * 1.330274))));
    if z > 0.0 { 1.0 - prob } else { prob }
}

/// Gamma function approximation.
///
/// Exact at 0.5, 1, 1.5 and 2; larger arguments are reduced with `Γ(x) = (x-1)Γ(x-1)` until they
/// hit one of those points or drop to `x <= 1`, where Stirling's formula takes over.
pub fn gamma_approx(x: f64) -> f64 {
    let mut x = x;
    let mut scale = 1.0;
    loop {
        if x == 0.5 {
            return scale * PI.sqrt();
        }
        if x == 1.0 || x == 2.0 {
            return scale;
        }
        if x == 1.5 {
            return scale * PI.sqrt() / 2.0;
        }
        if x > 1.0 {
            scale *= x - 1.0;
            x -= 1.0;
            continue;
        }
        return scale * (2.0 * PI / x).sqrt() * (x / E).powf(x);
    }
}

/// Student-t probability density built from [`gamma_approx`].
///
/// Γ overflows for arguments above about 171, so from `df ≈ 342` on the coefficient is no longer
/// representable. The density then falls back to the standard normal, which it approaches within
/// `φ(x) / (4·df)` at that size.
pub fn t_pdf(x: f64, df: f64) -> f64 {
    let coefficient = gamma_approx((df + 1.0) / 2.0) / ((df * PI).sqrt() * gamma_approx(df / 2.0));
    if !coefficient.is_finite() {
        return normal_pdf(x);
    }
    coefficient * (1.0 + x * x / df).powf(-(df + 1.0) / 2.0)
}

fn normal_pdf(x: f64) -> f64 {
    (-x * x / 2.0).exp() / (2.0 * PI).sqrt()
}

/// Critical value of the t statistic.
///
/// For `df >= 30` the normal cutoffs apply. Below that the small table is consulted with the
/// nearest tabulated df and the nearest tabulated alpha; no interpolation takes place.
///
/// # Arguments
///
/// * `alpha` - Significance level, halved internally for two-sided alternatives
/// * `df` - Degrees of freedom, fractional values (Welch) are accepted as-is
/// * `alternative` - Alternative hypothesis
pub fn t_critical_value(alpha: f64, df: f64, alternative: Alternative) -> f64 {
    let alpha_for_lookup = match alternative {
        Alternative::TwoSided => alpha / 2.0,
        _ => alpha,
    };

    if df >= LARGE_DF {
        return NORMAL_CUTOFFS
            .iter()
            .find(|(limit, _)| alpha_for_lookup <= *limit)
            .map(|(_, cutoff)| *cutoff)
            .unwrap_or(NORMAL_CUTOFF_FLOOR);
    }

    lookup_t_table(alpha_for_lookup, df).unwrap_or(FALLBACK_CRITICAL_VALUE)
}

fn lookup_t_table(alpha: f64, df: f64) -> Option<f64> {
    let row = nearest(T_TABLE.iter().map(|(table_df, _)| *table_df), df)?;
    let column = nearest(T_TABLE_ALPHAS.iter().copied(), alpha)?;
    Some(T_TABLE[row].1[column])
}

/// Index of the candidate closest to `target`; ties keep the earlier candidate.
fn nearest(candidates: impl Iterator<Item = f64>, target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, value) in candidates.enumerate() {
        let distance = (value - target).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((idx, distance)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Approximate p-value of a t statistic.
///
/// Large df use the normal tail; small df use `exp(-0.717|t| - 0.416t²)` clamped to
/// `[0.001, 0.5]`. Both are doubled for two-sided alternatives. One-sided p-values are taken from
/// `|t|` regardless of the sign of the statistic.
pub fn t_p_value(t_stat: f64, df: f64, alternative: Alternative) -> f64 {
    let abs_t = t_stat.abs();

    let tail = if df >= LARGE_DF {
        1.0 - normal_cdf(abs_t)
    } else {
        (-0.717 * abs_t - 0.416 * abs_t * abs_t).exp().clamp(0.001, 0.5)
    };

    let p = match alternative {
        Alternative::TwoSided => 2.0 * tail,
        _ => tail,
    };
    p.min(1.0)
}

/// Approximate upper-tail p-value of an F statistic.
pub fn f_p_value(f_stat: f64, _df_between: f64, df_within: f64) -> f64 {
    if df_within >= LARGE_DF {
        if f_stat < 1.0 {
            0.5
        } else if f_stat > 10.0 {
            0.001
        } else {
            (0.5 / f_stat.powf(1.5)).max(0.001)
        }
    } else {
        (-0.5 * f_stat).exp().clamp(0.001, 0.5)
    }
}

/// Approximate p-value of a chi-square statistic.
///
/// Returns the smallest tabulated alpha whose critical value is exceeded (df capped at 4),
/// otherwise `exp(-χ²/2)` clamped to `[0.05, 0.9]`.
pub fn chi_square_p_value(chi_sq: f64, df: usize) -> f64 {
    let row = CHI_SQUARE_TABLE[df.clamp(1, CHI_SQUARE_TABLE.len()) - 1];

    row.iter()
        .zip(CHI_SQUARE_ALPHAS.iter())
        .rev()
        .find(|(critical, _)| chi_sq > **critical)
        .map(|(_, alpha)| *alpha)
        .unwrap_or_else(|| (-0.5 * chi_sq).exp().clamp(0.05, 0.9))
}

/// Whether `x` lies in the rejection region bounded by `critical_value`.
pub fn is_in_critical_region(x: f64, critical_value: f64, alternative: Alternative) -> bool {
    match alternative {
        Alternative::TwoSided => x.abs() >= critical_value,
        Alternative::Greater => x >= critical_value,
        Alternative::Less => x <= -critical_value,
    }
}

/// A point on the plotted t density.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityPoint {
    pub x: f64,
    pub density: f64,
    pub in_critical_region: bool,
    pub is_test_statistic: bool,
}

const CURVE_START: f64 = -5.0;
const CURVE_STEP: f64 = 0.1;
const CURVE_POINTS: usize = 101;

/// Sample the t density on `[-5, 5]` in steps of 0.1, marking the rejection region and the
/// grid points within 0.05 of the observed statistic.
pub fn density_curve(
    statistic: f64,
    df: f64,
    critical_value: f64,
    alternative: Alternative,
) -> Vec<DensityPoint> {
    (0..CURVE_POINTS)
        .map(|i| {
            let x = CURVE_START + i as f64 * CURVE_STEP;
            DensityPoint {
                x,
                density: t_pdf(x, df),
                in_critical_region: is_in_critical_region(x, critical_value, alternative),
                is_test_statistic: (x - statistic).abs() < 0.05,
            }
        })
        .collect()
}
