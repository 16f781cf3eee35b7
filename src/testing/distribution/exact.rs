//! Exact reference distributions backed by `statrs`.
//!
//! Unlike the approximations in the parent module these honour the direction of one-sided
//! alternatives for the t distribution.

use crate::testing::{Alternative, EngineError, Result};
use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, StudentsT};

fn students_t(df: f64) -> Result<StudentsT> {
    StudentsT::new(0.0, 1.0, df).map_err(|e| {
        EngineError::invalid(format!("t distribution with {} degrees of freedom: {}", df, e))
    })
}

/// Exact p-value of a t statistic.
pub fn t_p_value(t_stat: f64, df: f64, alternative: Alternative) -> Result<f64> {
    let dist = students_t(df)?;
    let p = match alternative {
        Alternative::TwoSided => 2.0 * dist.sf(t_stat.abs()),
        Alternative::Greater => dist.sf(t_stat),
        Alternative::Less => dist.cdf(t_stat),
    };
    Ok(p.clamp(0.0, 1.0))
}

/// Exact critical value of the t statistic at the given alpha.
pub fn t_critical_value(alpha: f64, df: f64, alternative: Alternative) -> Result<f64> {
    let tail = match alternative {
        Alternative::TwoSided => alpha / 2.0,
        _ => alpha,
    };
    Ok(students_t(df)?.inverse_cdf(1.0 - tail))
}

/// Exact upper-tail p-value of an F statistic.
pub fn f_p_value(f_stat: f64, df_between: f64, df_within: f64) -> Result<f64> {
    let dist = FisherSnedecor::new(df_between, df_within).map_err(|e| {
        EngineError::invalid(format!(
            "F distribution with ({}, {}) degrees of freedom: {}",
            df_between, df_within, e
        ))
    })?;
    Ok(dist.sf(f_stat).clamp(0.0, 1.0))
}

/// Exact upper-tail p-value of a chi-square statistic.
pub fn chi_square_p_value(chi_sq: f64, df: usize) -> Result<f64> {
    let dist = ChiSquared::new(df as f64).map_err(|e| {
        EngineError::invalid(format!(
            "chi-square distribution with {} degrees of freedom: {}",
            df, e
        ))
    })?;
    Ok(dist.sf(chi_sq).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_exact_t() {
        assert_abs_diff_eq!(
            t_p_value(2.228, 10.0, Alternative::TwoSided).unwrap(),
            0.05,
            epsilon = 1e-3
        );
        assert_abs_diff_eq!(
            t_p_value(-2.228, 10.0, Alternative::Less).unwrap(),
            0.025,
            epsilon = 1e-3
        );
        // wrong direction gives the large tail
        assert_abs_diff_eq!(
            t_p_value(-2.228, 10.0, Alternative::Greater).unwrap(),
            0.975,
            epsilon = 1e-3
        );
        assert_abs_diff_eq!(
            t_critical_value(0.05, 10.0, Alternative::TwoSided).unwrap(),
            2.228,
            epsilon = 1e-3
        );
        assert_abs_diff_eq!(
            t_critical_value(0.05, 10.0, Alternative::Greater).unwrap(),
            1.812,
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_exact_f_and_chi_square() {
        assert_abs_diff_eq!(f_p_value(4.965, 1.0, 10.0).unwrap(), 0.05, epsilon = 1e-3);
        assert_abs_diff_eq!(chi_square_p_value(3.841, 1).unwrap(), 0.05, epsilon = 1e-3);
        assert_abs_diff_eq!(chi_square_p_value(5.991, 2).unwrap(), 0.05, epsilon = 1e-3);
    }

    #[test]
    fn test_invalid_degrees_of_freedom() {
        assert!(matches!(
            t_p_value(1.0, 0.0, Alternative::TwoSided),
            Err(EngineError::InvalidConfiguration(_))
        ));
        assert!(chi_square_p_value(1.0, 0).is_err());
        assert!(f_p_value(1.0, 0.0, 5.0).is_err());
    }
}
