use crate::testing::{EngineError, Result};
use num_traits::Float;

/// Arithmetic mean of a sample, `None` when the sample is empty.
pub fn mean<T>(sample: &[T]) -> Option<T>
where
    T: Float,
{
    if sample.is_empty() {
        return None;
    }
    let sum = sample.iter().fold(T::zero(), |acc, &x| acc + x);
    Some(sum / T::from(sample.len())?)
}

/// Sum of squared deviations from `center`.
pub fn sum_of_squares<T>(sample: &[T], center: T) -> T
where
    T: Float,
{
    sample
        .iter()
        .fold(T::zero(), |acc, &x| acc + (x - center) * (x - center))
}

/// Sample variance with the `n - 1` denominator, `None` for fewer than two observations.
pub fn sample_variance<T>(sample: &[T]) -> Option<T>
where
    T: Float,
{
    if sample.len() < 2 {
        return None;
    }
    let m = mean(sample)?;
    Some(sum_of_squares(sample, m) / T::from(sample.len() - 1)?)
}

/// Sample standard deviation, the square root of [`sample_variance`].
pub fn sample_std<T>(sample: &[T]) -> Option<T>
where
    T: Float,
{
    sample_variance(sample).map(|v| v.sqrt())
}

/// Pooled variance of two groups: `((n1-1)var1 + (n2-1)var2) / (n1+n2-2)`.
///
/// `None` when `n1 + n2 < 3`, where the pooled denominator vanishes.
pub fn pooled_variance<T>(n1: usize, var1: T, n2: usize, var2: T) -> Option<T>
where
    T: Float,
{
    if n1 + n2 < 3 {
        return None;
    }
    let w1 = T::from(n1 - 1)?;
    let w2 = T::from(n2 - 1)?;
    Some((w1 * var1 + w2 * var2) / T::from(n1 + n2 - 2)?)
}

/// Parse comma-separated free text into a sample.
///
/// Tokens are trimmed; anything that is not a finite number is dropped.
pub fn parse_sample(text: &str) -> Vec<f64> {
    text.split(',')
        .filter_map(|token| token.trim().parse::<f64>().ok())
        .filter(|x| x.is_finite())
        .collect()
}

pub(crate) fn ensure_finite(sample: &[f64], name: &str) -> Result<()> {
    match sample.iter().position(|x| !x.is_finite()) {
        Some(index) => Err(EngineError::NonFiniteInput {
            sample: name.to_string(),
            index,
        }),
        None => Ok(()),
    }
}

pub(crate) fn ensure_min_len(sample: &[f64], min: usize, name: &str) -> Result<()> {
    if sample.len() < min {
        return Err(EngineError::insufficient(format!(
            "{} needs at least {} observations, got {}",
            name,
            min,
            sample.len()
        )));
    }
    Ok(())
}

/// Reject derived quantities that overflowed `f64` arithmetic.
///
/// Finite observations of extreme magnitude can still push a mean, a sum of squares or a ratio
/// to ±∞ or NaN; results never carry such values.
pub(crate) fn ensure_finite_values(values: &[(&str, f64)]) -> Result<()> {
    match values.iter().find(|(_, value)| !value.is_finite()) {
        Some((name, value)) => Err(EngineError::degenerate(format!(
            "{} is {}, the observations overflow floating-point arithmetic",
            name, value
        ))),
        None => Ok(()),
    }
}

pub(crate) fn ensure_unique_labels<'a>(labels: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen: Vec<&str> = Vec::new();
    for label in labels {
        if seen.contains(&label) {
            return Err(EngineError::invalid(format!(
                "group label '{}' appears more than once",
                label
            )));
        }
        seen.push(label);
    }
    Ok(())
}
