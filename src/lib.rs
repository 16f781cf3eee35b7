//! # hypothesis-engine
//!
//! A small statistical inference library for classical hypothesis tests on plain numeric samples.
//!
//! Every test validates its input, computes the test statistic from descriptive statistics, looks
//! up a p-value, attaches an effect size (and, for t-tests, a confidence interval) and finally
//! derives a plain-language headline plus a technical summary from the numbers. All entry points
//! are pure functions that return an immutable [`TestResult`](testing::TestResult).
//!
//! ## Core Features
//!
//! - **t-tests**: One-sample, two-sample (Student or Welch) and paired t-tests
//! - **One-way ANOVA**: F-test across two or more groups with η²
//! - **Chi-square**: Test of independence for success/failure counts with Cramér's V, odds ratio
//!   and risk ratio
//! - **Interpretation**: Deterministic headline and technical text from fixed templates
//! - **Batch evaluation**: Many independent tests evaluated in parallel with `rayon`
//!
//! ## Quick Start
//!
//! Build a [`TestConfiguration`](testing::TestConfiguration) and call an engine:
//!
//! ```
//! use hypothesis_engine::testing::{TestConfiguration, inference::one_sample_t_test};
//!
//! let data = [23.0, 25.0, 21.0, 22.0, 27.0, 23.0, 25.0, 24.0, 26.0, 22.0];
//! let result = one_sample_t_test(&data, 24.0, &TestConfiguration::default()).unwrap();
//! assert!(!result.is_significant());
//! println!("{}", result.headline());
//! ```
//!
//! p-values come from closed-form approximations by default; switch a configuration to
//! [`PValueMethod::Exact`](testing::PValueMethod::Exact) for the exact reference distributions.
//!
//! ## Module Organization
//!
//! - **[`testing`]**: Configuration, test engines, distributions, effect sizes and batch runs
//! - **[`interpretation`]**: Effect-size bands and text generation

pub mod interpretation;
pub mod testing;

pub use testing::inference::{
    ProportionGroup, SampleGroup, anova, chi_square_test, one_sample_t_test, paired_t_test,
    two_sample_t_test,
};
pub use testing::{
    Alternative, EngineError, PValueMethod, TTestType, TestConfiguration, TestResult,
};
