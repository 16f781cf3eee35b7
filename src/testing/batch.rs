//! Independent test invocations evaluated in parallel.
//!
//! Every engine is a pure function of its arguments, so a batch is a plain `par_iter` over the
//! requests. Failures stay local to their entry and carry the request label as context.

use crate::testing::inference::{
    ProportionGroup, SampleGroup, anova, chi_square_test, one_sample_t_test, paired_t_test,
    two_sample_t_test,
};
use crate::testing::{TTestType, TestConfiguration, TestResult};
use anyhow::Context;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Owned inputs for one test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TestRequest {
    OneSample {
        sample: Vec<f64>,
        population_mean: f64,
        config: TestConfiguration,
    },
    TwoSample {
        sample1: Vec<f64>,
        sample2: Vec<f64>,
        test_type: TTestType,
        config: TestConfiguration,
    },
    Paired {
        before: Vec<f64>,
        after: Vec<f64>,
        config: TestConfiguration,
    },
    Anova {
        groups: Vec<SampleGroup>,
        config: TestConfiguration,
    },
    ChiSquare {
        groups: Vec<ProportionGroup>,
        success_label: String,
        config: TestConfiguration,
    },
}

impl TestRequest {
    pub fn run(&self) -> crate::testing::Result<TestResult> {
        match self {
            TestRequest::OneSample {
                sample,
                population_mean,
                config,
            } => one_sample_t_test(sample, *population_mean, config),
            TestRequest::TwoSample {
                sample1,
                sample2,
                test_type,
                config,
            } => two_sample_t_test(sample1, sample2, config, *test_type),
            TestRequest::Paired {
                before,
                after,
                config,
            } => paired_t_test(before, after, config),
            TestRequest::Anova { groups, config } => anova(groups, config),
            TestRequest::ChiSquare {
                groups,
                success_label,
                config,
            } => chi_square_test(groups, success_label, config),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelledRequest {
    pub label: String,
    pub request: TestRequest,
}

impl LabelledRequest {
    pub fn new(label: impl Into<String>, request: TestRequest) -> Self {
        LabelledRequest {
            label: label.into(),
            request,
        }
    }
}

#[derive(Debug)]
pub struct BatchEntry {
    pub label: String,
    pub outcome: anyhow::Result<TestResult>,
}

/// Outcomes of a batch, in the order the requests were given.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<&anyhow::Result<TestResult>> {
        self.entries
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| &entry.outcome)
    }

    /// Labels of the requests that ran and came out significant.
    pub fn significant_labels(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| matches!(&entry.outcome, Ok(result) if result.is_significant()))
            .map(|entry| entry.label.as_str())
            .collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &anyhow::Error)> {
        self.entries.iter().filter_map(|entry| match &entry.outcome {
            Ok(_) => None,
            Err(e) => Some((entry.label.as_str(), e)),
        })
    }
}

/// Run every request in parallel.
///
/// # Arguments
///
/// * `requests` - Labelled requests; labels are only used for reporting and need not be unique
///
/// # Returns
///
/// A [`BatchReport`] with one entry per request, in input order. A rejected request does not
/// affect the others.
pub fn run_batch(requests: &[LabelledRequest]) -> BatchReport {
    let entries: Vec<BatchEntry> = requests
        .par_iter()
        .map(|labelled| BatchEntry {
            label: labelled.label.clone(),
            outcome: labelled
                .request
                .run()
                .with_context(|| format!("test '{}' failed", labelled.label)),
        })
        .collect();

    let report = BatchReport { entries };
    debug!(
        requests = report.len(),
        failed = report.failures().count(),
        significant = report.significant_labels().len(),
        "batch finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::EngineError;

    #[test]
    fn test_run_dispatches_by_kind() {
        let request = TestRequest::Paired {
            before: vec![120.0, 118.0, 125.0, 122.0, 119.0, 121.0, 123.0],
            after: vec![115.0, 112.0, 118.0, 116.0, 113.0, 115.0, 117.0],
            config: TestConfiguration::default(),
        };
        let result = request.run().unwrap();
        assert_eq!(result.kind(), "paired");
        assert!(result.is_significant());
    }

    #[test]
    fn test_batch_keeps_order_and_isolates_failures() {
        let config = TestConfiguration::default();
        let requests = vec![
            LabelledRequest::new(
                "shifted",
                TestRequest::OneSample {
                    sample: vec![10.0, 12.0, 11.0, 13.0, 12.0, 11.0, 12.0, 13.0],
                    population_mean: 8.0,
                    config,
                },
            ),
            LabelledRequest::new(
                "too small",
                TestRequest::OneSample {
                    sample: vec![1.0],
                    population_mean: 0.0,
                    config,
                },
            ),
            LabelledRequest::new(
                "no difference",
                TestRequest::ChiSquare {
                    groups: vec![
                        ProportionGroup::new("A", 30, 100),
                        ProportionGroup::new("B", 30, 100),
                    ],
                    success_label: "success".to_string(),
                    config,
                },
            ),
        ];

        let report = run_batch(&requests);
        assert_eq!(report.len(), 3);
        let labels: Vec<&str> = report.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["shifted", "too small", "no difference"]);
        assert_eq!(report.significant_labels(), ["shifted"]);

        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        let (label, error) = failures[0];
        assert_eq!(label, "too small");
        assert!(error.to_string().contains("too small"));
        assert!(matches!(
            error.downcast_ref::<EngineError>(),
            Some(EngineError::InsufficientSample(_))
        ));

        assert!(report.get("no difference").unwrap().is_ok());
        assert!(report.get("missing").is_none());
    }

    #[test]
    fn test_empty_batch() {
        let report = run_batch(&[]);
        assert!(report.is_empty());
        assert!(report.significant_labels().is_empty());
    }
}
