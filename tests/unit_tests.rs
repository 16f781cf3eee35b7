use approx::assert_abs_diff_eq;
use hypothesis_engine::testing::distribution;
use hypothesis_engine::testing::utils::parse_sample;
use hypothesis_engine::{
    Alternative, EngineError, PValueMethod, ProportionGroup, SampleGroup, TTestType,
    TestConfiguration, TestResult, anova, chi_square_test, one_sample_t_test, paired_t_test,
    two_sample_t_test,
};

#[cfg(test)]
mod quick_test {
    use super::*;

    #[test]
    fn check_one_sample_reference() {
        // Mean 23.8 against 24: a small deviation that must not be significant
        let data = [23.0, 25.0, 21.0, 22.0, 27.0, 23.0, 25.0, 24.0, 26.0, 22.0];
        let result = one_sample_t_test(&data, 24.0, &TestConfiguration::default()).unwrap();

        let TestResult::OneSample(r) = &result else {
            panic!("expected a one-sample result");
        };
        assert_eq!(r.n, 10);
        assert_abs_diff_eq!(r.sample_mean, 23.8, epsilon = 1e-12);
        assert_abs_diff_eq!(r.sample_std, (33.6_f64 / 9.0).sqrt(), epsilon = 1e-12);
        assert!(result.statistic().abs() < 0.5);
        assert!(!result.is_significant());
        assert_eq!(result.summary().degrees_of_freedom, 9.0);
        assert_eq!(result.summary().critical_value, Some(2.228));
        assert!(result.headline().contains("not significantly different"));
    }

    #[test]
    fn check_paired_reference() {
        let before = [120.0, 118.0, 125.0, 122.0, 119.0, 121.0, 123.0];
        let after = [115.0, 112.0, 118.0, 116.0, 113.0, 115.0, 117.0];
        let result = paired_t_test(&before, &after, &TestConfiguration::default()).unwrap();

        let TestResult::Paired(r) = &result else {
            panic!("expected a paired result");
        };
        // differences are 5, 6, 7, 6, 6, 6, 6
        assert_abs_diff_eq!(r.mean_difference, 6.0, epsilon = 1e-12);
        assert_eq!(r.changes.decreased, 7);
        assert_eq!(r.changes.increased, 0);
        assert!(result.is_significant());
        assert!(result.headline().contains("decrease"));
    }

    #[test]
    fn check_separated_groups() {
        // [1, 2, 3] vs [7, 8, 9]: both variances are 1, so the pooled sd is 1
        let result = two_sample_t_test(
            &[1.0, 2.0, 3.0],
            &[7.0, 8.0, 9.0],
            &TestConfiguration::default(),
            TTestType::Student,
        )
        .unwrap();

        assert_abs_diff_eq!(result.statistic(), -6.0 / (2.0_f64 / 3.0).sqrt(), epsilon = 1e-9);
        assert_eq!(result.summary().degrees_of_freedom, 4.0);
        assert_eq!(result.p_value(), 0.002);
        assert!(result.is_significant());
        assert_abs_diff_eq!(result.effect_size(), -6.0, epsilon = 1e-9);
        assert_eq!(result.summary().critical_value, Some(2.776));
    }

    #[test]
    fn check_welch_fractional_df() {
        let sample1 = [1.0, 2.0, 3.0, 4.0, 5.0];
        let sample2 = [2.0, 6.0, 10.0, 14.0, 18.0, 22.0];
        let result = two_sample_t_test(
            &sample1,
            &sample2,
            &TestConfiguration::default(),
            TTestType::from_equal_variances(false),
        )
        .unwrap();

        let df = result.summary().degrees_of_freedom;
        let expected = (0.5_f64 + 56.0 / 6.0).powi(2)
            / (0.5_f64.powi(2) / 4.0 + (56.0_f64 / 6.0).powi(2) / 5.0);
        assert_abs_diff_eq!(df, expected, epsilon = 1e-9);
        assert!(df.fract() != 0.0);
        assert!(result.technical_description().starts_with("Welch's t-test"));
    }
}

#[cfg(test)]
mod anova_and_chi_square {
    use super::*;

    #[test]
    fn anova_matches_squared_t_for_two_groups() {
        let a = [1.0, 2.0, 3.0];
        let b = [7.0, 8.0, 9.0];
        let config = TestConfiguration::default();

        let t = two_sample_t_test(&a, &b, &config, TTestType::Student).unwrap();
        let f = anova(&[SampleGroup::new("a", a), SampleGroup::new("b", b)], &config).unwrap();

        assert_abs_diff_eq!(f.statistic(), t.statistic().powi(2), epsilon = 1e-9);
        assert_eq!(f.summary().alternative, Alternative::Greater);
    }

    #[test]
    fn chi_square_treatment_vs_control() {
        let groups = [
            ProportionGroup::new("Treatment", 60, 100),
            ProportionGroup::new("Control", 30, 100),
        ];
        let result = chi_square_test(&groups, "recovery", &TestConfiguration::default()).unwrap();

        let TestResult::ChiSquare(r) = &result else {
            panic!("expected a chi-square result");
        };
        assert!(result.is_significant());
        assert_abs_diff_eq!(r.odds_ratio.unwrap(), 3.5, epsilon = 1e-12);
        assert_abs_diff_eq!(r.risk_ratio.unwrap(), 2.0, epsilon = 1e-12);
        assert!(result.headline().starts_with("Treatment has a significantly higher recovery rate"));
    }

    #[test]
    fn chi_square_borderline_is_not_significant() {
        // 2.2 is below the df = 1 table value 3.841, so the smooth curve gives exp(-1.1)
        let p = distribution::chi_square_p_value(2.2, 1);
        assert_abs_diff_eq!(p, (-1.1_f64).exp(), epsilon = 1e-12);

        // a p-value equal to alpha is not significant
        assert_eq!(distribution::chi_square_p_value(4.0, 1), 0.05);
        let groups = [ProportionGroup::new("A", 60, 100), ProportionGroup::new("B", 46, 100)];
        let result = chi_square_test(&groups, "s", &TestConfiguration::default()).unwrap();
        assert!(result.statistic() > 3.841 && result.statistic() < 6.635);
        assert_eq!(result.p_value(), 0.05);
        assert!(!result.is_significant());
    }
}

#[cfg(test)]
mod configuration {
    use super::*;

    #[test]
    fn alternative_parses_ui_choices() {
        assert_eq!("two-sided".parse::<Alternative>().unwrap(), Alternative::TwoSided);
        assert_eq!("greater".parse::<Alternative>().unwrap(), Alternative::Greater);
        assert_eq!(" less ".parse::<Alternative>().unwrap(), Alternative::Less);
        assert!(matches!(
            "both".parse::<Alternative>(),
            Err(EngineError::InvalidConfiguration(_))
        ));
        assert_eq!(Alternative::TwoSided.to_string(), "two-sided");
    }

    #[test]
    fn ui_alpha_levels_are_valid() {
        for alpha in [0.01, 0.05, 0.10] {
            let config = TestConfiguration::new(alpha).unwrap();
            assert_eq!(config.alpha(), alpha);
            assert_eq!(config.p_value_method(), PValueMethod::Approximate);
        }
        assert!(TestConfiguration::new(0.0).is_err());
        assert!(TestConfiguration::new(1.0).is_err());
    }

    #[test]
    fn stricter_alpha_still_rejects() {
        // p = 0.002 stays below the stricter level
        let before = [120.0, 118.0, 125.0, 122.0, 119.0, 121.0, 123.0];
        let after = [115.0, 112.0, 118.0, 116.0, 113.0, 115.0, 117.0];
        let strict = TestConfiguration::new(0.01).unwrap();
        let result = paired_t_test(&before, &after, &strict).unwrap();
        assert!(result.is_significant());
        assert!(result.technical_description().contains("99% CI"));
    }

    #[test]
    fn parse_free_text_sample() {
        assert_eq!(parse_sample("1, 2, abc, 3.5,, NaN , inf"), vec![1.0, 2.0, 3.5]);
        assert!(parse_sample("").is_empty());
    }
}

#[cfg(test)]
mod rejections {
    use super::*;

    #[test]
    fn every_error_kind_is_reachable() {
        let config = TestConfiguration::default();

        assert!(matches!(
            one_sample_t_test(&[1.0], 0.0, &config),
            Err(EngineError::InsufficientSample(_))
        ));
        assert!(matches!(
            paired_t_test(&[1.0, 2.0, 3.0], &[1.0, 2.0], &config),
            Err(EngineError::InsufficientSample(_))
        ));
        assert!(matches!(
            paired_t_test(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0], &config),
            Err(EngineError::DegenerateInput(_))
        ));
        assert!(matches!(
            two_sample_t_test(&[], &[1.0, 2.0], &config, TTestType::Welch),
            Err(EngineError::InsufficientSample(_))
        ));
        assert!(matches!(
            one_sample_t_test(&[1.0, f64::INFINITY], 0.0, &config),
            Err(EngineError::NonFiniteInput { index: 1, .. })
        ));
        assert!(matches!(
            anova(&[SampleGroup::new("only", [1.0, 2.0])], &config),
            Err(EngineError::InvalidConfiguration(_))
        ));
    }
}
