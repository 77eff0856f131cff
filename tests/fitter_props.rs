use proptest::prelude::*;
use tadseg::model::{log_likelihood, DecayParams, PoissonDecayFitter};

proptest! {
    #[test]
    fn recovers_exact_decay(
        a in 1.0f64..4.0,
        b in -0.3f64..0.0,
        raw in proptest::collection::vec(1u32..16, 3..30),
    ) {
        let distances: Vec<f64> = raw.iter().map(|&d| f64::from(d)).collect();
        prop_assume!(distances.iter().any(|&d| d != distances[0]));
        let truth = DecayParams::new(a, b);
        let counts: Vec<f64> = distances.iter().map(|&d| truth.mean(d)).collect();

        let mut params = DecayParams::default();
        let outcome = PoissonDecayFitter::default()
            .fit(&counts, &distances, &mut params)
            .expect("exact data converges");

        prop_assert!((params.a - a).abs() < 1e-2, "a: {} vs {}", params.a, a);
        prop_assert!((params.b - b).abs() < 1e-2, "b: {} vs {}", params.b, b);

        let direct = log_likelihood(&counts, &distances, &params);
        prop_assert!((outcome.log_likelihood - direct).abs() <= 1e-9 * direct.abs().max(1.0));
    }

    #[test]
    fn empty_fit_leaves_params(a in -5.0f64..5.0, b in -1.0f64..1.0) {
        let mut params = DecayParams::new(a, b);
        let outcome = PoissonDecayFitter::default().fit(&[], &[], &mut params).unwrap();
        prop_assert_eq!(outcome.log_likelihood, 0.0);
        prop_assert_eq!(params, DecayParams::new(a, b));
    }
}
