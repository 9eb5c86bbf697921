use approx::assert_abs_diff_eq;

use surface_fit::data::{SampleConfig, generate_sample};
use surface_fit::{FitError, FitOptions, FitSession, InitialGuess, ModelKind, fit, fit_model, fit_with_options};

#[test]
fn linear_x1_recovers_slope_and_intercept() {
    let x1 = [1.0, 2.0, 3.0];
    let x2 = [9.0, -7.0, 0.0]; // ignored by model 0
    let y: Vec<f64> = x1.iter().map(|v| 2.0 * v + 5.0).collect();

    let model = fit(0, &x1, &x2, &y).unwrap();
    assert_abs_diff_eq!(model.coefficient("a").unwrap(), 2.0, epsilon = 1e-6);
    assert_abs_diff_eq!(model.coefficient("f").unwrap(), 5.0, epsilon = 1e-6);
    assert_abs_diff_eq!(model.evaluate(&[4.0, 0.0]).unwrap(), 13.0, epsilon = 1e-6);
}

#[test]
fn plane_recovers_exact_three_point_fit() {
    let model = fit(4, &[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0], &[3.0, 6.0, 5.0]).unwrap();
    assert_abs_diff_eq!(model.coefficient("a").unwrap(), 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(model.coefficient("b").unwrap(), 2.0, epsilon = 1e-6);
    assert_abs_diff_eq!(model.coefficient("f").unwrap(), 3.0, epsilon = 1e-6);
}

#[test]
fn full_quadratic_with_five_points_does_not_converge() {
    let x1 = [0.0, 1.0, 2.0, 3.0, 4.0];
    let x2 = [4.0, 3.0, 2.0, 1.0, 0.5];
    let y = [1.0, 0.0, 2.0, 5.0, 3.0];
    let err = fit(5, &x1, &x2, &y).unwrap_err();
    assert!(matches!(err, FitError::Convergence { .. }), "{err:?}");
}

#[test]
fn out_of_range_model_index_is_rejected() {
    let x = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    for index in [6, 7, usize::MAX] {
        let err = fit(index, &x, &x, &x).unwrap_err();
        assert_eq!(err, FitError::InvalidModelIndex { index, max: 5 });
    }
}

#[test]
fn every_model_recovers_sampled_coefficients() {
    let truth = [-1.25, 0.5, 2.0, -0.75, 0.3, 10.0];
    for kind in ModelKind::ALL {
        let theta = &truth[..kind.param_count()];
        let obs = generate_sample(kind, theta, &SampleConfig::default()).unwrap();

        let outcome = fit_model(kind, &obs, &FitOptions::default()).unwrap();
        for (got, want) in outcome.model.coefficients().iter().zip(theta) {
            assert_abs_diff_eq!(*got, *want, epsilon = 1e-6);
        }
    }
}

#[test]
fn noisy_sample_lands_near_truth() {
    let theta = [1.0, -2.0, 0.5];
    let config = SampleConfig {
        count: 400,
        noise_sigma: 0.05,
        seed: 7,
        ..SampleConfig::default()
    };
    let obs = generate_sample(ModelKind::Plane, &theta, &config).unwrap();
    let outcome = fit_model(ModelKind::Plane, &obs, &FitOptions::default()).unwrap();
    for (got, want) in outcome.model.coefficients().iter().zip(&theta) {
        assert_abs_diff_eq!(*got, *want, epsilon = 0.05);
    }
}

#[test]
fn starting_point_does_not_change_the_answer() {
    let x1 = [0.0, 1.0, 2.0, 3.0];
    // Not an exact quadratic, so the solver stops at a nonzero residual.
    let y = [1.0, 0.0, 3.0, 11.0];
    let x2 = [0.0; 4];

    let from_ones = fit_with_options(2, &x1, &x2, &y, &FitOptions::default()).unwrap();
    let opts = FitOptions {
        initial_guess: InitialGuess::Explicit(vec![-50.0, 20.0, 100.0]),
        ..FitOptions::default()
    };
    let from_far = fit_with_options(2, &x1, &x2, &y, &opts).unwrap();

    for (a, b) in from_ones.model.coefficients().iter().zip(from_far.model.coefficients()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-6);
    }
}

#[test]
fn session_follows_unfitted_fitted_lifecycle() {
    let mut session = FitSession::new();
    assert_eq!(session.evaluate(&[1.0, 1.0]), Err(FitError::Uninitialized));

    let outcome = session.fit(3, &[0.0; 4], &[0.0, 1.0, 2.0, 3.0], &[1.0, 2.0, 5.0, 10.0]).unwrap();
    assert_eq!(outcome.model.kind(), ModelKind::QuadraticX2);

    // y = x2^2 + 1
    assert_abs_diff_eq!(session.evaluate(&[0.0, 4.0, 123.0]).unwrap(), 17.0, epsilon = 1e-6);
}
