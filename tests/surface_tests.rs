
use approx::assert_relative_eq;
use option_surface::{
    compute_surface, default_configs, linspace, run, sample, AxisSpec, CallDelta, CallPrice,
    ModelParams, SurfaceConfig, SurfaceKind, SurfaceModel,
};
use test_utils::{central_difference, reference_delta, reference_price, temp_path, STRIKE};

fn price_model() -> CallPrice {
    CallPrice::new(ModelParams::default()).unwrap()
}

fn delta_model() -> CallDelta {
    CallDelta::new(ModelParams::default()).unwrap()
}

/// S = E at two times before maturity: both finite and positive, pinned to
/// the literal formula. Note the price grows toward maturity at the money.
#[test]
fn test_at_the_money_scenario() {
    let m = price_model();
    let near = m.evaluate(100.0, 0.99);
    let mid = m.evaluate(100.0, 0.5);

    assert!(near.is_finite() && near > 0.0);
    assert!(mid.is_finite() && mid > 0.0);
    assert_relative_eq!(near, 0.224240266538, epsilon = 1e-9);
    assert_relative_eq!(mid, 0.081374073349, epsilon = 1e-9);
    assert_relative_eq!(near, reference_price(100.0, 0.99), epsilon = 1e-14);
    assert_relative_eq!(mid, reference_price(100.0, 0.5), epsilon = 1e-14);
}

#[test]
fn test_terminal_boundary_law() {
    let m = price_model();
    for s in linspace(0.0, 300.0, 61) {
        assert_eq!(m.evaluate(s, 1.0), (s - STRIKE).max(0.0));
    }
}

#[test]
fn test_zero_underlying_is_guarded() {
    assert_eq!(price_model().evaluate(0.0, 0.5), 0.0);
    assert_eq!(delta_model().evaluate(0.0, 0.5), 0.0);
}

#[test]
fn test_matches_reference_transcription() {
    let price = price_model();
    let delta = delta_model();
    for s in linspace(10.0, 200.0, 20) {
        for t in linspace(0.01, 0.99, 20) {
            assert_relative_eq!(
                price.evaluate(s, t),
                reference_price(s, t),
                epsilon = 1e-14,
                max_relative = 1e-12
            );
            assert_relative_eq!(
                delta.evaluate(s, t),
                reference_delta(s, t),
                epsilon = 1e-14,
                max_relative = 1e-12
            );
        }
    }
}

#[test]
fn test_price_surface_preset() {
    let config = default_configs::price();
    let surface = compute_surface(&config).unwrap();

    assert_eq!(surface.kind, SurfaceKind::Price);
    assert_eq!(surface.shape(), (20, 20));
    assert_eq!(surface.non_finite_count(), 0);
    assert_eq!(surface.underlying[0], 0.0);
    assert_eq!(surface.underlying[19], 200.0);
    assert_eq!(surface.time[0], 0.0);
    assert_eq!(surface.time[19], 0.99);

    // S = 0 column is exactly zero
    assert!(surface.values.iter().all(|row| row[0] == 0.0));

    // Non-decreasing in S above the strike
    let model = price_model();
    for (i, row) in surface.values.iter().enumerate() {
        let above: Vec<f64> = surface
            .underlying
            .iter()
            .zip(row)
            .filter(|(&s, _)| s >= STRIKE)
            .map(|(_, &v)| v)
            .collect();
        assert!(above.iter().all(|&v| v >= 0.0));
        assert!(
            above.windows(2).all(|w| w[1] >= w[0]),
            "row {} not monotone above strike",
            i
        );
        assert_eq!(row[5], model.evaluate(surface.underlying[5], surface.time[i]));
    }
}

#[test]
fn test_delta_surface_preset() {
    let config = default_configs::delta();
    let surface = compute_surface(&config).unwrap();

    assert_eq!(surface.kind, SurfaceKind::Delta);
    assert_eq!(surface.shape(), (20, 20));
    assert_eq!(surface.non_finite_count(), 0);
    assert_eq!(surface.time[0], 0.01);
    assert_eq!(surface.time[19], 0.99);

    let price = price_model();
    for (i, &t) in surface.time.iter().enumerate() {
        for (j, &s) in surface.underlying.iter().enumerate().skip(1) {
            let fd = central_difference(|x| price.evaluate(x, t), s, 1e-4);
            assert!(
                (surface.values[i][j] - fd).abs() < 1e-7,
                "delta mismatch at S={}, t={}",
                s,
                t
            );
        }
    }
}

#[test]
fn test_delta_asymptotes() {
    let d = delta_model();
    for t in [0.1, 0.5, 0.9] {
        assert!(d.evaluate(1.0, t).abs() < 1e-12);
        assert_relative_eq!(d.evaluate(5000.0, t), 1.0 / STRIKE, epsilon = 1e-9);
    }
}

#[test]
fn test_delta_rejects_closed_time_interval() {
    let mut config = default_configs::delta();
    config.grid.time = AxisSpec::new(0.0, 0.99, 20);
    let err = compute_surface(&config).unwrap_err();
    assert!(err.to_string().contains("outside open interval"));

    config.grid.time = AxisSpec::new(0.01, 1.0, 20);
    assert!(compute_surface(&config).is_err());
}

#[test]
fn test_grid_shape_matches_axes() {
    let model = price_model();
    for rows in 1..=5 {
        for cols in 1..=5 {
            let s = linspace(50.0, 150.0, cols);
            let t = linspace(0.1, 0.9, rows);
            let surface = sample(&model, &s, &t, rows % 2 == 0).unwrap();
            assert_eq!(surface.shape(), (rows, cols));
            assert_eq!(surface.values.len(), rows);
            assert!(surface.values.iter().all(|r| r.len() == cols));
        }
    }
}

#[test]
fn test_custom_params_flow_through() {
    let mut config = default_configs::price();
    config.model = ModelParams::new(120.0, 0.03, 0.25, 2.0).unwrap();
    config.grid.time = AxisSpec::new(0.0, 2.0, 5);
    let surface = compute_surface(&config).unwrap();

    // Last row sits at maturity: intrinsic payoff against the new strike
    let last = surface.values.last().unwrap();
    for (&s, &v) in surface.underlying.iter().zip(last) {
        assert_eq!(v, (s - 120.0).max(0.0));
    }
}

#[test]
fn test_run_writes_svg() {
    let mut config = default_configs::delta();
    config.render.output_path = temp_path("run/delta.svg");
    let surface = run(&config).unwrap();
    assert_eq!(surface.shape(), (20, 20));

    let svg = std::fs::read_to_string(&config.render.output_path).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("Delta"));
    let _ = std::fs::remove_file(&config.render.output_path);
}

#[cfg(feature = "serde")]
#[test]
fn test_config_file_round_trip() {
    let path = temp_path("config/price.toml");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();

    let mut config = SurfaceConfig::price();
    config.grid.underlying = AxisSpec::new(80.0, 120.0, 9);
    config.render.title = "custom".to_string();
    std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();

    let loaded = SurfaceConfig::from_toml_file(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(compute_surface(&loaded).unwrap().shape(), (20, 9));

    assert!(SurfaceConfig::from_toml_file(temp_path("config/missing.toml")).is_err());
    let _ = std::fs::remove_file(&path);
}
