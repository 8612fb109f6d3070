//! Test the warm-up gate, the cascaded low pass filter and the one euro filter.

use na::Vector3;
use nalgebra as na;

use keypoint_estimate::config::{LowPassConfig, OneEuroConfig, LOW_PASS_MAX_ORDER};
use keypoint_estimate::smoothing::one_euro::{smoothing_factor, MIN_INTERVAL};
use keypoint_estimate::smoothing::{LowPassFilter, OneEuroFilter, WarmUp, WarmUpGate, LOW_PASS_WARM_UP};

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DT: f32 = 1. / 30.;

fn random_point(rng: &mut StdRng) -> Vector3<f32> {
    Vector3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0))
}

fn within_unit(p: &Vector3<f32>) -> bool {
    p.iter().all(|e| e.abs() <= 1.0 + 1e-6)
}

/// Rising ramp, falling ramp and accelerating rise, one per axis.
fn monotone(k: u32) -> Vector3<f32> {
    let k = k as f32;
    Vector3::new(0.1 * k, -0.05 * k, 0.01 * k * k)
}

fn assert_between(prev: &Vector3<f32>, x: &Vector3<f32>, out: &Vector3<f32>, k: u32) {
    for i in 0..3 {
        let (lo, hi) = (prev[i].min(x[i]), prev[i].max(x[i]));
        let tol = 1e-5 * hi.abs().max(lo.abs()).max(1.);
        assert!(
            out[i] >= lo - tol && out[i] <= hi + tol,
            "step {} axis {}: {} outside [{}, {}]",
            k,
            i,
            out[i],
            lo,
            hi
        );
    }
}

#[test]
fn test_warm_up_gate() {
    let mut gate = WarmUpGate::new(3);
    assert_eq!(gate.phase(), WarmUp::WarmingUp { count: 0 });
    assert!(gate.pass_through());
    assert!(gate.pass_through());
    assert_eq!(gate.count(), 2);
    assert!(!gate.is_active());
    // The saturating call is still passed through
    assert!(gate.pass_through());
    assert!(gate.is_active());
    assert!(!gate.pass_through());
    assert_eq!(gate.phase(), WarmUp::Active);
    assert_eq!(gate.count(), 3);

    gate.reset();
    assert_eq!(gate.phase(), WarmUp::WarmingUp { count: 0 });
    assert_eq!(gate.threshold(), 3);

    let mut none = WarmUpGate::new(0);
    assert!(none.is_active());
    assert!(!none.pass_through());
}

#[test]
fn test_low_pass_order_clamped() {
    assert_eq!(LowPassFilter::new(0, 0.5).order(), 1);
    assert_eq!(LowPassFilter::new(4, 0.5).order(), 4);
    assert_eq!(LowPassFilter::new(25, 0.5).order(), LOW_PASS_MAX_ORDER);
    assert_eq!(LowPassFilter::with_config(LowPassConfig { order: 99, smooth: 0.5 }).order(), LOW_PASS_MAX_ORDER);
    assert_eq!(LowPassConfig::new(11, 0.2).order, LOW_PASS_MAX_ORDER);
}

#[test]
fn test_low_pass_step() {
    let mut filter = LowPassFilter::new(5, 0.5);
    let zero = Vector3::zeros();
    for _ in 0..LOW_PASS_WARM_UP {
        assert_eq!(filter.correct_and_predict(&zero), zero);
    }
    assert_eq!(filter.warm_up(), WarmUp::Active);

    let x = Vector3::repeat(10.);
    let first = filter.correct_and_predict(&x);
    // Stage 0 takes half the step, then is blended with the still zero last stage
    assert_relative_eq!(first, Vector3::repeat(2.5));

    let mut prev = first;
    for _ in 0..30 {
        let out = filter.correct_and_predict(&x);
        assert!(out.x > prev.x, "{} <= {}", out.x, prev.x);
        assert!(out.x < 10.);
        prev = out;
    }
    for _ in 0..300 {
        let out = filter.correct_and_predict(&x);
        assert!(out.x >= prev.x && out.x <= 10.);
        prev = out;
    }
    assert_relative_eq!(prev, x, epsilon = 1e-3);
}

#[test]
fn test_low_pass_warm_up_passes_raw() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut filter = LowPassFilter::default();
    for _ in 0..LOW_PASS_WARM_UP {
        let x = random_point(&mut rng);
        assert_eq!(filter.correct_and_predict(&x), x);
    }
    let x = random_point(&mut rng);
    assert_ne!(filter.correct_and_predict(&x), x);
}

#[test]
fn test_low_pass_bounded() {
    let mut rng = StdRng::seed_from_u64(11);
    for &(order, smooth) in [(1, 0.1), (3, 0.5), (7, 0.9), (10, 0.99)].iter() {
        let mut filter = LowPassFilter::new(order, smooth);
        for _ in 0..500 {
            let out = filter.correct_and_predict(&random_point(&mut rng));
            assert!(within_unit(&out), "order {} smooth {}: {}", order, smooth, out);
        }
    }
}

#[test]
fn test_low_pass_monotone_input() {
    for &(order, smooth) in [(1, 0.3), (4, 0.5), (LOW_PASS_MAX_ORDER, 0.9)].iter() {
        let mut filter = LowPassFilter::new(order, smooth);
        for k in 0..LOW_PASS_WARM_UP {
            filter.correct_and_predict(&monotone(k));
        }
        // The first filtered output lags the raw warm-up samples
        let mut prev = filter.correct_and_predict(&monotone(LOW_PASS_WARM_UP));
        for k in (LOW_PASS_WARM_UP + 1)..200 {
            let x = monotone(k);
            let out = filter.correct_and_predict(&x);
            assert_between(&prev, &x, &out, k);
            prev = out;
        }
    }
}

#[test]
fn test_low_pass_update_filter_parameter() {
    let mut filter = LowPassFilter::new(3, 0.5);
    for _ in 0..20 {
        filter.correct_and_predict(&Vector3::repeat(1.));
    }
    filter.update_filter_parameter(12, 0.7);
    assert_eq!(filter.order(), LOW_PASS_MAX_ORDER);
    assert_eq!(filter.config().smooth, 0.7);
    assert_eq!(filter.warm_up(), WarmUp::WarmingUp { count: 0 });
    assert_eq!(*filter.value(), Vector3::zeros());

    let x = Vector3::new(4., 5., 6.);
    assert_eq!(filter.correct_and_predict(&x), x);
}

#[test]
fn test_smoothing_factor() {
    assert_eq!(smoothing_factor(0., 3.5), 0.);
    let a = smoothing_factor(DT, 3.5);
    assert!(a > 0. && a < 1.);
    assert!(smoothing_factor(DT, 10.) > a);
}

#[test]
fn test_one_euro_first_sample() {
    let mut filter = OneEuroFilter::default();
    assert_eq!(*filter.config(), OneEuroConfig::default());

    let out = filter.correct_with_interval(&Vector3::repeat(1.), DT);
    assert_relative_eq!(out, Vector3::repeat(0.425), epsilon = 1e-3);
    assert_eq!(*filter.value(), out);
    assert!(filter.derivative().x > 0.);
}

#[test]
fn test_one_euro_converges() {
    let mut filter = OneEuroFilter::new(3.5, 0.005, 1.2);
    let x = Vector3::new(0.2, -0.4, 0.9);
    let mut out = Vector3::zeros();
    for _ in 0..200 {
        out = filter.correct_with_interval(&x, DT);
    }
    assert_relative_eq!(out, x, epsilon = 1e-4);
    assert_relative_eq!(*filter.derivative(), Vector3::zeros(), epsilon = 1e-2);
}

#[test]
fn test_one_euro_timestamps() {
    let mut by_timestamp = OneEuroFilter::default();
    let mut by_interval = OneEuroFilter::default();
    let mut rng = StdRng::seed_from_u64(5);
    for k in 1..100 {
        let x = random_point(&mut rng);
        let a = by_timestamp.correct_and_predict(&x, k as f32 * DT);
        let b = by_interval.correct_with_interval(&x, DT);
        assert_relative_eq!(a, b, epsilon = 1e-3);
    }
}

#[test]
fn test_one_euro_zero_interval() {
    let mut filter = OneEuroFilter::default();
    let x = Vector3::new(1., -2., 3.);
    let first = filter.correct_and_predict(&x, 0.);
    let second = filter.correct_and_predict(&x, 0.);
    let third = filter.correct_with_interval(&x, -1.);
    for out in [first, second, third].iter() {
        assert!(out.iter().all(|e| e.is_finite()), "{}", out);
    }
    assert!(filter.derivative().iter().all(|e| e.is_finite()));
    assert!(MIN_INTERVAL > 0.);
}

#[test]
fn test_one_euro_bounded() {
    let mut rng = StdRng::seed_from_u64(17);
    let mut filter = OneEuroFilter::new(1.0, 0.5, 1.0);
    for _ in 0..1000 {
        let elapsed = rng.gen_range(0.0..0.1);
        let out = filter.correct_with_interval(&random_point(&mut rng), elapsed);
        assert!(within_unit(&out), "{}", out);
    }
}

#[test]
fn test_one_euro_monotone_input() {
    for &(min_cutoff, beta) in [(3.5, 0.005), (1.0, 0.5), (0.1, 5.0)].iter() {
        let mut filter = OneEuroFilter::new(min_cutoff, beta, 1.2);
        let mut prev = Vector3::zeros();
        for k in 0..200 {
            let x = monotone(k);
            let out = filter.correct_with_interval(&x, DT);
            assert_between(&prev, &x, &out, k);
            prev = out;
        }
    }
}

#[test]
fn test_one_euro_reset() {
    let mut filter = OneEuroFilter::default();
    filter.correct_with_interval(&Vector3::repeat(5.), DT);
    filter.update_filter_parameter(1., 0.1, 2.);
    assert_eq!(filter.config().beta, 0.1);
    assert_eq!(*filter.value(), Vector3::zeros());
    assert_eq!(*filter.derivative(), Vector3::zeros());

    filter.correct_with_interval(&Vector3::repeat(5.), DT);
    filter.reset();
    assert_eq!(*filter.value(), Vector3::zeros());
    assert_eq!(filter.config().min_cutoff, 1.);
}
