//! Smoothing a single noisy keypoint.
//!
//! A point moving on a straight line is observed with noise at 30 frames per second
//! and smoothed by a Kalman keypoint filter followed by a one euro filter.

use na::Vector3;
use nalgebra as na;

use keypoint_estimate::smoothing::{KalmanKeypointFilter, OneEuroFilter, WarmUp};

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

fn main() -> Result<(), keypoint_estimate::FilterError> {
    let dt = 1. / 30.;
    let mut kalman = KalmanKeypointFilter::new(dt, 0.01)?;
    let mut one_euro = OneEuroFilter::default();

    let mut rng = StdRng::seed_from_u64(1);
    let noise = Normal::new(0f32, 0.02).unwrap();

    for k in 0..120 {
        let t = k as f32 * dt;
        let truth = Vector3::new(0.5 * t, 1.0, -0.2 * t);
        let observed = truth + Vector3::from_fn(|_, _| noise.sample(&mut rng));

        let smoothed = kalman.correct_and_predict(&observed)?;
        let smoothed = one_euro.correct_with_interval(&smoothed, dt);

        if k % 10 == 0 {
            let phase = match kalman.warm_up() {
                WarmUp::WarmingUp { .. } => "warm-up",
                WarmUp::Active => "active",
            };
            println!("{:3} {:7} observed x{:.3} smoothed x{:.3}", k, phase, observed.x, smoothed.x);
        }
    }
    println!("Velocity {:.3}", kalman.state().velocity);
    Ok(())
}
