#![allow(non_snake_case)]

//! Constant velocity motion model of a 3D point.
//!
//! The state vector interleaves position and velocity per axis: `[px, vx, py, vy, pz, vz]`.
//! The model is pure derivation, every call returns freshly built matrices.

use na::{Matrix3x6, Matrix6, Matrix6x3, RealField, Vector3, Vector6, U6};
use nalgebra as na;

use crate::models::StateVector;
use crate::noise::{CorrelatedNoise, CoupledNoise};

/// Position and velocity of a point moving at constant velocity.
#[derive(PartialEq, Clone, Debug)]
pub struct ConstantVelocity3d<N: RealField> {
    pub position: Vector3<N>,
    pub velocity: Vector3<N>,
}

impl<N: RealField> ConstantVelocity3d<N> {
    pub fn new(position: Vector3<N>, velocity: Vector3<N>) -> Self {
        ConstantVelocity3d { position, velocity }
    }

    /// At rest at the origin.
    pub fn zero() -> Self {
        ConstantVelocity3d {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
        }
    }

    pub fn to_array(&self) -> [N; 6] {
        let (p, v) = (&self.position, &self.velocity);
        [p.x, v.x, p.y, v.y, p.z, v.z]
    }

    pub fn from_array(a: &[N; 6]) -> Self {
        ConstantVelocity3d {
            position: Vector3::new(a[0], a[2], a[4]),
            velocity: Vector3::new(a[1], a[3], a[5]),
        }
    }

    /// State transition over the time interval `dt`.
    ///
    /// Identity with `dt` coupling each velocity into its position.
    pub fn transition_matrix(dt: N) -> Matrix6<N> {
        let mut Fx = Matrix6::identity();
        Fx[(0, 1)] = dt;
        Fx[(2, 3)] = dt;
        Fx[(4, 5)] = dt;
        Fx
    }

    /// Coupling of a white noise acceleration per axis into the state over `dt`.
    pub fn noise_coupling(dt: N) -> Matrix6x3<N> {
        let half: N = na::convert(0.5);
        let mut G = Matrix6x3::zeros();
        for axis in 0..3 {
            G[(2 * axis, axis)] = half * dt * dt;
            G[(2 * axis + 1, axis)] = dt;
        }
        G
    }

    /// Process noise G.q.G' of an acceleration variance `acceleration_noise` on every axis.
    pub fn process_noise(acceleration_noise: N, dt: N) -> CorrelatedNoise<N, U6> {
        let coupled = CoupledNoise {
            q: Vector3::repeat(acceleration_noise),
            G: Self::noise_coupling(dt),
        };
        CorrelatedNoise::from_coupled(&coupled)
    }

    /// Observation of the three positions.
    pub fn position_measurement_matrix() -> Matrix3x6<N> {
        let mut Hx = Matrix3x6::zeros();
        Hx[(0, 0)] = N::one();
        Hx[(1, 2)] = N::one();
        Hx[(2, 4)] = N::one();
        Hx
    }
}

impl<N: RealField> StateVector<N, U6> for ConstantVelocity3d<N> {
    fn to_vector(&self) -> Vector6<N> {
        Vector6::from_row_slice(&self.to_array())
    }

    fn from_vector(x: &Vector6<N>) -> Self {
        ConstantVelocity3d {
            position: Vector3::new(x[0], x[2], x[4]),
            velocity: Vector3::new(x[1], x[3], x[5]),
        }
    }
}
