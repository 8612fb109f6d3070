//! State estimators.
//!
//! A generic state space filter engine and the discrete linear Kalman filter built on it.

pub mod discrete;
pub mod filter;
