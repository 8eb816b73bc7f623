//! Constant-velocity Kalman filter using ndarray and a manual/nalgebra-based inverse.

use ndarray::{Array1, Array2, arr1};

/// Process noise variance on every state component.
const PROCESS_NOISE_VAR: f64 = 1e-6;
/// Measurement noise variance on both position components.
const MEASUREMENT_NOISE_VAR: f64 = 1e-3;
/// Initial error covariance on every state component.
const INITIAL_ERROR_COV: f64 = 1e-2;

/// Linear filter over the state `[x, y, vx, vy]` with position-only
/// measurements. Velocities are carried forward unchanged by the transition
/// model.
#[derive(Debug, Clone)]
pub struct KalmanFilter {
    transition: Array2<f64>,
    measurement: Array2<f64>,
    process_noise: Array2<f64>,
    measurement_noise: Array2<f64>,
    state_pre: Array1<f64>,
    state_post: Array1<f64>,
    error_cov_pre: Array2<f64>,
    error_cov_post: Array2<f64>,
}

impl KalmanFilter {
    /// Create a filter at rest at the given position and run the first
    /// predict, so a prediction (the position itself) is available
    /// immediately.
    pub fn new(x: f64, y: f64) -> Self {
        let mut transition = Array2::eye(4);
        transition[[0, 2]] = 1.0;
        transition[[1, 3]] = 1.0;

        let mut measurement = Array2::zeros((2, 4));
        measurement[[0, 0]] = 1.0;
        measurement[[1, 1]] = 1.0;

        let mut filter = Self {
            transition,
            measurement,
            process_noise: Array2::eye(4) * PROCESS_NOISE_VAR,
            measurement_noise: Array2::eye(2) * MEASUREMENT_NOISE_VAR,
            state_pre: Array1::zeros(4),
            state_post: arr1(&[x, y, 0.0, 0.0]),
            error_cov_pre: Array2::zeros((4, 4)),
            error_cov_post: Array2::eye(4) * INITIAL_ERROR_COV,
        };
        filter.predict();
        filter
    }

    /// Fold a position measurement into the state.
    pub fn correct(&mut self, mx: f64, my: f64) {
        let z = arr1(&[mx, my]);
        let innovation = &z - &self.measurement.dot(&self.state_pre);

        // S = H P- H^T + R
        let innovation_cov = self
            .measurement
            .dot(&self.error_cov_pre)
            .dot(&self.measurement.t())
            + &self.measurement_noise;

        // K = P- H^T S^-1. The 2x2 inverse goes through nalgebra to avoid
        // BLAS/LAPACK.
        let s_inv = invert_2x2(&innovation_cov);
        let gain = self.error_cov_pre.dot(&self.measurement.t()).dot(&s_inv);

        self.state_post = &self.state_pre + &gain.dot(&innovation);
        self.error_cov_post =
            &self.error_cov_pre - &gain.dot(&self.measurement).dot(&self.error_cov_pre);
    }

    /// Advance the state one frame: `x' = F x`, `P' = F P F^T + Q`.
    /// Returns the predicted position.
    pub fn predict(&mut self) -> (f64, f64) {
        self.state_pre = self.transition.dot(&self.state_post);
        self.error_cov_pre = self
            .transition
            .dot(&self.error_cov_post)
            .dot(&self.transition.t())
            + &self.process_noise;
        (self.state_pre[0], self.state_pre[1])
    }

    /// Most recent predicted position.
    pub fn prediction(&self) -> (f64, f64) {
        (self.state_pre[0], self.state_pre[1])
    }

    /// Most recent corrected velocity.
    pub fn velocity(&self) -> (f64, f64) {
        (self.state_post[2], self.state_post[3])
    }
}

/// Helper to invert a 2x2 matrix using nalgebra (pure Rust).
fn invert_2x2(m: &Array2<f64>) -> Array2<f64> {
    let nm = nalgebra::Matrix2::new(m[[0, 0]], m[[0, 1]], m[[1, 0]], m[[1, 1]]);
    let inv = nm
        .try_inverse()
        .expect("2x2 innovation matrix inversion failed");
    let mut res = Array2::zeros((2, 2));
    for i in 0..2 {
        for j in 0..2 {
            res[[i, j]] = inv[(i, j)];
        }
    }
    res
}
