//! Per-pixel color classification of candidate ball pixels.

use image::{GrayImage, Luma, RgbImage};

/// Score below which a color is too far from the calibrated model. The value
/// corresponds to all three channels sitting within two standard deviations.
const COLOR_PROB_THRESHOLD: f64 = 0.142625;

/// Tolerance band around the expected G given R.
const GREEN_TOLERANCE: f64 = 7.5;

/// Gaussian color model of the tracked object, one mean/stddev pair per
/// channel, calibrated against sampled ball pixels.
#[derive(Debug, Clone)]
pub struct ColorClassifier {
    mean: [f64; 3],
    stddev: [f64; 3],
}

impl Default for ColorClassifier {
    fn default() -> Self {
        Self {
            mean: [110.6875, 74.1875, 46.6875],
            stddev: [10.98134071, 9.001518969, 8.541946134],
        }
    }
}

impl ColorClassifier {
    pub fn new(mean: [f64; 3], stddev: [f64; 3]) -> Self {
        Self { mean, stddev }
    }

    /// Decide whether a single RGB sample could belong to the ball.
    pub fn is_candidate(&self, r: u8, g: u8, b: u8) -> bool {
        let (r, g, b) = (r as f64, g as f64, b as f64);

        let raw = ((phi(r, self.mean[0], self.stddev[0]) - 0.5)
            * (phi(g, self.mean[1], self.stddev[1]) - 0.5)
            * (phi(b, self.mean[2], self.stddev[2]) - 0.5))
            .abs();
        // 0.125 is the theoretical maximum of the product, reached far from
        // the means; rescale so that colors at the channel means score 1.
        let score = (0.125 - raw) / 0.125;
        if score < COLOR_PROB_THRESHOLD {
            return false;
        }

        // Pairwise linear relationships between the channels. A single
        // outlier relationship is tolerated.
        let mut failures = 0;
        let expected_g = 0.7618 * r - 10.14;
        if g > expected_g + GREEN_TOLERANCE || g < expected_g - GREEN_TOLERANCE {
            failures += 1;
        }
        if b > 5.0 * r / 8.0 - 45.0 / 4.0 || b < r - 80.0 {
            failures += 1;
        }
        if b > 5.0 * g / 7.0 + 40.0 / 7.0 || b < 5.0 * g / 4.0 - 255.0 / 4.0 {
            failures += 1;
        }
        failures < 2
    }

    /// Segment a frame into a binary candidate mask (255 = candidate color).
    pub fn segment(&self, frame: &RgbImage) -> GrayImage {
        let mut mask = GrayImage::new(frame.width(), frame.height());
        for (x, y, pixel) in frame.enumerate_pixels() {
            let [r, g, b] = pixel.0;
            if self.is_candidate(r, g, b) {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        mask
    }
}

/// Normal CDF at `x` for the given mean and standard deviation, evaluated
/// through the Abramowitz-Stegun 7.1.26 rational approximation of erf.
fn phi(x: f64, mean: f64, stddev: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let z = (x - mean) / stddev;
    let sign = if z < 0.0 { -1.0 } else { 1.0 };
    let z = z.abs() / std::f64::consts::SQRT_2;

    let t = 1.0 / (1.0 + P * z);
    let y = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-z * z).exp();

    0.5 * (1.0 + sign * y)
}
