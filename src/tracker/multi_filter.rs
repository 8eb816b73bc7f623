//! Registry of per-object Kalman filters keyed by integer object id.

use std::collections::HashMap;

use crate::tracker::geometry::Point;
use crate::tracker::kalman_filter::KalmanFilter;

/// Object id driven by the ball tracking pipeline.
pub const BALL_OBJECT_ID: u32 = 0;

/// Keeps one constant-velocity filter per tracked object. States persist
/// across frames and are only ever mutated through the correct/predict
/// cycle; no id is reset implicitly.
#[derive(Debug, Default)]
pub struct MultiKalmanFilter {
    filters: HashMap<u32, KalmanFilter>,
}

impl MultiKalmanFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a measurement into the filter for `id` and return the next
    /// predicted position.
    ///
    /// An unknown id is initialized from the measurement, whose position
    /// doubles as the first prediction.
    pub fn correct_and_predict(&mut self, id: u32, measurement: Point) -> Point {
        match self.filters.get_mut(&id) {
            Some(filter) => {
                filter.correct(f64::from(measurement.x), f64::from(measurement.y));
                let (x, y) = filter.predict();
                Point::new(x as f32, y as f32)
            }
            None => {
                let filter = KalmanFilter::new(f64::from(measurement.x), f64::from(measurement.y));
                let (x, y) = filter.prediction();
                self.filters.insert(id, filter);
                Point::new(x as f32, y as f32)
            }
        }
    }

    /// Whether a filter exists for `id`.
    pub fn is_tracking(&self, id: u32) -> bool {
        self.filters.contains_key(&id)
    }
}
