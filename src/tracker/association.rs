//! Gated nearest-candidate association between the motion prediction and
//! the filtered region list.

use crate::tracker::geometry::Point;
use crate::tracker::regions::Region;

/// Candidates at or beyond this distance from the prediction are never
/// associated.
const GATING_DISTANCE: f32 = 200.0;

/// Outcome of one association pass.
#[derive(Debug, Clone, Copy)]
pub struct Association {
    /// Measurement to feed the motion filter; the prediction itself when no
    /// candidate passed the gate.
    pub measurement: Point,
    /// Distance from the prediction to the chosen candidate; `None` when
    /// the prediction was held.
    pub distance: Option<f32>,
    /// Index of the winning region in the candidate list.
    pub region_index: Option<usize>,
}

impl Association {
    /// True when a real detection was chosen over the held prediction.
    pub fn detected(&self) -> bool {
        self.region_index.is_some()
    }
}

/// Choose the candidate whose centroid is nearest to the prediction.
///
/// The first of equally distant candidates wins. When the list is empty or
/// the best candidate sits outside the gate, the object is treated as
/// undetected this frame and the prediction is handed back as its own
/// measurement.
pub fn associate(prediction: Point, regions: &[Region]) -> Association {
    let mut best: Option<(usize, f32)> = None;
    for (index, region) in regions.iter().enumerate() {
        let distance = prediction.distance_to(&region.centroid);
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((index, distance));
        }
    }

    match best {
        Some((index, distance)) if distance < GATING_DISTANCE => Association {
            measurement: regions[index].centroid,
            distance: Some(distance),
            region_index: Some(index),
        },
        _ => Association {
            measurement: prediction,
            distance: None,
            region_index: None,
        },
    }
}
