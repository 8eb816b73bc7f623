//! Shot event detection and the recent-path trail.

use std::collections::VecDeque;

use crate::tracker::geometry::{Point, Rect};

/// Association distances below this count as confident detections worth
/// recording on the trail.
const TRAIL_DISTANCE_THRESHOLD: f32 = 50.0;
/// Default number of recent locations kept for rendering.
pub const DEFAULT_TRAIL_CAPACITY: usize = 15;

/// Event phase of the tracked ball relative to the net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShotPhase {
    /// Ordinary motion
    #[default]
    Default,
    /// Ball in flight above the net
    Shot,
}

/// Two-phase automaton evaluated only on frames where the net was found.
#[derive(Debug, Default)]
pub struct ShotStateMachine {
    phase: ShotPhase,
}

impl ShotStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ShotPhase {
        self.phase
    }

    /// Evaluate the transition rules against the net rectangle and return
    /// the resulting phase.
    ///
    /// A shot starts when both the measurement and the prediction sit
    /// strictly above the net's top edge, and ends when both sit strictly
    /// below its bottom edge. Anything else holds the current phase.
    pub fn update(&mut self, net: Rect, measurement: Point, prediction: Point) -> ShotPhase {
        match self.phase {
            ShotPhase::Default => {
                if measurement.y < net.top() && prediction.y < net.top() {
                    self.phase = ShotPhase::Shot;
                }
            }
            ShotPhase::Shot => {
                if measurement.y > net.bottom() && prediction.y > net.bottom() {
                    self.phase = ShotPhase::Default;
                }
            }
        }
        self.phase
    }
}

/// Bounded FIFO of recently confirmed ball locations.
#[derive(Debug)]
pub struct PathTrail {
    points: VecDeque<Point>,
    capacity: usize,
}

impl PathTrail {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a location while a shot is in flight. Held predictions and
    /// loose matches carry no distance below the threshold and are skipped.
    pub fn record(&mut self, phase: ShotPhase, location: Point, distance: Option<f32>) {
        if phase != ShotPhase::Shot {
            return;
        }
        if matches!(distance, Some(d) if d < TRAIL_DISTANCE_THRESHOLD) {
            self.push(location);
        }
    }

    /// Append a location, evicting the oldest entry at capacity.
    pub fn push(&mut self, location: Point) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(location);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Oldest-first view of the recorded locations.
    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    /// Consecutive point pairs for rendering, most recent segment first;
    /// yields `len - 1` pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        (1..self.points.len())
            .rev()
            .map(|i| (self.points[i], self.points[i - 1]))
    }
}

impl Default for PathTrail {
    fn default() -> Self {
        Self::new(DEFAULT_TRAIL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shot_sequence() {
        // Net occupies y in [100, 150].
        let net = Rect::new(40.0, 100.0, 80.0, 50.0);
        let mut machine = ShotStateMachine::new();

        let ys = [200.0, 90.0, 80.0, 95.0, 160.0];
        let expected = [
            ShotPhase::Default,
            ShotPhase::Shot,
            ShotPhase::Shot,
            ShotPhase::Shot,
            ShotPhase::Default,
        ];
        for (y, want) in ys.iter().zip(expected) {
            let point = Point::new(60.0, *y);
            assert_eq!(machine.update(net, point, point), want);
        }
    }

    #[test]
    fn test_disagreeing_prediction_holds_phase() {
        let net = Rect::new(40.0, 100.0, 80.0, 50.0);
        let mut machine = ShotStateMachine::new();

        // Measurement above the net, prediction still below its top edge.
        machine.update(net, Point::new(60.0, 90.0), Point::new(60.0, 120.0));
        assert_eq!(machine.phase(), ShotPhase::Default);
    }

    #[test]
    fn test_trail_capacity_and_order() {
        let mut trail = PathTrail::new(15);
        for i in 0..20 {
            trail.push(Point::new(i as f32, 0.0));
        }

        assert_eq!(trail.len(), 15);
        let xs: Vec<f32> = trail.iter().map(|p| p.x).collect();
        assert_eq!(xs.first(), Some(&5.0));
        assert_eq!(xs.last(), Some(&19.0));
        assert_eq!(trail.segments().count(), 14);

        // Most recent segment first.
        let (from, to) = trail.segments().next().unwrap();
        assert_eq!(from.x, 19.0);
        assert_eq!(to.x, 18.0);
    }

    #[test]
    fn test_record_requires_shot_and_confident_distance() {
        let mut trail = PathTrail::new(15);
        let location = Point::new(10.0, 10.0);

        trail.record(ShotPhase::Default, location, Some(5.0));
        assert!(trail.is_empty());

        trail.record(ShotPhase::Shot, location, None);
        assert!(trail.is_empty());

        trail.record(ShotPhase::Shot, location, Some(60.0));
        assert!(trail.is_empty());

        trail.record(ShotPhase::Shot, location, Some(5.0));
        assert_eq!(trail.len(), 1);
    }
}
