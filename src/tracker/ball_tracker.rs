//! Per-frame orchestration of the full tracking pipeline.

use image::{GrayImage, RgbImage};
use tracing::{debug, warn};

use crate::tracker::association::{self, Association};
use crate::tracker::color::ColorClassifier;
use crate::tracker::geometry::Point;
use crate::tracker::labeling::{self, candidate_mask};
use crate::tracker::multi_filter::{BALL_OBJECT_ID, MultiKalmanFilter};
use crate::tracker::net::{NetLocalizer, NetStatus};
use crate::tracker::overlay;
use crate::tracker::regions::{self, Region};
use crate::tracker::shot::{PathTrail, ShotPhase, ShotStateMachine};

/// Regions smaller than this are never the ball.
const MIN_BALL_AREA: u32 = 120;
/// Regions less circular than this are never the ball.
const MIN_BALL_CIRCULARITY: f64 = 0.3;

/// Everything downstream consumers need to know about one tracked frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameReport {
    /// Predicted ball position after this frame's correction; `None` until
    /// tracking has bootstrapped.
    pub prediction: Option<Point>,
    /// Measurement fed to the motion filter this frame.
    pub measurement: Option<Point>,
    /// True when the measurement came from a real detection rather than the
    /// held prediction.
    pub detected: bool,
    /// Net localization outcome.
    pub net: NetStatus,
    /// Shot phase after this frame.
    pub shot_phase: ShotPhase,
}

/// Tracks the ball across frames and draws the overlays in place.
///
/// Owns all cross-frame state: the filter registry, the smoothed net
/// location, the shot phase and the trail. One instance processes one
/// stream, strictly one frame at a time.
pub struct BallTracker {
    classifier: ColorClassifier,
    filters: MultiKalmanFilter,
    net: NetLocalizer,
    shot: ShotStateMachine,
    trail: PathTrail,
    last_prediction: Option<Point>,
    debug: bool,
    debug_mask: Option<GrayImage>,
}

impl BallTracker {
    /// `seed` initializes the motion filter before the first frame; without
    /// it, the first surviving detection bootstraps tracking.
    pub fn new(seed: Option<Point>, net: NetLocalizer, debug: bool) -> Self {
        let mut filters = MultiKalmanFilter::new();
        let last_prediction =
            seed.map(|location| filters.correct_and_predict(BALL_OBJECT_ID, location));
        Self {
            classifier: ColorClassifier::default(),
            filters,
            net,
            shot: ShotStateMachine::new(),
            trail: PathTrail::default(),
            last_prediction,
            debug,
            debug_mask: None,
        }
    }

    /// Run the full pipeline over one frame: segmentation, labeling,
    /// metrics, filtering, association, correct/predict, net localization,
    /// shot state and trail, then all overlays.
    pub fn track(&mut self, frame: &mut RgbImage) -> FrameReport {
        let mask = self.classifier.segment(frame);
        let (mut labels, count) = labeling::label_components(&mask);
        if count.capped {
            warn!(
                regions = count.regions,
                "label space exhausted; processing a partially labeled frame"
            );
        }
        let metrics = regions::compute_region_metrics(&labels, count);
        let candidates = regions::filter_regions(&mut labels, metrics, |region| {
            region.area < MIN_BALL_AREA || region.circularity < MIN_BALL_CIRCULARITY
        });

        if self.debug {
            self.debug_mask = Some(candidate_mask(&labels));
        }

        let (association, prediction) = self.update_motion(&candidates);

        // Localize before any overlay lands on the frame, so the drawn
        // markers never feed back into the correlation.
        let net_status = self.net.localize(frame);

        if let Some(association) = &association {
            if let Some(index) = association.region_index {
                let region = &candidates[index];
                overlay::draw_detection(frame, region.centroid, region.area);
            }
        }
        if let Some(prediction) = prediction {
            overlay::draw_prediction(frame, prediction);
        }

        if let NetStatus::Found { rect, fresh } = net_status {
            overlay::draw_net(frame, rect, fresh);
            if let (Some(association), Some(prediction)) = (&association, prediction) {
                let phase = self.shot.update(rect, association.measurement, prediction);
                self.trail
                    .record(phase, association.measurement, association.distance);
            }
        }
        overlay::draw_trail(frame, &self.trail);

        debug!(
            candidates = candidates.len(),
            detected = association.as_ref().is_some_and(Association::detected),
            phase = ?self.shot.phase(),
            "frame tracked"
        );

        FrameReport {
            prediction,
            measurement: association.as_ref().map(|a| a.measurement),
            detected: association.as_ref().is_some_and(Association::detected),
            net: net_status,
            shot_phase: self.shot.phase(),
        }
    }

    /// Associate the candidates against the current prediction and run the
    /// correct/predict cycle. Before the first prediction exists, the first
    /// surviving candidate bootstraps the filter.
    fn update_motion(&mut self, candidates: &[Region]) -> (Option<Association>, Option<Point>) {
        let association = match self.last_prediction {
            Some(previous) => association::associate(previous, candidates),
            None => match candidates.first() {
                Some(region) => Association {
                    measurement: region.centroid,
                    distance: Some(0.0),
                    region_index: Some(0),
                },
                None => return (None, None),
            },
        };
        let prediction = self
            .filters
            .correct_and_predict(BALL_OBJECT_ID, association.measurement);
        self.last_prediction = Some(prediction);
        (Some(association), Some(prediction))
    }

    /// Post-filter candidate mask of the last tracked frame. Retained only
    /// when the tracker was built with the debug flag; purely observational.
    pub fn debug_mask(&self) -> Option<&GrayImage> {
        self.debug_mask.as_ref()
    }

    pub fn shot_phase(&self) -> ShotPhase {
        self.shot.phase()
    }

    pub fn trail(&self) -> &PathTrail {
        &self.trail
    }

    pub fn net_localizer(&self) -> &NetLocalizer {
        &self.net
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    /// Ball-colored disk big enough to survive area filtering.
    fn paint_ball(frame: &mut RgbImage, cx: i64, cy: i64, radius: i64) {
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                let dx = i64::from(x) - cx;
                let dy = i64::from(y) - cy;
                if dx * dx + dy * dy <= radius * radius {
                    frame.put_pixel(x, y, Rgb([110, 74, 47]));
                }
            }
        }
    }

    fn tracker() -> BallTracker {
        BallTracker::new(None, NetLocalizer::new(None), false)
    }

    #[test]
    fn test_bootstrap_from_first_detection() {
        let mut tracker = tracker();
        let mut frame = RgbImage::new(160, 120);
        paint_ball(&mut frame, 60, 60, 10);

        let report = tracker.track(&mut frame);
        assert!(report.detected);
        let measurement = report.measurement.unwrap();
        assert!((measurement.x - 60.0).abs() < 1.0);
        assert!((measurement.y - 60.0).abs() < 1.0);
        assert_eq!(report.prediction, report.measurement);
    }

    #[test]
    fn test_empty_frame_before_bootstrap_reports_nothing() {
        let mut tracker = tracker();
        let mut frame = RgbImage::new(160, 120);
        let report = tracker.track(&mut frame);
        assert!(!report.detected);
        assert!(report.prediction.is_none());
        assert!(report.measurement.is_none());
    }

    #[test]
    fn test_occlusion_holds_prediction() {
        let mut tracker = tracker();
        let mut frame = RgbImage::new(160, 120);
        paint_ball(&mut frame, 60, 60, 10);
        tracker.track(&mut frame);

        let mut empty = RgbImage::new(160, 120);
        let report = tracker.track(&mut empty);
        assert!(!report.detected);
        // The held prediction feeds the filter, so a prediction is still
        // reported near the last known position.
        let prediction = report.prediction.unwrap();
        assert!((prediction.x - 60.0).abs() < 2.0);
        assert!((prediction.y - 60.0).abs() < 2.0);
    }

    #[test]
    fn test_seeded_tracker_predicts_without_detections() {
        let mut tracker = BallTracker::new(Some(Point::new(80.0, 40.0)), NetLocalizer::new(None), false);
        let mut frame = RgbImage::new(160, 120);
        let report = tracker.track(&mut frame);
        assert!(!report.detected);
        let prediction = report.prediction.unwrap();
        assert!((prediction.x - 80.0).abs() < 1.0);
        assert!((prediction.y - 40.0).abs() < 1.0);
    }

    #[test]
    fn test_debug_mask_retained_only_when_enabled() {
        let mut debug_tracker = BallTracker::new(None, NetLocalizer::new(None), true);
        let mut frame = RgbImage::new(160, 120);
        paint_ball(&mut frame, 60, 60, 10);
        debug_tracker.track(&mut frame);
        let mask = debug_tracker.debug_mask().unwrap();
        assert_eq!(mask.get_pixel(60, 60).0[0], 255);

        let mut plain_tracker = tracker();
        let mut frame = RgbImage::new(160, 120);
        paint_ball(&mut frame, 60, 60, 10);
        plain_tracker.track(&mut frame);
        assert!(plain_tracker.debug_mask().is_none());
    }
}
