//! Color-segmentation ball tracking with Kalman prediction, net
//! localization and shot detection.
//!
//! Each frame runs through a fixed pipeline: per-pixel color classification
//! into a binary mask, connected-component labeling, two-pass region shape
//! metrics with area/circularity filtering, gated nearest-candidate
//! association against a constant-velocity Kalman prediction, multi-scale
//! template localization of the net, and a shot state machine feeding a
//! bounded path trail. Overlays for every stage are drawn onto the caller's
//! frame in place.
//!
//! ```ignore
//! use hooptrack_rs::{BallTrackerBuilder, FrameSource, TrackingPipeline};
//!
//! let tracker = BallTrackerBuilder::new()
//!     .seed(320.0, 240.0)
//!     .net_template("net.png")
//!     .build();
//! let mut pipeline = TrackingPipeline::new(my_capture, tracker);
//! while let Some((frame, report)) = pipeline.process_next()? {
//!     // display the annotated frame, inspect the report
//! }
//! ```

pub mod integration;
pub mod tracker;

pub use integration::{BallTrackerBuilder, FrameSource, TrackingPipeline, load_net_template};
pub use tracker::{
    Association, BallTracker, FrameReport, MultiKalmanFilter, NetLocalizer, NetStatus, Point, Rect,
    Region, ShotPhase,
};
