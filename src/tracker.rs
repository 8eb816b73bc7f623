mod association;
mod ball_tracker;
mod color;
mod geometry;
mod kalman_filter;
mod labeling;
mod multi_filter;
mod net;
mod overlay;
mod regions;
mod shot;

pub use association::{Association, associate};
pub use ball_tracker::{BallTracker, FrameReport};
pub use color::ColorClassifier;
pub use geometry::{Point, Rect};
pub use kalman_filter::KalmanFilter;
pub use labeling::{LabelCount, candidate_mask, label_components};
pub use multi_filter::{BALL_OBJECT_ID, MultiKalmanFilter};
pub use net::{NetLocalizer, NetStatus};
pub use regions::{Region, compute_region_metrics, filter_regions};
pub use shot::{DEFAULT_TRAIL_CAPACITY, PathTrail, ShotPhase, ShotStateMachine};
