//! Integration module for connecting video and template collaborators with
//! the tracker.
//!
//! This module provides the seams the surrounding program plugs into: frame
//! acquisition, net template loading and tracker construction.

mod builder;
mod pipeline;
mod source;
mod template;

pub use builder::BallTrackerBuilder;
pub use pipeline::TrackingPipeline;
pub use source::FrameSource;
pub use template::{TemplateError, load_net_template};
