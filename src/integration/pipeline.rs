//! TrackingPipeline for combining frame acquisition with tracking.

use image::RgbImage;

use crate::tracker::{BallTracker, FrameReport};

use super::FrameSource;

/// Bundles a [`FrameSource`] with a [`BallTracker`] for end-to-end runs.
///
/// Frames are pulled, tracked and annotated strictly one at a time; the
/// annotated frame is handed back for display or writing.
pub struct TrackingPipeline<S: FrameSource> {
    source: S,
    tracker: BallTracker,
}

impl<S: FrameSource> TrackingPipeline<S> {
    /// Create a new pipeline from a frame source and a built tracker.
    pub fn new(source: S, tracker: BallTracker) -> Self {
        Self { source, tracker }
    }

    /// Pull the next frame, run the tracker over it and hand back the
    /// annotated frame with its report.
    ///
    /// `Ok(None)` means the source is exhausted and the session is over.
    pub fn process_next(&mut self) -> Result<Option<(RgbImage, FrameReport)>, S::Error> {
        let Some(mut frame) = self.source.next_frame()? else {
            return Ok(None);
        };
        let report = self.tracker.track(&mut frame);
        Ok(Some((frame, report)))
    }

    /// Get a reference to the underlying tracker.
    pub fn tracker(&self) -> &BallTracker {
        &self.tracker
    }

    /// Get a mutable reference to the underlying tracker.
    pub fn tracker_mut(&mut self) -> &mut BallTracker {
        &mut self.tracker
    }

    /// Get a reference to the underlying frame source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get a mutable reference to the underlying frame source.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::BallTrackerBuilder;

    struct MockSource {
        frames: Vec<RgbImage>,
    }

    impl FrameSource for MockSource {
        type Error = std::convert::Infallible;

        fn next_frame(&mut self) -> Result<Option<RgbImage>, Self::Error> {
            if self.frames.is_empty() {
                Ok(None)
            } else {
                Ok(Some(self.frames.remove(0)))
            }
        }
    }

    #[test]
    fn test_pipeline_drains_the_source() {
        let source = MockSource {
            frames: vec![RgbImage::new(64, 48), RgbImage::new(64, 48)],
        };
        let mut pipeline = TrackingPipeline::new(source, BallTrackerBuilder::new().build());

        assert!(pipeline.process_next().unwrap().is_some());
        assert!(pipeline.process_next().unwrap().is_some());
        assert!(pipeline.process_next().unwrap().is_none());
    }
}
