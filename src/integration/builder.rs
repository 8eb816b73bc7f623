//! Builder wiring collaborator inputs into a `BallTracker`.

use std::path::PathBuf;
use std::sync::mpsc::Receiver;

use tracing::{info, warn};

use crate::tracker::{BallTracker, NetLocalizer, Point};

use super::template::load_net_template;

/// Builder for a [`BallTracker`].
///
/// The initial ball location can come from a fixed seed or from a one-shot
/// channel handed over by the input-collection collaborator (typically a
/// mouse click); `build` blocks until that value arrives. A net template
/// path is optional: when it cannot be loaded, net localization is disabled
/// for the session and tracking continues without it.
#[derive(Default)]
pub struct BallTrackerBuilder {
    seed: Option<Point>,
    seed_channel: Option<Receiver<(f32, f32)>>,
    template_path: Option<PathBuf>,
    debug: bool,
}

impl BallTrackerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking from a known location.
    pub fn seed(mut self, x: f32, y: f32) -> Self {
        self.seed = Some(Point::new(x, y));
        self
    }

    /// Receive the starting location from a one-shot channel at build time.
    /// A fixed [`seed`](Self::seed) takes precedence over the channel.
    pub fn seed_channel(mut self, channel: Receiver<(f32, f32)>) -> Self {
        self.seed_channel = Some(channel);
        self
    }

    /// Reference image of the net to localize on every frame.
    pub fn net_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_path = Some(path.into());
        self
    }

    /// Retain intermediate candidate masks for display.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Build the tracker, blocking on the seed channel if one was supplied.
    pub fn build(self) -> BallTracker {
        let seed = self.seed.or_else(|| {
            self.seed_channel
                .and_then(|channel| channel.recv().ok())
                .map(|(x, y)| Point::new(x, y))
        });
        if let Some(seed) = seed {
            info!(x = seed.x, y = seed.y, "initial ball location");
        }

        let template = self.template_path.and_then(|path| {
            match load_net_template(&path) {
                Ok(template) => Some(template),
                Err(error) => {
                    warn!(
                        path = %path.display(),
                        %error,
                        "net template unavailable; localization disabled"
                    );
                    None
                }
            }
        });

        BallTracker::new(seed, NetLocalizer::new(template), self.debug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use std::sync::mpsc;

    #[test]
    fn test_seed_channel_initializes_tracking() {
        let (tx, rx) = mpsc::channel();
        tx.send((80.0, 40.0)).unwrap();

        let mut tracker = BallTrackerBuilder::new().seed_channel(rx).build();
        let mut frame = RgbImage::new(160, 120);
        let report = tracker.track(&mut frame);

        let prediction = report.prediction.unwrap();
        assert!((prediction.x - 80.0).abs() < 1.0);
        assert!((prediction.y - 40.0).abs() < 1.0);
    }

    #[test]
    fn test_dropped_seed_channel_leaves_tracker_unseeded() {
        let (tx, rx) = mpsc::channel::<(f32, f32)>();
        drop(tx);

        let mut tracker = BallTrackerBuilder::new().seed_channel(rx).build();
        let mut frame = RgbImage::new(160, 120);
        let report = tracker.track(&mut frame);
        assert!(report.prediction.is_none());
    }

    #[test]
    fn test_unreadable_template_disables_localization() {
        let tracker = BallTrackerBuilder::new()
            .net_template("/nonexistent/net.png")
            .build();
        assert!(!tracker.net_localizer().is_enabled());
    }
}
