//! Multi-scale template localization of the net with temporal smoothing.

use image::{GrayImage, RgbImage, imageops};
use imageproc::edges::canny;
use imageproc::template_matching::{MatchTemplateMethod, match_template};

use crate::tracker::geometry::Rect;

/// Canny hysteresis thresholds for the per-frame search edges.
const FRAME_CANNY_LOW: f32 = 120.0;
const FRAME_CANNY_HIGH: f32 = 300.0;
/// A fresh match farther than this from the smoothed rectangle is treated
/// as an outlier and the previous rectangle is kept.
const SMOOTHING_GATE: f32 = 100.0;
/// Template scale sweep, descending.
const SCALE_MAX: f32 = 0.2;
const SCALE_MIN: f32 = 0.1;
const SCALE_STEP: f32 = 0.05;

/// Where the net was (or wasn't) found this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NetStatus {
    /// No match has ever been confirmed, or the localizer is disabled.
    NotFound,
    /// The rectangle to use this frame; `fresh` distinguishes a newly
    /// confirmed match from a held previous one.
    Found { rect: Rect, fresh: bool },
}

impl NetStatus {
    pub fn rect(&self) -> Option<Rect> {
        match self {
            NetStatus::Found { rect, .. } => Some(*rect),
            NetStatus::NotFound => None,
        }
    }
}

/// Finds the net by normalized cross-correlation of a pre-edged template
/// against the edge map of the top half of each frame, smoothing the
/// result over time with a distance gate.
pub struct NetLocalizer {
    template: Option<GrayImage>,
    smoothed: Option<Rect>,
}

impl NetLocalizer {
    /// `template` is the pre-edged reference image of the net. `None`
    /// disables localization for the session; every call then reports
    /// [`NetStatus::NotFound`].
    pub fn new(template: Option<GrayImage>) -> Self {
        Self {
            template,
            smoothed: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.template.is_some()
    }

    /// Search the top half of the frame for the net.
    ///
    /// The first match ever only seeds the smoothed rectangle. From then on
    /// the localizer always reports found: with the new match when it lands
    /// within the gate of the previous rectangle, with the previous
    /// rectangle otherwise.
    pub fn localize(&mut self, frame: &RgbImage) -> NetStatus {
        let Some(template) = &self.template else {
            return NetStatus::NotFound;
        };

        let gray = imageops::grayscale(frame);
        let search_height = gray.height() / 2;
        if search_height == 0 || gray.width() == 0 {
            return self.held();
        }
        let search = imageops::crop_imm(&gray, 0, 0, gray.width(), search_height).to_image();
        let edges = canny(&search, FRAME_CANNY_LOW, FRAME_CANNY_HIGH);

        let mut best: Option<(f32, Rect)> = None;
        let mut scale = (search_height as f32 / template.height() as f32).min(SCALE_MAX);
        while scale >= SCALE_MIN - 1e-4 {
            let width = (template.width() as f32 * scale).round() as u32;
            let height = (template.height() as f32 * scale).round() as u32;
            scale -= SCALE_STEP;
            if width == 0 || height == 0 || width > edges.width() || height > edges.height() {
                continue;
            }

            let resized = imageops::resize(template, width, height, imageops::FilterType::Triangle);
            let scores = match_template(
                &edges,
                &resized,
                MatchTemplateMethod::CrossCorrelationNormalized,
            );
            for (x, y, pixel) in scores.enumerate_pixels() {
                let score = pixel.0[0];
                // Patches with no edge content normalize to non-finite
                // scores; skip them.
                if !score.is_finite() {
                    continue;
                }
                if best.is_none_or(|(s, _)| score > s) {
                    best = Some((
                        score,
                        Rect::new(x as f32, y as f32, width as f32, height as f32),
                    ));
                }
            }
        }

        let Some((_, candidate)) = best else {
            return self.held();
        };

        match self.smoothed {
            None => {
                self.smoothed = Some(candidate);
                NetStatus::NotFound
            }
            Some(previous) => {
                if previous.origin().distance_to(&candidate.origin()) < SMOOTHING_GATE {
                    self.smoothed = Some(candidate);
                    NetStatus::Found {
                        rect: candidate,
                        fresh: true,
                    }
                } else {
                    NetStatus::Found {
                        rect: previous,
                        fresh: false,
                    }
                }
            }
        }
    }

    fn held(&self) -> NetStatus {
        match self.smoothed {
            Some(rect) => NetStatus::Found { rect, fresh: false },
            None => NetStatus::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    /// Edge-map style template: a white hollow rectangle on black.
    fn hollow_rect_template(width: u32, height: u32) -> GrayImage {
        let mut template = GrayImage::new(width, height);
        for x in 0..width {
            template.put_pixel(x, 0, Luma([255]));
            template.put_pixel(x, height - 1, Luma([255]));
        }
        for y in 0..height {
            template.put_pixel(0, y, Luma([255]));
            template.put_pixel(width - 1, y, Luma([255]));
        }
        template
    }

    /// Frame with a white filled rectangle in the top half; its contour
    /// matches the template shape after edge extraction.
    fn frame_with_rect(x0: u32, y0: u32, width: u32, height: u32) -> RgbImage {
        let mut frame = RgbImage::new(320, 240);
        for y in y0..y0 + height {
            for x in x0..x0 + width {
                frame.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
        frame
    }

    #[test]
    fn test_disabled_localizer_reports_not_found() {
        let mut localizer = NetLocalizer::new(None);
        let frame = frame_with_rect(50, 30, 20, 12);
        assert_eq!(localizer.localize(&frame), NetStatus::NotFound);
        assert!(!localizer.is_enabled());
    }

    #[test]
    fn test_first_call_seeds_then_confirms() {
        // 100x60 template matched at scale 0.2 against a 20x12 target.
        let mut localizer = NetLocalizer::new(Some(hollow_rect_template(100, 60)));
        let frame = frame_with_rect(50, 30, 20, 12);

        assert_eq!(localizer.localize(&frame), NetStatus::NotFound);

        match localizer.localize(&frame) {
            NetStatus::Found { rect, fresh } => {
                assert!(fresh);
                // The correlation peak lands on the drawn rectangle.
                assert!((rect.x - 50.0).abs() < 15.0, "peak x at {}", rect.x);
                assert!((rect.y - 30.0).abs() < 15.0, "peak y at {}", rect.y);
            }
            NetStatus::NotFound => panic!("second call must report found"),
        }
    }

    #[test]
    fn test_far_match_keeps_previous_rectangle() {
        let mut localizer = NetLocalizer::new(Some(hollow_rect_template(100, 60)));
        let near = frame_with_rect(50, 30, 20, 12);
        localizer.localize(&near);
        let confirmed = match localizer.localize(&near) {
            NetStatus::Found { rect, .. } => rect,
            NetStatus::NotFound => panic!("second call must report found"),
        };

        // The target jumps far across the frame; the smoothed rectangle
        // must hold.
        let far = frame_with_rect(250, 60, 20, 12);
        match localizer.localize(&far) {
            NetStatus::Found { rect, fresh } => {
                assert!(!fresh);
                assert_eq!(rect, confirmed);
            }
            NetStatus::NotFound => panic!("localizer has been seeded, must report found"),
        }
    }
}
