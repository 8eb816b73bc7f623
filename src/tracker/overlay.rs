//! In-place frame annotations for the tracking overlays.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_cross_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect as PixelRect;

use crate::tracker::geometry::{Point, Rect};
use crate::tracker::shot::PathTrail;

const DETECTION_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const PREDICTION_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
const NET_FRESH_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const NET_STALE_COLOR: Rgb<u8> = Rgb([0, 255, 255]);
const TRAIL_COLOR: Rgb<u8> = Rgb([255, 255, 0]);

/// Hollow square of side `sqrt(area)` around the detected region.
pub fn draw_detection(frame: &mut RgbImage, centroid: Point, area: u32) {
    let side = (area as f32).sqrt();
    draw_rect(frame, Rect::centered_square(centroid, side), DETECTION_COLOR);
}

/// Cross at the predicted ball position.
pub fn draw_prediction(frame: &mut RgbImage, prediction: Point) {
    draw_cross_mut(
        frame,
        PREDICTION_COLOR,
        prediction.x.round() as i32,
        prediction.y.round() as i32,
    );
}

/// Net rectangle, colored by whether the match was confirmed this frame.
pub fn draw_net(frame: &mut RgbImage, net: Rect, fresh: bool) {
    let color = if fresh { NET_FRESH_COLOR } else { NET_STALE_COLOR };
    draw_rect(frame, net, color);
}

/// Straight segments between consecutive trail points, most recent first.
pub fn draw_trail(frame: &mut RgbImage, trail: &PathTrail) {
    for (from, to) in trail.segments() {
        draw_line_segment_mut(frame, (from.x, from.y), (to.x, to.y), TRAIL_COLOR);
    }
}

fn draw_rect(frame: &mut RgbImage, rect: Rect, color: Rgb<u8>) {
    let width = rect.width.round().max(1.0) as u32;
    let height = rect.height.round().max(1.0) as u32;
    draw_hollow_rect_mut(
        frame,
        PixelRect::at(rect.x.round() as i32, rect.y.round() as i32).of_size(width, height),
        color,
    );
}
