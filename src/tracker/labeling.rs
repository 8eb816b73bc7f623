//! Connected-component labeling of the binary candidate mask.

use image::{GrayImage, Luma};

/// Label for background and visited non-candidate pixels.
pub const BACKGROUND_LABEL: u8 = 1;
/// First label id handed to a region; ids grow contiguously from here.
pub const FIRST_REGION_LABEL: u8 = 2;
/// Connected blobs smaller than this are absorbed into the background.
const ABSORPTION_THRESHOLD: usize = 50;

/// Result of one labeling pass.
#[derive(Debug, Clone, Copy)]
pub struct LabelCount {
    /// Number of regions allocated; their ids run `2..=regions + 1`.
    pub regions: u32,
    /// True when the scan stopped early because the 8-bit label space ran
    /// out. The returned map is only partially labeled in that case.
    pub capped: bool,
}

/// Label the 8-connected components of `mask` (non-zero = candidate).
///
/// Every background pixel ends up labeled [`BACKGROUND_LABEL`], as does any
/// candidate blob below the absorption threshold. The scan stops before it
/// would allocate an id above 255; unvisited pixels past that point stay 0.
pub fn label_components(mask: &GrayImage) -> (GrayImage, LabelCount) {
    let (width, height) = mask.dimensions();
    let mut labels = GrayImage::new(width, height);
    let mut next_label = u32::from(FIRST_REGION_LABEL);

    for y in 0..height {
        for x in 0..width {
            if labels.get_pixel(x, y).0[0] != 0 {
                continue;
            }
            if mask.get_pixel(x, y).0[0] == 0 {
                labels.put_pixel(x, y, Luma([BACKGROUND_LABEL]));
                continue;
            }
            if flood_fill(mask, &mut labels, x, y, next_label as u8) {
                next_label += 1;
                if next_label > u32::from(u8::MAX) {
                    let regions = next_label - u32::from(FIRST_REGION_LABEL);
                    return (labels, LabelCount {
                        regions,
                        capped: true,
                    });
                }
            }
        }
    }

    let regions = next_label - u32::from(FIRST_REGION_LABEL);
    (labels, LabelCount {
        regions,
        capped: false,
    })
}

/// Iterative 8-connected fill from a seed candidate pixel.
///
/// Background neighbors are marked visited along the way so the raster scan
/// never re-inspects them. Returns false when the blob was below the
/// absorption threshold and was folded into the background instead of
/// keeping its label.
fn flood_fill(mask: &GrayImage, labels: &mut GrayImage, seed_x: u32, seed_y: u32, label: u8) -> bool {
    let (width, height) = mask.dimensions();
    labels.put_pixel(seed_x, seed_y, Luma([label]));
    let mut filled = vec![(seed_x, seed_y)];
    let mut stack = vec![(seed_x, seed_y)];

    while let Some((x, y)) = stack.pop() {
        for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
                    continue;
                }
                let (nx, ny) = (nx as u32, ny as u32);
                if labels.get_pixel(nx, ny).0[0] != 0 {
                    continue;
                }
                if mask.get_pixel(nx, ny).0[0] == 0 {
                    labels.put_pixel(nx, ny, Luma([BACKGROUND_LABEL]));
                } else {
                    labels.put_pixel(nx, ny, Luma([label]));
                    stack.push((nx, ny));
                    filled.push((nx, ny));
                }
            }
        }
    }

    if filled.len() < ABSORPTION_THRESHOLD {
        for &(x, y) in &filled {
            labels.put_pixel(x, y, Luma([BACKGROUND_LABEL]));
        }
        return false;
    }
    true
}

/// Binary view of a labeled map: 255 wherever a region pixel survives.
pub fn candidate_mask(labels: &GrayImage) -> GrayImage {
    let mut mask = GrayImage::new(labels.width(), labels.height());
    for (dst, src) in mask.pixels_mut().zip(labels.pixels()) {
        if src.0[0] >= FIRST_REGION_LABEL {
            dst.0[0] = 255;
        }
    }
    mask
}
