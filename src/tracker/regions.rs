//! Per-region shape metrics and the filtering pass that keeps the region
//! list and the labeled map consistent.

use image::GrayImage;

use crate::tracker::geometry::Point;
use crate::tracker::labeling::{BACKGROUND_LABEL, FIRST_REGION_LABEL, LabelCount};

/// Geometric and statistical descriptors of one labeled region.
#[derive(Debug, Clone)]
pub struct Region {
    /// Label id carried by this region's pixels.
    pub id: u8,
    /// Pixel count.
    pub area: u32,
    /// Number of boundary pixels.
    pub boundary_len: u32,
    /// Mean pixel position.
    pub centroid: Point,
    /// Centered second moment in x, normalized by area.
    pub sxx: f64,
    /// Centered second moment in y, normalized by area.
    pub syy: f64,
    /// Centered cross moment, normalized by area.
    pub sxy: f64,
    /// Principal-axis angle in radians; 0 when the moments are isotropic.
    pub orientation: f64,
    /// Minor-to-major eigenvalue ratio in [0, 1]; 1 = circle-like.
    pub circularity: f64,
    /// Squared boundary length over area.
    pub compactness: f64,
    /// Area over boundary length.
    pub area_perimeter_ratio: f64,
}

/// Compute descriptors for every labeled region in two image passes.
///
/// The first pass accumulates area, centroid sums and boundary counts; the
/// second accumulates second moments about the finalized centroids. Regions
/// with no boundary pixels are dropped before any ratio is formed.
pub fn compute_region_metrics(labels: &GrayImage, count: LabelCount) -> Vec<Region> {
    let n = count.regions as usize;
    if n == 0 {
        return Vec::new();
    }

    let (width, height) = labels.dimensions();
    let mut area = vec![0u32; n];
    let mut boundary = vec![0u32; n];
    let mut sum_x = vec![0f64; n];
    let mut sum_y = vec![0f64; n];

    for y in 0..height {
        for x in 0..width {
            let label = labels.get_pixel(x, y).0[0];
            if label < FIRST_REGION_LABEL {
                continue;
            }
            let idx = (label - FIRST_REGION_LABEL) as usize;
            area[idx] += 1;
            if is_boundary(labels, x, y, label) {
                boundary[idx] += 1;
            }
            sum_x[idx] += x as f64;
            sum_y[idx] += y as f64;
        }
    }

    let mut cx = vec![0f64; n];
    let mut cy = vec![0f64; n];
    for idx in 0..n {
        if area[idx] > 0 {
            cx[idx] = sum_x[idx] / area[idx] as f64;
            cy[idx] = sum_y[idx] / area[idx] as f64;
        }
    }

    let mut sxx = vec![0f64; n];
    let mut syy = vec![0f64; n];
    let mut sxy = vec![0f64; n];
    for y in 0..height {
        for x in 0..width {
            let label = labels.get_pixel(x, y).0[0];
            if label < FIRST_REGION_LABEL {
                continue;
            }
            let idx = (label - FIRST_REGION_LABEL) as usize;
            let dx = x as f64 - cx[idx];
            let dy = y as f64 - cy[idx];
            sxx[idx] += dx * dx;
            syy[idx] += dy * dy;
            sxy[idx] += dx * dy;
        }
    }

    let mut regions = Vec::with_capacity(n);
    for idx in 0..n {
        if area[idx] == 0 || boundary[idx] == 0 {
            continue;
        }
        let a = area[idx] as f64;
        let (sxx, syy, sxy) = (sxx[idx] / a, syy[idx] / a, sxy[idx] / a);

        let orientation = if sxx == syy {
            0.0
        } else {
            (2.0 * sxy).atan2(sxx - syy) / 2.0
        };

        // Closed-form eigen-extremes of [[sxx, sxy], [sxy, syy]].
        let mid = (sxx + syy) / 2.0;
        let disc = (((sxx - syy) / 2.0).powi(2) + sxy * sxy).sqrt();
        let (e_min, e_max) = (mid - disc, mid + disc);
        let circularity = if e_max.abs() < f64::EPSILON {
            1.0
        } else {
            e_min / e_max
        };

        regions.push(Region {
            id: idx as u8 + FIRST_REGION_LABEL,
            area: area[idx],
            boundary_len: boundary[idx],
            centroid: Point::new(cx[idx] as f32, cy[idx] as f32),
            sxx,
            syy,
            sxy,
            orientation,
            circularity,
            compactness: (boundary[idx] as f64).powi(2) / a,
            area_perimeter_ratio: a / boundary[idx] as f64,
        });
    }
    regions
}

/// A pixel is boundary when any of its 8 neighbors carries a different
/// label; positions outside the image count as different, so regions flush
/// with the frame edge are bounded there too.
fn is_boundary(labels: &GrayImage, x: u32, y: u32, label: u8) -> bool {
    let (width, height) = labels.dimensions();
    for dy in -1i32..=1 {
        for dx in -1i32..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
                return true;
            }
            if labels.get_pixel(nx as u32, ny as u32).0[0] != label {
                return true;
            }
        }
    }
    false
}

/// Drop every region matching `predicate`, blanking its pixels back to the
/// background label in one pass so no removed id survives in the map.
///
/// Returns the retained regions in their original order.
pub fn filter_regions<F>(labels: &mut GrayImage, regions: Vec<Region>, predicate: F) -> Vec<Region>
where
    F: Fn(&Region) -> bool,
{
    let mut removed = [false; 256];
    let mut any_removed = false;
    let mut kept = Vec::with_capacity(regions.len());
    for region in regions {
        if predicate(&region) {
            removed[region.id as usize] = true;
            any_removed = true;
        } else {
            kept.push(region);
        }
    }

    if any_removed {
        for pixel in labels.pixels_mut() {
            if removed[pixel.0[0] as usize] {
                pixel.0[0] = BACKGROUND_LABEL;
            }
        }
    }
    kept
}
