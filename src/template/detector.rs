use std::path::Path;

use image::RgbImage;
use tracing::{debug, info};

use crate::error::{Result, TemplateError};

/// Grid stride used to seed the flood fill. Key-color blobs are far larger
/// than the stride, so a sparse scan finds every one of them.
const SEED_STRIDE: u32 = 5;

/// Components with fewer key pixels than this are anti-aliasing noise.
const MIN_COMPONENT_PIXELS: usize = 100;

/// An axis-aligned pixel region in template coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Bounding-box area in pixels
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// The two placeholder regions recognized in a template frame
#[derive(Debug, Clone, Copy)]
pub struct TemplateRegions {
    /// Largest key-color blob: the main content screen
    pub main: Region,

    /// Second-largest blob: the anchor window
    pub anchor: Region,
}

/// Key-color test: saturated green, tolerant of anti-aliased edges.
fn is_key_color(pixel: &image::Rgb<u8>) -> bool {
    let [r, g, b] = pixel.0;
    g > 200 && r < 100 && b < 100
}

struct Component {
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
    pixels: usize,
}

impl Component {
    fn region(&self) -> Region {
        Region {
            x: self.min_x,
            y: self.min_y,
            width: self.max_x - self.min_x + 1,
            height: self.max_y - self.min_y + 1,
        }
    }
}

/// Load a template image and detect its main and anchor regions.
pub fn detect_regions(path: &Path) -> Result<TemplateRegions> {
    info!("Analyzing template {:?}", path);

    let img = image::open(path)
        .map_err(|e| TemplateError::DecodeFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?
        .to_rgb8();

    detect_regions_in(&img)
}

/// Detect the two largest key-color blobs in an already-decoded image.
///
/// Seeds a 4-connected flood fill from a sparse grid, discards components
/// below the noise threshold, and ranks the survivors by bounding-box area.
pub fn detect_regions_in(img: &RgbImage) -> Result<TemplateRegions> {
    let (width, height) = img.dimensions();
    let mut visited = vec![false; (width as usize) * (height as usize)];
    let mut components: Vec<Component> = Vec::new();

    for y in (0..height).step_by(SEED_STRIDE as usize) {
        for x in (0..width).step_by(SEED_STRIDE as usize) {
            let idx = (y as usize) * (width as usize) + x as usize;
            if visited[idx] || !is_key_color(img.get_pixel(x, y)) {
                continue;
            }

            let component = flood_fill(img, &mut visited, x, y);
            if component.pixels >= MIN_COMPONENT_PIXELS {
                debug!(
                    "Key-color component: {} px, bbox {:?}",
                    component.pixels,
                    component.region()
                );
                components.push(component);
            }
        }
    }

    if components.len() < 2 {
        return Err(TemplateError::RegionDetection {
            found: components.len(),
        }
        .into());
    }

    // Stable sort: equal areas keep scan order, first-found wins
    components.sort_by_key(|c| std::cmp::Reverse(c.region().area()));

    let main = components[0].region();
    let anchor = components[1].region();

    info!(
        "Template regions: main {}x{} at ({}, {}), anchor {}x{} at ({}, {})",
        main.width, main.height, main.x, main.y, anchor.width, anchor.height, anchor.x, anchor.y
    );

    Ok(TemplateRegions { main, anchor })
}

/// Iterative 4-connected flood fill from one seed.
///
/// The explicit stack and visited bitmap bound the work by the image's pixel
/// count, so termination does not depend on recursion depth.
fn flood_fill(img: &RgbImage, visited: &mut [bool], seed_x: u32, seed_y: u32) -> Component {
    let (width, height) = img.dimensions();
    let mut stack = vec![(seed_x, seed_y)];
    let mut component = Component {
        min_x: seed_x,
        min_y: seed_y,
        max_x: seed_x,
        max_y: seed_y,
        pixels: 0,
    };

    while let Some((x, y)) = stack.pop() {
        let idx = (y as usize) * (width as usize) + x as usize;
        if visited[idx] {
            continue;
        }
        visited[idx] = true;

        if !is_key_color(img.get_pixel(x, y)) {
            continue;
        }

        component.min_x = component.min_x.min(x);
        component.min_y = component.min_y.min(y);
        component.max_x = component.max_x.max(x);
        component.max_y = component.max_y.max(y);
        component.pixels += 1;

        if x + 1 < width {
            stack.push((x + 1, y));
        }
        if x > 0 {
            stack.push((x - 1, y));
        }
        if y + 1 < height {
            stack.push((x, y + 1));
        }
        if y > 0 {
            stack.push((x, y - 1));
        }
    }

    component
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const KEY: Rgb<u8> = Rgb([0, 255, 0]);

    fn fill_rect(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
        for dy in 0..h {
            for dx in 0..w {
                img.put_pixel(x + dx, y + dy, color);
            }
        }
    }

    #[test]
    fn test_two_rectangles_detected_with_true_bounding_boxes() {
        let mut img = RgbImage::from_pixel(400, 300, Rgb([30, 30, 30]));
        fill_rect(&mut img, 20, 40, 200, 120, KEY); // main
        fill_rect(&mut img, 260, 50, 80, 60, KEY); // anchor

        let regions = detect_regions_in(&img).unwrap();

        assert_eq!(
            regions.main,
            Region {
                x: 20,
                y: 40,
                width: 200,
                height: 120
            }
        );
        assert_eq!(
            regions.anchor,
            Region {
                x: 260,
                y: 50,
                width: 80,
                height: 60
            }
        );
        assert!(regions.main.area() >= regions.anchor.area());
    }

    #[test]
    fn test_blank_template_fails() {
        let img = RgbImage::from_pixel(200, 200, Rgb([255, 255, 255]));
        let err = detect_regions_in(&img).unwrap_err();
        assert!(matches!(
            err,
            crate::error::AssemblyError::Template(TemplateError::RegionDetection { found: 0 })
        ));
    }

    #[test]
    fn test_single_region_fails() {
        let mut img = RgbImage::from_pixel(200, 200, Rgb([0, 0, 0]));
        fill_rect(&mut img, 10, 10, 100, 100, KEY);

        let err = detect_regions_in(&img).unwrap_err();
        assert!(matches!(
            err,
            crate::error::AssemblyError::Template(TemplateError::RegionDetection { found: 1 })
        ));
    }

    #[test]
    fn test_noise_below_threshold_ignored() {
        let mut img = RgbImage::from_pixel(300, 300, Rgb([0, 0, 0]));
        fill_rect(&mut img, 10, 10, 150, 100, KEY);
        fill_rect(&mut img, 200, 20, 60, 40, KEY);
        // a few stray key pixels, well under the 100 px threshold
        fill_rect(&mut img, 280, 280, 5, 5, KEY);

        let regions = detect_regions_in(&img).unwrap();
        assert_eq!(regions.main.width, 150);
        assert_eq!(regions.anchor.width, 60);
    }

    #[test]
    fn test_minimum_area_component_qualifies() {
        let mut img = RgbImage::from_pixel(300, 300, Rgb([0, 0, 0]));
        fill_rect(&mut img, 10, 10, 150, 100, KEY);
        // exactly 100 pixels: qualifies
        fill_rect(&mut img, 200, 200, 10, 10, KEY);

        let regions = detect_regions_in(&img).unwrap();
        assert_eq!(
            regions.anchor,
            Region {
                x: 200,
                y: 200,
                width: 10,
                height: 10
            }
        );
    }

    #[test]
    fn test_anti_aliased_edge_still_counts() {
        // Dimmed-green halo around a key rectangle must not split or grow it
        let mut img = RgbImage::from_pixel(300, 300, Rgb([0, 0, 0]));
        fill_rect(&mut img, 50, 50, 120, 80, KEY);
        fill_rect(&mut img, 49, 49, 122, 1, Rgb([80, 180, 80]));
        fill_rect(&mut img, 200, 50, 40, 40, KEY);

        let regions = detect_regions_in(&img).unwrap();
        assert_eq!(
            regions.main,
            Region {
                x: 50,
                y: 50,
                width: 120,
                height: 80
            }
        );
    }
}
