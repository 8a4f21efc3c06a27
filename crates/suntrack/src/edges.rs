//! Binary edge mask from Sobel gradient magnitude.
//!
//! The classic 3x3 Sobel pair runs over one selected color channel; a pixel
//! is an edge when |gx| + |gy| exceeds the configured threshold. Border
//! pixels are never edges. A single gap-closing pass then promotes non-edge
//! pixels whose vertical or horizontal neighbor pair are both edges, closing
//! one-pixel dropouts along a disk boundary without iterating to a fixpoint.

use image::GrayImage;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

use crate::config::EdgeConfig;
use crate::frame::FrameBuffer;

/// Immutable per-cycle edge mask, same dimensions as the frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeMap {
    width: u32,
    height: u32,
    mask: Vec<bool>,
}

impl EdgeMap {
    /// Compute the edge mask for one frame. Pure in (frame, config).
    pub fn compute(frame: &FrameBuffer, config: &EdgeConfig) -> Self {
        let plane = frame.channel_plane(config.channel);
        let (w, h) = plane.dimensions();
        let mut mask = vec![false; w as usize * h as usize];

        if w >= 3 && h >= 3 {
            let gx = horizontal_sobel(&plane);
            let gy = vertical_sobel(&plane);
            for y in 1..h - 1 {
                for x in 1..w - 1 {
                    let mag = (gx.get_pixel(x, y)[0] as i32).abs()
                        + (gy.get_pixel(x, y)[0] as i32).abs();
                    if mag as f64 > config.threshold {
                        mask[(y * w + x) as usize] = true;
                    }
                }
            }
            close_gaps(&mut mask, w, h);
        }

        Self {
            width: w,
            height: h,
            mask,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Edge test; coordinates outside the frame are never edges.
    pub fn is_edge(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return false;
        }
        self.mask[y as usize * self.width as usize + x as usize]
    }

    /// Number of edge pixels in the mask.
    pub fn edge_count(&self) -> usize {
        self.mask.iter().filter(|&&e| e).count()
    }

    /// Hand-built mask for gate tests that need edges at exact positions.
    #[cfg(test)]
    pub(crate) fn from_points(width: u32, height: u32, points: &[(i64, i64)]) -> Self {
        let mut mask = vec![false; width as usize * height as usize];
        for &(x, y) in points {
            if x >= 0 && y >= 0 && x < width as i64 && y < height as i64 {
                mask[y as usize * width as usize + x as usize] = true;
            }
        }
        Self {
            width,
            height,
            mask,
        }
    }

    /// Render the mask white-on-black for debug output.
    pub fn to_image(&self) -> GrayImage {
        let mut img = GrayImage::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                if self.mask[(y * self.width + x) as usize] {
                    img.put_pixel(x, y, image::Luma([255]));
                }
            }
        }
        img
    }
}

/// Single-pass dropout closing. Promotions read the pre-pass mask, so the
/// result does not depend on scan order and never cascades.
fn close_gaps(mask: &mut [bool], w: u32, h: u32) {
    let before = mask.to_vec();
    let stride = w as usize;
    for y in 1..(h - 1) as usize {
        for x in 1..(w - 1) as usize {
            let i = y * stride + x;
            if before[i] {
                continue;
            }
            let vertical = before[i - stride] && before[i + stride];
            let horizontal = before[i - 1] && before[i + 1];
            if vertical || horizontal {
                mask[i] = true;
            }
        }
    }
}
