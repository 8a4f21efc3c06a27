//! Owned per-cycle frame buffer with bounds-checked channel access.
//!
//! One `FrameBuffer` is captured per control cycle and is read-only from then
//! on; the pipeline stages borrow it. The container boundary contract is a
//! plain width x height x 3 byte buffer, row-major, top-to-bottom.

use image::{GrayImage, Luma, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::TrackError;

/// Color channel selector for [`FrameBuffer::get`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Red,
    Green,
    Blue,
    /// Integer mean of the three color channels.
    Luminance,
}

/// Fixed-geometry RGB frame, 8 bits per channel.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl FrameBuffer {
    /// Zero-filled (black) frame.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 3],
        }
    }

    /// Wrap a raw row-major RGB buffer. The length must be exactly
    /// width * height * 3.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, TrackError> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(TrackError::MalformedFrame {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn from_rgb_image(img: &RgbImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            data: img.as_raw().clone(),
        }
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_raw(self.width, self.height, self.data.clone())
            .expect("buffer length is kept consistent with dimensions")
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, row: i64, col: i64) -> Option<usize> {
        if row < 0 || col < 0 || row >= self.height as i64 || col >= self.width as i64 {
            return None;
        }
        Some((row as usize * self.width as usize + col as usize) * 3)
    }

    /// Channel value at (row, col), or `None` when the coordinate is outside
    /// the frame. Out-of-range access is a defined condition, never a panic.
    pub fn get(&self, row: i64, col: i64, channel: Channel) -> Option<u8> {
        let i = self.index(row, col)?;
        let v = match channel {
            Channel::Red => self.data[i],
            Channel::Green => self.data[i + 1],
            Channel::Blue => self.data[i + 2],
            Channel::Luminance => {
                let sum =
                    self.data[i] as u16 + self.data[i + 1] as u16 + self.data[i + 2] as u16;
                (sum / 3) as u8
            }
        };
        Some(v)
    }

    /// Write one pixel. Out-of-range coordinates are rejected without
    /// touching the buffer.
    pub fn set(&mut self, row: i64, col: i64, r: u8, g: u8, b: u8) -> Result<(), TrackError> {
        let i = self
            .index(row, col)
            .ok_or(TrackError::OutOfRange { row, col })?;
        self.data[i] = r;
        self.data[i + 1] = g;
        self.data[i + 2] = b;
        Ok(())
    }

    /// Extract a single channel as a grayscale image for gradient kernels
    /// and debug dumps.
    pub fn channel_plane(&self, channel: Channel) -> GrayImage {
        let mut out = GrayImage::new(self.width, self.height);
        for row in 0..self.height {
            for col in 0..self.width {
                let v = self
                    .get(row as i64, col as i64, channel)
                    .unwrap_or(0);
                out.put_pixel(col, row, Luma([v]));
            }
        }
        out
    }

    /// Draw a filled square of the given half-size, clipped to the frame.
    /// Used to mark a detected center on debug renders.
    pub fn mark_square(&mut self, center_x: i64, center_y: i64, half: i64, color: Rgb<u8>) {
        for dy in -half..half {
            for dx in -half..half {
                let _ = self.set(
                    center_y + dy,
                    center_x + dx,
                    color[0],
                    color[1],
                    color[2],
                );
            }
        }
    }
}
