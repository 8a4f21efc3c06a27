//! Shared test utilities: synthetic frame builders.
//!
//! Consolidated here so each stage test draws its fixtures the same way.
//! The target color (bright, strongly red) and the dark background are chosen
//! so the green/red predicate separates them cleanly at the default 0.4 limit.

use crate::config::DiameterConfig;
use crate::diameter::on_target_at;
use crate::edges::EdgeMap;
use crate::frame::FrameBuffer;

const TARGET: [u8; 3] = [255, 60, 40];
const BACKGROUND: [u8; 3] = [12, 12, 12];

/// Uniform dark frame with no edges anywhere.
pub(crate) fn dark_frame(w: u32, h: u32) -> FrameBuffer {
    fill(w, h, |_, _| BACKGROUND)
}

/// Uniform on-target frame (used to isolate individual validation gates).
pub(crate) fn red_frame(w: u32, h: u32) -> FrameBuffer {
    fill(w, h, |_, _| TARGET)
}

/// Bright disk of the target color on a dark background.
pub(crate) fn draw_disk_frame(w: u32, h: u32, cx: f32, cy: f32, radius: f32) -> FrameBuffer {
    fill(w, h, |x, y| {
        let dx = x as f32 - cx;
        let dy = y as f32 - cy;
        if dx * dx + dy * dy <= radius * radius {
            TARGET
        } else {
            BACKGROUND
        }
    })
}

/// Upper half-disk: disk pixels at or above the center row only. The flat
/// diameter edge runs straight through the geometric center.
pub(crate) fn draw_half_disk_frame(w: u32, h: u32, cx: f32, cy: f32, radius: f32) -> FrameBuffer {
    fill(w, h, |x, y| {
        let dx = x as f32 - cx;
        let dy = y as f32 - cy;
        if y as f32 <= cy && dx * dx + dy * dy <= radius * radius {
            TARGET
        } else {
            BACKGROUND
        }
    })
}

/// All pixels that would cast votes: edge AND on-target.
pub(crate) fn voting_pixels(
    frame: &FrameBuffer,
    edges: &EdgeMap,
    config: &DiameterConfig,
) -> Vec<(u32, u32)> {
    let mut out = Vec::new();
    for y in 0..frame.height() {
        for x in 0..frame.width() {
            if edges.is_edge(x as i64, y as i64) && on_target_at(frame, x as i64, y as i64, config)
            {
                out.push((x, y));
            }
        }
    }
    out
}

fn fill(w: u32, h: u32, pixel: impl Fn(u32, u32) -> [u8; 3]) -> FrameBuffer {
    let mut frame = FrameBuffer::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let [r, g, b] = pixel(x, y);
            frame
                .set(y as i64, x as i64, r, g, b)
                .expect("coordinates are in range by construction");
        }
    }
    frame
}
