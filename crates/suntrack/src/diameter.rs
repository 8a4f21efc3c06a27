//! Run-length target-diameter estimation from a color-ratio scan.
//!
//! The target is far redder than anything else in the scene, so the longest
//! run of consecutive pixels whose green/red ratio falls below the limit is a
//! cheap proxy for the disk diameter. A red channel of zero is always
//! off-target; the degenerate ratio never divides.

use crate::config::DiameterConfig;
use crate::frame::{Channel, FrameBuffer};

/// One full scan line through the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanLine {
    Row(u32),
    Col(u32),
}

/// On-target color predicate: green/red below the configured limit.
pub fn is_on_target(red: u8, green: u8, ratio_max: f32) -> bool {
    if red == 0 {
        return false;
    }
    (green as f32) / (red as f32) < ratio_max
}

/// On-target test for one frame pixel; out-of-range is off-target.
pub fn on_target_at(frame: &FrameBuffer, x: i64, y: i64, config: &DiameterConfig) -> bool {
    match (frame.get(y, x, Channel::Red), frame.get(y, x, Channel::Green)) {
        (Some(r), Some(g)) => is_on_target(r, g, config.color_ratio_max),
        _ => false,
    }
}

/// Longest run of consecutive on-target pixels along one scan line.
pub fn longest_run(frame: &FrameBuffer, line: ScanLine, config: &DiameterConfig) -> u32 {
    let len = match line {
        ScanLine::Row(_) => frame.width(),
        ScanLine::Col(_) => frame.height(),
    };
    let mut best = 0u32;
    let mut run = 0u32;
    for i in 0..len as i64 {
        let (x, y) = match line {
            ScanLine::Row(row) => (i, row as i64),
            ScanLine::Col(col) => (col as i64, i),
        };
        if on_target_at(frame, x, y, config) {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    best
}

/// Radius estimate from the widest on-target run over all rows.
///
/// Returns 0 when no on-target pixel exists anywhere; downstream stages treat
/// that as "no target".
pub fn estimate_radius(frame: &FrameBuffer, config: &DiameterConfig) -> u32 {
    let mut diameter = 0u32;
    for row in 0..frame.height() {
        diameter = diameter.max(longest_run(frame, ScanLine::Row(row), config));
    }
    (diameter as f32 * config.radius_scale).round() as u32
}
