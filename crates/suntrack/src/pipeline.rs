//! Per-cycle vision pipeline: edges -> diameter -> vote -> select.
//!
//! Stage primitives live in their own modules; this layer owns the call
//! order and data flow for one frame.

use serde::{Deserialize, Serialize};

use crate::candidate::{select, Candidate};
use crate::config::TrackerConfig;
use crate::diameter::estimate_radius;
use crate::edges::EdgeMap;
use crate::frame::FrameBuffer;
use crate::vote::cast_votes;

/// Outcome of one detection cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Detection {
    /// Validated candidate, if any survived selection.
    pub candidate: Option<Candidate>,
    /// Radius estimate from the run-length scan (0 means no target color).
    pub radius_estimate: u32,
    /// Raw accumulator maximum before validation.
    pub peak_votes: u32,
}

/// Run the full detection pipeline on one frame.
pub fn detect(frame: &FrameBuffer, config: &TrackerConfig) -> Detection {
    let edges = EdgeMap::compute(frame, &config.edge);
    tracing::debug!(edge_pixels = edges.edge_count(), "edge mask computed");

    let radius = estimate_radius(frame, &config.diameter);
    if radius == 0 {
        tracing::debug!("no on-target run; skipping vote stage");
        return Detection {
            candidate: None,
            radius_estimate: 0,
            peak_votes: 0,
        };
    }
    tracing::debug!(radius, "diameter estimate");

    let grid = cast_votes(frame, &edges, radius, &config.vote, &config.diameter);
    let peak_votes = crate::candidate::peak(&grid).2;
    let candidate = select(
        frame,
        &edges,
        &grid,
        radius,
        &config.select,
        &config.diameter,
    );
    match &candidate {
        Some(c) => tracing::info!(
            x = c.center_x,
            y = c.center_y,
            votes = c.votes,
            radius = c.radius,
            "target detected"
        ),
        None => tracing::info!(radius, "no valid candidate this cycle"),
    }

    Detection {
        candidate,
        radius_estimate: radius,
        peak_votes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{dark_frame, draw_disk_frame};

    #[test]
    fn scenario_bright_disk_is_located() {
        let frame = draw_disk_frame(320, 240, 160.0, 120.0, 40.0);
        let det = detect(&frame, &TrackerConfig::default());
        let cand = det.candidate.expect("disk should be detected");
        assert!((cand.center_x as i64 - 160).abs() <= 2);
        assert!((cand.center_y as i64 - 120).abs() <= 2);
        assert!((cand.radius as i64 - 40).abs() <= 3);
    }

    #[test]
    fn scenario_all_dark_frame_yields_nothing() {
        let frame = dark_frame(320, 240);
        let det = detect(&frame, &TrackerConfig::default());
        assert!(det.candidate.is_none());
        assert_eq!(det.radius_estimate, 0);
        assert_eq!(det.peak_votes, 0);
    }

    #[test]
    fn scenario_disk_clipped_at_top_is_rejected() {
        let frame = draw_disk_frame(320, 240, 160.0, 14.0, 40.0);
        let det = detect(&frame, &TrackerConfig::default());
        assert!(det.candidate.is_none());
        assert!(det.radius_estimate > 0, "target color is present");
    }
}
