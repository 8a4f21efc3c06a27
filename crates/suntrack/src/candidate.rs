//! Vote-peak extraction and candidate validation.
//!
//! The raw accumulator maximum is only a hypothesis; a stack of cheap
//! geometric and photometric gates rejects truncated disks, spurious peaks,
//! and square-cornered glare before anything reaches the controller.

use serde::{Deserialize, Serialize};

use crate::config::{DiameterConfig, SelectConfig};
use crate::diameter::{longest_run, on_target_at, ScanLine};
use crate::edges::EdgeMap;
use crate::frame::FrameBuffer;
use crate::vote::VoteGrid;

/// A validated detection for one cycle. Ephemeral; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub center_x: u32,
    pub center_y: u32,
    pub votes: u32,
    pub radius: u32,
}

/// Accumulator maximum, excluding the one-pixel border. Ties resolve to the
/// first position encountered in row-major (y outer, x inner) order.
pub(crate) fn peak(grid: &VoteGrid) -> (u32, u32, u32) {
    let mut best = (0u32, 0u32, 0u32);
    for y in 1..grid.height().saturating_sub(1) {
        for x in 1..grid.width().saturating_sub(1) {
            let v = grid.at(x as i64, y as i64);
            if v > best.2 {
                best = (x, y, v);
            }
        }
    }
    best
}

/// Validation gates applied to a peak before it becomes a candidate.
pub(crate) fn validate(
    frame: &FrameBuffer,
    edges: &EdgeMap,
    candidate: &Candidate,
    select: &SelectConfig,
    diameter: &DiameterConfig,
) -> bool {
    let cx = candidate.center_x as i64;
    let cy = candidate.center_y as i64;
    let radius = candidate.radius;

    if candidate.votes < select.vote_floor {
        return false;
    }

    // An edge through the exact center is half-circle topology, not a disk.
    if edges.is_edge(cx, cy) {
        return false;
    }

    // Centers too close to the top or bottom border are truncated targets.
    let margin = (radius / 2) as i64;
    if cy < margin || cy > frame.height() as i64 - 1 - margin {
        return false;
    }

    // Re-measure the disk through the candidate center; a genuine peak sits
    // on a column whose on-target run matches the voted diameter.
    let measured = longest_run(frame, ScanLine::Col(candidate.center_x), diameter) as i64;
    if (measured - 2 * radius as i64).abs() > select.diameter_tol_px as i64 {
        return false;
    }

    // Square-corner probe: a rectangular glare patch has edge pixels on-target
    // at both diagonal offsets; a disk has neither.
    if let Some(corners) = &select.corner_check {
        let off = radius as i64 - 3;
        if off > 0 {
            let hit = |sign: [i32; 2]| {
                let px = cx + sign[0] as i64 * off;
                let py = cy + sign[1] as i64 * off;
                edges.is_edge(px, py) && on_target_at(frame, px, py, diameter)
            };
            if hit(corners.first) && hit(corners.second) {
                return false;
            }
        }
    }

    true
}

/// Extract the best vote peak and validate it. Returns `None` when the peak
/// fails any gate or when the radius estimate was zero.
pub fn select(
    frame: &FrameBuffer,
    edges: &EdgeMap,
    grid: &VoteGrid,
    radius: u32,
    select_config: &SelectConfig,
    diameter_config: &DiameterConfig,
) -> Option<Candidate> {
    if radius == 0 {
        return None;
    }
    let (x, y, votes) = peak(grid);
    if votes == 0 {
        return None;
    }
    let candidate = Candidate {
        center_x: x,
        center_y: y,
        votes,
        radius,
    };
    if validate(frame, edges, &candidate, select_config, diameter_config) {
        Some(candidate)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CornerOffsets, EdgeConfig, VoteConfig};
    use crate::diameter::estimate_radius;
    use crate::test_utils::{draw_disk_frame, draw_half_disk_frame, red_frame};
    use crate::vote::cast_votes;

    fn run_selection(frame: &FrameBuffer, select_cfg: &SelectConfig) -> Option<Candidate> {
        let dia_cfg = DiameterConfig::default();
        let edges = EdgeMap::compute(frame, &EdgeConfig::default());
        let radius = estimate_radius(frame, &dia_cfg);
        let grid = cast_votes(frame, &edges, radius, &VoteConfig::default(), &dia_cfg);
        select(frame, &edges, &grid, radius, select_cfg, &dia_cfg)
    }

    #[test]
    fn clean_disk_is_selected_near_truth() {
        let frame = draw_disk_frame(320, 240, 160.0, 120.0, 40.0);
        let cand = run_selection(&frame, &SelectConfig::default()).expect("disk detected");
        assert!((cand.center_x as i64 - 160).abs() <= 2, "x={}", cand.center_x);
        assert!((cand.center_y as i64 - 120).abs() <= 2, "y={}", cand.center_y);
        assert!((cand.radius as i64 - 40).abs() <= 3, "r={}", cand.radius);
    }

    #[test]
    fn half_disk_is_rejected() {
        let frame = draw_half_disk_frame(320, 240, 160.0, 120.0, 40.0);
        assert_eq!(run_selection(&frame, &SelectConfig::default()), None);
    }

    #[test]
    fn disk_near_top_border_is_rejected() {
        // Center row well inside radius/2 of the border; votes are plentiful
        // but the boundary-proximity rule must fire.
        let frame = draw_disk_frame(320, 240, 160.0, 14.0, 40.0);
        assert_eq!(run_selection(&frame, &SelectConfig::default()), None);
    }

    #[test]
    fn vote_floor_rejects_weak_peaks() {
        let frame = draw_disk_frame(320, 240, 160.0, 120.0, 40.0);
        let strict = SelectConfig {
            vote_floor: u32::MAX,
            ..SelectConfig::default()
        };
        assert_eq!(run_selection(&frame, &strict), None);
    }

    #[test]
    fn tie_break_is_first_in_row_major_order() {
        let grid = {
            let mut g = VoteGrid::new(16, 16);
            g.bump(9, 4, 30);
            g.bump(3, 7, 30);
            g.bump(5, 7, 30);
            g
        };
        let (x, y, v) = peak(&grid);
        assert_eq!((x, y, v), (9, 4, 30));
    }

    #[test]
    fn corner_probe_rejects_square_glare() {
        // All-red frame with hand-placed edges exactly at the diagonal probe
        // offsets of a radius-20 candidate.
        let frame = red_frame(64, 64);
        let off = 17i64; // radius 20 - 3
        let mask = EdgeMap::from_points(64, 64, &[(32 - off, 32 - off), (32 + off, 32 + off)]);
        let candidate = Candidate {
            center_x: 32,
            center_y: 32,
            votes: 100,
            radius: 20,
        };
        let dia = DiameterConfig::default();
        let mut cfg = SelectConfig {
            vote_floor: 1,
            diameter_tol_px: 200,
            corner_check: Some(CornerOffsets::default()),
        };
        assert!(!validate(&frame, &mask, &candidate, &cfg, &dia));

        // Opposite sign convention misses these probe points and passes.
        cfg.corner_check = Some(CornerOffsets {
            first: [1, -1],
            second: [-1, 1],
        });
        assert!(validate(&frame, &mask, &candidate, &cfg, &dia));

        // Disabling the probe also passes.
        cfg.corner_check = None;
        assert!(validate(&frame, &mask, &candidate, &cfg, &dia));
    }

    #[test]
    fn center_on_edge_is_rejected() {
        let frame = red_frame(32, 32);
        let mask = EdgeMap::from_points(32, 32, &[(16, 16)]);
        let candidate = Candidate {
            center_x: 16,
            center_y: 16,
            votes: 100,
            radius: 8,
        };
        let cfg = SelectConfig {
            vote_floor: 1,
            diameter_tol_px: 200,
            corner_check: None,
        };
        assert!(!validate(&frame, &mask, &candidate, &cfg, &DiameterConfig::default()));
    }
}
