//! Circular center voting (generalized Hough) over the edge mask.
//!
//! Every edge pixel that also passes the on-target color predicate casts one
//! vote per (radius, angle) combination for the center it would imply. A true
//! disk center collects votes from edge pixels all around its perimeter.
//! Accumulation is commutative, so the grid contents are independent of the
//! order pixels are processed in.

use crate::config::{DiameterConfig, VoteConfig};
use crate::diameter::on_target_at;
use crate::edges::EdgeMap;
use crate::frame::FrameBuffer;

/// Per-cycle integer accumulator over candidate center positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteGrid {
    width: u32,
    height: u32,
    votes: Vec<u32>,
}

impl VoteGrid {
    /// Zeroed grid with the frame's dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            votes: vec![0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Vote count at (x, y); zero outside the grid.
    pub fn at(&self, x: i64, y: i64) -> u32 {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return 0;
        }
        self.votes[y as usize * self.width as usize + x as usize]
    }

    /// Cast all votes implied by one voting pixel at (x, y).
    ///
    /// For each candidate radius in the band and each stepped angle, the
    /// implied center is (x - r*cos t, y + r*sin t), truncated to integer
    /// coordinates. The `+ r*sin t` convention is part of the geometry and
    /// must not be flipped. Out-of-grid centers are skipped.
    pub fn cast_from(&mut self, x: u32, y: u32, radius: u32, config: &VoteConfig) {
        let halfwidth = radius_halfwidth(radius, config);
        let r_lo = radius.saturating_sub(halfwidth);
        let r_hi = radius + halfwidth;
        let step = config.angle_step_deg.max(1);
        for r in r_lo..r_hi {
            let mut deg = 0u32;
            while deg < 360 {
                let theta = (deg as f64).to_radians();
                let cx = (x as f64 - r as f64 * theta.cos()) as i64;
                let cy = (y as f64 + r as f64 * theta.sin()) as i64;
                if cx >= 0 && cy >= 0 && cx < self.width as i64 && cy < self.height as i64 {
                    self.votes[cy as usize * self.width as usize + cx as usize] += 1;
                }
                deg += step;
            }
        }
    }

    /// Add votes to one cell directly; only for shaping test fixtures.
    #[cfg(test)]
    pub(crate) fn bump(&mut self, x: u32, y: u32, n: u32) {
        self.votes[y as usize * self.width as usize + x as usize] += n;
    }

    /// Sum of all votes in the grid.
    pub fn total(&self) -> u64 {
        self.votes.iter().map(|&v| v as u64).sum()
    }
}

/// Band half-width for a given radius estimate; widens with the radius.
pub fn radius_halfwidth(radius: u32, config: &VoteConfig) -> u32 {
    let grown = (radius as f32 * config.radius_halfwidth_frac).round() as u32;
    grown.max(config.radius_halfwidth_min)
}

/// Accumulate votes from every pixel that is both an edge and on-target.
pub fn cast_votes(
    frame: &FrameBuffer,
    edges: &EdgeMap,
    radius: u32,
    vote_config: &VoteConfig,
    diameter_config: &DiameterConfig,
) -> VoteGrid {
    let mut grid = VoteGrid::new(frame.width(), frame.height());
    if radius == 0 {
        return grid;
    }
    for y in 0..frame.height() {
        for x in 0..frame.width() {
            if edges.is_edge(x as i64, y as i64)
                && on_target_at(frame, x as i64, y as i64, diameter_config)
            {
                grid.cast_from(x, y, radius, vote_config);
            }
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EdgeConfig;
    use crate::test_utils::{dark_frame, draw_disk_frame, voting_pixels};
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    #[test]
    fn zero_radius_casts_nothing() {
        let frame = draw_disk_frame(64, 48, 32.0, 24.0, 10.0);
        let edges = EdgeMap::compute(&frame, &EdgeConfig::default());
        let grid = cast_votes(
            &frame,
            &edges,
            0,
            &VoteConfig::default(),
            &DiameterConfig::default(),
        );
        assert_eq!(grid.total(), 0);
    }

    #[test]
    fn dark_frame_grid_stays_zero() {
        let frame = dark_frame(64, 48);
        let edges = EdgeMap::compute(&frame, &EdgeConfig::default());
        let grid = cast_votes(
            &frame,
            &edges,
            10,
            &VoteConfig::default(),
            &DiameterConfig::default(),
        );
        assert_eq!(grid.total(), 0);
    }

    #[test]
    fn disk_peak_lands_near_center() {
        let frame = draw_disk_frame(160, 120, 80.0, 60.0, 25.0);
        let edges = EdgeMap::compute(&frame, &EdgeConfig::default());
        let grid = cast_votes(
            &frame,
            &edges,
            25,
            &VoteConfig::default(),
            &DiameterConfig::default(),
        );
        let mut best = (0i64, 0i64, 0u32);
        for y in 0..120 {
            for x in 0..160 {
                let v = grid.at(x, y);
                if v > best.2 {
                    best = (x, y, v);
                }
            }
        }
        assert!(best.2 > 0);
        assert!((best.0 - 80).abs() <= 2 && (best.1 - 60).abs() <= 2,
            "peak at ({}, {})", best.0, best.1);
    }

    #[test]
    fn accumulation_is_order_independent() {
        let frame = draw_disk_frame(96, 96, 48.0, 48.0, 18.0);
        let edges = EdgeMap::compute(&frame, &EdgeConfig::default());
        let vote_cfg = VoteConfig::default();
        let dia_cfg = DiameterConfig::default();

        let mut pixels = voting_pixels(&frame, &edges, &dia_cfg);
        assert!(!pixels.is_empty());

        let mut forward = VoteGrid::new(96, 96);
        for &(x, y) in &pixels {
            forward.cast_from(x, y, 18, &vote_cfg);
        }

        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        pixels.shuffle(&mut rng);
        let mut shuffled = VoteGrid::new(96, 96);
        for &(x, y) in &pixels {
            shuffled.cast_from(x, y, 18, &vote_cfg);
        }

        assert_eq!(forward, shuffled);
        // and the batch entry point matches the per-pixel path
        let batch = cast_votes(&frame, &edges, 18, &vote_cfg, &dia_cfg);
        assert_eq!(batch, forward);
    }

    #[test]
    fn halfwidth_widens_with_radius() {
        let cfg = VoteConfig::default();
        assert_eq!(radius_halfwidth(10, &cfg), 3);
        assert_eq!(radius_halfwidth(43, &cfg), 4);
        assert_eq!(radius_halfwidth(80, &cfg), 8);
    }
}
