//! Pipeline and controller configuration.
//!
//! Every tunable the original per-variant firmware hardcoded lives here as an
//! explicit field with the domain value as its default, so behavioral variants
//! are configuration choices rather than code forks.

use serde::{Deserialize, Serialize};

use crate::frame::Channel;

/// Configuration for the Sobel edge stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeConfig {
    /// Color channel the gradient kernels run over.
    pub channel: Channel,
    /// Edge threshold on |gx| + |gy| (domain value 60–70).
    pub threshold: f64,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            channel: Channel::Red,
            threshold: 60.0,
        }
    }
}

/// Configuration for the run-length diameter estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiameterConfig {
    /// A pixel is on-target when green/red is below this ratio.
    /// Red of zero is always off-target.
    pub color_ratio_max: f32,
    /// Radius = round(diameter * radius_scale).
    pub radius_scale: f32,
}

impl Default for DiameterConfig {
    fn default() -> Self {
        Self {
            color_ratio_max: 0.4,
            radius_scale: 0.5,
        }
    }
}

/// Configuration for circular center voting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteConfig {
    /// Angular step between cast directions (degrees).
    pub angle_step_deg: u32,
    /// Lower bound on the radius band half-width (pixels).
    pub radius_halfwidth_min: u32,
    /// Half-width grows as round(radius * frac), so the band widens for
    /// larger targets.
    pub radius_halfwidth_frac: f32,
}

impl Default for VoteConfig {
    fn default() -> Self {
        Self {
            angle_step_deg: 10,
            radius_halfwidth_min: 3,
            radius_halfwidth_frac: 0.1,
        }
    }
}

/// Diagonal offset sign pair for the square-corner rejection probe.
///
/// Source variants disagree on which diagonal is probed, so the signs are
/// explicit configuration instead of a guessed convention. Each entry is a
/// unit sign pair `[sx, sy]`; the probe samples center + sign * (radius - 3).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CornerOffsets {
    pub first: [i32; 2],
    pub second: [i32; 2],
}

impl Default for CornerOffsets {
    fn default() -> Self {
        Self {
            first: [-1, -1],
            second: [1, 1],
        }
    }
}

/// Configuration for peak extraction and candidate validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectConfig {
    /// Minimum vote count for a peak to be considered at all.
    pub vote_floor: u32,
    /// Maximum |measured - 2*radius| for the secondary diameter check (pixels).
    pub diameter_tol_px: u32,
    /// Square-corner glare rejection; `None` disables the probe.
    pub corner_check: Option<CornerOffsets>,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            vote_floor: 15,
            diameter_tol_px: 8,
            corner_check: Some(CornerOffsets::default()),
        }
    }
}

/// Configuration for the two-axis feedback controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlConfig {
    /// Proportional gain applied to the pixel error.
    pub gain: f64,
    /// Lower actuator limit (degrees), shared by both axes.
    pub min_tilt: f64,
    /// Upper actuator limit (degrees), shared by both axes.
    pub max_tilt: f64,
    /// Elevation the controller snaps to when the target is lost.
    pub home_elevation: f64,
    /// Azimuth the controller snaps to when the target is lost.
    pub home_azimuth: f64,
    /// Minimum votes/radius for a candidate to count as a real detection.
    pub min_vote_ratio: f32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            gain: 0.1,
            min_tilt: 32.0,
            max_tilt: 65.0,
            home_elevation: 47.0,
            home_azimuth: 65.0,
            min_vote_ratio: 1.0,
        }
    }
}

/// Full tracker configuration: frame geometry plus one block per stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub frame: FrameGeometry,
    pub edge: EdgeConfig,
    pub diameter: DiameterConfig,
    pub vote: VoteConfig,
    pub select: SelectConfig,
    pub control: ControlConfig,
}

/// Fixed capture geometry. Frames whose dimensions disagree are rejected as
/// malformed for the cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FrameGeometry {
    pub width: u32,
    pub height: u32,
}

impl Default for FrameGeometry {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_json_round_trip() {
        let cfg = TrackerConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: TrackerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.frame.width, cfg.frame.width);
        assert_eq!(back.edge.threshold, cfg.edge.threshold);
        assert_eq!(back.vote.angle_step_deg, cfg.vote.angle_step_deg);
        assert_eq!(back.control.home_azimuth, cfg.control.home_azimuth);
        assert!(back.select.corner_check.is_some());
    }

    #[test]
    fn corner_check_can_be_disabled() {
        let json = r#"{"vote_floor":10,"diameter_tol_px":5,"corner_check":null}"#;
        let cfg: SelectConfig = serde_json::from_str(json).unwrap();
        assert!(cfg.corner_check.is_none());
    }
}
