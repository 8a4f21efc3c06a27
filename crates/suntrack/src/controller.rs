//! Two-axis feedback controller.
//!
//! The only state that survives across cycles lives here: current elevation
//! and azimuth plus the tracking/reset flag. A validated candidate nudges the
//! axes proportionally toward the disk; a lost target snaps both axes back to
//! the configured home position instead of letting the drifted pose wander.

use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;
use crate::config::ControlConfig;

/// Actuator axis identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Elevation,
    Azimuth,
}

/// Controller mode for the current cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerState {
    /// Target seen; axes follow the pixel error.
    Tracking,
    /// Target lost; axes held at the home position.
    Reset,
}

/// Holds actuator state across cycles and converts detections into bounded
/// position deltas. Single writer; one instance per tracker.
#[derive(Debug, Clone)]
pub struct TrackingController {
    config: ControlConfig,
    state: ControllerState,
    elevation: f64,
    azimuth: f64,
}

impl TrackingController {
    /// Start in tracking mode at the home position.
    pub fn new(config: ControlConfig) -> Self {
        let elevation = config.home_elevation;
        let azimuth = config.home_azimuth;
        Self {
            config,
            state: ControllerState::Tracking,
            elevation,
            azimuth,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn elevation(&self) -> f64 {
        self.elevation
    }

    pub fn azimuth(&self) -> f64 {
        self.azimuth
    }

    /// A candidate only counts as a detection when its vote density clears
    /// the configured floor; sparse peaks are treated as a lost target.
    fn is_confident(&self, candidate: &Candidate) -> bool {
        if candidate.radius == 0 {
            return false;
        }
        candidate.votes as f32 / candidate.radius as f32 >= self.config.min_vote_ratio
    }

    /// Advance one cycle. Returns the (elevation, azimuth) pair to push to
    /// the actuator; the pair is always within [min_tilt, max_tilt].
    pub fn update(
        &mut self,
        candidate: Option<&Candidate>,
        frame_width: u32,
        frame_height: u32,
    ) -> (f64, f64) {
        match candidate {
            Some(c) if self.is_confident(c) => {
                let error_x =
                    self.config.gain * (c.center_x as f64 - frame_width as f64 / 2.0);
                let error_y =
                    self.config.gain * (c.center_y as f64 - frame_height as f64 / 2.0);
                self.elevation = (self.elevation + error_y)
                    .clamp(self.config.min_tilt, self.config.max_tilt);
                self.azimuth = (self.azimuth + error_x)
                    .clamp(self.config.min_tilt, self.config.max_tilt);
                self.state = ControllerState::Tracking;
            }
            _ => {
                self.elevation = self
                    .config
                    .home_elevation
                    .clamp(self.config.min_tilt, self.config.max_tilt);
                self.azimuth = self
                    .config
                    .home_azimuth
                    .clamp(self.config.min_tilt, self.config.max_tilt);
                self.state = ControllerState::Reset;
            }
        }
        (self.elevation, self.azimuth)
    }
}
