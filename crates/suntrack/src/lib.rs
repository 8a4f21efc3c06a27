//! suntrack — sun-disk detection and two-axis tracking.
//!
//! Locates a bright circular target in a fixed-geometry color frame and
//! converts its position into bounded elevation/azimuth commands. The
//! pipeline stages are:
//!
//! 1. **Frame** – owned W×H×3 buffer with bounds-checked channel access.
//! 2. **Edges** – Sobel gradient-magnitude thresholding + one-pass gap closing.
//! 3. **Diameter** – run-length color-ratio scan for the target size estimate.
//! 4. **Vote** – circular Hough voting over edge pixels in a radius band.
//! 5. **Candidate** – peak extraction plus plausibility gates.
//! 6. **Controller** – tracking/reset state machine with clamped tilt output.
//!
//! Capture and actuation sit behind the [`FrameSource`] and [`Actuator`]
//! traits; [`Tracker::run`] drives the synchronous per-cycle loop until
//! cancelled.

mod candidate;
mod config;
mod controller;
mod diameter;
mod edges;
mod error;
mod frame;
mod pipeline;
mod tracker;
mod vote;

#[cfg(test)]
pub(crate) mod test_utils;

pub use candidate::{select, Candidate};
pub use config::{
    ControlConfig, CornerOffsets, DiameterConfig, EdgeConfig, FrameGeometry, SelectConfig,
    TrackerConfig, VoteConfig,
};
pub use controller::{Axis, ControllerState, TrackingController};
pub use diameter::{estimate_radius, is_on_target, longest_run, ScanLine};
pub use edges::EdgeMap;
pub use error::TrackError;
pub use frame::{Channel, FrameBuffer};
pub use pipeline::{detect, Detection};
pub use tracker::{Actuator, CycleReport, FrameSource, Tracker};
pub use vote::{cast_votes, VoteGrid};
