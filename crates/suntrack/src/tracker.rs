//! Control loop tying capture, detection, and actuation together.
//!
//! Capture and actuation are external collaborators behind traits; the loop
//! itself is fully synchronous, one cycle at a time. A failed or malformed
//! capture aborts only the current cycle: the controller falls back to its
//! reset semantics and capture is retried on the next cycle.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::config::TrackerConfig;
use crate::controller::{Axis, ControllerState, TrackingController};
use crate::error::TrackError;
use crate::frame::FrameBuffer;
use crate::pipeline::{detect, Detection};

/// Provides one populated frame per cycle.
pub trait FrameSource {
    fn capture(&mut self) -> Result<FrameBuffer, TrackError>;
}

/// Accepts per-axis angle commands.
pub trait Actuator {
    fn drive(&mut self, axis: Axis, angle_deg: f64) -> Result<(), TrackError>;

    /// Flush any pending command; called once on clean shutdown.
    fn flush(&mut self) -> Result<(), TrackError> {
        Ok(())
    }
}

/// Summary of one completed cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleReport {
    pub state: ControllerState,
    pub elevation: f64,
    pub azimuth: f64,
    /// Detection outcome; absent when the cycle had no usable frame.
    pub detection: Option<Detection>,
}

/// Per-process tracker: configuration plus the controller state that
/// survives across cycles.
pub struct Tracker {
    config: TrackerConfig,
    controller: TrackingController,
}

impl Tracker {
    pub fn new(config: TrackerConfig) -> Self {
        let controller = TrackingController::new(config.control.clone());
        Self { config, controller }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn controller(&self) -> &TrackingController {
        &self.controller
    }

    /// Run one full cycle: capture, detect, update the controller, drive
    /// both axes. Capture problems degrade to a reset cycle; only actuator
    /// failures propagate.
    pub fn step(
        &mut self,
        source: &mut dyn FrameSource,
        actuator: &mut dyn Actuator,
    ) -> Result<CycleReport, TrackError> {
        let geometry = self.config.frame;
        let detection = match source.capture() {
            Ok(frame) => {
                if frame.width() != geometry.width || frame.height() != geometry.height {
                    tracing::warn!(
                        got_w = frame.width(),
                        got_h = frame.height(),
                        want_w = geometry.width,
                        want_h = geometry.height,
                        "frame shape mismatch; treating cycle as capture loss"
                    );
                    None
                } else {
                    Some(detect(&frame, &self.config))
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "capture failed; falling back to reset");
                None
            }
        };

        let candidate = detection.as_ref().and_then(|d| d.candidate);
        let (elevation, azimuth) =
            self.controller
                .update(candidate.as_ref(), geometry.width, geometry.height);

        actuator.drive(Axis::Elevation, elevation)?;
        actuator.drive(Axis::Azimuth, azimuth)?;

        Ok(CycleReport {
            state: self.controller.state(),
            elevation,
            azimuth,
            detection,
        })
    }

    /// Drive cycles until the cancellation flag is set, then flush the
    /// actuator. The flag is checked once per cycle. An actuator failure
    /// ends the loop; the flush still runs (best-effort) before the error
    /// propagates, so both exit paths honor the shutdown hook.
    pub fn run(
        &mut self,
        source: &mut dyn FrameSource,
        actuator: &mut dyn Actuator,
        cancel: &AtomicBool,
    ) -> Result<(), TrackError> {
        while !cancel.load(Ordering::Relaxed) {
            if let Err(e) = self.step(source, actuator) {
                tracing::warn!(error = %e, "cycle failed; flushing actuator before exit");
                let _ = actuator.flush();
                return Err(e);
            }
        }
        tracing::info!("cancellation observed; flushing actuator");
        actuator.flush()
    }
}
