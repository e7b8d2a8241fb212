//! Key decoder: status frames in, debounced gestures out
//!
//! The display reports at most one routing key at a time and only the
//! instantaneous function/cursor key mask. To turn a near-simultaneous chord
//! such as "fk2 + routing 38" into one gesture, the decoder ORs everything it
//! sees while any key is down and emits a single combined code on the first
//! tick where both the routing byte and the corrected key mask are back to
//! idle. This is a merge policy over poll ticks, not a hardware requirement.

use tracing::{debug, info};

use crate::calibration::{Calibration, CalibrationMode};
use crate::frame::Frame;
use crate::geometry::{CellGeometry, StatusCellPolicy};
use crate::gesture::Gesture;
use crate::keys::{combine, NO_KEY, STATUS_KEY_BASE};

/// Per-session decoder state
#[derive(Debug, Clone)]
pub struct KeyDecoder {
    /// Set on the first frame unless preset
    geometry: Option<CellGeometry>,
    status_policy: StatusCellPolicy,
    calibration: Calibration,
    /// Function/cursor keys seen since the last emission
    accumulated: u16,
    /// Last routing key seen since the last emission, `NO_KEY` if none
    last_routing: u8,
}

impl Default for KeyDecoder {
    fn default() -> Self {
        Self::new(StatusCellPolicy::Auto, CalibrationMode::LearnOnFirstRead)
    }
}

impl KeyDecoder {
    /// Decoder that discovers its geometry from the first frame
    pub fn new(status_policy: StatusCellPolicy, calibration: CalibrationMode) -> Self {
        Self {
            geometry: None,
            status_policy,
            calibration: Calibration::new(calibration),
            accumulated: 0,
            last_routing: NO_KEY,
        }
    }

    /// Decoder with geometry already known (read at session open)
    pub fn with_geometry(geometry: CellGeometry, calibration: CalibrationMode) -> Self {
        Self::with_calibration(geometry, Calibration::new(calibration))
    }

    /// Decoder that carries on with calibration from an earlier decoder
    pub fn with_calibration(geometry: CellGeometry, calibration: Calibration) -> Self {
        Self {
            geometry: Some(geometry),
            status_policy: StatusCellPolicy::Auto,
            calibration,
            accumulated: 0,
            last_routing: NO_KEY,
        }
    }

    /// Run the cell-count discovery rule on a frame and keep the result
    pub fn discover(&mut self, frame: &Frame) -> CellGeometry {
        let geometry = CellGeometry::with_policy(frame.cell_count(), self.status_policy);
        self.geometry = Some(geometry);
        geometry
    }

    /// Geometry in use, `None` before the first frame
    pub fn geometry(&self) -> Option<CellGeometry> {
        self.geometry
    }

    /// Calibration state
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Whether a key combination is being held
    pub fn is_pressed(&self) -> bool {
        self.accumulated != 0 || self.last_routing != NO_KEY
    }

    /// Feed one poll's frame; returns a gesture on full release
    pub fn on_frame(&mut self, frame: &Frame) -> Option<Gesture> {
        let geometry = match self.geometry {
            Some(g) => g,
            None => self.discover(frame),
        };

        let routing = frame.routing_key();
        if routing != NO_KEY {
            self.last_routing = remap_routing(routing, geometry.status_cells);
        }

        let raw = frame.raw_keys();
        if self.calibration.learn(raw) {
            info!(
                "Metec length {} key mask 0x{:04x}",
                frame.cell_count(),
                raw
            );
        }
        let keys = self.calibration.correct(raw);
        self.accumulated |= keys;

        if self.is_pressed() && keys == 0 && routing == NO_KEY {
            let code = combine(self.accumulated, self.last_routing);
            self.accumulated = 0;
            self.last_routing = NO_KEY;
            debug!("Metec key 0x{:x}", code);
            return Some(Gesture::from_code(code));
        }

        None
    }
}

/// Map a raw routing index: status keys to `STATUS_KEY_BASE + index`,
/// routing keys shifted down past the status cells
fn remap_routing(raw: u8, status_cells: u8) -> u8 {
    if raw < status_cells {
        STATUS_KEY_BASE + raw
    } else {
        raw - status_cells
    }
}
