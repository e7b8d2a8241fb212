//! Key decoding and cell encoding for Metec BD braille displays
//!
//! This crate sits on top of any `metec_transport::Transport` and turns the
//! display's 8-byte status frames into debounced key gestures, and rows of dot
//! patterns into the display's cell buffer.
//!
//! ```text
//! transport -> Frame -> KeyDecoder -> Gesture -> Dispatch
//! cells -> encode_cells -> transport
//! ```

pub mod calibration;
pub mod cell;
pub mod decoder;
pub mod dispatch;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod gesture;
pub mod keys;
pub mod poller;
pub mod session;

pub use calibration::{Calibration, CalibrationMode};
pub use cell::{encode_cells, reverse_dots};
pub use decoder::KeyDecoder;
pub use dispatch::Dispatch;
pub use error::BrailleError;
pub use frame::Frame;
pub use geometry::{CellGeometry, DeviceVariant, StatusCellPolicy};
pub use gesture::{canonical_id, Gesture};
pub use poller::{poll_once, Poller, SharedTransport, DEFAULT_POLL_INTERVAL};
pub use session::{DeviceSession, SessionOptions};

// Re-export transport types consumers need to open a session
pub use metec_transport::{BoxedTransport, DeviceKind, Transport, TransportError};
