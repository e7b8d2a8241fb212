//! Braille core error types

use metec_transport::{DeviceKind, TransportError};
use thiserror::Error;

/// Errors from session and poller operations
#[derive(Error, Debug)]
pub enum BrailleError {
    /// Transport layer error (fatal to the session)
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Status frame shorter than the fixed frame size
    #[error("Status frame too short: {len} bytes")]
    ShortFrame { len: usize },

    /// Device kind the core does not drive
    #[error("Unsupported device: {0}")]
    UnsupportedDevice(DeviceKind),

    /// Key polling already started for this session
    #[error("Key polling already running")]
    AlreadyRunning,

    /// Poller thread panicked
    #[error("Key poller thread panicked")]
    PollerPanicked,
}
