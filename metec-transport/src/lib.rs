//! Transport abstraction layer for Metec BD braille displays
//!
//! This crate provides the raw byte I/O the braille core runs on:
//!
//! - HID (direct USB connection via hidapi)
//! - Replay (scripted status frames, for tests and offline debugging)
//! - Printer middleware (monitoring of every frame and cell write)

pub mod device_registry;
pub mod error;
pub mod printer;
pub mod protocol;
pub mod replay;
pub mod types;

mod discovery;
mod hid;

pub use error::TransportError;
pub use printer::{PrinterConfig, PrinterTransport};
pub use replay::{ReplayTransport, WriteLog};
pub use types::{DeviceKind, DiscoveredDevice, TransportDeviceInfo, TransportType};

pub use discovery::HidDiscovery;
pub use hid::HidTransport;

/// The core transport trait - all backends implement this
///
/// Calls are synchronous and blocking. Callers serialize access themselves
/// (the braille session holds one lock around every call), so methods take
/// `&mut self`.
pub trait Transport: Send {
    /// Read one status snapshot of `len` bytes
    ///
    /// Implementations return exactly `len` bytes or an error.
    fn read_status(&mut self, len: usize) -> Result<Vec<u8>, TransportError>;

    /// Write the complete cell buffer (status cells first)
    fn write_cells(&mut self, cells: &[u8]) -> Result<(), TransportError>;

    /// Get device information
    fn device_info(&self) -> &TransportDeviceInfo;

    /// Close the device; further calls fail with `TransportError::Closed`
    fn close(&mut self) -> Result<(), TransportError>;
}

/// Type alias for a boxed transport
pub type BoxedTransport = Box<dyn Transport>;
