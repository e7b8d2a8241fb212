//! Common types for transport layer

use std::fmt;

/// Device kind reported at open time
///
/// Only single-line displays carry the status frame / cell buffer protocol
/// handled by `metec-braille`; everything else is rejected by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// One-line BD-20 / BD-40 display
    SingleLine,
    /// Any other Metec device type (raw type code)
    Other(u8),
}

impl DeviceKind {
    /// Device type code as used by the vendor driver (1 = single line)
    pub fn type_code(&self) -> u8 {
        match self {
            Self::SingleLine => 1,
            Self::Other(code) => *code,
        }
    }

    /// Map a vendor type code to a kind
    pub fn from_type_code(code: u8) -> Self {
        match code {
            1 => Self::SingleLine,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleLine => write!(f, "single-line display"),
            Self::Other(code) => write!(f, "unsupported type {code}"),
        }
    }
}

/// Transport type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportType {
    /// Direct USB HID connection
    Hid,
    /// Frames replayed from a script
    Replay,
}

/// Device identification information
#[derive(Debug, Clone)]
pub struct TransportDeviceInfo {
    /// USB Vendor ID
    pub vid: u16,
    /// USB Product ID
    pub pid: u16,
    /// Device kind tag
    pub kind: DeviceKind,
    /// Transport type
    pub transport_type: TransportType,
    /// Device path or identifier (transport-specific)
    pub device_path: String,
    /// Serial number if available
    pub serial: Option<String>,
    /// Product name if available
    pub product_name: Option<String>,
}

impl TransportDeviceInfo {
    /// Display name, falling back to the VID:PID pair
    pub fn display_name(&self) -> String {
        match &self.product_name {
            Some(name) => name.clone(),
            None => format!("{:04x}:{:04x}", self.vid, self.pid),
        }
    }
}

/// Discovered device that can be opened
#[derive(Debug, Clone)]
pub struct DiscoveredDevice {
    /// Device information
    pub info: TransportDeviceInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_code_roundtrip() {
        assert_eq!(DeviceKind::from_type_code(1), DeviceKind::SingleLine);
        assert_eq!(DeviceKind::from_type_code(2), DeviceKind::Other(2));
        assert_eq!(DeviceKind::SingleLine.type_code(), 1);
    }

    #[test]
    fn test_display_name_fallback() {
        let info = TransportDeviceInfo {
            vid: 0x0452,
            pid: 0x0100,
            kind: DeviceKind::SingleLine,
            transport_type: TransportType::Hid,
            device_path: String::new(),
            serial: None,
            product_name: None,
        };
        assert_eq!(info.display_name(), "0452:0100");
    }
}
