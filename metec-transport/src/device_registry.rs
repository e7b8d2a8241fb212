//! Device registry - device kind detection by VID/PID
//!
//! The vendor driver reports a device type next to the handle; over plain HID
//! we derive the same tag from the product ID.

use crate::types::DeviceKind;

/// Metec vendor IDs seen on BD-series hardware
pub const VENDOR_IDS: &[u16] = &[0x0452, 0x1FE4];

/// Known products: (vid, pid, kind, model name)
pub const KNOWN_DEVICES: &[(u16, u16, DeviceKind, &str)] = &[
    (0x0452, 0x0100, DeviceKind::SingleLine, "Metec BD-40"),
    (0x1FE4, 0x0003, DeviceKind::SingleLine, "Metec BD-20/BD-40"),
    (0x1FE4, 0x0010, DeviceKind::Other(2), "Metec Hyperflat"),
];

/// Look up the device kind for a VID/PID pair
#[inline]
pub fn device_kind(vid: u16, pid: u16) -> Option<DeviceKind> {
    KNOWN_DEVICES
        .iter()
        .find(|(v, p, _, _)| *v == vid && *p == pid)
        .map(|(_, _, kind, _)| *kind)
}

/// Model name for a VID/PID pair
pub fn model_name(vid: u16, pid: u16) -> Option<&'static str> {
    KNOWN_DEVICES
        .iter()
        .find(|(v, p, _, _)| *v == vid && *p == pid)
        .map(|(_, _, _, name)| *name)
}

/// Check if a VID/PID pair belongs to a known device
#[inline]
pub fn is_known(vid: u16, pid: u16) -> bool {
    device_kind(vid, pid).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_pids() {
        assert_eq!(device_kind(0x0452, 0x0100), Some(DeviceKind::SingleLine));
        assert_eq!(device_kind(0x1FE4, 0x0003), Some(DeviceKind::SingleLine));
    }

    #[test]
    fn test_other_kind_is_known_but_not_single_line() {
        assert!(is_known(0x1FE4, 0x0010));
        assert_ne!(device_kind(0x1FE4, 0x0010), Some(DeviceKind::SingleLine));
    }

    #[test]
    fn test_unknown_pid() {
        assert!(!is_known(0x0452, 0x0000));
        assert_eq!(model_name(0x1234, 0x5678), None);
    }
}
