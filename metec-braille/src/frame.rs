//! The 8-byte status frame read on every poll

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::error::BrailleError;
use crate::keys::NO_KEY;

/// Status snapshot as laid out on the wire
///
/// | byte | content |
/// |------|---------|
/// | 0    | routing key index, `0xFF` = none |
/// | 1    | reported cell count (20, 22, 40, 42) |
/// | 2    | function keys |
/// | 3    | cursor keys |
/// | 4-7  | garbage |
///
/// Equality ignores the garbage bytes.
#[derive(Debug, Clone, Copy, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct Frame {
    routing_key: u8,
    cell_count: u8,
    keys: [u8; 2],
    _garbage: [u8; 4],
}

impl Frame {
    /// Wire size of a frame
    pub const SIZE: usize = 8;

    /// Build a frame from its meaningful fields
    pub fn new(routing_key: u8, cell_count: u8, keys: u16) -> Self {
        Self {
            routing_key,
            cell_count,
            keys: keys.to_le_bytes(),
            _garbage: [0; 4],
        }
    }

    /// Parse the first 8 bytes of a status read; trailing bytes are ignored
    pub fn parse(bytes: &[u8]) -> Result<Self, BrailleError> {
        Self::read_from_prefix(bytes)
            .map(|(frame, _)| frame)
            .map_err(|_| BrailleError::ShortFrame { len: bytes.len() })
    }

    /// Raw routing byte (`NO_KEY` when nothing is pressed)
    pub fn routing_key(&self) -> u8 {
        self.routing_key
    }

    /// Whether a routing key is reported in this frame
    pub fn has_routing_key(&self) -> bool {
        self.routing_key != NO_KEY
    }

    /// Reported physical cell count
    pub fn cell_count(&self) -> u8 {
        self.cell_count
    }

    /// Function keys (low byte) and cursor keys (high byte), uncorrected
    pub fn raw_keys(&self) -> u16 {
        u16::from_le_bytes(self.keys)
    }
}

impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        self.routing_key == other.routing_key
            && self.cell_count == other.cell_count
            && self.keys == other.keys
    }
}

impl Eq for Frame {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ignores_garbage() {
        let frame = Frame::parse(&[0x05, 0x2A, 0x10, 0x04, 0xDE, 0xAD, 0xBE, 0xEF]).unwrap();
        assert_eq!(frame.routing_key(), 0x05);
        assert_eq!(frame.cell_count(), 42);
        assert_eq!(frame.raw_keys(), 0x0410);
        assert_eq!(frame, Frame::new(0x05, 42, 0x0410));
    }

    #[test]
    fn test_garbage_does_not_affect_equality() {
        let a = Frame::parse(&[0xFF, 40, 0xAB, 0, 1, 2, 3, 4]).unwrap();
        let b = Frame::parse(&[0xFF, 40, 0xAB, 0, 9, 9, 9, 9]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, Frame::new(0xFF, 40, 0x00AC));
    }

    #[test]
    fn test_parse_longer_buffer() {
        let frame = Frame::parse(&[0xFF, 20, 0, 0, 0, 0, 0, 0, 0x99]).unwrap();
        assert!(!frame.has_routing_key());
    }

    #[test]
    fn test_parse_short_buffer() {
        let err = Frame::parse(&[0xFF, 20, 0]).unwrap_err();
        assert!(matches!(err, BrailleError::ShortFrame { len: 3 }));
    }

    #[test]
    fn test_wire_layout() {
        let frame = Frame::new(0x03, 40, 0xAB01);
        assert_eq!(frame.as_bytes(), &[0x03, 40, 0x01, 0xAB, 0, 0, 0, 0]);
    }
}
