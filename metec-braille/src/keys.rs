//! Key codes of the combined 24-bit key space
//!
//! Bits 0-7 hold the routing key (or `NO_KEY`), bits 8-15 the function keys
//! from frame byte 2 and bits 16-23 the cursor keys from frame byte 3.

/// Routing byte meaning "no routing key pressed"
pub const NO_KEY: u8 = 0xFF;

/// Status keys are remapped to `STATUS_KEY_BASE + index`
pub const STATUS_KEY_BASE: u8 = 0xA0;
/// Status key 0
pub const SK0: u8 = STATUS_KEY_BASE;
/// Status key 1
pub const SK1: u8 = STATUS_KEY_BASE + 1;

/// Function keys, frame byte 2 shifted 8 bits left
pub mod function {
    /// Right down
    pub const FK6: u32 = 0x00_0100;
    /// Right center
    pub const FK5: u32 = 0x00_0200;
    /// Left down
    pub const FK3: u32 = 0x00_0400;
    /// Right up
    pub const FK4: u32 = 0x00_0800;
    /// Left center
    pub const FK2: u32 = 0x00_1000;
    /// Left up
    pub const FK1: u32 = 0x00_4000;
}

/// Cursor keys, frame byte 3 shifted 16 bits left
pub mod cursor {
    /// Left
    pub const CKL: u32 = 0x04_0000;
    /// Up
    pub const CKU: u32 = 0x08_0000;
    /// Right
    pub const CKR: u32 = 0x10_0000;
    /// Down
    pub const CKD: u32 = 0x40_0000;
}

/// Named key flags in naming order
pub const NAMED_KEYS: &[(u32, &str)] = &[
    (cursor::CKD, "ckd"),
    (cursor::CKL, "ckl"),
    (cursor::CKR, "ckr"),
    (cursor::CKU, "cku"),
    (function::FK1, "fk1"),
    (function::FK2, "fk2"),
    (function::FK3, "fk3"),
    (function::FK4, "fk4"),
    (function::FK5, "fk5"),
    (function::FK6, "fk6"),
];

/// Combine accumulated function/cursor bits with a routing byte
#[inline]
pub fn combine(keys: u16, routing: u8) -> u32 {
    (u32::from(keys) << 8) | u32::from(routing)
}
