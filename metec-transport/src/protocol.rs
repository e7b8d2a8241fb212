//! Wire constants for Metec BD displays

/// Size of the status frame read on every poll
pub const STATUS_FRAME_SIZE: usize = 8;

/// Largest cell buffer any supported model accepts (BD-40 + 2 status cells)
pub const MAX_CELL_BUFFER: usize = 42;

/// HID report IDs
pub mod report_id {
    /// Feature report carrying the 8-byte status frame
    pub const STATUS: u8 = 0x00;
    /// Output report carrying the cell buffer
    pub const CELLS: u8 = 0x00;
}
