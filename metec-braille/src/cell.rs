//! Output encoding: abstract dot patterns to device bit order
//!
//! Callers hand in cells with bit *i* meaning dot *i+1*. The BD hardware
//! wants dot 1 in bit 7 and dot 8 in bit 0, so every cell is bit-reversed.

use crate::geometry::CellGeometry;

/// Reverse the dot order of one cell
#[inline]
pub const fn reverse_dots(cell: u8) -> u8 {
    cell.reverse_bits()
}

/// Encode a row of cells into the device buffer
///
/// The buffer is `status_cells + num_cells` long. Status cells stay blank,
/// cells beyond `num_cells` are dropped and missing cells stay blank.
pub fn encode_cells(cells: &[u8], geometry: CellGeometry) -> Vec<u8> {
    let status = usize::from(geometry.status_cells);
    let mut out = vec![0u8; geometry.buffer_len()];
    for (slot, cell) in out[status..].iter_mut().zip(cells) {
        *slot = reverse_dots(*cell);
    }
    out
}
