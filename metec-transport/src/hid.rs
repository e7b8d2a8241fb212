//! HID transport implementation for USB-connected displays

use hidapi::HidDevice;
use tracing::debug;

use crate::error::TransportError;
use crate::protocol::{report_id, MAX_CELL_BUFFER};
use crate::types::TransportDeviceInfo;
use crate::Transport;

/// HID transport for a BD display
///
/// Status frames are fetched as feature reports, cell buffers are sent as
/// output reports. Both carry a leading report ID byte on the wire.
pub struct HidTransport {
    /// Open device, `None` once closed
    device: Option<HidDevice>,
    /// Device information
    info: TransportDeviceInfo,
}

impl HidTransport {
    /// Create a new transport from an opened HID device
    pub fn new(device: HidDevice, info: TransportDeviceInfo) -> Self {
        Self {
            device: Some(device),
            info,
        }
    }

    fn device(&self) -> Result<&HidDevice, TransportError> {
        self.device.as_ref().ok_or(TransportError::Closed)
    }
}

/// Output report for a cell buffer: report ID, then the cells
fn cell_report(cells: &[u8]) -> Result<Vec<u8>, TransportError> {
    if cells.len() > MAX_CELL_BUFFER {
        return Err(TransportError::CellBufferTooLong {
            len: cells.len(),
            max: MAX_CELL_BUFFER,
        });
    }
    let mut buf = Vec::with_capacity(cells.len() + 1);
    buf.push(report_id::CELLS);
    buf.extend_from_slice(cells);
    Ok(buf)
}

impl Transport for HidTransport {
    fn read_status(&mut self, len: usize) -> Result<Vec<u8>, TransportError> {
        let device = self.device()?;
        let mut buf = vec![0u8; len + 1];
        buf[0] = report_id::STATUS;
        let read = device.get_feature_report(&mut buf)?;
        // hidapi counts the report ID byte
        let payload = read.saturating_sub(1);
        if payload < len {
            return Err(TransportError::ShortRead {
                expected: len,
                actual: payload,
            });
        }
        buf.remove(0);
        Ok(buf)
    }

    fn write_cells(&mut self, cells: &[u8]) -> Result<(), TransportError> {
        let device = self.device()?;
        let report = cell_report(cells)?;
        debug!("Writing {} cells: {:02X?}", cells.len(), cells);
        device.write(&report)?;
        Ok(())
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }

    fn close(&mut self) -> Result<(), TransportError> {
        // HidDevice closes on drop
        if self.device.take().is_some() {
            debug!("Closed HID device {}", self.info.device_path);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_report_prefixes_report_id() {
        let report = cell_report(&[0x80, 0x01]).unwrap();
        assert_eq!(report, vec![report_id::CELLS, 0x80, 0x01]);
    }

    #[test]
    fn test_cell_report_full_bd40() {
        let report = cell_report(&[0u8; MAX_CELL_BUFFER]).unwrap();
        assert_eq!(report.len(), MAX_CELL_BUFFER + 1);
    }

    #[test]
    fn test_cell_report_rejects_oversized_buffer() {
        let err = cell_report(&[0u8; MAX_CELL_BUFFER + 1]).unwrap_err();
        assert!(matches!(
            err,
            TransportError::CellBufferTooLong { len: 43, max: 42 }
        ));
    }
}
