//! Replay transport: serves scripted status frames instead of a device
//!
//! Script format, one status frame per line:
//!
//! ```text
//! # routing cells keys.lo keys.hi  (garbage)
//! ff 2a 00 00 00 00 00 00 x20   # idle for 20 polls
//! 05 2a 00 00 00 00 00 00       # routing key 5 down
//! ```
//!
//! Tokens are hex bytes (optional `0x` prefix); a trailing `xN` repeats the
//! frame N times. Every cell write is recorded in a shared [`WriteLog`].

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::TransportError;
use crate::protocol::STATUS_FRAME_SIZE;
use crate::types::{DeviceKind, TransportDeviceInfo, TransportType};
use crate::Transport;

/// Cell writes captured by a [`ReplayTransport`]
pub type WriteLog = Arc<Mutex<Vec<Vec<u8>>>>;

/// Transport that plays back a fixed list of status frames
pub struct ReplayTransport {
    frames: VecDeque<Vec<u8>>,
    writes: WriteLog,
    info: TransportDeviceInfo,
    closed: bool,
}

impl ReplayTransport {
    /// Replay the given frames in order
    pub fn from_frames(frames: Vec<Vec<u8>>) -> Self {
        Self {
            frames: frames.into(),
            writes: Arc::new(Mutex::new(Vec::new())),
            info: TransportDeviceInfo {
                vid: 0,
                pid: 0,
                kind: DeviceKind::SingleLine,
                transport_type: TransportType::Replay,
                device_path: "replay".to_string(),
                serial: None,
                product_name: Some("Replay".to_string()),
            },
            closed: false,
        }
    }

    /// Parse a replay script
    pub fn from_script(script: &str) -> Result<Self, TransportError> {
        Ok(Self::from_frames(parse_script(script)?))
    }

    /// Load a replay script from a file
    pub fn from_file(path: &Path) -> Result<Self, TransportError> {
        let script = std::fs::read_to_string(path)?;
        let mut transport = Self::from_script(&script)?;
        transport.info.device_path = path.display().to_string();
        Ok(transport)
    }

    /// Pretend to be a different kind of device
    pub fn with_kind(mut self, kind: DeviceKind) -> Self {
        self.info.kind = kind;
        self
    }

    /// Handle to the recorded cell writes
    pub fn write_log(&self) -> WriteLog {
        Arc::clone(&self.writes)
    }

    /// Frames not yet served
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl Transport for ReplayTransport {
    fn read_status(&mut self, len: usize) -> Result<Vec<u8>, TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        let mut frame = self.frames.pop_front().ok_or(TransportError::Disconnected)?;
        if frame.len() < len {
            return Err(TransportError::ShortRead {
                expected: len,
                actual: frame.len(),
            });
        }
        frame.truncate(len);
        Ok(frame)
    }

    fn write_cells(&mut self, cells: &[u8]) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        self.writes.lock().push(cells.to_vec());
        Ok(())
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }

    fn close(&mut self) -> Result<(), TransportError> {
        if !self.closed {
            debug!("Replay closed with {} frames left", self.frames.len());
        }
        self.closed = true;
        Ok(())
    }
}

/// Parse a replay script into frames
pub fn parse_script(script: &str) -> Result<Vec<Vec<u8>>, TransportError> {
    let mut frames = Vec::new();

    for (idx, raw) in script.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let mut repeat = 1usize;
        let mut bytes = Vec::with_capacity(STATUS_FRAME_SIZE);
        for token in line.split_whitespace() {
            if let Some(count) = token.strip_prefix('x') {
                repeat = count.parse().map_err(|_| TransportError::Replay {
                    line: line_no,
                    reason: format!("bad repeat count '{token}'"),
                })?;
                continue;
            }
            let hex = token.strip_prefix("0x").unwrap_or(token);
            let byte = u8::from_str_radix(hex, 16).map_err(|_| TransportError::Replay {
                line: line_no,
                reason: format!("bad hex byte '{token}'"),
            })?;
            bytes.push(byte);
        }

        if bytes.len() != STATUS_FRAME_SIZE {
            return Err(TransportError::Replay {
                line: line_no,
                reason: format!(
                    "expected {} bytes, found {}",
                    STATUS_FRAME_SIZE,
                    bytes.len()
                ),
            });
        }

        for _ in 0..repeat {
            frames.push(bytes.clone());
        }
    }

    Ok(frames)
}
