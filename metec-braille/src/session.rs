//! Device session: one open display, its lock and its poller
//!
//! ```text
//! [HidTransport / ReplayTransport]   <- raw status reads and cell writes
//!            |
//!   Arc<Mutex<BoxedTransport>>       <- held only around the transport call
//!       /            \
//!  [Poller]       [display()]
//!  KeyDecoder     encode_cells
//! ```

use std::sync::Arc;
use std::time::Duration;

use metec_transport::{BoxedTransport, DeviceKind, TransportDeviceInfo, TransportError};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::calibration::{Calibration, CalibrationMode};
use crate::cell::encode_cells;
use crate::decoder::KeyDecoder;
use crate::dispatch::Dispatch;
use crate::error::BrailleError;
use crate::frame::Frame;
use crate::geometry::{CellGeometry, DeviceVariant, StatusCellPolicy};
use crate::poller::{Poller, SharedTransport, DEFAULT_POLL_INTERVAL};

/// Per-session settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Key poll period
    pub poll_interval: Duration,
    /// Status cell reservation
    pub status_cells: StatusCellPolicy,
    /// Function-key noise mask handling
    pub calibration: CalibrationMode,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            status_cells: StatusCellPolicy::Auto,
            calibration: CalibrationMode::LearnOnFirstRead,
        }
    }
}

/// An open single-line display
pub struct DeviceSession {
    transport: SharedTransport,
    info: TransportDeviceInfo,
    variant: DeviceVariant,
    geometry: CellGeometry,
    options: SessionOptions,
    /// Carried across poller restarts; the mask is learned once per session
    calibration: Calibration,
    poller: Option<Poller>,
    open: bool,
}

impl DeviceSession {
    /// Take ownership of an opened transport
    ///
    /// Rejects (and closes) anything that is not a single-line display, then
    /// reads one status frame to learn the cell layout.
    pub fn open(mut transport: BoxedTransport, options: SessionOptions) -> Result<Self, BrailleError> {
        let info = transport.device_info().clone();
        if info.kind != DeviceKind::SingleLine {
            warn!("Not supported type of Metec display: {}", info.kind);
            let _ = transport.close();
            return Err(BrailleError::UnsupportedDevice(info.kind));
        }

        let frame = match read_frame(&mut transport) {
            Ok(frame) => frame,
            Err(e) => {
                let _ = transport.close();
                return Err(e);
            }
        };

        let variant = DeviceVariant::from_reported(frame.cell_count());
        let geometry = CellGeometry::with_policy(frame.cell_count(), options.status_cells);
        info!(
            "Metec {} found: {}, {}",
            info.display_name(),
            variant.name(),
            geometry
        );

        Ok(Self {
            transport: Arc::new(Mutex::new(transport)),
            info,
            variant,
            geometry,
            options,
            calibration: Calibration::new(options.calibration),
            poller: None,
            open: true,
        })
    }

    /// Start key polling, handing gestures to `dispatch`
    pub fn start<D>(&mut self, dispatch: D) -> Result<(), BrailleError>
    where
        D: Dispatch + 'static,
    {
        if !self.open {
            return Err(TransportError::Closed.into());
        }
        if self.is_polling() {
            return Err(BrailleError::AlreadyRunning);
        }
        // Reap a poller that died earlier; its error was already logged
        let _ = self.reap_poller();

        let decoder = KeyDecoder::with_calibration(self.geometry, self.calibration);
        self.poller = Some(Poller::spawn(
            Arc::clone(&self.transport),
            decoder,
            dispatch,
            self.options.poll_interval,
        )?);
        Ok(())
    }

    /// Whether the key poller is alive
    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(Poller::is_running)
    }

    /// Function-key calibration as of the last poller stop
    pub fn calibration(&self) -> Calibration {
        self.calibration
    }

    /// Device information
    pub fn info(&self) -> &TransportDeviceInfo {
        &self.info
    }

    /// Model detected at open
    pub fn variant(&self) -> DeviceVariant {
        self.variant
    }

    /// Cell layout detected at open
    pub fn geometry(&self) -> CellGeometry {
        self.geometry
    }

    /// Text cells available to the host, 0 once terminated
    pub fn num_cells(&self) -> usize {
        if self.open {
            usize::from(self.geometry.num_cells)
        } else {
            0
        }
    }

    /// Read a fresh status frame and derive the current cell configuration
    ///
    /// Uses the same discovery rule as the key decoder; the session keeps the
    /// geometry it opened with.
    pub fn read_cell_config(&self) -> Result<CellGeometry, BrailleError> {
        if !self.open {
            return Err(TransportError::Closed.into());
        }
        let frame = read_frame(&mut self.transport.lock())?;
        Ok(CellGeometry::with_policy(
            frame.cell_count(),
            self.options.status_cells,
        ))
    }

    /// Show a row of dot patterns (bit i = dot i+1)
    ///
    /// Encoding happens outside the lock. No-op once terminated.
    pub fn display(&self, cells: &[u8]) -> Result<(), BrailleError> {
        if !self.open {
            debug!("Display update after terminate ignored");
            return Ok(());
        }
        let buffer = encode_cells(cells, self.geometry);
        self.transport.lock().write_cells(&buffer)?;
        Ok(())
    }

    /// Stop polling, then close the device
    ///
    /// Returns the error that killed the poller, if any. Safe to call twice.
    pub fn terminate(&mut self) -> Result<(), BrailleError> {
        if !self.open {
            return Ok(());
        }
        self.open = false;

        let polled = self.reap_poller();
        let closed = self.transport.lock().close();
        info!("Metec {} closed", self.info.display_name());

        polled?;
        closed?;
        Ok(())
    }
}

impl DeviceSession {
    /// Stop the poller, keeping the calibration it learned
    fn reap_poller(&mut self) -> Result<(), BrailleError> {
        let Some(mut poller) = self.poller.take() else {
            return Ok(());
        };
        let result = poller.stop();
        if let Some(calibration) = poller.calibration() {
            self.calibration = calibration;
        }
        result
    }
}

impl Drop for DeviceSession {
    fn drop(&mut self) {
        if let Err(e) = self.terminate() {
            warn!("Session ended with error: {}", e);
        }
    }
}

fn read_frame(transport: &mut BoxedTransport) -> Result<Frame, BrailleError> {
    let data = transport.read_status(Frame::SIZE)?;
    Frame::parse(&data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::Gesture;
    use metec_transport::{ReplayTransport, Transport, TransportType};
    use std::collections::VecDeque;
    use std::time::Instant;
    use zerocopy::IntoBytes;

    /// Serves scripted reads, including errors; `Disconnected` when empty
    struct ScriptedReads {
        reads: Arc<Mutex<VecDeque<Result<Vec<u8>, TransportError>>>>,
        info: TransportDeviceInfo,
    }

    impl Transport for ScriptedReads {
        fn read_status(&mut self, _len: usize) -> Result<Vec<u8>, TransportError> {
            self.reads
                .lock()
                .pop_front()
                .unwrap_or(Err(TransportError::Disconnected))
        }

        fn write_cells(&mut self, _cells: &[u8]) -> Result<(), TransportError> {
            Ok(())
        }

        fn device_info(&self) -> &TransportDeviceInfo {
            &self.info
        }

        fn close(&mut self) -> Result<(), TransportError> {
            Ok(())
        }
    }

    fn wait_for_poller_exit(session: &DeviceSession) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while session.is_polling() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(2));
        }
        assert!(!session.is_polling());
    }

    fn frame(routing: u8, cells: u8, keys: u16) -> Vec<u8> {
        Frame::new(routing, cells, keys).as_bytes().to_vec()
    }

    #[test]
    fn test_open_reads_geometry() {
        let replay = ReplayTransport::from_frames(vec![frame(0xFF, 42, 0)]);
        let session = DeviceSession::open(Box::new(replay), SessionOptions::default()).unwrap();
        assert_eq!(session.num_cells(), 40);
        assert_eq!(session.geometry().status_cells, 2);
        assert_eq!(session.variant(), DeviceVariant::Bd40Status);
    }

    #[test]
    fn test_open_rejects_other_kinds() {
        let replay = ReplayTransport::from_frames(vec![frame(0xFF, 40, 0)])
            .with_kind(DeviceKind::Other(2));
        let err = DeviceSession::open(Box::new(replay), SessionOptions::default())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            BrailleError::UnsupportedDevice(DeviceKind::Other(2))
        ));
    }

    #[test]
    fn test_display_writes_encoded_buffer() {
        let replay = ReplayTransport::from_frames(vec![frame(0xFF, 22, 0)]);
        let log = replay.write_log();
        let session = DeviceSession::open(Box::new(replay), SessionOptions::default()).unwrap();

        session.display(&[0x01, 0x80]).unwrap();
        let writes = log.lock();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].len(), 22);
        assert_eq!(&writes[0][..4], &[0x00, 0x00, 0x80, 0x01]);
    }

    #[test]
    fn test_status_policy_none() {
        let replay = ReplayTransport::from_frames(vec![frame(0xFF, 42, 0)]);
        let options = SessionOptions {
            status_cells: StatusCellPolicy::None,
            ..SessionOptions::default()
        };
        let session = DeviceSession::open(Box::new(replay), options).unwrap();
        assert_eq!(session.num_cells(), 42);
    }

    #[test]
    fn test_terminate_twice_is_noop() {
        let replay = ReplayTransport::from_frames(vec![frame(0xFF, 40, 0)]);
        let log = replay.write_log();
        let mut session = DeviceSession::open(Box::new(replay), SessionOptions::default()).unwrap();

        session.terminate().unwrap();
        session.terminate().unwrap();
        assert_eq!(session.num_cells(), 0);
        // writes after terminate are dropped silently
        session.display(&[0xFF]).unwrap();
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_read_cell_config_after_terminate() {
        let replay = ReplayTransport::from_frames(vec![frame(0xFF, 40, 0); 2]);
        let mut session = DeviceSession::open(Box::new(replay), SessionOptions::default()).unwrap();
        assert_eq!(session.read_cell_config().unwrap().num_cells, 40);
        session.terminate().unwrap();
        assert!(matches!(
            session.read_cell_config(),
            Err(BrailleError::Transport(TransportError::Closed))
        ));
    }

    #[test]
    fn test_start_twice_fails() {
        let mut frames = vec![frame(0xFF, 40, 0)];
        frames.extend(std::iter::repeat(frame(0xFF, 40, 0)).take(10_000));
        let replay = ReplayTransport::from_frames(frames);
        let options = SessionOptions {
            poll_interval: Duration::from_secs(1),
            ..SessionOptions::default()
        };
        let mut session = DeviceSession::open(Box::new(replay), options).unwrap();

        session.start(|_: &Gesture| true).unwrap();
        assert!(session.is_polling());
        assert!(matches!(
            session.start(|_: &Gesture| true),
            Err(BrailleError::AlreadyRunning)
        ));
        session.terminate().unwrap();
        assert!(!session.is_polling());
    }

    #[test]
    fn test_restart_keeps_learned_mask() {
        let reads = Arc::new(Mutex::new(VecDeque::from(vec![
            Ok(frame(0xFF, 40, 0x00AB)), // open
            Ok(frame(0xFF, 40, 0x00AB)), // first poll learns the noise
            Err(TransportError::HidError("transient".into())),
        ])));
        let transport = ScriptedReads {
            reads: Arc::clone(&reads),
            info: TransportDeviceInfo {
                vid: 0,
                pid: 0,
                kind: DeviceKind::SingleLine,
                transport_type: TransportType::Replay,
                device_path: "scripted".into(),
                serial: None,
                product_name: None,
            },
        };
        let options = SessionOptions {
            poll_interval: Duration::from_millis(1),
            ..SessionOptions::default()
        };
        let mut session = DeviceSession::open(Box::new(transport), options).unwrap();

        session.start(|_: &Gesture| true).unwrap();
        wait_for_poller_exit(&session);

        // fk2 held on the first poll after the restart
        reads.lock().extend([
            Ok(frame(0xFF, 40, 0x00BB)),
            Ok(frame(0xFF, 40, 0x00AB)),
            Ok(frame(0xFF, 40, 0x00AB)),
        ]);
        let (tx, rx) = std::sync::mpsc::channel();
        session
            .start(move |g: &Gesture| {
                let _ = tx.send(g.id().to_string());
                true
            })
            .unwrap();
        assert_eq!(session.calibration().mask(), Some(0x00AB));
        wait_for_poller_exit(&session);

        assert!(matches!(
            session.terminate(),
            Err(BrailleError::Transport(TransportError::Disconnected))
        ));
        assert_eq!(session.calibration().mask(), Some(0x00AB));
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec!["fk2".to_string()]);
    }
}
