//! Periodic key polling
//!
//! One named thread reads a status frame every interval, feeds the decoder and
//! hands gestures to the dispatcher. The transport lock is held only for the
//! read itself.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use metec_transport::{BoxedTransport, TransportError};
use parking_lot::Mutex;
use tracing::{debug, error, warn};

use crate::calibration::Calibration;
use crate::decoder::KeyDecoder;
use crate::dispatch::Dispatch;
use crate::error::BrailleError;
use crate::frame::Frame;
use crate::gesture::Gesture;

/// Transport shared between the poller (reads) and display updates (writes)
pub type SharedTransport = Arc<Mutex<BoxedTransport>>;

/// Poll period of the reference driver
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run one poll tick: read, decode, dispatch
///
/// Returns the gesture emitted on this tick, if any. Only transport and frame
/// errors are errors; an unbound gesture is reported to the dispatcher.
pub fn poll_once<D>(
    transport: &SharedTransport,
    decoder: &mut KeyDecoder,
    dispatch: &mut D,
) -> Result<Option<Gesture>, BrailleError>
where
    D: Dispatch + ?Sized,
{
    let data = transport.lock().read_status(Frame::SIZE)?;
    let frame = Frame::parse(&data)?;

    let Some(gesture) = decoder.on_frame(&frame) else {
        return Ok(None);
    };

    if !dispatch.handle(&gesture) {
        debug!("Metec key 0x{:x} not found", gesture.code());
        dispatch.notify_unbound(&gesture);
    }
    Ok(Some(gesture))
}

/// Handle to the running poll thread
pub struct Poller {
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<(Calibration, Result<(), BrailleError>)>>,
    /// Decoder calibration handed back by the thread on stop
    calibration: Option<Calibration>,
}

impl Poller {
    /// Start polling on a dedicated thread
    pub fn spawn<D>(
        transport: SharedTransport,
        decoder: KeyDecoder,
        dispatch: D,
        interval: Duration,
    ) -> Result<Self, BrailleError>
    where
        D: Dispatch + 'static,
    {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = Arc::clone(&shutdown);

        let handle = thread::Builder::new()
            .name("metec-key-poller".into())
            .spawn(move || {
                let mut decoder = decoder;
                let result =
                    run_poll_loop(&transport, &mut decoder, dispatch, interval, &shutdown_clone);
                (*decoder.calibration(), result)
            })
            .map_err(TransportError::from)?;

        Ok(Self {
            shutdown,
            handle: Some(handle),
            calibration: None,
        })
    }

    /// Whether the poll thread is still alive
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop polling and wait for the thread
    ///
    /// Returns the error that ended polling early, if any. Calling this again
    /// is a no-op.
    pub fn stop(&mut self) -> Result<(), BrailleError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        self.shutdown.store(true, Ordering::SeqCst);
        handle.thread().unpark();
        let (calibration, result) = handle.join().map_err(|_| BrailleError::PollerPanicked)?;
        self.calibration = Some(calibration);
        result
    }

    /// Calibration state the poll thread ended with
    ///
    /// `None` until `stop` has joined the thread (or if it panicked).
    pub fn calibration(&self) -> Option<Calibration> {
        self.calibration
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!("Key poller ended with error: {}", e);
        }
    }
}

/// Poll loop body, runs until shutdown or the first transport error
fn run_poll_loop<D>(
    transport: &SharedTransport,
    decoder: &mut KeyDecoder,
    mut dispatch: D,
    interval: Duration,
    shutdown: &AtomicBool,
) -> Result<(), BrailleError>
where
    D: Dispatch,
{
    debug!("Key poller started ({:?} interval)", interval);
    let mut next = Instant::now();

    while !shutdown.load(Ordering::Relaxed) {
        if let Err(e) = poll_once(transport, decoder, &mut dispatch) {
            error!("Key polling stopped: {}", e);
            return Err(e);
        }

        next += interval;
        let now = Instant::now();
        if next <= now {
            // Fell behind (slow transport); don't try to catch up
            next = now;
            continue;
        }
        // park_timeout may wake early; stop() unparks us on purpose
        while !shutdown.load(Ordering::Relaxed) {
            let now = Instant::now();
            if now >= next {
                break;
            }
            thread::park_timeout(next - now);
        }
    }

    debug!("Key poller exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use metec_transport::ReplayTransport;

    fn shared(frames: Vec<Vec<u8>>) -> SharedTransport {
        let transport: BoxedTransport = Box::new(ReplayTransport::from_frames(frames));
        Arc::new(Mutex::new(transport))
    }

    fn raw(routing: u8, keys: u16) -> Vec<u8> {
        let [lo, hi] = keys.to_le_bytes();
        vec![routing, 40, lo, hi, 0, 0, 0, 0]
    }

    #[test]
    fn test_poll_once_dispatches() {
        let transport = shared(vec![raw(0xFF, 0), raw(4, 0), raw(0xFF, 0)]);
        let mut decoder = KeyDecoder::default();
        let mut seen = Vec::new();
        let mut dispatch = |g: &Gesture| {
            seen.push(g.id().to_string());
            true
        };

        assert!(poll_once(&transport, &mut decoder, &mut dispatch).unwrap().is_none());
        assert!(poll_once(&transport, &mut decoder, &mut dispatch).unwrap().is_none());
        let g = poll_once(&transport, &mut decoder, &mut dispatch).unwrap().unwrap();
        assert_eq!(g.routing_index(), Some(4));
        assert_eq!(seen, vec!["routing".to_string()]);
    }

    struct Unbound {
        notified: Vec<String>,
    }

    impl Dispatch for Unbound {
        fn handle(&mut self, _gesture: &Gesture) -> bool {
            false
        }

        fn notify_unbound(&mut self, gesture: &Gesture) {
            self.notified.push(gesture.id().to_string());
        }
    }

    #[test]
    fn test_unbound_gesture_is_not_an_error() {
        let transport = shared(vec![raw(0xFF, 0), raw(0xFF, 0x0040), raw(0xFF, 0)]);
        let mut decoder = KeyDecoder::default();
        let mut dispatch = Unbound {
            notified: Vec::new(),
        };

        for _ in 0..3 {
            poll_once(&transport, &mut decoder, &mut dispatch).unwrap();
        }
        assert_eq!(dispatch.notified, vec!["fk1".to_string()]);
    }

    #[test]
    fn test_poll_once_until_disconnect() {
        let transport = shared(vec![vec![0xFF, 40, 0, 0, 0, 0, 0, 0, 0]]);
        let mut decoder = KeyDecoder::default();
        let mut dispatch = |_: &Gesture| true;
        // Longer reads are truncated by the transport, not an error
        assert!(poll_once(&transport, &mut decoder, &mut dispatch).is_ok());
        // Script exhausted
        assert!(matches!(
            poll_once(&transport, &mut decoder, &mut dispatch),
            Err(BrailleError::Transport(TransportError::Disconnected))
        ));
    }

    #[test]
    fn test_poller_dies_on_transport_error() {
        let transport = shared(vec![raw(0xFF, 0); 3]);
        let mut poller = Poller::spawn(
            transport,
            KeyDecoder::default(),
            |_: &Gesture| true,
            Duration::from_millis(1),
        )
        .unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while poller.is_running() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(!poller.is_running());
        assert!(matches!(
            poller.stop(),
            Err(BrailleError::Transport(TransportError::Disconnected))
        ));
        // second stop is a no-op
        assert!(poller.stop().is_ok());
        // first frame was learned before the script ran out
        assert_eq!(poller.calibration().and_then(|c| c.mask()), Some(0));
    }

    #[test]
    fn test_poller_stops_promptly() {
        let transport = shared(vec![raw(0xFF, 0); 1000]);
        let mut poller = Poller::spawn(
            transport,
            KeyDecoder::default(),
            |_: &Gesture| true,
            Duration::from_secs(10),
        )
        .unwrap();

        let started = Instant::now();
        assert!(poller.stop().is_ok());
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(!poller.is_running());
    }
}
