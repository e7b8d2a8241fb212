//! Command handlers for the CLI application.
//!
//! - `query`: read-only commands (list, info)
//! - `watch`: key gesture monitor
//! - `display`: cell output (display, clear)

pub mod display;
pub mod query;
pub mod watch;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use metec_braille::{BoxedTransport, DeviceSession};
use metec_driver::DriverConfig;
use metec_transport::{HidDiscovery, PrinterConfig, PrinterTransport, ReplayTransport};
use tracing::info;

/// Result type for command handlers
pub type CommandResult = anyhow::Result<()>;

/// Where the session's frames come from
pub struct Source<'a> {
    /// Replay script instead of a device
    pub replay: Option<&'a Path>,
    /// Wrap the transport with the printer
    pub printer: Option<PrinterConfig>,
}

impl Source<'_> {
    /// Open the transport: the replay script if one was given, else the first display
    pub fn open_transport(&self) -> anyhow::Result<BoxedTransport> {
        match self.replay {
            Some(path) => {
                let replay = ReplayTransport::from_file(path)
                    .with_context(|| format!("loading replay script {}", path.display()))?;
                info!("Replaying {} frames from {}", replay.remaining(), path.display());
                let transport: BoxedTransport = Box::new(replay);
                Ok(match &self.printer {
                    Some(config) => PrinterTransport::wrap(transport, config.clone()),
                    None => transport,
                })
            }
            None => {
                let discovery = match &self.printer {
                    Some(config) => HidDiscovery::with_printer_config(config.clone()),
                    None => HidDiscovery::new(),
                };
                Ok(discovery.open_first()?)
            }
        }
    }

    /// Open a session with the configured options
    pub fn open_session(&self, config: &DriverConfig) -> anyhow::Result<DeviceSession> {
        let transport = self.open_transport()?;
        let session = DeviceSession::open(transport, config.session_options())?;
        Ok(session)
    }
}

/// Create printer config from CLI flags
pub fn create_printer_config(monitor: bool, hex: bool, all: bool) -> Option<PrinterConfig> {
    monitor.then(|| PrinterConfig::default().with_hex(hex).with_all(all))
}

/// Set up a Ctrl-C handler that sets the given flag to false when triggered.
pub fn setup_interrupt_handler() -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .ok();

    running
}
