//! Key gesture monitor.

use std::collections::BTreeMap;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;

use crossterm::style::Stylize;
use metec_braille::{BrailleError, Dispatch, Gesture, TransportError};
use metec_driver::DriverConfig;
use tracing::info;

use super::{setup_interrupt_handler, CommandResult, Source};

/// Prints gestures, treating the ones with a label as bound
pub struct GesturePrinter {
    labels: BTreeMap<String, String>,
    announce_unbound: bool,
}

impl GesturePrinter {
    pub fn new(config: &DriverConfig) -> Self {
        Self {
            labels: config.labels.clone(),
            announce_unbound: config.announce_unbound,
        }
    }

    fn describe(&self, gesture: &Gesture) -> Option<&str> {
        self.labels.get(gesture.id()).map(String::as_str)
    }
}

impl Dispatch for GesturePrinter {
    fn handle(&mut self, gesture: &Gesture) -> bool {
        match self.describe(gesture) {
            Some(label) => {
                println!(
                    "{} 0x{:06x}  {}",
                    format!("{gesture:<20}").green(),
                    gesture.code(),
                    label
                );
                true
            }
            None => false,
        }
    }

    fn notify_unbound(&mut self, gesture: &Gesture) {
        if self.announce_unbound {
            println!(
                "{} 0x{:06x}  {}",
                format!("{gesture:<20}").yellow(),
                gesture.code(),
                "keys not found".dark_grey()
            );
        }
    }
}

/// Print gestures until Ctrl-C or until the device goes away
pub fn watch(source: &Source<'_>, config: &DriverConfig) -> CommandResult {
    let mut session = source.open_session(config)?;
    let running = setup_interrupt_handler();

    session.start(GesturePrinter::new(config))?;
    println!(
        "Watching keys on {} ({}), Ctrl-C to stop",
        session.info().display_name(),
        session.geometry()
    );

    while running.load(Ordering::SeqCst) && session.is_polling() {
        thread::sleep(Duration::from_millis(100));
    }

    match session.terminate() {
        Ok(()) => Ok(()),
        Err(BrailleError::Transport(TransportError::Disconnected)) if source.replay.is_some() => {
            info!("Replay finished");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
