//! PrinterTransport middleware for monitoring transport traffic
//!
//! Wraps any Transport implementation and prints every status frame and cell
//! write passing through it to stderr.
//!
//! # Example
//!
//! ```ignore
//! use metec_transport::{HidDiscovery, PrinterTransport, PrinterConfig};
//!
//! let transport = HidDiscovery::new().open_first()?;
//! let monitored = PrinterTransport::wrap(transport, PrinterConfig::default());
//! ```

use crossterm::style::Stylize;

use crate::{BoxedTransport, Transport, TransportDeviceInfo, TransportError};

/// Configuration for the PrinterTransport
#[derive(Debug, Clone, Default)]
pub struct PrinterConfig {
    /// Show raw hex dump alongside decoded output
    pub show_hex: bool,
    /// Print every status frame, not just the ones that changed
    pub show_all: bool,
}

impl PrinterConfig {
    /// Create config with hex output setting
    pub fn with_hex(mut self, show: bool) -> Self {
        self.show_hex = show;
        self
    }

    /// Create config with repeated frames setting
    pub fn with_all(mut self, show: bool) -> Self {
        self.show_all = show;
        self
    }
}

/// Transport middleware that prints all frames and writes
pub struct PrinterTransport {
    inner: BoxedTransport,
    config: PrinterConfig,
    last_status: Option<Vec<u8>>,
}

impl PrinterTransport {
    /// Wrap a transport with printing middleware
    pub fn wrap(transport: BoxedTransport, config: PrinterConfig) -> BoxedTransport {
        Box::new(Self {
            inner: transport,
            config,
            last_status: None,
        })
    }

    /// Status frames repeat every poll; only changes are interesting
    fn should_show_status(&self, data: &[u8]) -> bool {
        self.config.show_all || self.last_status.as_deref() != Some(data)
    }

    fn print_status(&mut self, data: &[u8]) {
        if !self.should_show_status(data) {
            return;
        }
        self.last_status = Some(data.to_vec());

        if data.len() >= 4 {
            let routing = data[0];
            let keys = u16::from_le_bytes([data[2], data[3]]);
            let routing = if routing == 0xFF {
                "--".to_string()
            } else {
                format!("{routing:3}")
            };
            eprintln!(
                "{} {}  routing={} cells={} keys=0x{:04x}",
                "<<<".green(),
                "STS".green().bold(),
                routing,
                data[1],
                keys
            );
        } else {
            eprintln!("{} {}  {:02x?}", "<<<".green(), "STS".red().bold(), data);
        }

        if self.config.show_hex {
            eprintln!("    {}  {:02x?}", "HEX".dim(), data);
        }
    }

    fn print_cells(&self, cells: &[u8]) {
        eprintln!("{} {}  {} cells", ">>>".cyan(), "OUT".cyan().bold(), cells.len());
        if self.config.show_hex {
            eprintln!("    {}  {:02x?}", "HEX".dim(), cells);
        }
    }
}

impl Transport for PrinterTransport {
    fn read_status(&mut self, len: usize) -> Result<Vec<u8>, TransportError> {
        let data = self.inner.read_status(len)?;
        self.print_status(&data);
        Ok(data)
    }

    fn write_cells(&mut self, cells: &[u8]) -> Result<(), TransportError> {
        self.print_cells(cells);
        self.inner.write_cells(cells)
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        self.inner.device_info()
    }

    fn close(&mut self) -> Result<(), TransportError> {
        eprintln!("{} {}", "---".yellow(), "CLOSE".yellow().bold());
        self.inner.close()
    }
}
