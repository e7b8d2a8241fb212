//! Device discovery for Metec BD displays

use hidapi::HidApi;
use tracing::{debug, info};

use crate::device_registry;
use crate::error::TransportError;
use crate::hid::HidTransport;
use crate::printer::{PrinterConfig, PrinterTransport};
use crate::types::{DiscoveredDevice, TransportDeviceInfo, TransportType};
use crate::BoxedTransport;

/// HID device discovery
pub struct HidDiscovery {
    /// Optional printer config for monitoring mode - wraps transports automatically
    printer_config: Option<PrinterConfig>,
}

impl Default for HidDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

impl HidDiscovery {
    /// Create a new HID discovery instance
    pub fn new() -> Self {
        Self {
            printer_config: None,
        }
    }

    /// Create with printer config for monitoring mode
    /// All transports opened via open_device() will be wrapped with Printer
    pub fn with_printer_config(config: PrinterConfig) -> Self {
        Self {
            printer_config: Some(config),
        }
    }

    /// List currently connected displays
    pub fn list_devices(&self) -> Result<Vec<DiscoveredDevice>, TransportError> {
        let api = HidApi::new()?;
        let mut devices = Vec::new();

        for device_info in api.device_list() {
            let vid = device_info.vendor_id();
            let pid = device_info.product_id();

            if !device_registry::VENDOR_IDS.contains(&vid) {
                continue;
            }
            let Some(kind) = device_registry::device_kind(vid, pid) else {
                debug!("Skipping unknown Metec device {:04X}:{:04X}", vid, pid);
                continue;
            };

            let path = device_info.path().to_string_lossy().to_string();
            // One entry per physical device, even with several interfaces
            if devices
                .iter()
                .any(|d: &DiscoveredDevice| d.info.device_path == path)
            {
                continue;
            }

            let product_name = device_info
                .product_string()
                .map(|s| s.to_string())
                .or_else(|| device_registry::model_name(vid, pid).map(str::to_string));

            debug!(
                "Found device: VID={:04X} PID={:04X} kind={} path={}",
                vid, pid, kind, path
            );

            devices.push(DiscoveredDevice {
                info: TransportDeviceInfo {
                    vid,
                    pid,
                    kind,
                    transport_type: TransportType::Hid,
                    device_path: path,
                    serial: device_info.serial_number().map(|s| s.to_string()),
                    product_name,
                },
            });
        }

        Ok(devices)
    }

    /// Open a specific device
    pub fn open_device(&self, device: &DiscoveredDevice) -> Result<BoxedTransport, TransportError> {
        let api = HidApi::new()?;
        let path = std::ffi::CString::new(device.info.device_path.clone())
            .map_err(|e| TransportError::DeviceNotFound(e.to_string()))?;
        let hid = api.open_path(&path)?;

        info!(
            "Opened {} ({:04x}:{:04x}), kind={}",
            device.info.display_name(),
            device.info.vid,
            device.info.pid,
            device.info.kind
        );

        let transport: BoxedTransport = Box::new(HidTransport::new(hid, device.info.clone()));
        Ok(self.wrap(transport))
    }

    /// Open the first connected display
    pub fn open_first(&self) -> Result<BoxedTransport, TransportError> {
        let devices = self.list_devices()?;
        let first = devices.first().ok_or_else(|| {
            TransportError::DeviceNotFound("No supported braille display found".into())
        })?;
        self.open_device(first)
    }

    /// Wrap a transport with the printer if monitoring is enabled
    pub fn wrap(&self, transport: BoxedTransport) -> BoxedTransport {
        match &self.printer_config {
            Some(config) => PrinterTransport::wrap(transport, config.clone()),
            None => transport,
        }
    }
}
