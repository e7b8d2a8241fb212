//! Query (read-only) command handlers.

use crossterm::style::Stylize;
use metec_driver::DriverConfig;
use metec_transport::{device_registry, HidDiscovery};

use super::{CommandResult, Source};

/// List connected displays
pub fn list() -> CommandResult {
    let devices = HidDiscovery::new().list_devices()?;
    if devices.is_empty() {
        println!("No supported braille display found");
        return Ok(());
    }

    println!("Braille displays:");
    for device in &devices {
        let info = &device.info;
        let model = device_registry::model_name(info.vid, info.pid).unwrap_or("unknown model");
        println!(
            "  {} VID={:04x} PID={:04x} kind={} ({}) path={}",
            info.display_name().bold(),
            info.vid,
            info.pid,
            info.kind,
            model,
            info.device_path
        );
        if let Some(serial) = &info.serial {
            println!("      serial {serial}");
        }
    }
    Ok(())
}

/// Show device model and cell layout
pub fn info(source: &Source<'_>, config: &DriverConfig) -> CommandResult {
    let mut session = source.open_session(config)?;
    let info = session.info().clone();

    println!(
        "Device:   {} VID={:04X} PID={:04X} type={:?}",
        info.display_name(),
        info.vid,
        info.pid,
        info.transport_type
    );
    println!("Model:    {}", session.variant().name());
    println!("Cells:    {}", session.geometry());
    println!("Text:     {} cells", session.num_cells());

    let current = session.read_cell_config()?;
    if current != session.geometry() {
        println!("{}", format!("Now reports: {current}").yellow());
    }

    session.terminate()?;
    Ok(())
}
