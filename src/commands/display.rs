//! Cell output command handlers.

use std::thread;
use std::time::Duration;

use metec_driver::{format_cell, parse_cells, DriverConfig};

use super::{CommandResult, Source};

/// Show a row of cells
pub fn display(
    source: &Source<'_>,
    config: &DriverConfig,
    cells: &[String],
    hold: Duration,
) -> CommandResult {
    let row = parse_cells(cells)?;
    let mut session = source.open_session(config)?;

    if row.len() > session.num_cells() {
        eprintln!(
            "Warning: {} cells given, display shows {}; extra cells dropped",
            row.len(),
            session.num_cells()
        );
    }
    session.display(&row)?;

    let shown: Vec<String> = row
        .iter()
        .take(session.num_cells())
        .map(|&c| format_cell(c))
        .collect();
    println!("Shown: {}", shown.join(" "));

    if !hold.is_zero() {
        thread::sleep(hold);
    }
    session.terminate()?;
    Ok(())
}

/// Blank every cell
pub fn clear(source: &Source<'_>, config: &DriverConfig) -> CommandResult {
    let mut session = source.open_session(config)?;
    session.display(&[])?;
    println!("Cleared {} cells", session.num_cells());
    session.terminate()?;
    Ok(())
}
