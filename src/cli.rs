// CLI definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "metec")]
#[command(author, version, about = "Metec BD-20/BD-40 braille display driver")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable transport monitoring (prints all status reads and cell writes)
    #[arg(long, global = true)]
    pub monitor: bool,

    /// Show raw hex dump alongside decoded output
    #[arg(long, global = true)]
    pub hex: bool,

    /// Print every status frame while monitoring, not only changes
    #[arg(long, global = true)]
    pub all: bool,

    /// Replay status frames from a script instead of opening a device
    #[arg(long, global = true, value_name = "FILE")]
    pub replay: Option<PathBuf>,

    /// Config file path (default: ~/.config/metec/driver.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List connected braille displays
    #[command(visible_alias = "ls")]
    List,

    /// Show model and cell layout of the display
    #[command(visible_aliases = ["version", "i"])]
    Info,

    /// Print key gestures until Ctrl-C
    #[command(visible_aliases = ["keys", "w"])]
    Watch,

    /// Show a row of cells (dot numbers like 1245, hex like 0x1b, - for blank)
    #[command(visible_alias = "d")]
    Display {
        /// Cells, left to right
        #[arg(required = true, allow_hyphen_values = true)]
        cells: Vec<String>,

        /// Keep the row up for this many milliseconds before closing
        #[arg(long, default_value = "0")]
        hold_ms: u64,
    },

    /// Blank every cell
    Clear,

    /// Write the effective configuration to the config file
    SaveConfig,
}
