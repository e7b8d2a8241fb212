//! Metec BD braille display driver
//!
//! Shared pieces of the `metec` command-line tool. The driver itself lives in
//! `metec-braille` (decoding, sessions) and `metec-transport` (HID access).

pub mod config;
pub mod notation;

pub use config::DriverConfig;
pub use notation::{format_cell, parse_cell, parse_cells, NotationError};
