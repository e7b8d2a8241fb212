//! Braille cell notation for the command line
//!
//! A cell is written as its raised dot numbers (`1245`), as a hex byte
//! (`0x1b`), or `-` for a blank cell. Bit `i` of the parsed byte is dot `i+1`.

use thiserror::Error;

/// Cell notation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("empty cell")]
    Empty,

    #[error("invalid dot '{dot}' in cell \"{cell}\" (dots are 1-8)")]
    InvalidDot { cell: String, dot: char },

    #[error("dot {dot} repeated in cell \"{cell}\"")]
    RepeatedDot { cell: String, dot: char },

    #[error("invalid hex cell \"{0}\"")]
    InvalidHex(String),
}

/// Parse one cell
pub fn parse_cell(s: &str) -> Result<u8, NotationError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(NotationError::Empty);
    }
    if s == "-" || s == "0" {
        return Ok(0);
    }
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return u8::from_str_radix(hex, 16).map_err(|_| NotationError::InvalidHex(s.to_string()));
    }

    let mut pattern = 0u8;
    for c in s.chars() {
        let dot = match c.to_digit(10) {
            Some(d @ 1..=8) => d,
            _ => {
                return Err(NotationError::InvalidDot {
                    cell: s.to_string(),
                    dot: c,
                })
            }
        };
        let bit = 1u8 << (dot - 1);
        if pattern & bit != 0 {
            return Err(NotationError::RepeatedDot {
                cell: s.to_string(),
                dot: c,
            });
        }
        pattern |= bit;
    }
    Ok(pattern)
}

/// Parse a row of cells
pub fn parse_cells<S: AsRef<str>>(cells: &[S]) -> Result<Vec<u8>, NotationError> {
    cells.iter().map(|c| parse_cell(c.as_ref())).collect()
}

/// Format a cell as its dot numbers, `-` when blank
pub fn format_cell(pattern: u8) -> String {
    if pattern == 0 {
        return "-".to_string();
    }
    (0..8)
        .filter(|i| pattern & (1 << i) != 0)
        .map(|i| char::from(b'1' + i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_numbers() {
        assert_eq!(parse_cell("1"), Ok(0x01));
        assert_eq!(parse_cell("8"), Ok(0x80));
        assert_eq!(parse_cell("1245"), Ok(0x1b));
        assert_eq!(parse_cell("5421"), Ok(0x1b));
        assert_eq!(parse_cell("12345678"), Ok(0xFF));
    }

    #[test]
    fn test_blank_and_hex() {
        assert_eq!(parse_cell("-"), Ok(0));
        assert_eq!(parse_cell("0"), Ok(0));
        assert_eq!(parse_cell("0x1b"), Ok(0x1b));
        assert_eq!(parse_cell("0XFF"), Ok(0xFF));
        assert!(matches!(parse_cell("0x100"), Err(NotationError::InvalidHex(_))));
    }

    #[test]
    fn test_bad_cells() {
        assert_eq!(parse_cell(""), Err(NotationError::Empty));
        assert!(matches!(
            parse_cell("129"),
            Err(NotationError::InvalidDot { dot: '9', .. })
        ));
        assert!(matches!(
            parse_cell("1a"),
            Err(NotationError::InvalidDot { dot: 'a', .. })
        ));
        assert!(matches!(
            parse_cell("11"),
            Err(NotationError::RepeatedDot { dot: '1', .. })
        ));
    }

    #[test]
    fn test_parse_row() {
        assert_eq!(parse_cells(&["1", "-", "0x80"]), Ok(vec![0x01, 0x00, 0x80]));
        assert!(parse_cells(&["1", "x"]).is_err());
    }

    #[test]
    fn test_format_cell() {
        assert_eq!(format_cell(0), "-");
        assert_eq!(format_cell(0x1b), "1245");
        assert_eq!(format_cell(0xFF), "12345678");
        assert_eq!(parse_cell(&format_cell(0x5a)), Ok(0x5a));
    }
}
