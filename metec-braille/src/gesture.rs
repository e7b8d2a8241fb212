//! Decoded key gestures and their names
//!
//! A gesture is everything that was held down together between two full
//! releases. Names follow the driver's gesture vocabulary: `routing` for a
//! bare routing key, otherwise the held flags (`fk1`..`fk6`, `ckl`, `cku`,
//! `ckr`, `ckd`) plus `rNN` or `sk0`/`sk1`, joined with `+`
//! (e.g. `fk2+r38`).

use std::fmt;

use crate::keys::{NAMED_KEYS, SK0, SK1, STATUS_KEY_BASE};

/// Separator between key names in a gesture identifier
pub const NAME_SEPARATOR: &str = "+";

/// Name of a bare routing-key gesture
pub const ROUTING: &str = "routing";

/// One decoded, debounced key combination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gesture {
    code: u32,
    names: Vec<String>,
    routing_index: Option<u8>,
    id: String,
}

impl Gesture {
    /// Build a gesture from a combined 24-bit key code
    pub fn from_code(code: u32) -> Self {
        let mut names = Vec::new();
        let mut routing_index = None;

        if code < u32::from(STATUS_KEY_BASE) {
            names.push(ROUTING.to_string());
            routing_index = Some(code as u8);
        } else {
            for (flag, name) in NAMED_KEYS {
                if code & flag != 0 {
                    names.push((*name).to_string());
                }
            }
            let routing = (code & 0xFF) as u8;
            if routing < STATUS_KEY_BASE {
                names.push(format!("r{routing:02}"));
            } else if routing == SK0 {
                names.push("sk0".to_string());
            } else if routing == SK1 {
                names.push("sk1".to_string());
            }
        }

        let id = names.join(NAME_SEPARATOR);
        Self {
            code,
            names,
            routing_index,
            id,
        }
    }

    /// Combined key code (bits 0-7 routing, 8-23 function and cursor keys)
    pub fn code(&self) -> u32 {
        self.code
    }

    /// Key names in fixed order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Routing cell index for a bare `routing` gesture
    pub fn routing_index(&self) -> Option<u8> {
        self.routing_index
    }

    /// Identifier string, e.g. `fk1+fk3`
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Rewrite a hand-written identifier in the order `Gesture` names keys
///
/// `fk2+ckl` becomes `ckl+fk2`. Names are trimmed and lowercased, duplicates
/// dropped; routing and status names (`r38`, `sk0`, `routing`) go last.
pub fn canonical_id(id: &str) -> String {
    let rank = |name: &str| {
        NAMED_KEYS
            .iter()
            .position(|(_, n)| *n == name)
            .unwrap_or(NAMED_KEYS.len())
    };

    let mut names: Vec<String> = id
        .split(NAME_SEPARATOR)
        .map(|n| n.trim().to_lowercase())
        .filter(|n| !n.is_empty())
        .collect();
    names.sort_by_key(|n| rank(n));
    names.dedup();
    names.join(NAME_SEPARATOR)
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.routing_index {
            Some(index) => f.pad(&format!("{}({})", self.id, index)),
            None => f.pad(&self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{combine, cursor, function, NO_KEY};

    #[test]
    fn test_bare_routing_key() {
        let g = Gesture::from_code(combine(0, 5));
        assert_eq!(g.id(), "routing");
        assert_eq!(g.routing_index(), Some(5));
        assert_eq!(g.to_string(), "routing(5)");
    }

    #[test]
    fn test_function_plus_routing() {
        let g = Gesture::from_code(function::FK2 | 38);
        assert_eq!(g.id(), "fk2+r38");
        assert_eq!(g.routing_index(), None);
    }

    #[test]
    fn test_function_chord_without_routing() {
        let g = Gesture::from_code(function::FK1 | function::FK2 | function::FK3 | u32::from(NO_KEY));
        assert_eq!(g.id(), "fk1+fk2+fk3");
    }

    #[test]
    fn test_cursor_keys_come_first() {
        let g = Gesture::from_code(function::FK2 | cursor::CKL | u32::from(NO_KEY));
        assert_eq!(g.names(), &["ckl".to_string(), "fk2".to_string()]);
    }

    #[test]
    fn test_status_keys() {
        assert_eq!(Gesture::from_code(combine(0, SK0)).id(), "sk0");
        assert_eq!(Gesture::from_code(combine(0, SK1)).id(), "sk1");
        assert_eq!(
            Gesture::from_code(combine((function::FK6 >> 8) as u16, SK1)).id(),
            "fk6+sk1"
        );
    }

    #[test]
    fn test_zero_padded_routing_name() {
        assert_eq!(Gesture::from_code(function::FK2).id(), "fk2+r00");
    }

    #[test]
    fn test_naming_deterministic() {
        for code in [0x00_10FF, 0x5C_5F05, 0x40_00A1, 0x00_0013] {
            assert_eq!(Gesture::from_code(code), Gesture::from_code(code));
        }
        let all = Gesture::from_code(0x5C_5FFF);
        assert_eq!(all.id(), "ckd+ckl+ckr+cku+fk1+fk2+fk3+fk4+fk5+fk6");
    }

    #[test]
    fn test_canonical_id_reorders_keys() {
        assert_eq!(canonical_id("fk2+ckl"), "ckl+fk2");
        assert_eq!(canonical_id("r38+fk2"), "fk2+r38");
        assert_eq!(canonical_id("FK3 + fk1"), "fk1+fk3");
        assert_eq!(canonical_id("fk1+fk1"), "fk1");
        assert_eq!(canonical_id("routing"), "routing");
    }

    #[test]
    fn test_canonical_id_matches_generated_ids() {
        let codes = [
            function::FK2 | cursor::CKL | u32::from(NO_KEY),
            function::FK2 | 38,
            cursor::CKD | cursor::CKU | function::FK6 | u32::from(NO_KEY),
            0x0A,
        ];
        for code in codes {
            let g = Gesture::from_code(code);
            assert_eq!(canonical_id(g.id()), g.id());
        }
    }
}
