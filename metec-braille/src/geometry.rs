//! Cell geometry and device variants
//!
//! The display reports its physical cell count in every status frame. BD-20
//! and BD-40 come with or without two leading status cells; the count tells
//! the variants apart (22 and 42 mean "with status cells").

use std::fmt;

/// Number of status cells on variants that have them
pub const STATUS_CELLS: u8 = 2;

/// Text cells and leading status cells of a display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellGeometry {
    /// Cells available for text
    pub num_cells: u8,
    /// Leading status cells (0 or 2)
    pub status_cells: u8,
}

impl CellGeometry {
    /// Derive geometry from a reported cell count: 22 and 42 carry two status
    /// cells, everything else is all text cells
    pub fn from_reported(count: u8) -> Self {
        match count {
            22 | 42 => Self {
                num_cells: count - STATUS_CELLS,
                status_cells: STATUS_CELLS,
            },
            _ => Self {
                num_cells: count,
                status_cells: 0,
            },
        }
    }

    /// Derive geometry under a status-cell policy
    pub fn with_policy(count: u8, policy: StatusCellPolicy) -> Self {
        match policy {
            StatusCellPolicy::Auto => Self::from_reported(count),
            StatusCellPolicy::None => Self {
                num_cells: count,
                status_cells: 0,
            },
            StatusCellPolicy::Two if count > STATUS_CELLS => Self {
                num_cells: count - STATUS_CELLS,
                status_cells: STATUS_CELLS,
            },
            StatusCellPolicy::Two => Self {
                num_cells: count,
                status_cells: 0,
            },
        }
    }

    /// Physical cell count as reported by the device
    pub fn reported(&self) -> u8 {
        self.num_cells + self.status_cells
    }

    /// Length of the output buffer written to the device
    pub fn buffer_len(&self) -> usize {
        usize::from(self.reported())
    }
}

impl fmt::Display for CellGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} cells", self.num_cells)?;
        if self.status_cells > 0 {
            write!(f, " + {} status cells", self.status_cells)?;
        }
        Ok(())
    }
}

/// How many leading cells are reserved as status cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusCellPolicy {
    /// Two status cells when the device reports 22 or 42 cells
    #[default]
    Auto,
    /// Every cell is a text cell
    None,
    /// Always reserve two status cells
    Two,
}

impl std::str::FromStr for StatusCellPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "none" | "0" => Ok(Self::None),
            "two" | "2" => Ok(Self::Two),
            _ => Err(format!("Unknown status cell policy: {s}")),
        }
    }
}

/// Known BD models, classified once per session from the reported count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceVariant {
    Bd20,
    Bd20Status,
    Bd40,
    Bd40Status,
    /// Unrecognized count, driven as all text cells
    Other(u8),
}

impl DeviceVariant {
    /// Classify a reported cell count
    pub fn from_reported(count: u8) -> Self {
        match count {
            20 => Self::Bd20,
            22 => Self::Bd20Status,
            40 => Self::Bd40,
            42 => Self::Bd40Status,
            other => Self::Other(other),
        }
    }

    /// Native geometry of the variant
    pub fn geometry(&self) -> CellGeometry {
        match self {
            Self::Bd20 => CellGeometry::from_reported(20),
            Self::Bd20Status => CellGeometry::from_reported(22),
            Self::Bd40 => CellGeometry::from_reported(40),
            Self::Bd40Status => CellGeometry::from_reported(42),
            Self::Other(count) => CellGeometry::from_reported(*count),
        }
    }

    /// Model name for logs
    pub fn name(&self) -> String {
        match self {
            Self::Bd20 => "BD-20".to_string(),
            Self::Bd20Status => "BD-20 with status cells".to_string(),
            Self::Bd40 => "BD-40".to_string(),
            Self::Bd40Status => "BD-40 with status cells".to_string(),
            Self::Other(count) => format!("unknown model ({count} cells)"),
        }
    }
}
