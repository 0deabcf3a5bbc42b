//! Core index types for the grid.

use std::fmt;

/// Position of a cell in the temperature field.
///
/// Rows run along `z` (row 0 is the bed), columns along `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellIndex {
    pub row: usize,
    pub col: usize,
}

impl CellIndex {
    /// Create a new cell index.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Squared index-space distance to another cell.
    pub fn distance_sq(&self, other: CellIndex) -> usize {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        dr * dr + dc * dc
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[z{}, x{}]", self.row, self.col)
    }
}

/// One of the four edges of the rectangular domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Row 0 (in contact with the print bed)
    Bottom,
    /// Row `nz - 1` (exposed surface)
    Top,
    /// Column 0
    Left,
    /// Column `nx - 1`
    Right,
}

impl Edge {
    /// All edges in boundary enforcement order.
    ///
    /// Sides come last so they read already-corrected top and bottom rows.
    pub const ENFORCEMENT_ORDER: [Edge; 4] = [Edge::Bottom, Edge::Top, Edge::Left, Edge::Right];

    /// Parse an edge from its name.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bottom" | "bed" => Some(Self::Bottom),
            "top" => Some(Self::Top),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    /// Whether the edge runs along `x` (a row) rather than along `z` (a column).
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Edge::Bottom | Edge::Top)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Edge::Bottom => "bottom",
            Edge::Top => "top",
            Edge::Left => "left",
            Edge::Right => "right",
        };
        write!(f, "{}", name)
    }
}
