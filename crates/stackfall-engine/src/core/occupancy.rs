use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};

use super::{PLAYABLE_HEIGHT, PLAYABLE_WIDTH};

// Full row (all playable cells occupied)
const FULL_ROW_MASK: u16 = (1 << PLAYABLE_WIDTH) - 1;

/// Single row of the occupancy matrix.
///
/// Bit `col` is set when column `col` is occupied. Bits above
/// [`PLAYABLE_WIDTH`] are always clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OccupancyRow {
    bits: u16,
}

impl OccupancyRow {
    pub const EMPTY: Self = Self { bits: 0 };
    pub const FULL: Self = Self {
        bits: FULL_ROW_MASK,
    };

    /// Checks if every column is occupied.
    #[inline]
    #[must_use]
    pub fn is_filled(self) -> bool {
        self.bits == FULL_ROW_MASK
    }

    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    #[inline]
    #[must_use]
    pub fn is_occupied(self, col: usize) -> bool {
        col < PLAYABLE_WIDTH && self.bits & (1 << col) != 0
    }

    #[inline]
    fn occupy(&mut self, col: usize) {
        debug_assert!(col < PLAYABLE_WIDTH);
        self.bits |= 1 << col;
    }

    #[must_use]
    pub fn count_occupied(self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Iterates over the columns, left to right, yielding their occupied status.
    #[inline]
    pub fn iter_cells(self) -> impl Iterator<Item = bool> {
        (0..PLAYABLE_WIDTH).map(move |col| self.is_occupied(col))
    }
}

/// Occupancy of the visible 20×10 playfield.
///
/// Row 0 is the bottom row. The matrix is a derived view: the playfield
/// rebuilds it from its cells after every structural change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyMatrix {
    rows: [OccupancyRow; PLAYABLE_HEIGHT],
}

impl Default for OccupancyMatrix {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Serialize for OccupancyMatrix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "0000,03ff,..." (comma-separated hex values, bottom row first)
        let mut hex_string = String::with_capacity(PLAYABLE_HEIGHT * 5);
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                hex_string.push(',');
            }
            write!(&mut hex_string, "{:04x}", row.bits).map_err(serde::ser::Error::custom)?;
        }
        serializer.serialize_str(&hex_string)
    }
}

impl<'de> Deserialize<'de> for OccupancyMatrix {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != PLAYABLE_HEIGHT {
            return Err(serde::de::Error::custom(format!(
                "expected {} comma-separated hex values, got {}",
                PLAYABLE_HEIGHT,
                parts.len()
            )));
        }

        let mut rows = [OccupancyRow::EMPTY; PLAYABLE_HEIGHT];
        for (i, hex_str) in parts.iter().enumerate() {
            let bits = u16::from_str_radix(hex_str, 16).map_err(|e| {
                serde::de::Error::custom(format!("invalid hex at row {i}: {hex_str} ({e})"))
            })?;
            if bits & !FULL_ROW_MASK != 0 {
                return Err(serde::de::Error::custom(format!(
                    "row {i} has bits outside the playfield: {hex_str}"
                )));
            }
            rows[i] = OccupancyRow { bits };
        }

        Ok(Self { rows })
    }
}

/// Renders the matrix top row first, `#` for occupied and `.` for empty.
impl fmt::Display for OccupancyMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows.iter().rev() {
            for occupied in row.iter_cells() {
                f.write_char(if occupied { '#' } else { '.' })?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}

impl OccupancyMatrix {
    pub const WIDTH: usize = PLAYABLE_WIDTH;
    pub const HEIGHT: usize = PLAYABLE_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [OccupancyRow::EMPTY; PLAYABLE_HEIGHT],
    };

    #[must_use]
    pub fn row(&self, row: usize) -> OccupancyRow {
        self.rows[row]
    }

    /// Returns an iterator over the rows, bottom row first.
    pub fn rows(&self) -> impl Iterator<Item = OccupancyRow> + '_ {
        self.rows.iter().copied()
    }

    /// Checks a grid position, treating anything outside the visible area as
    /// free.
    #[must_use]
    pub fn is_occupied(&self, row: i32, col: i32) -> bool {
        match (usize::try_from(row), usize::try_from(col)) {
            (Ok(row), Ok(col)) if row < PLAYABLE_HEIGHT => self.rows[row].is_occupied(col),
            _ => false,
        }
    }

    pub(crate) fn occupy(&mut self, row: usize, col: usize) {
        self.rows[row].occupy(col);
    }

    /// Indices of all completely filled rows, bottom first.
    pub fn filled_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.is_filled())
            .map(|(i, _)| i)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.is_empty())
    }

    /// Number of occupied positions over the whole matrix.
    #[must_use]
    pub fn count_occupied(&self) -> usize {
        self.rows.iter().map(|row| row.count_occupied()).sum()
    }

    /// Returns the matrix as `[row][col]` booleans, bottom row first.
    #[must_use]
    pub fn to_bools(&self) -> [[bool; PLAYABLE_WIDTH]; PLAYABLE_HEIGHT] {
        let mut out = [[false; PLAYABLE_WIDTH]; PLAYABLE_HEIGHT];
        for (dst, row) in out.iter_mut().zip(&self.rows) {
            for (cell, occupied) in dst.iter_mut().zip(row.iter_cells()) {
                *cell = occupied;
            }
        }
        out
    }
}
