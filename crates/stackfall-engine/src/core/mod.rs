//! Geometry of the playfield: cells, piece shapes, falling pieces and the
//! occupancy matrix.
//!
//! Coordinates follow the classic turtle-graphics convention used by the
//! playfield: `x` grows to the right, `y` grows upward, and row 0 is the
//! bottom row. A cell of side `size` whose lower-left corner is `(x, y)`
//! occupies row `y / size` and column `x / size`.

pub use self::{cell::*, occupancy::*, piece::*, shape::*};

pub(crate) mod cell;
pub(crate) mod occupancy;
pub(crate) mod piece;
pub(crate) mod shape;

/// Number of columns in the visible playfield.
pub const PLAYABLE_WIDTH: usize = 10;
/// Number of rows in the visible playfield.
pub const PLAYABLE_HEIGHT: usize = 20;
/// Index of the top visible row. Any locked cell reaching it ends the game.
pub const TOP_ROW: usize = PLAYABLE_HEIGHT - 1;
