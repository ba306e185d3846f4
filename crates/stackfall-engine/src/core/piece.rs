use serde::{Deserialize, Serialize};

use super::{
    cell::{Bounds, Cell, Center, Color, Point},
    shape::PieceKind,
};

/// A falling tetromino made of four cells.
///
/// The piece only knows how to transform itself. Whether a transform is legal
/// is decided by the [`Playfield`](crate::Playfield) before it is applied.
///
/// # Example
///
/// ```
/// use stackfall_engine::{Direction, Piece, PieceKind, Point};
///
/// let mut piece = Piece::new(PieceKind::T, Point::new(4, 22), 1);
/// piece.step(Direction::Down);
/// piece.rotate();
/// assert_eq!(piece.start(), Point::new(4, 21));
/// assert_eq!(piece.rotation().as_u8(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Piece {
    kind: PieceKind,
    cells: [Cell; 4],
    start: Point,
    rotation: PieceRotation,
    rot_center: Center,
    rot_bounds: Bounds,
    size: i32,
    color: Color,
}

impl Piece {
    /// Draws a piece of the given kind in its default color, anchored at
    /// `start` (in grid units).
    #[must_use]
    pub fn new(kind: PieceKind, start: Point, size: i32) -> Self {
        Self::with_color(kind, start, size, kind.default_color())
    }

    #[must_use]
    pub fn with_color(kind: PieceKind, start: Point, size: i32, color: Color) -> Self {
        let start = Point::new(start.x * size, start.y * size);
        let mut piece = Self {
            kind,
            cells: kind.initial_cells(start, size, color),
            start,
            rotation: PieceRotation::default(),
            rot_center: Center::default(),
            rot_bounds: Bounds::new(0, 0, 0, 0),
            size,
            color,
        };
        piece.update_bounds();
        piece
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell; 4] {
        &self.cells
    }

    /// Anchor point in playfield coordinates.
    #[must_use]
    pub fn start(&self) -> Point {
        self.start
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn rot_center(&self) -> Center {
        self.rot_center
    }

    #[must_use]
    pub fn rot_bounds(&self) -> Bounds {
        self.rot_bounds
    }

    #[must_use]
    pub fn size(&self) -> i32 {
        self.size
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Box actually covered by the cells in the current orientation, derived
    /// from the rotation box without looking at the cells.
    #[must_use]
    pub fn actual_bounds(&self) -> Bounds {
        self.rot_bounds
            .offset_by(self.kind.rot_offsets()[self.rotation.as_usize()], self.size)
    }

    /// Cells as they would be after one step in `direction`.
    #[must_use]
    pub fn stepped_cells(&self, direction: Direction) -> [Cell; 4] {
        let (dx, dy) = direction.delta();
        self.cells.each_ref().map(|c| c.shifted(dx, dy))
    }

    /// Cells as they would be after one clockwise rotation.
    #[must_use]
    pub fn rotated_cells(&self) -> [Cell; 4] {
        self.cells.each_ref().map(|c| c.rotated(self.rot_center))
    }

    /// Moves the piece one cell in `direction`.
    pub fn step(&mut self, direction: Direction) {
        let (dx, dy) = direction.delta();
        self.start.x += dx * self.size;
        self.start.y += dy * self.size;
        for cell in &mut self.cells {
            cell.translate(dx, dy);
        }
        self.update_bounds();
    }

    /// Rotates the piece 90° clockwise around its pivot.
    pub fn rotate(&mut self) {
        for cell in &mut self.cells {
            cell.rotate(self.rot_center);
        }
        self.update_bounds();
        self.rotation = self.rotation.rotated_right();
    }

    /// Checks whether any of `cells` coincides with one of the piece's cells.
    #[must_use]
    pub fn overlaps(&self, cells: &[Cell]) -> bool {
        cells.iter().any(|other| self.cells.contains(other))
    }

    pub(crate) fn into_cells(self) -> [Cell; 4] {
        self.cells
    }

    fn update_bounds(&mut self) {
        self.rot_bounds = self.kind.rot_bounds(self.start, self.size);
        self.rot_center = self.kind.rot_center(self.start, self.size);
    }
}

/// A single-cell move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Direction {
    Down,
    Left,
    Right,
    Up,
}

impl Direction {
    /// Column and row deltas.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, 1),
        }
    }
}

/// Rotation state of a piece.
///
/// Represents one of four rotation states:
///
/// - `0`: 0° (spawn orientation)
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 270° clockwise
///
/// Rotation wraps around modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PieceRotation(u8);

impl PieceRotation {
    #[must_use]
    pub fn rotated_right(self) -> Self {
        PieceRotation((self.0 + 1) % 4)
    }

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    const fn as_usize(self) -> usize {
        self.0 as usize
    }
}
