use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::cell::{Bounds, Cell, Center, Color, Point};

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// O-piece.
    O = 0,
    /// I-piece.
    I = 1,
    /// J-piece.
    J = 2,
    /// L-piece.
    L = 3,
    /// S-piece.
    S = 4,
    /// Z-piece.
    Z = 5,
    /// T-piece.
    T = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All kinds, in the order the round-robin selector hands them out.
    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::O,
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::T,
    ];

    #[must_use]
    pub fn geometry(self) -> &'static ShapeGeometry {
        &SHAPES[self as usize]
    }

    #[must_use]
    pub fn default_color(self) -> Color {
        self.geometry().color
    }

    /// Lays out the four cells of a freshly drawn piece anchored at `anchor`.
    #[must_use]
    pub fn initial_cells(self, anchor: Point, size: i32, color: Color) -> [Cell; 4] {
        self.geometry()
            .layout
            .map(|(dx, dy)| Cell::from_top_left(anchor.x + dx * size, anchor.y + dy * size, size, color))
    }

    /// Rotation bounding box for a piece anchored at `anchor`.
    #[must_use]
    pub fn rot_bounds(self, anchor: Point, size: i32) -> Bounds {
        let [xl, yl, xh, yh] = self.geometry().rot_bounds;
        Bounds::new(
            anchor.x + xl * size,
            anchor.y + yl * size,
            anchor.x + xh * size,
            anchor.y + yh * size,
        )
    }

    /// Rotation pivot for a piece anchored at `anchor`.
    #[must_use]
    pub fn rot_center(self, anchor: Point, size: i32) -> Center {
        match self.geometry().pivot {
            Pivot::Fixed(dx, dy) => Center::new(
                f64::from(anchor.x + dx * size),
                f64::from(anchor.y + dy * size),
            ),
            Pivot::BoundsMidpoint => self.rot_bounds(anchor, size).center(),
        }
    }

    /// Per-orientation adjustments turning the rotation box into the actual
    /// footprint, in units of the cell size.
    #[must_use]
    pub fn rot_offsets(self) -> &'static [[i32; 4]; 4] {
        &self.geometry().rot_offsets
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use stackfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::O => 'O',
            PieceKind::I => 'I',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::T => 'T',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use stackfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('I'), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'O' => Some(PieceKind::O),
            'I' => Some(PieceKind::I),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }
}

/// Where a shape rotates around, relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pivot {
    /// Fixed point, in units of the cell size.
    Fixed(i32, i32),
    /// Middle of the rotation bounding box.
    BoundsMidpoint,
}

/// Static description of one piece kind.
///
/// All distances are in units of the cell size and relative to the anchor,
/// which is the top-left corner of the first drawn cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeGeometry {
    /// Top-left corner of each cell.
    pub layout: [(i32, i32); 4],
    /// Rotation bounding box as `[xl, yl, xh, yh]`.
    pub rot_bounds: [i32; 4],
    pub pivot: Pivot,
    /// One `[xl, yl, xh, yh]` adjustment per orientation.
    pub rot_offsets: [[i32; 4]; 4],
    pub color: Color,
}

const LJSZT_OFFSETS: [[i32; 4]; 4] = [
    [0, 1, 0, 0],
    [1, 0, 0, 0],
    [0, 0, 0, -1],
    [0, 0, -1, 0],
];

const SHAPES: [ShapeGeometry; PieceKind::LEN] = [
    // O-piece: 2×2 block, turns in place
    ShapeGeometry {
        layout: [(0, 0), (1, 0), (0, -1), (1, -1)],
        rot_bounds: [-1, -3, 3, 0],
        pivot: Pivot::Fixed(1, -1),
        rot_offsets: [[1, 1, -1, 0]; 4],
        color: Color::YELLOW,
    },
    // I-piece: 4 in a row, 4×4 box
    ShapeGeometry {
        layout: [(0, 0), (1, 0), (2, 0), (3, 0)],
        rot_bounds: [0, -3, 4, 1],
        pivot: Pivot::BoundsMidpoint,
        rot_offsets: [[0, 2, 0, -1], [2, 0, -1, 0], [0, 1, 0, -2], [1, 0, -2, 0]],
        color: Color::LIGHT_BLUE,
    },
    // J-piece
    ShapeGeometry {
        layout: [(0, 0), (0, -1), (1, -1), (2, -1)],
        rot_bounds: [0, -3, 3, 0],
        pivot: Pivot::BoundsMidpoint,
        rot_offsets: LJSZT_OFFSETS,
        color: Color::BLUE,
    },
    // L-piece
    ShapeGeometry {
        layout: [(0, 0), (-2, -1), (-1, -1), (0, -1)],
        rot_bounds: [-2, -3, 1, 0],
        pivot: Pivot::BoundsMidpoint,
        rot_offsets: LJSZT_OFFSETS,
        color: Color::ORANGE,
    },
    // S-piece
    ShapeGeometry {
        layout: [(0, 0), (1, 0), (-1, -1), (0, -1)],
        rot_bounds: [-1, -3, 2, 0],
        pivot: Pivot::BoundsMidpoint,
        rot_offsets: LJSZT_OFFSETS,
        color: Color::GREEN,
    },
    // Z-piece
    ShapeGeometry {
        layout: [(0, 0), (1, 0), (1, -1), (2, -1)],
        rot_bounds: [0, -3, 3, 0],
        pivot: Pivot::BoundsMidpoint,
        rot_offsets: LJSZT_OFFSETS,
        color: Color::RED,
    },
    // T-piece
    ShapeGeometry {
        layout: [(0, 0), (-1, -1), (0, -1), (1, -1)],
        rot_bounds: [-1, -3, 2, 0],
        pivot: Pivot::BoundsMidpoint,
        rot_offsets: LJSZT_OFFSETS,
        color: Color::PURPLE,
    },
];
