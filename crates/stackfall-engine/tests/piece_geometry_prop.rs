//! Property tests for piece transforms.
//!
//! - Four clockwise rotations bring every cell back to where it started.
//! - The pivot does not move when a piece rotates.
//! - `actual_bounds` always matches the footprint of the cells.
//! - A step and its opposite cancel out.

use proptest::prelude::*;
use stackfall_engine::{Bounds, Cell, Direction, Piece, PieceKind, Point};

fn footprint(cells: &[Cell]) -> Bounds {
    cells
        .iter()
        .map(Cell::bounds)
        .reduce(|a, b| Bounds::new(a.xl.min(b.xl), a.yl.min(b.yl), a.xh.max(b.xh), a.yh.max(b.yh)))
        .unwrap()
}

fn any_kind() -> impl Strategy<Value = PieceKind> {
    prop::sample::select(PieceKind::ALL.to_vec())
}

fn any_piece() -> impl Strategy<Value = Piece> {
    (any_kind(), -5i32..15, -5i32..30, 1i32..40)
        .prop_map(|(kind, x, y, size)| Piece::new(kind, Point::new(x, y), size))
}

fn any_direction() -> impl Strategy<Value = Direction> {
    prop::sample::select(vec![
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::Up,
    ])
}

const fn opposite(direction: Direction) -> Direction {
    match direction {
        Direction::Down => Direction::Up,
        Direction::Up => Direction::Down,
        Direction::Left => Direction::Right,
        Direction::Right => Direction::Left,
    }
}

proptest! {
    #[test]
    fn four_rotations_restore_every_cell(piece in any_piece()) {
        let mut rotated = piece.clone();
        for _ in 0..4 {
            rotated.rotate();
        }
        prop_assert_eq!(rotated.rotation(), piece.rotation());
        for (a, b) in rotated.cells().iter().zip(piece.cells()) {
            prop_assert_eq!(a, b);
            prop_assert_eq!(a.bounds(), b.bounds());
        }
    }

    #[test]
    fn rotation_keeps_pivot_and_bounds_box(piece in any_piece(), turns in 1usize..8) {
        let mut rotated = piece.clone();
        for _ in 0..turns {
            rotated.rotate();
            prop_assert_eq!(rotated.rot_center(), piece.rot_center());
            prop_assert_eq!(rotated.rot_bounds(), piece.rot_bounds());
        }
    }

    #[test]
    fn actual_bounds_match_cells(piece in any_piece(), turns in 0usize..4) {
        let mut piece = piece;
        for _ in 0..turns {
            piece.rotate();
        }
        prop_assert_eq!(piece.actual_bounds(), footprint(piece.cells()));
    }

    #[test]
    fn rotation_keeps_cells_unit_sized_and_distinct(piece in any_piece(), turns in 0usize..4) {
        let mut piece = piece;
        for _ in 0..turns {
            piece.rotate();
        }
        let size = piece.size();
        for (i, cell) in piece.cells().iter().enumerate() {
            let b = cell.bounds();
            prop_assert_eq!(b.xh - b.xl, size);
            prop_assert_eq!(b.yh - b.yl, size);
            prop_assert!(!piece.cells()[i + 1..].contains(cell));
        }
    }

    #[test]
    fn opposite_steps_cancel(piece in any_piece(), direction in any_direction()) {
        let mut moved = piece.clone();
        moved.step(direction);
        prop_assert_ne!(moved.start(), piece.start());
        moved.step(opposite(direction));
        prop_assert_eq!(moved, piece);
    }
}
