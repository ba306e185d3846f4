use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::core::{
    Cell, Color, Direction, OccupancyMatrix, PLAYABLE_HEIGHT, PLAYABLE_WIDTH, Piece, PieceKind,
    TOP_ROW,
};

/// Rows cleared by a single lock, bottom first.
pub type ClearedRows = ArrayVec<usize, PLAYABLE_HEIGHT>;

/// A move requested for the falling piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Instruction {
    Down,
    Left,
    Right,
    Rotate,
}

/// Outcome of checking a move against the playfield, without side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum MoveCheck {
    /// The prospective cells are inside the walls and free.
    Allowed,
    /// The move is refused and the piece stays where it is.
    Blocked,
    /// The piece cannot go further down and must be absorbed where it is.
    Landed,
}

/// Outcome of [`Playfield::ok_move`].
#[derive(Debug, Clone, PartialEq, derive_more::IsVariant)]
pub enum MoveVerdict {
    /// The caller may apply the move to the piece.
    Allowed,
    /// The move is refused; nothing changed.
    Denied,
    /// The move is refused and the piece has been absorbed into the stack.
    Absorbed(LockReport),
}

/// What happened when a piece was absorbed into the stack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LockReport {
    kind: PieceKind,
    cells: [Cell; 4],
    cleared_rows: ClearedRows,
    top_out: bool,
}

impl LockReport {
    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// The absorbed cells, at the position they were locked (before any
    /// line clear).
    #[must_use]
    pub fn cells(&self) -> &[Cell; 4] {
        &self.cells
    }

    #[must_use]
    pub fn cleared_rows(&self) -> &[usize] {
        &self.cleared_rows
    }

    #[must_use]
    pub fn lines_cleared(&self) -> usize {
        self.cleared_rows.len()
    }

    /// Whether the stack reached the top row or overflowed the playfield.
    #[must_use]
    pub fn is_top_out(&self) -> bool {
        self.top_out
    }
}

/// The stack of locked cells and its occupancy matrix.
///
/// The cell list is authoritative; the matrix is rebuilt from it after every
/// absorption and line clear.
///
/// # Example
///
/// ```
/// use stackfall_engine::{Instruction, Piece, PieceKind, Playfield, Point};
///
/// let mut field = Playfield::new(1);
/// let mut piece = Piece::new(PieceKind::O, Point::new(4, 3), 1);
///
/// // O covers rows 1 and 2, one step down is free.
/// assert!(field.ok_move(&piece, Instruction::Down).is_allowed());
/// piece.step(stackfall_engine::Direction::Down);
///
/// // The next step would cross the floor, so the piece is absorbed.
/// let verdict = field.ok_move(&piece, Instruction::Down);
/// assert!(verdict.is_absorbed());
/// assert_eq!(field.matrix().count_occupied(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct Playfield {
    size: i32,
    cells: Vec<Cell>,
    matrix: OccupancyMatrix,
    game_over: bool,
}

impl Playfield {
    #[must_use]
    pub fn new(size: i32) -> Self {
        debug_assert!(size > 0, "cell size must be positive");
        Self {
            size,
            cells: Vec::with_capacity(PLAYABLE_WIDTH * PLAYABLE_HEIGHT),
            matrix: OccupancyMatrix::EMPTY,
            game_over: false,
        }
    }

    /// Builds a playfield from ASCII art for testing.
    ///
    /// `#` is an occupied cell and `.` an empty one. Rows are listed top to
    /// bottom and the last line is row 0, so fewer than 20 lines describe
    /// the bottom of the playfield.
    ///
    /// # Panics
    ///
    /// Panics if a line does not have exactly 10 cells or there are more
    /// than 20 lines.
    #[must_use]
    pub fn from_ascii(art: &str, size: i32) -> Self {
        let mut field = Self::new(size);
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert!(
            lines.len() <= PLAYABLE_HEIGHT,
            "At most {PLAYABLE_HEIGHT} rows are allowed, got {}",
            lines.len()
        );

        for (row, line) in lines.iter().rev().enumerate() {
            let chars: Vec<char> = line.chars().filter(|c| *c == '#' || *c == '.').collect();
            assert_eq!(
                chars.len(),
                PLAYABLE_WIDTH,
                "Each row must have exactly {} cells, got {} at row {}",
                PLAYABLE_WIDTH,
                chars.len(),
                row
            );
            for (col, &ch) in chars.iter().enumerate() {
                if ch == '#' {
                    let (x, y) = (grid_to_coord(col) * size, grid_to_coord(row + 1) * size);
                    field
                        .cells
                        .push(Cell::from_top_left(x, y, size, Color::WHITE));
                }
            }
        }
        field.rebuild_matrix();
        field
    }

    #[must_use]
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Cells owned by the stack.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[must_use]
    pub fn matrix(&self) -> &OccupancyMatrix {
        &self.matrix
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Drops every locked cell and clears the game over flag.
    pub fn reset(&mut self) {
        self.cells.clear();
        self.matrix = OccupancyMatrix::EMPTY;
        self.game_over = false;
    }

    /// Classifies `instr` for `piece` without changing anything.
    ///
    /// Checks run in this order over the prospective cells:
    ///
    /// 1. any cell outside `[0, 10·size]` horizontally blocks the move;
    /// 2. for down and rotate, any cell whose bottom edge is below row 0
    ///    lands the piece;
    /// 3. any cell on an occupied position lands the piece on a down move
    ///    and blocks it otherwise.
    #[must_use]
    pub fn check(&self, piece: &Piece, instr: Instruction) -> MoveCheck {
        let next = match instr {
            Instruction::Down => piece.stepped_cells(Direction::Down),
            Instruction::Left => piece.stepped_cells(Direction::Left),
            Instruction::Right => piece.stepped_cells(Direction::Right),
            Instruction::Rotate => piece.rotated_cells(),
        };

        let width = grid_to_coord(PLAYABLE_WIDTH) * self.size;
        let outside_walls = next.iter().any(|cell| {
            let b = cell.bounds();
            b.xl < 0 || b.xh > width
        });
        if outside_walls {
            return MoveCheck::Blocked;
        }

        let enforce_floor = matches!(instr, Instruction::Down | Instruction::Rotate);
        if enforce_floor && next.iter().any(|cell| cell.bounds().yl < 0) {
            return MoveCheck::Landed;
        }

        let colliding = next.iter().any(|cell| {
            let (row, col) = cell.grid_position();
            self.matrix.is_occupied(row, col)
        });
        match (colliding, instr) {
            (false, _) => MoveCheck::Allowed,
            (true, Instruction::Down) => MoveCheck::Landed,
            (true, _) => MoveCheck::Blocked,
        }
    }

    /// Validates `instr` for `piece`, absorbing the piece when it has landed.
    ///
    /// The piece itself is never moved; on [`MoveVerdict::Allowed`] the caller
    /// applies the move, on [`MoveVerdict::Absorbed`] the caller discards the
    /// piece.
    pub fn ok_move(&mut self, piece: &Piece, instr: Instruction) -> MoveVerdict {
        match self.check(piece, instr) {
            MoveCheck::Allowed => MoveVerdict::Allowed,
            MoveCheck::Blocked => {
                log::trace!("{instr:?} denied for {:?}", piece.kind());
                MoveVerdict::Denied
            }
            MoveCheck::Landed => MoveVerdict::Absorbed(self.absorb(piece)),
        }
    }

    /// Locks the piece's cells into the stack, clears full rows and checks
    /// for top-out.
    pub fn absorb(&mut self, piece: &Piece) -> LockReport {
        let cells = piece.cells().clone();
        self.cells.extend(cells.iter().cloned());
        self.rebuild_matrix();

        let cleared_rows = self.rearrange();

        if self.matrix.row(TOP_ROW).iter_cells().any(|occupied| occupied) {
            self.game_over = true;
        }

        log::debug!(
            "absorbed {:?}: cleared {} line(s), stack of {} cell(s)",
            piece.kind(),
            cleared_rows.len(),
            self.cells.len()
        );

        LockReport {
            kind: piece.kind(),
            cells,
            cleared_rows,
            top_out: self.game_over,
        }
    }

    /// Removes full rows and drops every surviving cell by the number of
    /// cleared rows beneath it.
    pub fn rearrange(&mut self) -> ClearedRows {
        let cleared: ClearedRows = self.matrix.filled_rows().collect();
        if cleared.is_empty() {
            return cleared;
        }

        self.cells.retain_mut(|cell| {
            let (row, _) = cell.grid_position();
            let Ok(row) = usize::try_from(row) else {
                return true;
            };
            if cleared.contains(&row) {
                return false;
            }
            let drop = cleared.iter().filter(|&&r| r < row).count();
            if drop > 0 {
                cell.translate(0, -grid_to_coord(drop));
            }
            true
        });

        self.rebuild_matrix();
        cleared
    }

    /// Recomputes the matrix from the cells and raises the game over flag on
    /// any cell in the top row or outside the visible area.
    fn rebuild_matrix(&mut self) {
        self.matrix = OccupancyMatrix::EMPTY;
        let mut overflow = false;
        for cell in &self.cells {
            let (row, col) = cell.grid_position();
            match (usize::try_from(row), usize::try_from(col)) {
                (Ok(row), Ok(col)) if row < PLAYABLE_HEIGHT && col < PLAYABLE_WIDTH => {
                    self.matrix.occupy(row, col);
                    overflow |= row >= TOP_ROW;
                }
                _ => overflow = true,
            }
        }
        if overflow {
            self.game_over = true;
        }
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const fn grid_to_coord(n: usize) -> i32 {
    n as i32
}

#[cfg(test)]
mod tests {
    use crate::core::Point;

    use super::*;

    fn piece_at(kind: PieceKind, col: i32, row: i32) -> Piece {
        Piece::new(kind, Point::new(col, row), 1)
    }

    fn lowest_row(piece: &Piece) -> i32 {
        piece
            .cells()
            .iter()
            .map(|c| c.grid_position().0)
            .min()
            .unwrap()
    }

    #[test]
    fn test_new_playfield_is_empty() {
        let field = Playfield::new(1);
        assert!(field.matrix().is_empty());
        assert!(field.cells().is_empty());
        assert!(!field.is_game_over());
    }

    #[test]
    fn test_from_ascii_maps_last_line_to_row_zero() {
        let field = Playfield::from_ascii(
            r"
            #.........
            ##########
            ",
            20,
        );
        assert!(field.matrix().row(0).is_filled());
        assert!(field.matrix().is_occupied(1, 0));
        assert!(!field.matrix().is_occupied(1, 1));
        assert_eq!(field.cells().len(), 11);
        assert_eq!(field.cells()[0].lower_left(), Point::new(0, 0));
        assert_eq!(field.cells()[9].lower_left(), Point::new(180, 0));
        assert_eq!(field.cells()[10].lower_left(), Point::new(0, 20));
        assert_eq!(field.cells()[10].grid_position(), (1, 0));
    }

    #[test]
    fn test_walls_block_horizontal_moves() {
        let field = Playfield::new(1);
        let left = piece_at(PieceKind::I, 0, 10);
        assert_eq!(field.check(&left, Instruction::Left), MoveCheck::Blocked);
        assert_eq!(field.check(&left, Instruction::Right), MoveCheck::Allowed);

        let right = piece_at(PieceKind::I, 6, 10);
        assert_eq!(field.check(&right, Instruction::Right), MoveCheck::Blocked);
        assert_eq!(field.check(&right, Instruction::Left), MoveCheck::Allowed);
    }

    #[test]
    fn test_down_on_floor_lands() {
        let field = Playfield::new(1);
        // I drawn at row 1 sits on row 0.
        let piece = piece_at(PieceKind::I, 3, 1);
        assert_eq!(lowest_row(&piece), 0);
        assert_eq!(field.check(&piece, Instruction::Down), MoveCheck::Landed);

        let above = piece_at(PieceKind::I, 3, 2);
        assert_eq!(field.check(&above, Instruction::Down), MoveCheck::Allowed);
    }

    #[test]
    fn test_down_onto_stack_lands_but_sideways_is_denied() {
        let mut field = Playfield::from_ascii(
            r"
            ....#.....
            ....#.....
            ",
            1,
        );
        // O at columns 4-5, rows 2-3: the stack is right below column 4.
        let piece = piece_at(PieceKind::O, 4, 4);
        assert_eq!(field.check(&piece, Instruction::Down), MoveCheck::Landed);

        // O at columns 2-3, rows 0-1: moving right hits the column.
        let beside = piece_at(PieceKind::O, 2, 2);
        assert_eq!(field.check(&beside, Instruction::Right), MoveCheck::Blocked);
        assert_eq!(field.ok_move(&beside, Instruction::Right), MoveVerdict::Denied);
        assert_eq!(field.cells().len(), 2);
    }

    #[test]
    fn test_rotation_into_floor_lands() {
        let field = Playfield::new(1);
        // Horizontal I on row 0; turning it would push cells below the floor.
        let piece = piece_at(PieceKind::I, 3, 1);
        assert_eq!(field.check(&piece, Instruction::Rotate), MoveCheck::Landed);
    }

    #[test]
    fn test_rotation_into_stack_is_blocked() {
        let field = Playfield::from_ascii(
            r"
            .....#....
            .....#....
            .....#....
            .....#....
            .....#....
            .....#....
            ",
            1,
        );
        let piece = piece_at(PieceKind::I, 3, 6);
        assert!(
            piece
                .rotated_cells()
                .iter()
                .any(|c| field.matrix().is_occupied(c.grid_position().0, c.grid_position().1))
        );
        assert_eq!(field.check(&piece, Instruction::Rotate), MoveCheck::Blocked);
    }

    #[test]
    fn test_ok_move_does_not_touch_piece() {
        let mut field = Playfield::new(1);
        let piece = piece_at(PieceKind::T, 4, 5);
        let before = piece.clone();
        assert!(field.ok_move(&piece, Instruction::Down).is_allowed());
        assert!(field.ok_move(&piece, Instruction::Rotate).is_allowed());
        assert_eq!(piece, before);
        assert!(field.cells().is_empty());
    }

    #[test]
    fn test_absorb_keeps_color_and_geometry() {
        let mut field = Playfield::new(1);
        let piece = piece_at(PieceKind::S, 4, 2);
        let MoveVerdict::Absorbed(report) = field.ok_move(&piece, Instruction::Down) else {
            panic!("expected absorption");
        };
        assert_eq!(report.kind(), PieceKind::S);
        assert_eq!(report.lines_cleared(), 0);
        assert!(!report.is_top_out());
        assert_eq!(field.cells(), piece.cells());
        assert!(field.cells().iter().all(|c| c.color() == Color::GREEN));
        assert_eq!(field.matrix().count_occupied(), 4);
    }

    #[test]
    fn test_multi_row_clear_compacts_in_one_pass() {
        let mut field = Playfield::from_ascii(
            r"
            ..#.......
            .#........
            #########.
            #########.
            #########.
            ",
            1,
        );
        assert_eq!(field.matrix().filled_rows().count(), 0);

        // Vertical I filling column 9 on rows 0-3.
        let mut piece = piece_at(PieceKind::I, 7, 3);
        piece.rotate();
        assert!(piece.cells().iter().all(|c| c.grid_position().1 == 9));
        assert_eq!(lowest_row(&piece), 0);

        let MoveVerdict::Absorbed(report) = field.ok_move(&piece, Instruction::Down) else {
            panic!("expected absorption");
        };
        assert_eq!(report.cleared_rows(), &[0, 1, 2]);

        let expected = Playfield::from_ascii(
            r"
            ..#.......
            .#.......#
            ",
            1,
        );
        assert_eq!(field.matrix(), expected.matrix());
        assert_eq!(field.cells().len(), 3);
        assert!(!field.is_game_over());
    }

    #[test]
    fn test_rearrange_drops_by_rows_cleared_beneath() {
        let mut field = Playfield::from_ascii(
            r"
            ...#......
            ##########
            ..#.......
            ##########
            .#........
            ",
            1,
        );
        let cleared = field.rearrange();
        assert_eq!(cleared.as_slice(), &[1, 3]);
        let after = Playfield::from_ascii(
            r"
            ...#......
            ..#.......
            .#........
            ",
            1,
        );
        assert_eq!(field.matrix(), after.matrix());
    }

    #[test]
    fn test_rearrange_without_full_rows_is_noop() {
        let mut field = Playfield::from_ascii("#########.", 1);
        let before = field.cells().to_vec();
        assert!(field.rearrange().is_empty());
        assert_eq!(field.cells(), &before[..]);
    }

    #[test]
    fn test_lock_in_top_row_is_game_over() {
        let mut field = Playfield::from_ascii(
            r"
            ..........
            ....#.....
            ....#.....
            ....#.....
            ....#.....
            ....#.....
            ....#.....
            ....#.....
            ....#.....
            ....#.....
            ....#.....
            ....#.....
            ....#.....
            ....#.....
            ....#.....
            ....#.....
            ....#.....
            ....#.....
            ....#.....
            ....#.....
            ",
            1,
        );
        assert!(!field.is_game_over());
        // Vertical stack tops out at row 18; an O landing on it reaches rows 19-20.
        let piece = piece_at(PieceKind::O, 4, 21);
        let MoveVerdict::Absorbed(report) = field.ok_move(&piece, Instruction::Down) else {
            panic!("expected absorption");
        };
        assert!(report.is_top_out());
        assert!(field.is_game_over());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut field = Playfield::from_ascii("##########\n#.........", 1);
        field.game_over = true;
        field.reset();
        assert!(field.cells().is_empty());
        assert!(field.matrix().is_empty());
        assert!(!field.is_game_over());
    }
}
