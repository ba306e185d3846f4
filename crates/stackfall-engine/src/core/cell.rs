use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::MalformedCellError;

/// A corner of a cell in playfield coordinates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Deserialize, Serialize,
)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Pivot of a rotation.
///
/// Pivots sit on grid points or on half-grid points (the middle of a 3×3
/// bounding box), so they are kept as floating point values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct Center {
    pub x: f64,
    pub y: f64,
}

impl Center {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box given by its lower-left `(xl, yl)` and upper-right
/// `(xh, yh)` corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Bounds {
    pub xl: i32,
    pub yl: i32,
    pub xh: i32,
    pub yh: i32,
}

impl Bounds {
    #[must_use]
    pub const fn new(xl: i32, yl: i32, xh: i32, yh: i32) -> Self {
        Self { xl, yl, xh, yh }
    }

    /// Adds `offsets[i] * size` to the i-th component `(xl, yl, xh, yh)`.
    #[must_use]
    pub const fn offset_by(self, offsets: [i32; 4], size: i32) -> Self {
        Self {
            xl: self.xl + offsets[0] * size,
            yl: self.yl + offsets[1] * size,
            xh: self.xh + offsets[2] * size,
            yh: self.yh + offsets[3] * size,
        }
    }

    #[must_use]
    pub fn center(self) -> Center {
        Center::new(
            f64::from(self.xl + self.xh) / 2.0,
            f64::from(self.yl + self.yh) / 2.0,
        )
    }
}

/// Cosmetic fill color. Game logic never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, derive_more::Display)]
#[display("#{r:02x}{g:02x}{b:02x}")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);
    pub const YELLOW: Self = Self::rgb(0xff, 0xff, 0x00);
    pub const LIGHT_BLUE: Self = Self::rgb(0xad, 0xd8, 0xe6);
    pub const RED: Self = Self::rgb(0xff, 0x00, 0x00);
    pub const GREEN: Self = Self::rgb(0x00, 0x80, 0x00);
    pub const PURPLE: Self = Self::rgb(0x80, 0x00, 0x80);
    pub const ORANGE: Self = Self::rgb(0xff, 0xa5, 0x00);
    pub const BLUE: Self = Self::rgb(0x00, 0x00, 0xff);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A single grid-aligned square of the playfield.
///
/// Two cells compare equal when they cover the same four corners, whatever
/// their order, color or state.
#[derive(Debug, Clone, Serialize)]
pub struct Cell {
    corners: [Point; 4],
    size: i32,
    color: Color,
    state: u8,
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.sorted_corners() == other.sorted_corners()
    }
}

impl Eq for Cell {}

impl Cell {
    /// Builds a cell from explicit corners, rejecting anything that is not an
    /// axis-aligned square of side `size`.
    pub fn new(size: i32, color: Color, corners: &[Point]) -> Result<Self, MalformedCellError> {
        if size <= 0 {
            return Err(MalformedCellError::InvalidSize(size));
        }
        let corners: [Point; 4] = corners
            .try_into()
            .map_err(|_| MalformedCellError::WrongCornerCount(corners.len()))?;
        for (i, p) in corners.iter().enumerate() {
            if corners[i + 1..].contains(p) {
                return Err(MalformedCellError::DuplicateCorner(*p));
            }
        }

        // Four distinct points with two x values and two y values, each pair
        // `size` apart, are exactly the corners of the square.
        let xl = corners.iter().map(|p| p.x).min().unwrap_or_default();
        let yl = corners.iter().map(|p| p.y).min().unwrap_or_default();
        let on_square = corners
            .iter()
            .all(|p| (p.x == xl || p.x == xl + size) && (p.y == yl || p.y == yl + size));
        if !on_square {
            return Err(MalformedCellError::NotSquare(size));
        }

        Ok(Self {
            corners,
            size,
            color,
            state: 0,
        })
    }

    /// Builds the cell whose top-left corner is `(x, y)`.
    ///
    /// Corners are listed clockwise starting from the top-right one, the order
    /// in which a pen heading east traces the square.
    #[must_use]
    pub fn from_top_left(x: i32, y: i32, size: i32, color: Color) -> Self {
        debug_assert!(size > 0, "cell size must be positive");
        Self {
            corners: [
                Point::new(x + size, y),
                Point::new(x + size, y - size),
                Point::new(x, y - size),
                Point::new(x, y),
            ],
            size,
            color,
            state: 0,
        }
    }

    #[must_use]
    pub fn corners(&self) -> &[Point; 4] {
        &self.corners
    }

    #[must_use]
    pub fn size(&self) -> i32 {
        self.size
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn state(&self) -> u8 {
        self.state
    }

    pub fn set_state(&mut self, state: u8) {
        self.state = state;
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        let mut bounds = Bounds::new(i32::MAX, i32::MAX, i32::MIN, i32::MIN);
        for p in &self.corners {
            bounds.xl = bounds.xl.min(p.x);
            bounds.yl = bounds.yl.min(p.y);
            bounds.xh = bounds.xh.max(p.x);
            bounds.yh = bounds.yh.max(p.y);
        }
        bounds
    }

    #[must_use]
    pub fn lower_left(&self) -> Point {
        let Bounds { xl, yl, .. } = self.bounds();
        Point::new(xl, yl)
    }

    /// Returns the `(row, col)` the lower-left corner maps to.
    ///
    /// Uses floor division, so cells below the floor or left of the wall get
    /// negative indices.
    #[must_use]
    pub fn grid_position(&self) -> (i32, i32) {
        let ll = self.lower_left();
        (ll.y.div_euclid(self.size), ll.x.div_euclid(self.size))
    }

    /// Shifts all corners by `dx` columns and `dy` rows.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        for p in &mut self.corners {
            p.x += dx * self.size;
            p.y += dy * self.size;
        }
    }

    #[must_use]
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        let mut cell = self.clone();
        cell.translate(dx, dy);
        cell
    }

    /// Rotates all corners 90° clockwise around `center`.
    pub fn rotate(&mut self, center: Center) {
        for p in &mut self.corners {
            *p = rotate_point(*p, center);
        }
    }

    #[must_use]
    pub fn rotated(&self, center: Center) -> Self {
        let mut cell = self.clone();
        cell.rotate(center);
        cell
    }

    fn sorted_corners(&self) -> [Point; 4] {
        let mut corners = self.corners;
        corners.sort_unstable();
        corners
    }
}

/// x' = xc + (x - xc)·cos(-π/2) - (y - yc)·sin(-π/2)
/// y' = yc + (x - xc)·sin(-π/2) + (y - yc)·cos(-π/2)
#[expect(clippy::cast_possible_truncation)]
fn rotate_point(p: Point, center: Center) -> Point {
    let (sin, cos) = (-FRAC_PI_2).sin_cos();
    let dx = f64::from(p.x) - center.x;
    let dy = f64::from(p.y) - center.y;
    let x = center.x + dx * cos - dy * sin;
    let y = center.y + dx * sin + dy * cos;
    Point::new(x.round() as i32, y.round() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(i32, i32)]) -> Vec<Point> {
        raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_new_rejects_wrong_corner_count() {
        let err = Cell::new(1, Color::RED, &pts(&[(0, 0), (1, 0), (1, 1)])).unwrap_err();
        assert_eq!(err, MalformedCellError::WrongCornerCount(3));

        let err = Cell::new(
            1,
            Color::RED,
            &pts(&[(0, 0), (1, 0), (1, 1), (0, 1), (0, 0)]),
        )
        .unwrap_err();
        assert_eq!(err, MalformedCellError::WrongCornerCount(5));
    }

    #[test]
    fn test_new_rejects_duplicate_corners() {
        let err = Cell::new(1, Color::RED, &pts(&[(0, 0), (1, 0), (0, 0), (0, 1)])).unwrap_err();
        assert_eq!(err, MalformedCellError::DuplicateCorner(Point::new(0, 0)));
    }

    #[test]
    fn test_new_rejects_non_square() {
        let err = Cell::new(2, Color::RED, &pts(&[(0, 0), (1, 0), (1, 1), (0, 1)])).unwrap_err();
        assert_eq!(err, MalformedCellError::NotSquare(2));

        let err = Cell::new(1, Color::RED, &pts(&[(0, 0), (1, 0), (2, 1), (0, 1)])).unwrap_err();
        assert_eq!(err, MalformedCellError::NotSquare(1));
    }

    #[test]
    fn test_new_rejects_non_positive_size() {
        let err = Cell::new(0, Color::RED, &pts(&[(0, 0), (1, 0), (1, 1), (0, 1)])).unwrap_err();
        assert_eq!(err, MalformedCellError::InvalidSize(0));
    }

    #[test]
    fn test_equality_ignores_order_and_color() {
        let c1 = Cell::new(2, Color::RED, &pts(&[(-1, 1), (1, 1), (1, -1), (-1, -1)])).unwrap();
        let c2 = Cell::new(2, Color::BLUE, &pts(&[(-1, -1), (1, 1), (-1, 1), (1, -1)])).unwrap();
        assert_eq!(c1, c2);
        assert_ne!(c1, c2.shifted(1, 0));
    }

    #[test]
    fn test_rotate_about_own_center() {
        let mut cell =
            Cell::new(2, Color::RED, &pts(&[(-1, 1), (1, 1), (1, -1), (-1, -1)])).unwrap();
        cell.rotate(Center::new(0.0, 0.0));
        assert_eq!(cell.corners(), &pts(&[(1, 1), (1, -1), (-1, -1), (-1, 1)])[..]);
    }

    #[test]
    fn test_rotate_about_half_grid_center_is_exact() {
        let cell = Cell::from_top_left(0, 1, 1, Color::RED);
        let rotated = cell.rotated(Center::new(1.5, -0.5));
        // (x, y) -> (xc + (y - yc), yc - (x - xc))
        assert_eq!(
            rotated.corners(),
            &pts(&[(3, 0), (2, 0), (2, 1), (3, 1)])[..]
        );
        assert_eq!(rotated.bounds(), Bounds::new(2, 0, 3, 1));
    }

    #[test]
    fn test_four_rotations_restore_corners() {
        let cell = Cell::from_top_left(3, 7, 20, Color::GREEN);
        let center = Center::new(30.0, -10.0);
        let back = cell
            .rotated(center)
            .rotated(center)
            .rotated(center)
            .rotated(center);
        assert_eq!(back.corners(), cell.corners());
    }

    #[test]
    fn test_translate() {
        let mut cell =
            Cell::new(2, Color::RED, &pts(&[(-1, 1), (1, 1), (1, -1), (-1, -1)])).unwrap();
        cell.translate(1, 0);
        assert_eq!(cell.corners(), &pts(&[(1, 1), (3, 1), (3, -1), (1, -1)])[..]);
        cell.translate(0, -1);
        assert_eq!(cell.corners(), &pts(&[(1, -1), (3, -1), (3, -3), (1, -3)])[..]);
    }

    #[test]
    fn test_from_top_left_grid_position() {
        let cell = Cell::from_top_left(40, 220, 20, Color::WHITE);
        assert_eq!(cell.bounds(), Bounds::new(40, 200, 60, 220));
        assert_eq!(cell.grid_position(), (10, 2));

        let below_floor = Cell::from_top_left(0, 0, 20, Color::WHITE);
        assert_eq!(below_floor.grid_position(), (-1, 0));
    }

    #[test]
    fn test_color_display() {
        assert_eq!(Color::ORANGE.to_string(), "#ffa500");
    }
}
