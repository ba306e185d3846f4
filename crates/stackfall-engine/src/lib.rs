pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// A cell was constructed from corners that do not describe a unit square.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MalformedCellError {
    #[display("cell needs exactly 4 corners, got {_0}")]
    WrongCornerCount(#[error(not(source))] usize),
    #[display("cell corner ({}, {}) appears more than once", _0.x, _0.y)]
    DuplicateCorner(#[error(not(source))] Point),
    #[display("cell size must be positive, got {_0}")]
    InvalidSize(#[error(not(source))] i32),
    #[display("cell corners do not form an axis-aligned square of side {_0}")]
    NotSquare(#[error(not(source))] i32),
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ConfigError {
    #[display("cell size must be positive, got {_0}")]
    #[from(ignore)]
    InvalidCellSize(#[error(not(source))] i32),
    #[display("invalid gravity timing: {_0}")]
    #[from(ignore)]
    InvalidGravity(#[error(not(source))] &'static str),
    #[display("spawn column {_0} pushes a piece outside the playfield")]
    #[from(ignore)]
    InvalidSpawnColumn(#[error(not(source))] i32),
    #[display("spawn row {_0} places a piece inside the visible playfield")]
    #[from(ignore)]
    InvalidSpawnRow(#[error(not(source))] i32),
    #[display("cell size {_0} overflows playfield coordinates")]
    #[from(ignore)]
    CoordinateOverflow(#[error(not(source))] i32),
    #[display("failed to parse game config: {_0}")]
    Json(serde_json::Error),
}
