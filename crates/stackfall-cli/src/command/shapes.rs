use std::path::PathBuf;

use serde::Serialize;
use stackfall_engine::{Bounds, Center, Color, GameConfig, Piece, PieceKind};

use crate::util;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ShapesArg {
    /// Override the cell size from the config
    #[arg(long)]
    size: Option<i32>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ShapeReport {
    kind: PieceKind,
    color: String,
    rot_bounds: Bounds,
    rot_center: Center,
    orientations: Vec<OrientationReport>,
}

#[derive(Debug, Serialize)]
struct OrientationReport {
    state: u8,
    /// `(row, col)` of each cell.
    cells: Vec<(i32, i32)>,
    actual_bounds: Bounds,
}

pub(crate) fn run(arg: &ShapesArg, config: &GameConfig) -> anyhow::Result<()> {
    let config = GameConfig {
        cell_size: arg.size.unwrap_or(config.cell_size),
        ..config.clone()
    };
    config.validate()?;
    let size = config.cell_size;

    let reports: Vec<_> = PieceKind::ALL
        .into_iter()
        .map(|kind| shape_report(kind, &config, size))
        .collect();
    util::save_json(&reports, arg.output.as_deref())
}

fn shape_report(kind: PieceKind, config: &GameConfig, size: i32) -> ShapeReport {
    let mut piece = Piece::new(kind, config.spawn_point(), size);
    let color: Color = piece.color();
    let rot_bounds = piece.rot_bounds();
    let rot_center = piece.rot_center();

    let mut orientations = Vec::with_capacity(4);
    for _ in 0..4 {
        orientations.push(OrientationReport {
            state: piece.rotation().as_u8(),
            cells: piece.cells().iter().map(|c| c.grid_position()).collect(),
            actual_bounds: piece.actual_bounds(),
        });
        piece.rotate();
    }

    ShapeReport {
        kind,
        color: color.to_string(),
        rot_bounds,
        rot_center,
        orientations,
    }
}
