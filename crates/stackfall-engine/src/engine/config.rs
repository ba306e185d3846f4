use rand::Rng as _;
use serde::{Deserialize, Serialize};

use crate::{
    ConfigError, PLAYABLE_HEIGHT, PLAYABLE_WIDTH, PieceKind, PieceSeed, PieceSelector, Point,
    RoundRobin, SevenBag, UniformSelector,
};

/// Tunables of a game session.
///
/// Every field has a default, so a JSON config only needs to list what it
/// changes:
///
/// ```
/// use stackfall_engine::GameConfig;
///
/// let config = GameConfig::from_json_str(r#"{ "gravity": { "min_ms": 50 } }"#).unwrap();
/// assert_eq!(config.gravity.base_ms, 500);
/// assert_eq!(config.gravity.min_ms, 50);
/// assert_eq!(config.cell_size, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Side of one cell in playfield coordinates.
    pub cell_size: i32,
    /// Anchor column for freshly spawned pieces.
    pub spawn_column: i32,
    /// Anchor row for freshly spawned pieces, above the visible area.
    pub spawn_row: i32,
    pub gravity: GravityConfig,
    pub selector: SelectorConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cell_size: 1,
            spawn_column: 4,
            spawn_row: 22,
            gravity: GravityConfig::default(),
            selector: SelectorConfig::default(),
        }
    }
}

impl GameConfig {
    /// Parses a JSON config and validates it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size <= 0 {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }
        self.gravity.validate()?;

        let (min_dx, max_dx) = spawn_extent();
        let width = i32::try_from(PLAYABLE_WIDTH).unwrap_or(i32::MAX);
        if self.spawn_column.saturating_add(min_dx) < 0
            || self.spawn_column.saturating_add(max_dx) > width
        {
            return Err(ConfigError::InvalidSpawnColumn(self.spawn_column));
        }

        let height = i32::try_from(PLAYABLE_HEIGHT).unwrap_or(i32::MAX);
        if self.spawn_row.saturating_add(spawn_floor()) < height {
            return Err(ConfigError::InvalidSpawnRow(self.spawn_row));
        }

        // Rotation boxes reach a few cells past the spawn anchor and the walls.
        let fits = |extent: i32| {
            extent
                .checked_add(COORDINATE_MARGIN)
                .and_then(|cells| cells.checked_mul(self.cell_size))
                .is_some()
        };
        if !fits(self.spawn_row) || !fits(width) {
            return Err(ConfigError::CoordinateOverflow(self.cell_size));
        }
        Ok(())
    }

    /// Spawn anchor in grid units.
    #[must_use]
    pub const fn spawn_point(&self) -> Point {
        Point::new(self.spawn_column, self.spawn_row)
    }
}

/// Cells a piece may reach beyond the spawn anchor or the side walls.
const COORDINATE_MARGIN: i32 = 4;

/// Leftmost and rightmost column offsets covered by any spawn layout,
/// relative to the anchor column.
fn spawn_extent() -> (i32, i32) {
    PieceKind::ALL
        .iter()
        .flat_map(|kind| kind.geometry().layout)
        .fold((0, 0), |(lo, hi), (dx, _)| (lo.min(dx), hi.max(dx + 1)))
}

/// Row offset of the lowest cell any spawn layout covers, relative to the
/// anchor row.
fn spawn_floor() -> i32 {
    PieceKind::ALL
        .iter()
        .flat_map(|kind| kind.geometry().layout)
        .map(|(_, dy)| dy - 1)
        .min()
        .unwrap_or(0)
}

/// Gravity timing: `max(min_ms, base_ms - (level - 1) * step_ms)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GravityConfig {
    pub base_ms: u64,
    pub step_ms: u64,
    pub min_ms: u64,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            base_ms: 500,
            step_ms: 50,
            min_ms: 100,
        }
    }
}

impl GravityConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_ms == 0 {
            return Err(ConfigError::InvalidGravity("min_ms must be positive"));
        }
        if self.min_ms > self.base_ms {
            return Err(ConfigError::InvalidGravity(
                "min_ms must not exceed base_ms",
            ));
        }
        Ok(())
    }
}

/// Which [`PieceSelector`] a session uses.
///
/// Random selectors without a seed draw one from the thread RNG when the
/// selector is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectorConfig {
    #[default]
    RoundRobin,
    SevenBag {
        #[serde(default)]
        seed: Option<PieceSeed>,
    },
    Uniform {
        #[serde(default)]
        seed: Option<PieceSeed>,
    },
}

impl SelectorConfig {
    #[must_use]
    pub fn build(self) -> Box<dyn PieceSelector> {
        match self {
            SelectorConfig::RoundRobin => Box::new(RoundRobin::new()),
            SelectorConfig::SevenBag { seed } => {
                Box::new(SevenBag::with_seed(seed.unwrap_or_else(|| rand::rng().random())))
            }
            SelectorConfig::Uniform { seed } => Box::new(UniformSelector::with_seed(
                seed.unwrap_or_else(|| rand::rng().random()),
            )),
        }
    }
}
