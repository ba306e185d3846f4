use std::mem;

use serde::Serialize;

use crate::{
    ConfigError,
    core::{Cell, Direction, OccupancyMatrix, Piece},
};

use super::{
    GameConfig, GameEvent, GameStats, GravityTick, Instruction, LockReport, MoveVerdict,
    PieceSelector, Playfield, gravity::GravityTimer, gravity_interval,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Playing,
    Paused,
    GameOver,
}

/// Result of a command sent to the session.
#[derive(Debug, Clone, PartialEq, derive_more::IsVariant)]
pub enum CommandOutcome {
    /// The session is paused, over, or has no active piece.
    Ignored,
    /// The active piece moved or rotated.
    Applied,
    /// The move was refused and the piece stayed put.
    Denied,
    /// The piece was locked into the stack.
    Locked(LockReport),
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub stats: GameStats,
    pub matrix: OccupancyMatrix,
    pub stack: Vec<Cell>,
    pub active: Option<Piece>,
}

/// One game: the playfield, the falling piece, the piece supply and the
/// score.
///
/// The session is driven from outside. Commands come in through
/// [`apply_command`](Self::apply_command) and [`hard_drop`](Self::hard_drop),
/// gravity through [`on_gravity`](Self::on_gravity) with the ticks the
/// session hands out, and observable changes are collected with
/// [`drain_events`](Self::drain_events).
///
/// # Example
///
/// ```
/// use stackfall_engine::{GameSession, Instruction};
///
/// let mut session = GameSession::new();
/// let tick = session.start_gravity().unwrap();
///
/// session.apply_command(Instruction::Left);
/// let outcome = session.hard_drop();
/// assert!(outcome.is_locked());
///
/// // The tick armed before the lock is still the outstanding one.
/// assert!(session.on_gravity(tick).is_some());
/// ```
#[derive(Debug)]
pub struct GameSession {
    config: GameConfig,
    field: Playfield,
    selector: Box<dyn PieceSelector>,
    active: Option<Piece>,
    stats: GameStats,
    session_state: SessionState,
    gravity: GravityTimer,
    events: Vec<GameEvent>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Creates a session with the default config and the round-robin
    /// selector, with the first piece already spawned.
    #[must_use]
    pub fn new() -> Self {
        let config = GameConfig::default();
        let selector = config.selector.build();
        Self::build(config, selector)
    }

    pub fn with_config(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let selector = config.selector.build();
        Ok(Self::build(config, selector))
    }

    /// Like [`Self::with_config`], but with a caller-provided selector. The
    /// selector named in `config` is ignored.
    pub fn with_selector(
        config: GameConfig,
        selector: Box<dyn PieceSelector>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, selector))
    }

    fn build(config: GameConfig, selector: Box<dyn PieceSelector>) -> Self {
        let mut session = Self {
            field: Playfield::new(config.cell_size),
            config,
            selector,
            active: None,
            stats: GameStats::new(),
            session_state: SessionState::Playing,
            gravity: GravityTimer::default(),
            events: Vec::new(),
        };
        session.spawn();
        session
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn field(&self) -> &Playfield {
        &self.field
    }

    #[must_use]
    pub fn matrix(&self) -> &OccupancyMatrix {
        self.field.matrix()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn lines_cleared(&self) -> usize {
        self.stats.total_cleared_lines()
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.stats.level()
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    /// Whether the session still accepts commands once unpaused.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.session_state.is_game_over()
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.session_state.is_paused()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.session_state.is_game_over()
    }

    #[must_use]
    pub fn active_piece(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    /// Current delay between gravity steps.
    #[must_use]
    pub fn gravity_interval(&self) -> std::time::Duration {
        gravity_interval(self.stats.level(), &self.config.gravity)
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.session_state,
            stats: self.stats.clone(),
            matrix: self.field.matrix().clone(),
            stack: self.field.cells().to_vec(),
            active: self.active.clone(),
        }
    }

    /// Hands out every event queued since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.events)
    }

    /// Draws the next kind and places it above the visible area.
    ///
    /// Does nothing once the game is over.
    pub fn spawn(&mut self) {
        if self.is_game_over() {
            return;
        }
        let kind = self.selector.next_kind();
        let piece = Piece::new(kind, self.config.spawn_point(), self.config.cell_size);
        log::debug!("spawned {kind:?}");
        self.active = Some(piece);
        self.events.push(GameEvent::PieceSpawned { kind });
    }

    /// Returns a fresh gravity tick, if none is outstanding and the game is
    /// running.
    pub fn start_gravity(&mut self) -> Option<GravityTick> {
        if !self.session_state.is_playing() {
            return None;
        }
        self.gravity.arm(self.gravity_interval())
    }

    /// Runs one gravity step for a tick handed out earlier and returns the
    /// next tick to arm.
    ///
    /// Ticks that already fired or were retired by a pause or reset, and
    /// ticks arriving while paused or after game over, are dropped without
    /// effect.
    pub fn on_gravity(&mut self, tick: GravityTick) -> Option<GravityTick> {
        if !self.session_state.is_playing() || !self.gravity.fire(tick) {
            log::trace!("dropped stale gravity tick #{}", tick.serial());
            return None;
        }
        self.tick();
        self.start_gravity()
    }

    /// One gravity step: moves the active piece down or locks it.
    pub fn tick(&mut self) -> CommandOutcome {
        self.apply_command(Instruction::Down)
    }

    /// Validates `instr` against the playfield and applies it to the active
    /// piece if allowed.
    pub fn apply_command(&mut self, instr: Instruction) -> CommandOutcome {
        if self.field.is_game_over() {
            self.game_over();
        }
        if !self.session_state.is_playing() {
            return CommandOutcome::Ignored;
        }
        let Some(piece) = self.active.as_mut() else {
            return CommandOutcome::Ignored;
        };

        match self.field.ok_move(piece, instr) {
            MoveVerdict::Allowed => {
                match instr {
                    Instruction::Down => piece.step(Direction::Down),
                    Instruction::Left => piece.step(Direction::Left),
                    Instruction::Right => piece.step(Direction::Right),
                    Instruction::Rotate => piece.rotate(),
                }
                CommandOutcome::Applied
            }
            MoveVerdict::Denied => CommandOutcome::Denied,
            MoveVerdict::Absorbed(report) => {
                self.complete_piece_drop(&report);
                CommandOutcome::Locked(report)
            }
        }
    }

    /// Drops the active piece as far as it goes and locks it there.
    pub fn hard_drop(&mut self) -> CommandOutcome {
        loop {
            match self.apply_command(Instruction::Down) {
                CommandOutcome::Applied => {}
                outcome => return outcome,
            }
        }
    }

    pub fn pause(&mut self) {
        if !self.session_state.is_playing() {
            return;
        }
        log::debug!("paused");
        self.session_state = SessionState::Paused;
        self.gravity.invalidate();
        self.events.push(GameEvent::Paused);
    }

    /// Continues a paused game and returns the gravity tick to arm.
    pub fn resume(&mut self) -> Option<GravityTick> {
        if !self.session_state.is_paused() {
            return None;
        }
        log::debug!("resumed");
        self.session_state = SessionState::Playing;
        self.events.push(GameEvent::Resumed);
        self.start_gravity()
    }

    pub fn toggle_pause(&mut self) -> Option<GravityTick> {
        match self.session_state {
            SessionState::Playing => {
                self.pause();
                None
            }
            SessionState::Paused => self.resume(),
            SessionState::GameOver => None,
        }
    }

    /// Starts over with an empty playfield and fresh stats.
    ///
    /// Ticks handed out before the reset become stale; the returned tick
    /// starts gravity for the new game.
    pub fn reset(&mut self) -> Option<GravityTick> {
        log::debug!("reset");
        self.field.reset();
        self.stats = GameStats::new();
        self.active = None;
        self.session_state = SessionState::Playing;
        self.gravity.invalidate();
        self.events.push(GameEvent::Reset);
        self.spawn();
        self.start_gravity()
    }

    /// Ends the game. Calling it again has no effect.
    pub fn game_over(&mut self) {
        if self.session_state.is_game_over() {
            return;
        }
        log::debug!(
            "game over: score {}, {} line(s), level {}",
            self.stats.score(),
            self.stats.total_cleared_lines(),
            self.stats.level()
        );
        self.session_state = SessionState::GameOver;
        self.gravity.invalidate();
        self.events.push(GameEvent::GameOver);
    }

    fn complete_piece_drop(&mut self, report: &LockReport) {
        self.active = None;
        self.events.push(GameEvent::PieceLocked {
            kind: report.kind(),
        });

        let lines = report.lines_cleared();
        let points = self.stats.complete_piece_drop(lines);
        if lines > 0 {
            self.events.push(GameEvent::LinesCleared { count: lines });
        }
        if points > 0 {
            self.events.push(GameEvent::ScoreChanged {
                score: self.stats.score(),
                level: self.stats.level(),
            });
        }

        if report.is_top_out() {
            self.game_over();
        } else {
            self.spawn();
        }
    }
}
