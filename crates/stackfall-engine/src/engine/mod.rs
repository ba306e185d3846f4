//! Game rules on top of the geometry in [`crate::core`].
//!
//! - [`Playfield`] - The stack of locked cells; decides whether a move is legal
//! - [`GameSession`] - A running game: falling piece, selector, scoring, gravity
//! - [`GameStats`] - Score, cleared lines and level
//! - [`PieceSelector`] - Source of the next piece kind
//! - [`GameConfig`] - Session tunables, loadable from JSON
//!
//! # Game Flow
//!
//! 1. A new session spawns the first piece above the visible area
//! 2. The collaborator arms the tick from [`GameSession::start_gravity`] and
//!    forwards player commands
//! 3. A blocked down move locks the piece, clears full rows and spawns the
//!    next one
//! 4. Repeat until a locked cell reaches the top row
//!
//! # Example
//!
//! ```
//! use stackfall_engine::{GameEvent, GameSession, Instruction};
//!
//! let mut session = GameSession::new();
//! session.apply_command(Instruction::Rotate);
//! session.hard_drop();
//!
//! let events = session.drain_events();
//! assert!(events.iter().any(GameEvent::is_piece_locked));
//! ```

pub use self::{
    config::*,
    event::*,
    game_session::*,
    game_stats::*,
    gravity::{GravityTick, gravity_interval},
    piece_selector::*,
    playfield::*,
};

mod config;
mod event;
mod game_session;
mod game_stats;
mod gravity;
mod piece_selector;
mod playfield;
