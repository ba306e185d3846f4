use serde::Serialize;

use crate::PieceKind;

/// Something a collaborator may want to react to.
///
/// Events are queued by the session as they happen and handed out by
/// [`GameSession::drain_events`](crate::GameSession::drain_events).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_more::Display, derive_more::IsVariant)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    #[display("spawned {kind:?}")]
    PieceSpawned { kind: PieceKind },
    #[display("locked {kind:?}")]
    PieceLocked { kind: PieceKind },
    #[display("cleared {count} line(s)")]
    LinesCleared { count: usize },
    #[display("score {score} (level {level})")]
    ScoreChanged { score: usize, level: usize },
    #[display("paused")]
    Paused,
    #[display("resumed")]
    Resumed,
    #[display("reset")]
    Reset,
    #[display("game over")]
    GameOver,
}
