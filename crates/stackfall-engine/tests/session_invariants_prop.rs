//! Property tests over random command streams.
//!
//! Invariants covered:
//! - The occupancy matrix always matches the stack cells inside the visible
//!   area.
//! - No full row survives a lock.
//! - The active piece never leaves the walls or sinks below the floor.
//! - Stack size equals four cells per locked piece minus ten per cleared line.
//! - Score and line counts never decrease; level is `lines / 10 + 1`.
//! - Once over, the game stays over.

use proptest::prelude::*;
use stackfall_engine::{
    CommandOutcome, GameConfig, GameSession, Instruction, PLAYABLE_HEIGHT, PLAYABLE_WIDTH,
    PieceSeed, SelectorConfig,
};

#[derive(Debug, Clone, Copy)]
enum Command {
    Move(Instruction),
    HardDrop,
}

fn any_command() -> impl Strategy<Value = Command> {
    prop_oneof![
        3 => Just(Command::Move(Instruction::Down)),
        3 => Just(Command::Move(Instruction::Left)),
        3 => Just(Command::Move(Instruction::Right)),
        3 => Just(Command::Move(Instruction::Rotate)),
        1 => Just(Command::HardDrop),
    ]
}

fn session(seed: u128, size: i32) -> GameSession {
    let config = GameConfig {
        cell_size: size,
        selector: SelectorConfig::SevenBag {
            seed: Some(PieceSeed::from_u128(seed)),
        },
        ..GameConfig::default()
    };
    GameSession::with_config(config).unwrap()
}

fn assert_matrix_matches_stack(session: &GameSession) {
    let mut expected = [[false; PLAYABLE_WIDTH]; PLAYABLE_HEIGHT];
    for cell in session.field().cells() {
        let (row, col) = cell.grid_position();
        if let (Ok(row), Ok(col)) = (usize::try_from(row), usize::try_from(col))
            && row < PLAYABLE_HEIGHT
            && col < PLAYABLE_WIDTH
        {
            assert!(!expected[row][col], "two stack cells at ({row}, {col})");
            expected[row][col] = true;
        }
    }
    assert_eq!(session.matrix().to_bools(), expected);
}

proptest! {
    #[test]
    fn random_commands_keep_session_consistent(
        seed in any::<u128>(),
        size in prop::sample::select(vec![1, 7, 20]),
        commands in prop::collection::vec(any_command(), 1..400),
    ) {
        let mut session = session(seed, size);
        let width = i32::try_from(PLAYABLE_WIDTH).unwrap() * size;

        for command in commands {
            let was_over = session.is_game_over();
            let before = session.stats().clone();

            let outcome = match command {
                Command::Move(instr) => session.apply_command(instr),
                Command::HardDrop => session.hard_drop(),
            };

            if was_over {
                prop_assert!(outcome.is_ignored());
                prop_assert!(session.is_game_over());
                prop_assert_eq!(session.stats(), &before);
                continue;
            }

            let stats = session.stats();
            prop_assert!(stats.score() >= before.score());
            prop_assert!(stats.total_cleared_lines() >= before.total_cleared_lines());
            prop_assert_eq!(stats.level(), stats.total_cleared_lines() / 10 + 1);
            prop_assert_eq!(
                session.field().cells().len(),
                4 * stats.completed_pieces() - 10 * stats.total_cleared_lines()
            );

            if let CommandOutcome::Locked(report) = &outcome {
                prop_assert_eq!(stats.completed_pieces(), before.completed_pieces() + 1);
                prop_assert_eq!(session.matrix().filled_rows().count(), 0);
                prop_assert_eq!(report.is_top_out(), session.is_game_over());
            }

            assert_matrix_matches_stack(&session);

            if let Some(piece) = session.active_piece() {
                for cell in piece.cells() {
                    let b = cell.bounds();
                    prop_assert!(b.xl >= 0 && b.xh <= width);
                    prop_assert!(b.yl >= 0);
                }
            }
        }
    }

    #[test]
    fn hard_drop_always_locks_while_playing(
        seed in any::<u128>(),
        drops in 1usize..60,
    ) {
        let mut session = session(seed, 1);
        for _ in 0..drops {
            let outcome = session.hard_drop();
            if session.is_game_over() && !outcome.is_locked() {
                prop_assert!(outcome.is_ignored());
                break;
            }
            prop_assert!(outcome.is_locked());
        }
    }
}
