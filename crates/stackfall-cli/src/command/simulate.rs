use std::{path::PathBuf, time::Duration};

use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;
use stackfall_engine::{
    GameConfig, GameEvent, GameSession, GameStats, GravityTick, Instruction, PieceSeed,
    SelectorConfig, SessionState,
};

use crate::util;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: usize,
    /// Stop a game after this many commands
    #[arg(long, default_value_t = 5000)]
    max_commands: usize,
    /// Simulated time between two commands, in milliseconds
    #[arg(long, default_value_t = 100)]
    command_interval_ms: u64,
    /// Seed for commands and piece selection (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Piece selector, overriding the config
    #[arg(long, value_enum)]
    selector: Option<SelectorArg>,
    /// Include the final board of every game
    #[arg(long)]
    show_board: bool,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum SelectorArg {
    RoundRobin,
    SevenBag,
    Uniform,
}

impl SelectorArg {
    fn to_config(self, seed: PieceSeed) -> SelectorConfig {
        match self {
            SelectorArg::RoundRobin => SelectorConfig::RoundRobin,
            SelectorArg::SevenBag => SelectorConfig::SevenBag { seed: Some(seed) },
            SelectorArg::Uniform => SelectorConfig::Uniform { seed: Some(seed) },
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Command {
    Move(Instruction),
    HardDrop,
    TogglePause,
}

impl Command {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.random_range(0..100) {
            0..25 => Command::Move(Instruction::Left),
            25..50 => Command::Move(Instruction::Right),
            50..75 => Command::Move(Instruction::Rotate),
            75..93 => Command::Move(Instruction::Down),
            93..99 => Command::HardDrop,
            _ => Command::TogglePause,
        }
    }
}

#[derive(Debug, Default, Serialize)]
struct EventCounts {
    spawned: usize,
    locked: usize,
    line_clears: usize,
    pauses: usize,
    resumes: usize,
}

impl EventCounts {
    fn record(&mut self, event: &GameEvent) {
        log::trace!("{event}");
        match event {
            GameEvent::PieceSpawned { .. } => self.spawned += 1,
            GameEvent::PieceLocked { .. } => self.locked += 1,
            GameEvent::LinesCleared { .. } => self.line_clears += 1,
            GameEvent::Paused => self.pauses += 1,
            GameEvent::Resumed => self.resumes += 1,
            GameEvent::ScoreChanged { .. } | GameEvent::Reset | GameEvent::GameOver => {}
        }
    }
}

#[derive(Debug, Serialize)]
struct GameReport {
    game: usize,
    commands: usize,
    gravity_ticks: usize,
    state: SessionState,
    stats: GameStats,
    events: EventCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    board: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    seed: u64,
    config: GameConfig,
    games: Vec<GameReport>,
}

/// Gravity tick waiting to fire, with the simulated time left until it does.
type PendingTick = Option<(GravityTick, Duration)>;

pub(crate) fn run(arg: &SimulateArg, mut config: GameConfig) -> anyhow::Result<()> {
    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = Pcg32::seed_from_u64(seed);
    if let Some(selector) = arg.selector {
        config.selector = selector.to_config(rng.random());
    }
    log::info!("simulating {} game(s) with seed {seed}", arg.games);

    let mut games = Vec::with_capacity(arg.games);
    for game in 0..arg.games {
        let report = play_game(arg, game, &config, &mut rng)?;
        log::info!(
            "game {game}: score {}, {} line(s), level {} after {} command(s)",
            report.stats.score(),
            report.stats.total_cleared_lines(),
            report.stats.level(),
            report.commands
        );
        games.push(report);
    }

    util::save_json(
        &SimulationReport {
            seed,
            config,
            games,
        },
        arg.output.as_deref(),
    )
}

fn play_game(
    arg: &SimulateArg,
    game: usize,
    config: &GameConfig,
    rng: &mut Pcg32,
) -> anyhow::Result<GameReport> {
    let mut session = GameSession::with_config(config.clone())?;
    let mut events = EventCounts::default();
    let mut pending: PendingTick = session.start_gravity().map(|tick| (tick, tick.delay()));
    let mut gravity_ticks = 0;
    let mut commands = 0;
    let step = Duration::from_millis(arg.command_interval_ms);

    while !session.is_game_over() && commands < arg.max_commands {
        match Command::random(rng) {
            Command::Move(instr) => {
                session.apply_command(instr);
            }
            Command::HardDrop => {
                session.hard_drop();
            }
            Command::TogglePause => {
                if let Some(tick) = session.toggle_pause() {
                    pending = Some((tick, tick.delay()));
                }
            }
        }
        commands += 1;
        gravity_ticks += advance_clock(&mut session, &mut pending, step);

        for event in session.drain_events() {
            events.record(&event);
        }
    }

    let board = arg.show_board.then(|| {
        session
            .matrix()
            .to_string()
            .lines()
            .map(str::to_owned)
            .collect()
    });

    Ok(GameReport {
        game,
        commands,
        gravity_ticks,
        state: session.session_state(),
        stats: session.stats().clone(),
        events,
        board,
    })
}

/// Delivers every gravity tick that falls due within `elapsed` and returns
/// how many were delivered.
fn advance_clock(
    session: &mut GameSession,
    pending: &mut PendingTick,
    mut elapsed: Duration,
) -> usize {
    let mut delivered = 0;
    while let Some((tick, remaining)) = *pending {
        if elapsed < remaining {
            *pending = Some((tick, remaining - elapsed));
            break;
        }
        elapsed -= remaining;
        delivered += 1;
        *pending = session.on_gravity(tick).map(|next| (next, next.delay()));
    }
    delivered
}
