use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use engine::HeadlessRunner;
use engine::agent::{AgentCommand, AgentHost};
use engine::profiling::LogProfiler;
use engine::regression::state_sha256_hex;
use env_logger::Env;
use log::info;
use twenty48::agent::Twenty48Logic;
use twenty48::config::ConfigStore;
use twenty48::render::render_board;
use twenty48::{Direction, Game2048, GameConfig, GameStatus, MoveCheck, RandomTileInitializer};

#[derive(Debug, Parser)]
#[command(name = "twenty48")]
#[command(about = "Play 2048 in the terminal or run a scripted sequence of moves")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct GameArgs {
    /// Seed for tile spawns; omitted means a fresh random seed.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    width: Option<usize>,
    /// Tile value that wins the game.
    #[arg(long)]
    target: Option<u32>,
    /// Treat a full board with a mergeable pair as still movable.
    #[arg(long, default_value_t = false)]
    strict_moves: bool,
    /// JSON config file; defaults to the user config location.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Interactive game: w/a/s/d (or up/left/down/right) then enter, q to quit.
    Play {
        #[command(flatten)]
        game: GameArgs,
    },
    /// Apply a move string such as "LLURD" and print the final board.
    Auto {
        #[arg(long)]
        moves: String,
        #[command(flatten)]
        game: GameArgs,
    },
    /// Read agent commands from stdin (`step <dir>`, `state`, `history`, `reset`)
    /// and answer each with one JSON line.
    Script {
        #[command(flatten)]
        game: GameArgs,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play { game } => cmd_play(&game),
        Commands::Auto { moves, game } => cmd_auto(&moves, &game),
        Commands::Script { game } => cmd_script(&game),
    }
}

fn resolve_config(args: &GameArgs) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ConfigStore::from_env().load(),
    };
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(target) = args.target {
        config.winning_value = target;
    }
    if args.strict_moves {
        config.move_check = MoveCheck::EmptyOrMerge;
    }
    Ok(config.sanitized())
}

fn parse_direction(input: &str) -> Option<Direction> {
    match input.trim().to_ascii_lowercase().as_str() {
        "w" | "k" | "up" => Some(Direction::Up),
        "s" | "j" | "down" => Some(Direction::Down),
        "a" | "h" | "left" => Some(Direction::Left),
        "d" | "l" | "right" => Some(Direction::Right),
        _ => None,
    }
}

fn parse_moves(moves: &str) -> Result<Vec<Direction>> {
    moves
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .map(|c| match c.to_ascii_uppercase() {
            'U' => Ok(Direction::Up),
            'D' => Ok(Direction::Down),
            'L' => Ok(Direction::Left),
            'R' => Ok(Direction::Right),
            other => bail!("unknown move {other:?}; expected one of U, D, L, R"),
        })
        .collect()
}

/// Parse one scripted command; blank lines and `#` comments yield `None`.
fn parse_agent_command(line: &str) -> Result<Option<AgentCommand<Direction>>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut words = line.split_whitespace();
    let command = match (words.next(), words.next()) {
        (Some("step"), Some(dir)) => match parse_direction(dir) {
            Some(direction) => AgentCommand::Step(direction),
            None => bail!("unknown direction {dir:?}"),
        },
        (Some("state"), None) => AgentCommand::GetState,
        (Some("history"), None) => AgentCommand::GetHistory,
        (Some("reset"), None) => AgentCommand::Reset,
        _ => bail!("unrecognized command {line:?}"),
    };
    if words.next().is_some() {
        bail!("trailing input in {line:?}");
    }
    Ok(Some(command))
}

fn cmd_play(args: &GameArgs) -> Result<()> {
    let config = resolve_config(args)?;
    let initializer = match args.seed {
        Some(seed) => RandomTileInitializer::seeded(seed),
        None => RandomTileInitializer::from_entropy(),
    }
    .with_four_probability(config.four_probability);

    let mut game = Game2048::new(config, initializer)?;
    game.initialize()?;
    info!(
        "playing to {} on a {}x{} board",
        config.winning_value, config.width, config.width
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        writeln!(stdout, "\n{}\n", render_board(game.board()))?;
        match game.status() {
            GameStatus::Won => {
                writeln!(stdout, "You reached {}!", config.winning_value)?;
                break;
            }
            GameStatus::Stuck => {
                writeln!(stdout, "No moves left.")?;
                break;
            }
            GameStatus::Uninitialized | GameStatus::InProgress => {}
        }

        write!(stdout, "move> ")?;
        stdout.flush()?;
        let Some(line) = lines.next().transpose()? else {
            break;
        };
        if matches!(line.trim(), "q" | "quit") {
            break;
        }
        let Some(direction) = parse_direction(&line) else {
            writeln!(stdout, "unrecognized move {:?}", line.trim())?;
            continue;
        };
        if !game.process_move(direction)? {
            writeln!(stdout, "nothing moved")?;
        }
    }

    Ok(())
}

fn cmd_auto(moves: &str, args: &GameArgs) -> Result<()> {
    let config = resolve_config(args)?;
    let directions = parse_moves(moves)?;
    let logic = Twenty48Logic::new(args.seed.unwrap_or(0), config)?;

    let mut runner = HeadlessRunner::new(logic);
    let mut profiler = LogProfiler::default();
    for direction in directions {
        if runner.state().status(&config).is_over() {
            info!("game over after frame {}", runner.frame());
            break;
        }
        runner.step_profiled(direction, &mut profiler);
    }

    let state = runner.state();
    println!("{}\n", render_board(state.board()));
    println!("status: {:?}", state.status(&config));
    println!("frames: {} (board changed {} times)", runner.frame(), state.moves());
    println!("sha256: {}", state_sha256_hex(state)?);
    info!(
        "{} steps, mean {:?}, slowest {:?}",
        profiler.steps(),
        profiler.mean(),
        profiler.slowest()
    );
    Ok(())
}

fn cmd_script(args: &GameArgs) -> Result<()> {
    let config = resolve_config(args)?;
    let logic = Twenty48Logic::new(args.seed.unwrap_or(0), config)?;
    let mut host = AgentHost::new(logic);

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        let command = match parse_agent_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                log::warn!("{err}");
                continue;
            }
        };
        let response = host.handle(command);
        serde_json::to_writer(&mut stdout, &response)?;
        writeln!(stdout)?;
    }
    info!("script ended at frame {}", host.runner().frame());
    Ok(())
}
