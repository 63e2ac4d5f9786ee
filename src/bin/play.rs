use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::{Level, LevelFilter};
use maze_chase::constants::{READY_FRAMES, TICK_MS};
use maze_chase::engine::{GameEngine, Observer};
use maze_chase::error::EngineError;
use maze_chase::logging::{self, emit_log};
use maze_chase::types::{Direction, GameSnapshot, GameStatus};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play in the terminal: w/a/s/d to steer, q to quit")]
struct Cli {
    #[arg(long)]
    config: PathBuf,
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Move(Direction),
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let normalized = line.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "q" | "quit" => Some(Command::Quit),
        other => Direction::parse_move(other).map(Command::Move),
    }
}

/// Prints a status line whenever score, lives, level or status change.
#[derive(Default)]
struct StatusPrinter {
    last_line: Option<String>,
}

impl Observer for StatusPrinter {
    fn update(&mut self, snapshot: &GameSnapshot) {
        let line = status_line(snapshot);
        if self.last_line.as_deref() != Some(line.as_str()) {
            println!("{line}");
            self.last_line = Some(line);
        }
    }
}

fn status_line(snapshot: &GameSnapshot) -> String {
    format!(
        "level {}/{}  score {}  lives {}  {}",
        snapshot.level_no + 1,
        snapshot.num_levels,
        snapshot.score,
        snapshot.num_lives,
        snapshot.status
    )
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if logging::init(cli.log_level).is_err() {
        eprintln!("[play] logger already installed");
    }
    match play(&cli).await {
        Ok(status) => emit_log(
            Level::Info,
            "session_finished",
            None,
            json!({ "status": status }),
        ),
        Err(error) => {
            emit_log(
                Level::Error,
                "session_failed",
                None,
                json!({
                    "config": cli.config.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
    }
}

async fn play(cli: &Cli) -> Result<GameStatus, EngineError> {
    let mut engine = GameEngine::from_config_file(&cli.config)?;
    engine.register_observer(Box::new(StatusPrinter::default()));

    let (tx, mut rx) = mpsc::channel::<Command>(32);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let Some(command) = parse_command(&line) else {
                continue;
            };
            if tx.send(command).await.is_err() {
                break;
            }
        }
    });

    engine.start_game()?;
    let mut interval = tokio::time::interval(Duration::from_millis(TICK_MS));
    let mut ready_frames = READY_FRAMES;
    let mut input_open = true;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if ready_frames > 0 {
                    ready_frames -= 1;
                    continue;
                }
                engine.tick()?;
                if engine.is_terminal() {
                    break;
                }
            }
            command = rx.recv(), if input_open => match command {
                Some(Command::Move(direction)) => engine.move_intent(direction),
                Some(Command::Quit) => {
                    engine.end_game();
                    break;
                }
                None => input_open = false,
            },
        }
    }

    Ok(engine.get_game_status())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_accept_keys_words_and_whitespace() {
        assert_eq!(parse_command("w"), Some(Command::Move(Direction::Up)));
        assert_eq!(parse_command("  LEFT \n"), Some(Command::Move(Direction::Left)));
        assert_eq!(parse_command("q"), Some(Command::Quit));
        assert_eq!(parse_command("jump"), None);
        assert_eq!(parse_command(""), None);
    }

    #[test]
    fn printer_skips_unchanged_status() {
        let snapshot = GameSnapshot {
            status: GameStatus::Ready,
            score: 300,
            num_lives: 2,
            level_no: 0,
            num_levels: 2,
            tick: 40,
            ghost_mode: None,
            pellets_remaining: 5,
        };
        assert_eq!(status_line(&snapshot), "level 1/2  score 300  lives 2  READY!");

        let mut printer = StatusPrinter::default();
        printer.update(&snapshot);
        let first = printer.last_line.clone();
        printer.update(&GameSnapshot {
            tick: 41,
            ..snapshot.clone()
        });
        assert_eq!(printer.last_line, first);
    }
}
