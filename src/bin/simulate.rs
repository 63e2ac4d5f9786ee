use clap::Parser;
use log::{Level, LevelFilter};
use maze_chase::config::GameConfig;
use maze_chase::engine::GameEngine;
use maze_chase::error::EngineError;
use maze_chase::logging::{self, emit_log};
use maze_chase::maze::MazeLayout;
use maze_chase::types::{Direction, GameSnapshot, GameStatus};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::json;
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const MIN_INTENT_GAP: u64 = 6;
const MAX_INTENT_GAP: u64 = 20;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless batch runner with a seeded autopilot")]
struct Cli {
    #[arg(long)]
    config: PathBuf,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 20_000)]
    max_ticks: u64,
    #[arg(long, default_value_t = 1)]
    runs: u32,
    #[arg(long)]
    summary_out: Option<PathBuf>,
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Clone, Debug, Serialize)]
struct RunResultLine {
    run: u32,
    seed: u64,
    status: GameStatus,
    #[serde(rename = "timedOut")]
    timed_out: bool,
    ticks: u64,
    score: i32,
    #[serde(rename = "numLives")]
    num_lives: i32,
    #[serde(rename = "levelReached")]
    level_reached: usize,
    #[serde(rename = "livesLost")]
    lives_lost: i32,
    #[serde(rename = "pelletsRemaining")]
    pellets_remaining: usize,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    tick: u64,
    message: String,
}

#[derive(Clone, Debug, Serialize)]
struct RunOutcome {
    #[serde(flatten)]
    result: RunResultLine,
    #[serde(rename = "anomalyRecords")]
    anomaly_records: Vec<AnomalyRecord>,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "batchId")]
    batch_id: String,
    #[serde(rename = "startedAtMs")]
    started_at_ms: u64,
    #[serde(rename = "finishedAtMs")]
    finished_at_ms: u64,
    #[serde(rename = "runCount")]
    run_count: usize,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "averageTicks")]
    average_ticks: u64,
    #[serde(rename = "statusCounts")]
    status_counts: BTreeMap<String, usize>,
    runs: Vec<RunResultLine>,
}

/// Random steering: a fresh intent every few ticks, reproducible from a seed.
struct Autopilot {
    rng: StdRng,
    next_intent_at: u64,
}

impl Autopilot {
    fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let next_intent_at = rng.random_range(MIN_INTENT_GAP..=MAX_INTENT_GAP);
        Self {
            rng,
            next_intent_at,
        }
    }

    fn intent_for(&mut self, tick: u64) -> Option<Direction> {
        if tick < self.next_intent_at {
            return None;
        }
        self.next_intent_at = tick + self.rng.random_range(MIN_INTENT_GAP..=MAX_INTENT_GAP);
        Some(Direction::ALL[self.rng.random_range(0..Direction::ALL.len())])
    }
}

fn main() {
    let cli = Cli::parse();
    if logging::init(cli.log_level).is_err() {
        eprintln!("[simulate] logger already installed");
    }
    match run(&cli) {
        Ok(true) => std::process::exit(1),
        Ok(false) => {}
        Err(error) => {
            emit_log(
                Level::Error,
                "simulation_failed",
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

/// Returns whether any run recorded an anomaly.
fn run(cli: &Cli) -> Result<bool, EngineError> {
    let config = GameConfig::load(&cli.config)?;
    let layout = MazeLayout::load(&config.map_file)?;
    let started_at_ms = now_ms();
    let base_seed = cli.seed.unwrap_or(started_at_ms);
    let batch_id = default_batch_id(base_seed, started_at_ms);

    let mut results = Vec::new();
    let mut status_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_ticks = 0u64;
    let mut total_anomalies = 0usize;
    let mut has_anomaly = false;

    for run_idx in 0..cli.runs.max(1) {
        let seed = base_seed.wrapping_add(u64::from(run_idx));
        emit_log(
            Level::Info,
            "run_started",
            None,
            json!({
                "batchId": batch_id,
                "run": run_idx,
                "seed": seed,
                "levels": config.levels.len(),
            }),
        );

        let engine = GameEngine::new(config.clone(), layout.clone())?;
        let outcome = run_once(engine, run_idx, seed, cli.max_ticks)?;

        for anomaly in &outcome.anomaly_records {
            emit_log(
                Level::Warn,
                "anomaly_detected",
                Some(anomaly.tick),
                json!({
                    "run": run_idx,
                    "message": anomaly.message,
                }),
            );
        }
        has_anomaly |= !outcome.result.anomalies.is_empty();
        total_anomalies += outcome.anomaly_records.len();
        total_ticks += outcome.result.ticks;
        *status_counts
            .entry(status_key(&outcome.result))
            .or_insert(0) += 1;

        emit_log(
            Level::Info,
            "run_finished",
            Some(outcome.result.ticks),
            json!({
                "run": run_idx,
                "status": outcome.result.status,
                "score": outcome.result.score,
                "levelReached": outcome.result.level_reached,
                "anomalyCount": outcome.anomaly_records.len(),
            }),
        );

        match serde_json::to_string(&outcome.result) {
            Ok(line) => println!("{line}"),
            Err(error) => emit_log(
                Level::Error,
                "result_serialize_failed",
                None,
                json!({ "error": error.to_string() }),
            ),
        }
        results.push(outcome.result);
    }

    let summary = build_run_summary(
        batch_id,
        started_at_ms,
        now_ms(),
        results,
        status_counts,
        total_anomalies,
        total_ticks,
    );

    let mut summary_out_written: Option<String> = None;
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            emit_log(
                Level::Error,
                "summary_write_failed",
                None,
                json!({
                    "path": path.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
        summary_out_written = Some(path.to_string_lossy().to_string());
    }

    emit_log(
        Level::Info,
        "batch_finished",
        None,
        json!({
            "runCount": summary.run_count,
            "anomalyCount": summary.anomaly_count,
            "averageTicks": summary.average_ticks,
            "statusCounts": summary.status_counts,
            "summaryOut": summary_out_written,
        }),
    );

    Ok(has_anomaly)
}

fn run_once(
    mut engine: GameEngine,
    run: u32,
    seed: u64,
    max_ticks: u64,
) -> Result<RunOutcome, EngineError> {
    let mut autopilot = Autopilot::new(seed);
    let mut anomalies = Vec::new();
    let mut anomaly_records = Vec::new();
    let mut anomaly_seen = HashSet::new();

    engine.start_game()?;
    let initial_lives = engine.get_num_lives();
    let mut previous = engine.snapshot();
    let mut ticks = 0u64;

    while !engine.is_terminal() && ticks < max_ticks {
        if let Some(direction) = autopilot.intent_for(ticks) {
            engine.move_intent(direction);
        }
        engine.tick()?;
        ticks += 1;

        let snapshot = engine.snapshot();
        for message in collect_snapshot_anomalies(&previous, &snapshot) {
            push_anomaly(
                &mut anomalies,
                &mut anomaly_records,
                &mut anomaly_seen,
                ticks,
                message,
            );
        }
        previous = snapshot;
    }

    let timed_out = !engine.is_terminal();
    Ok(RunOutcome {
        result: RunResultLine {
            run,
            seed,
            status: previous.status,
            timed_out,
            ticks,
            score: previous.score,
            num_lives: previous.num_lives,
            level_reached: previous.level_no + 1,
            lives_lost: initial_lives - previous.num_lives,
            pellets_remaining: previous.pellets_remaining,
            anomalies,
        },
        anomaly_records,
    })
}

fn collect_snapshot_anomalies(previous: &GameSnapshot, current: &GameSnapshot) -> Vec<String> {
    let mut anomalies = Vec::new();
    if current.score < previous.score {
        anomalies.push(format!(
            "score decreased: {} -> {}",
            previous.score, current.score
        ));
    }
    if current.score < 0 {
        anomalies.push(format!("negative score: {}", current.score));
    }
    if current.num_lives > previous.num_lives {
        anomalies.push(format!(
            "lives increased: {} -> {}",
            previous.num_lives, current.num_lives
        ));
    }
    if previous.num_lives - current.num_lives > 1 {
        anomalies.push(format!(
            "more than one life lost in a tick: {} -> {}",
            previous.num_lives, current.num_lives
        ));
    }
    let out_of_lives = current.num_lives <= 0;
    if out_of_lives != (current.status == GameStatus::GameOver) {
        anomalies.push(format!(
            "status {} does not match {} lives",
            current.status, current.num_lives
        ));
    }
    if current.level_no == previous.level_no
        && current.pellets_remaining > previous.pellets_remaining
    {
        anomalies.push(format!(
            "pellets reappeared: {} -> {}",
            previous.pellets_remaining, current.pellets_remaining
        ));
    }
    anomalies
}

fn push_anomaly(
    anomalies: &mut Vec<String>,
    anomaly_records: &mut Vec<AnomalyRecord>,
    anomaly_seen: &mut HashSet<String>,
    tick: u64,
    message: String,
) {
    anomaly_records.push(AnomalyRecord {
        tick,
        message: message.clone(),
    });
    if anomaly_seen.insert(message.clone()) {
        anomalies.push(message);
    }
}

fn status_key(result: &RunResultLine) -> String {
    if result.timed_out {
        return "timed_out".to_string();
    }
    match result.status {
        GameStatus::YouWin => "won",
        GameStatus::GameOver => "game_over",
        GameStatus::Ready => "running",
    }
    .to_string()
}

fn default_batch_id(seed: u64, timestamp_ms: u64) -> String {
    format!("sim-{seed}-{timestamp_ms}")
}

fn build_run_summary(
    batch_id: String,
    started_at_ms: u64,
    finished_at_ms: u64,
    runs: Vec<RunResultLine>,
    status_counts: BTreeMap<String, usize>,
    anomaly_count: usize,
    total_ticks: u64,
) -> RunSummary {
    let run_count = runs.len();
    let average_ticks = if run_count == 0 {
        0
    } else {
        total_ticks / run_count as u64
    };
    RunSummary {
        batch_id,
        started_at_ms,
        finished_at_ms,
        run_count,
        anomaly_count,
        average_ticks,
        status_counts,
        runs,
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary).map_err(io::Error::other)?;
    std::fs::write(path, summary_text)
}
