//! JSON-lines logging for the drivers.
//!
//! The library itself only talks to the `log` facade. The binaries install
//! [`JsonLineLogger`], which renders both facade records and explicit driver
//! events as one [`StructuredLogLine`] per line on stderr.

use std::io::Write;

use chrono::{SecondsFormat, Utc};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Clone, Debug, Serialize)]
pub struct StructuredLogLine {
    pub timestamp: String,
    pub level: String,
    pub event: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick: Option<u64>,
    pub details: Value,
}

impl StructuredLogLine {
    pub fn new(level: Level, event: &str, target: &str, tick: Option<u64>, details: Value) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            level: level.as_str().to_ascii_lowercase(),
            event: event.to_string(),
            target: target.to_string(),
            tick,
            details,
        }
    }

    fn write_to_stderr(&self) {
        let Ok(text) = serde_json::to_string(self) else {
            return;
        };
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{text}");
    }
}

pub struct JsonLineLogger;

static LOGGER: JsonLineLogger = JsonLineLogger;

impl Log for JsonLineLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        StructuredLogLine::new(
            record.level(),
            "log",
            record.target(),
            None,
            json!({ "message": record.args().to_string() }),
        )
        .write_to_stderr();
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

pub fn init(filter: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(filter);
    Ok(())
}

/// Writes a driver event directly, honouring the installed level filter.
pub fn emit_log(level: Level, event: &str, tick: Option<u64>, details: Value) {
    if level > log::max_level() {
        return;
    }
    StructuredLogLine::new(level, event, "driver", tick, details).write_to_stderr();
}
