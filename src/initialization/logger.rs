//! Logger initialization.

use std::io::Write;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::*;
use log::{Level, LevelFilter, Record};

/// Installs the process logger.
///
/// `RUST_LOG` is read first and `level` then overrides it, so
/// `RUST_LOG=domain_signals::dns=debug` still narrows what `--log-level`
/// lets through. Plain lines are colored for a terminal; JSON lines carry the
/// same fields as the JSONL bags so both can be ingested together.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    colored::control::set_override(true);

    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    // Record decoding noise from odd server answers
    builder.filter_module("hickory_proto", LevelFilter::Error);
    builder.filter_module("domain_signals", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| writeln!(buf, "{}", json_line(record)));
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{} {} {} {}",
                    chrono::Local::now().format("%H:%M:%S%.3f").to_string().dimmed(),
                    colored_level(record.level()),
                    stage_of(record.target()).cyan(),
                    record.args()
                )
            });
        }
    }

    builder.try_init().map_err(InitializationError::from)?;
    Ok(())
}

/// Pipeline stage a log target belongs to: the last path segment of this
/// crate's modules, or the foreign crate's name.
fn stage_of(target: &str) -> &str {
    match target.strip_prefix("domain_signals") {
        Some("") => "main",
        Some(rest) => rest.rsplit("::").next().unwrap_or(rest),
        None => target.split("::").next().unwrap_or(target),
    }
}

fn colored_level(level: Level) -> ColoredString {
    let text = level.as_str();
    match level {
        Level::Error => text.red().bold(),
        Level::Warn => text.yellow(),
        Level::Info => text.green(),
        Level::Debug => text.blue(),
        Level::Trace => text.purple(),
    }
}

fn json_line(record: &Record) -> String {
    serde_json::json!({
        "ts": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        "level": record.level().as_str(),
        "stage": stage_of(record.target()),
        "target": record.target(),
        "msg": record.args().to_string(),
    })
    .to_string()
}
