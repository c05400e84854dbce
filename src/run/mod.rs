//! Batch collection runs.
//!
//! Reads targets from the input file, resolves them concurrently under a
//! semaphore and appends each result to the output files as soon as its task
//! finishes. Hostnames already present in the bags file, and duplicates
//! within the input, are skipped.

mod task;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinError;

use crate::app::{log_progress, parse_target_line, print_error_statistics};
use crate::config::{Config, LOGGING_INTERVAL};
use crate::error_handling::{ErrorType, ProcessingStats};
use crate::export::{existing_hostnames, BagWriter, FeatureWriter, OutputPaths};
use crate::initialization::{init_engine_config, init_semaphore};

pub use task::{resolve_target, TaskOutcome};

/// Results of a collection run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Hostnames handed to a resolution task
    pub total_hostnames: usize,
    /// Hostnames whose bag and features were written
    pub successful: usize,
    /// Hostnames whose task timed out, aborted or could not be written
    pub failed: usize,
    /// Duplicates and hostnames already present in the output
    pub skipped: usize,
    /// Input lines that did not yield a hostname
    pub invalid: usize,
    /// Where the bags and features were written
    pub output: OutputPaths,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
}

struct Outputs {
    bags: BagWriter<std::io::BufWriter<std::fs::File>>,
    features: FeatureWriter<std::fs::File>,
}

struct Counters {
    completed: AtomicUsize,
    failed: AtomicUsize,
}

/// Runs a collection with the provided configuration.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, or if the input file or
/// the output files cannot be opened. Failures of individual hostnames are
/// counted in the report instead.
///
/// # Example
///
/// ```no_run
/// use domain_signals::{run_collection, Config};
/// use std::path::PathBuf;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config {
///     file: PathBuf::from("hostnames.txt"),
///     ..Default::default()
/// };
/// let report = run_collection(config).await?;
/// println!("{} hostnames resolved", report.successful);
/// # Ok(())
/// # }
/// ```
pub async fn run_collection(config: Config) -> Result<RunReport> {
    let engine_config =
        init_engine_config(&config).context("Invalid resolver configuration")?;

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create output directory: {}",
                config.output_dir.display()
            )
        })?;
    let paths = OutputPaths::in_dir(&config.output_dir);

    let mut seen = existing_hostnames(&paths.bags)?;
    if !seen.is_empty() {
        info!(
            "{} hostnames already collected in {}, skipping them",
            seen.len(),
            paths.bags.display()
        );
    }
    let mut outputs = Outputs {
        bags: BagWriter::append_to(&paths.bags)?,
        features: FeatureWriter::append_to(&paths.features)?,
    };

    let file = tokio::fs::File::open(&config.file)
        .await
        .with_context(|| format!("Failed to open input file: {}", config.file.display()))?;
    let mut lines = BufReader::new(file).lines();

    let semaphore = init_semaphore(config.max_concurrency);
    let stats = ProcessingStats::new();
    let counters = Counters {
        completed: AtomicUsize::new(0),
        failed: AtomicUsize::new(0),
    };
    let start_time = Instant::now();
    let mut tasks = FuturesUnordered::new();
    let mut total_hostnames = 0usize;
    let mut skipped = 0usize;
    let mut invalid = 0usize;

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read line from input: {e}");
                continue;
            }
        };

        let target = match parse_target_line(&line) {
            None => continue,
            Some(Ok(target)) => target,
            Some(Err(e)) => {
                warn!("{e}");
                stats.increment_error(ErrorType::InvalidHostname);
                invalid += 1;
                continue;
            }
        };

        if !seen.insert(target.hostname.clone()) {
            debug!("Skipping already collected hostname {}", target.hostname);
            skipped += 1;
            continue;
        }

        let permit = match Arc::clone(&semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => {
                warn!("Semaphore closed, skipping hostname: {}", target.hostname);
                continue;
            }
        };

        total_hostnames += 1;
        let engine_config = engine_config.clone();
        tasks.push(tokio::spawn(async move {
            let _permit = permit;
            resolve_target(engine_config, target).await
        }));

        // Write whatever already finished so results land on disk while the
        // input is still being read.
        while let Some(Some(task_result)) = tasks.next().now_or_never() {
            handle_task_result(task_result, &mut outputs, &stats, &counters, start_time);
        }
    }

    while let Some(task_result) = tasks.next().await {
        handle_task_result(task_result, &mut outputs, &stats, &counters, start_time);
    }

    outputs.bags.flush()?;
    outputs.features.flush()?;

    log_progress(start_time, &counters.completed, &counters.failed);
    print_error_statistics(&stats);

    Ok(RunReport {
        total_hostnames,
        successful: counters.completed.load(Ordering::SeqCst),
        failed: counters.failed.load(Ordering::SeqCst),
        skipped,
        invalid,
        output: paths,
        elapsed_seconds: start_time.elapsed().as_secs_f64(),
    })
}

fn handle_task_result(
    task_result: Result<TaskOutcome, JoinError>,
    outputs: &mut Outputs,
    stats: &ProcessingStats,
    counters: &Counters,
    start_time: Instant,
) {
    let succeeded = match task_result {
        Ok(TaskOutcome {
            target,
            result: Ok(analysis),
        }) => {
            stats.record_bag(&analysis.bag);
            let label = target.label.as_deref();
            let written = outputs
                .bags
                .write(&analysis.hostname, label, &analysis.bag)
                .and_then(|()| {
                    outputs
                        .features
                        .write(&analysis.hostname, label, &analysis.features)
                });
            match written {
                Ok(()) => true,
                Err(e) => {
                    warn!("Failed to write results for {}: {e:#}", analysis.hostname);
                    stats.increment_error(ErrorType::OutputWriteError);
                    false
                }
            }
        }
        Ok(TaskOutcome {
            result: Err(error_type),
            ..
        }) => {
            stats.increment_error(error_type);
            false
        }
        Err(join_error) => {
            warn!("Resolution task panicked: {join_error:?}");
            stats.increment_error(ErrorType::TaskAborted);
            false
        }
    };

    let counter = if succeeded {
        &counters.completed
    } else {
        &counters.failed
    };
    counter.fetch_add(1, Ordering::SeqCst);

    let done = counters.completed.load(Ordering::SeqCst) + counters.failed.load(Ordering::SeqCst);
    if done % LOGGING_INTERVAL == 0 {
        log_progress(start_time, &counters.completed, &counters.failed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn config_for(dir: &TempDir, input: &str) -> Config {
        let file = dir.path().join("hostnames.txt");
        std::fs::File::create(&file)
            .unwrap()
            .write_all(input.as_bytes())
            .unwrap();
        Config {
            file,
            output_dir: dir.path().join("out"),
            // Nothing listens here, so every query fails fast and the run
            // stays offline.
            resolvers: vec!["127.0.0.1".parse().unwrap()],
            timeout_seconds: 1,
            max_concurrency: 2,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_run_with_only_invalid_lines() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir, "# header\n\n10.0.0.1\nnot a host!!!,1\n");
        let report = run_collection(config).await.unwrap();
        assert_eq!(report.total_hostnames, 0);
        assert_eq!(report.invalid, 2);
        assert_eq!(report.successful, 0);

        let header = std::fs::read_to_string(&report.output.features).unwrap();
        assert!(header.starts_with("hostname,"));
    }

    #[tokio::test]
    async fn test_run_rejects_missing_input() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            file: dir.path().join("missing.txt"),
            output_dir: dir.path().join("out"),
            ..Default::default()
        };
        let err = run_collection(config).await.unwrap_err();
        assert!(format!("{err:#}").contains("Failed to open input file"));
    }

    #[tokio::test]
    async fn test_run_rejects_zero_concurrency() {
        let dir = TempDir::new().unwrap();
        let mut config = config_for(&dir, "example.com\n");
        config.max_concurrency = 0;
        assert!(run_collection(config).await.is_err());
    }

    #[tokio::test]
    async fn test_run_writes_one_result_per_distinct_hostname() {
        let dir = TempDir::new().unwrap();
        let config = config_for(
            &dir,
            "example.invalid,benign\nhttps://EXAMPLE.invalid/path\nother.invalid\n",
        );
        let report = run_collection(config.clone()).await.unwrap();
        assert_eq!(report.total_hostnames, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.successful, 2);

        let bags = std::fs::read_to_string(&report.output.bags).unwrap();
        assert_eq!(bags.lines().count(), 2);
        let features = std::fs::read_to_string(&report.output.features).unwrap();
        assert_eq!(features.lines().count(), 3);

        // A second run over the same output resumes instead of repeating work
        let again = run_collection(config).await.unwrap();
        assert_eq!(again.total_hostnames, 0);
        assert_eq!(again.skipped, 3);
    }
}
