use crate::chart::LiveChart;
use crate::{MonitorError, StepDrag};
use crate::{DEFAULT_INTERVAL_SECS, DEFAULT_MIN_LINES, STEADY_DRAG};
use log::{debug, info, trace};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Settings of the watch and plot loop.
/// The retry limits are None by default, i.e., retry forever.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    pub steady_drag: f64,
    pub interval: Duration,
    pub min_lines: usize,
    pub max_wait_checks: Option<u32>,
    pub max_failures: Option<u32>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            steady_drag: STEADY_DRAG,
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            min_lines: DEFAULT_MIN_LINES,
            max_wait_checks: None,
            max_failures: None,
        }
    }
}

/// What one read of the report file produced
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// fewer lines than the configured minimum, with the line count
    TooFewLines(usize),
    NoValidRows,
    Ready(StepDrag),
}

/// Joins the directory and the report filename,
/// the directory must already exist.
pub fn resolve_target(dir: &Path, filename: &str) -> Result<PathBuf, MonitorError> {
    if !dir.is_dir() {
        return Err(MonitorError::MissingDirectory(dir.to_path_buf()));
    }
    Ok(dir.join(filename))
}

/// Blocks until the file exists, returns the number of waits.
pub fn wait_for_file(path: &Path, config: &MonitorConfig) -> Result<u32, MonitorError> {
    wait_for_file_with(path, config, std::thread::sleep)
}

/// Same as wait_for_file, with the sleep between checks provided by the caller.
/// With max_wait_checks = Some(n) the file is checked at most n times.
pub fn wait_for_file_with<F>(
    path: &Path,
    config: &MonitorConfig,
    mut sleep: F,
) -> Result<u32, MonitorError>
where
    F: FnMut(Duration),
{
    let mut checks: u32 = 0;
    loop {
        checks += 1;
        if path.exists() {
            return Ok(checks - 1);
        }
        if let Some(max) = config.max_wait_checks {
            if checks >= max {
                return Err(MonitorError::FileNeverAppeared {
                    path: path.to_path_buf(),
                    attempts: checks,
                });
            }
        }
        info!("waiting for {} to be created...", path.display());
        sleep(config.interval);
    }
}

/// Reads the whole file and parses it from scratch.
pub fn poll_cycle(path: &Path, min_lines: usize) -> Result<CycleOutcome, MonitorError> {
    let content = std::fs::read_to_string(path).map_err(|e| MonitorError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let nlines = content.lines().count();
    if nlines < min_lines {
        return Ok(CycleOutcome::TooFewLines(nlines));
    }
    let stepdrag = StepDrag::from_lines(content.lines());
    if stepdrag.is_empty() {
        return Ok(CycleOutcome::NoValidRows);
    }
    Ok(CycleOutcome::Ready(stepdrag))
}

/// One poll, giving the chart to draw when there is data.
pub fn refresh(path: &Path, config: &MonitorConfig) -> Result<Option<LiveChart>, MonitorError> {
    match poll_cycle(path, config.min_lines)? {
        CycleOutcome::TooFewLines(n) => {
            debug!("only {} line(s) in {}, not enough data yet", n, path.display());
            Ok(None)
        }
        CycleOutcome::NoValidRows => {
            debug!("no valid rows in {} yet", path.display());
            Ok(None)
        }
        CycleOutcome::Ready(stepdrag) => {
            debug!("read {} points from {}", stepdrag.len(), path.display());
            trace!("{}", stepdrag);
            Ok(LiveChart::new(&stepdrag, config.steady_drag))
        }
    }
}

/// Paces the refreshes of the live window and counts the failed ones.
#[derive(Debug)]
pub struct Poller {
    path: PathBuf,
    config: MonitorConfig,
    failures: u32,
    last_poll: Option<Instant>,
}

impl Poller {
    pub fn new(path: PathBuf, config: MonitorConfig) -> Poller {
        Poller {
            path,
            config,
            failures: 0,
            last_poll: None,
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_poll {
            None => true,
            Some(t) => now.duration_since(t) >= self.config.interval,
        }
    }

    pub fn until_due(&self, now: Instant) -> Duration {
        match self.last_poll {
            None => Duration::ZERO,
            Some(t) => self.config.interval.saturating_sub(now.duration_since(t)),
        }
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Refreshes once. Skipped cycles and errors wait for the next interval too.
    /// Returns TooManyFailures once max_failures updates in a row have failed.
    pub fn poll(&mut self, now: Instant) -> Result<Option<LiveChart>, MonitorError> {
        self.last_poll = Some(now);
        match refresh(&self.path, &self.config) {
            Ok(chart) => {
                self.failures = 0;
                Ok(chart)
            }
            Err(e) => {
                self.failures += 1;
                if let Some(max) = self.config.max_failures {
                    if self.failures >= max {
                        return Err(MonitorError::TooManyFailures {
                            failures: self.failures,
                            last: Box::new(e),
                        });
                    }
                }
                Err(e)
            }
        }
    }
}
