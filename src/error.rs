use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while watching and plotting the drag file.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("the directory does not exist -> {0}")]
    MissingDirectory(PathBuf),

    #[error("{path} was not created after {attempts} checks")]
    FileNeverAppeared { path: PathBuf, attempts: u32 },

    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not open the live plot window: {0}")]
    Window(String),

    #[error("giving up after {failures} failed updates in a row, last error: {last}")]
    TooManyFailures {
        failures: u32,
        last: Box<MonitorError>,
    },
}
