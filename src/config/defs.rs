use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Semaphore;

use crate::cli::Arguments;

pub const FASTQ_GZ_EXT: &str = ".fastq.gz";
pub const R1_TAG: &str = "R1";
pub const R2_TAG: &str = "R2";

/// How long each poll cycle waits for search results before logging
/// progress and polling again. Not a deadline.
pub const SEARCH_POLL_INTERVAL: Duration = Duration::from_secs(5);

pub struct RunConfig {
    pub cwd: PathBuf,
    pub args: Arguments,
    /// Bounds the number of chunk scans running at once (--threads).
    pub search_permits: Arc<Semaphore>,
}

/// Every variant is fatal for the run: main logs it and exits 1.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No matching FASTQ files: {0}")]
    NoMatchingFiles(String),

    #[error("FASTQ filename {0:?} does not match <sample>_L<lane>_R<1|2>_*.fastq.gz")]
    FilenameParse(PathBuf),

    #[error("Lane mismatch: {0}")]
    LaneMismatch(String),

    #[error("{0:?} contains no reads")]
    EmptyInput(PathBuf),

    #[error("First read ids of R1 and R2 differ: {r1} vs {r2}")]
    ReadIdMismatch { r1: String, r2: String },

    #[error("Merged read found in {file:?} with wrong identifier or sequence")]
    ContentMismatch { file: PathBuf },

    #[error("Read {read_id} not found in any merged chunk")]
    NotFound { read_id: String },

    #[error("Search task failed: {0}")]
    TaskFailure(String),

    #[error("Unrecognized inDrop linker {0:?} at bases 25-28")]
    UnknownLinker(String),

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
