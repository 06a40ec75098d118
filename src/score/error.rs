use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while saving the high score
///
/// Reading never fails: a missing or damaged record reads as zero.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("could not determine the user's home directory")]
    NoHomeDir,

    #[error("failed to write high score file {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
