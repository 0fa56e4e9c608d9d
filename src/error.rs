use thiserror::Error;

/// Why a single mount could not be sampled. Never fatal to a run.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with {status}: {stderr}")]
    ExitStatus {
        command: String,
        status:  std::process::ExitStatus,
        stderr:  String,
    },

    #[error("unexpected df output: no data line")]
    MissingData,

    #[error("unexpected df output format: expected at least 3 fields, got {0}")]
    TooFewFields(usize),

    #[error("error parsing used bytes {value:?}: {reason}")]
    InvalidNumber { value: String, reason: String },
}
