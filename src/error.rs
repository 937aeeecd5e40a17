use thiserror::Error;

#[derive(Error, Debug)]
pub enum VtermError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image Error: {0}")]
    Image(String),

    #[error("PDF Error: {0}")]
    Pdf(String),

    #[error("Plot Error: {0}")]
    Plot(String),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),

    /// A run whose channels cannot describe a trajectory. Always fatal to the
    /// whole summary.
    #[error("Invalid run (nsteps={step_count}): {reason}")]
    InvalidRun { step_count: usize, reason: String },
}

pub type VtResult<T> = Result<T, VtermError>;
