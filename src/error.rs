use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MineError {
    #[error("Invalid minimum support: {0}")]
    InvalidMinSupport(String),

    #[error("Invalid transaction length bounds: min {min} > max {max}")]
    InvalidLengthBounds { min: usize, max: usize },

    #[error("Failed to read transactions from {}: {source}", display_path(.path))]
    Io {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },
}

impl MineError {
    pub fn io(path: Option<PathBuf>, source: std::io::Error) -> Self {
        MineError::Io { path, source }
    }
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "<reader>".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, MineError>;
