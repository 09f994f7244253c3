//! Trivia dataset.
//!
//! One JSON file maps category names to arrays of records. It is read once
//! during startup and shared read-only through `Arc<Dataset>`.

pub mod category;
pub mod store;

use std::path::PathBuf;
use thiserror::Error;

pub use category::{TriviaCategory, UnknownCategory};
pub use store::Dataset;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("cannot read dataset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid dataset {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
