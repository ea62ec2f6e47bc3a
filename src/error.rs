use std::path::{Path, PathBuf};

use crate::fetch::FetchError;

/// Errors that stop a run before any download starts.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("input directory is not a directory: {}", .0.display())]
    InputNotDirectory(PathBuf),

    #[error("output directory already exists: {}", .0.display())]
    OutputExists(PathBuf),

    #[error("error creating output directory {}: {source}", .path.display())]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error reading photos in {}: {source}", .path.display())]
    ScanInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error building HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Errors that abandon one download task. The run carries on.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("error creating file {}: {source}", .path.display())]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error getting URL {url}: {source}")]
    Fetch {
        url: String,
        path: PathBuf,
        #[source]
        source: FetchError,
    },

    #[error("error writing file {} from {url}: {source}", .path.display())]
    Write {
        path: PathBuf,
        url: String,
        #[source]
        source: std::io::Error,
    },
}

impl TaskError {
    pub fn output_path(&self) -> &Path {
        match self {
            TaskError::CreateFile { path, .. }
            | TaskError::Fetch { path, .. }
            | TaskError::Write { path, .. } => path,
        }
    }

    /// Whether the destination file exists (empty or truncated) after this failure.
    pub fn leaves_file(&self) -> bool {
        !matches!(self, TaskError::CreateFile { .. })
    }
}
