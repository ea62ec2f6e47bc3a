use std::path::{Path, PathBuf};

use crate::config::RunConfig;
use crate::geo::GeoRecord;

/// Output name for a 1-based sequence index: `00001.jpg`, `00002.jpg`, ...
pub fn output_file_name(sequence_index: usize) -> String {
    format!("{:05}.jpg", sequence_index)
}

pub fn output_path(output_dir: &Path, sequence_index: usize) -> PathBuf {
    output_dir.join(output_file_name(sequence_index))
}

/// The request and destination for one record at its sequence position.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadTask {
    /// 1-based position in the ordered sequence
    pub sequence_index: usize,
    pub request_url: String,
    pub output_path: PathBuf,
}

impl DownloadTask {
    pub fn new(sequence_index: usize, record: &GeoRecord, config: &RunConfig) -> Self {
        Self {
            sequence_index,
            request_url: config.request.url_for(&record.point()),
            output_path: output_path(&config.output_dir, sequence_index),
        }
    }
}
