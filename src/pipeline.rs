use std::fs::{self, File};
use std::io;

use tracing::{debug, error};

use crate::config::RunConfig;
use crate::error::TaskError;
use crate::fetch::ImageFetcher;
use crate::ordering::OrderedSequence;
use crate::task::DownloadTask;
use crate::throttle::Throttle;

/// Progress callback: (current, total), current is 1-based.
pub type ProgressCallback<'a> = dyn Fn(u64, u64) + 'a;

/// What happened over the whole sequence.
#[derive(Debug, Default)]
pub struct RunReport {
    pub total: u64,
    pub files_written: u64,
    pub failures: Vec<TaskError>,
}

/// Fetch one image per record, in order, into numbered files.
///
/// Per-item failures are logged and collected; they never stop the loop.
/// The throttle runs between tasks, skipped only when the destination file
/// could not be created (no request was made).
pub fn fetch_and_persist(
    sequence: &OrderedSequence,
    config: &RunConfig,
    fetcher: &dyn ImageFetcher,
    throttle: &dyn Throttle,
    progress: &ProgressCallback<'_>,
) -> RunReport {
    let total = sequence.len() as u64;
    let mut report = RunReport {
        total,
        ..RunReport::default()
    };

    for (i, record) in sequence.iter().enumerate() {
        let index = i + 1;
        progress(index as u64, total);

        let task = DownloadTask::new(index, record, config);
        let outcome = persist(&task, fetcher);

        let requested = match outcome {
            Ok(bytes) => {
                debug!("wrote {} bytes to {}", bytes, task.output_path.display());
                report.files_written += 1;
                true
            }
            Err(err) => {
                error!("{}", err);
                if config.remove_failed && err.leaves_file() {
                    discard(&task);
                }
                let requested = err.leaves_file();
                report.failures.push(err);
                requested
            }
        };

        if requested && (index as u64) < total {
            throttle.pause();
        }
    }

    if !report.failures.is_empty() {
        debug!(
            "{} of {} downloads failed",
            report.failures.len(),
            report.total
        );
    }

    report
}

/// Create the file, fetch, and stream. File and body are closed on return.
fn persist(task: &DownloadTask, fetcher: &dyn ImageFetcher) -> Result<u64, TaskError> {
    let mut out = File::create(&task.output_path).map_err(|source| TaskError::CreateFile {
        path: task.output_path.clone(),
        source,
    })?;

    let mut body = fetcher
        .fetch(&task.request_url)
        .map_err(|source| TaskError::Fetch {
            url: task.request_url.clone(),
            path: task.output_path.clone(),
            source,
        })?;

    io::copy(&mut body, &mut out).map_err(|source| TaskError::Write {
        path: task.output_path.clone(),
        url: task.request_url.clone(),
        source,
    })
}

fn discard(task: &DownloadTask) {
    match fs::remove_file(&task.output_path) {
        Ok(()) => debug!("removed {}", task.output_path.display()),
        Err(e) => error!(
            "error removing file {}: {}",
            task.output_path.display(),
            e
        ),
    }
}
