pub mod config;
pub mod error;
pub mod fetch;
pub mod geo;
pub mod metadata;
pub mod ordering;
pub mod pipeline;
pub mod task;
pub mod throttle;

use std::fs;

use tracing::info;

pub use config::{RequestParams, RunConfig};
pub use error::{SetupError, TaskError};
pub use fetch::{HttpFetcher, ImageFetcher};
pub use geo::{GeoPoint, GeoRecord, GeoTable};
pub use metadata::{ExifGeoSource, GeoSource};
pub use ordering::OrderedSequence;
pub use pipeline::{ProgressCallback, RunReport};
pub use task::DownloadTask;
pub use throttle::{FixedInterval, NoDelay, Throttle};

/// Fails if anything, even a dangling symlink, is already at the output path.
pub fn check_output_absent(config: &RunConfig) -> Result<(), SetupError> {
    let dir = &config.output_dir;
    if fs::symlink_metadata(dir).is_ok() {
        return Err(SetupError::OutputExists(dir.clone()));
    }
    Ok(())
}

/// Refuse an existing output path, then create it with any missing parents.
pub fn prepare_output_dir(config: &RunConfig) -> Result<(), SetupError> {
    check_output_absent(config)?;
    let dir = &config.output_dir;
    fs::create_dir_all(dir).map_err(|source| SetupError::CreateOutputDir {
        path: dir.clone(),
        source,
    })
}

/// Run the whole pipeline: read photo locations, set up the output
/// directory, order the photos by capture time and download one image per photo.
///
/// Every setup check runs before the output directory is created, so a
/// fatal error leaves nothing behind. Only setup problems are returned as
/// errors. Failed downloads are logged and listed in the report.
pub fn process(
    config: &RunConfig,
    source: &dyn GeoSource,
    fetcher: &dyn ImageFetcher,
    throttle: &dyn Throttle,
    progress: &ProgressCallback<'_>,
) -> Result<RunReport, SetupError> {
    if !config.input_dir.is_dir() {
        return Err(SetupError::InputNotDirectory(config.input_dir.clone()));
    }
    check_output_absent(config)?;

    let table = source.collect(&config.input_dir)?;
    prepare_output_dir(config)?;

    let sequence = OrderedSequence::from_table(table);
    info!(
        "Fetching {} images into {}",
        sequence.len(),
        config.output_dir.display()
    );

    Ok(pipeline::fetch_and_persist(
        &sequence, config, fetcher, throttle, progress,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::{Cursor, Read};
    use std::path::Path;
    use tempfile::tempdir;

    struct FixedSource(GeoTable);

    impl GeoSource for FixedSource {
        fn collect(&self, _dir: &Path) -> Result<GeoTable, SetupError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct EchoFetcher {
        urls: RefCell<Vec<String>>,
    }

    impl ImageFetcher for EchoFetcher {
        fn fetch(&self, url: &str) -> Result<Box<dyn Read>, fetch::FetchError> {
            self.urls.borrow_mut().push(url.to_string());
            Ok(Box::new(Cursor::new(url.as_bytes().to_vec())))
        }
    }

    fn table_a() -> GeoTable {
        let mut table = GeoTable::new();
        table.insert(100, GeoPoint::new(37.0, -122.0).unwrap());
        table.insert(50, GeoPoint::new(37.1, -122.1).unwrap());
        table
    }

    #[test]
    fn test_empty_input_creates_dir_only() {
        let root = tempdir().unwrap();
        let out = root.path().join("nested").join("out");
        let config = RunConfig::new(root.path(), &out);
        let fetcher = EchoFetcher::default();

        let report = process(
            &config,
            &FixedSource(GeoTable::new()),
            &fetcher,
            &NoDelay,
            &|_, _| {},
        )
        .unwrap();

        assert_eq!(report.total, 0);
        assert!(out.is_dir());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
        assert!(fetcher.urls.borrow().is_empty());
    }

    #[test]
    fn test_existing_output_dir_is_fatal() {
        let root = tempdir().unwrap();
        let out = root.path().join("out");
        fs::create_dir(&out).unwrap();
        let config = RunConfig::new(root.path(), &out);
        let fetcher = EchoFetcher::default();

        let err = process(&config, &FixedSource(table_a()), &fetcher, &NoDelay, &|_, _| {})
            .unwrap_err();

        assert!(matches!(err, SetupError::OutputExists(_)));
        assert!(fetcher.urls.borrow().is_empty());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn test_existing_file_at_output_path_is_fatal() {
        let root = tempdir().unwrap();
        let out = root.path().join("out");
        fs::write(&out, b"").unwrap();
        let err = prepare_output_dir(&RunConfig::new(root.path(), &out)).unwrap_err();
        assert!(matches!(err, SetupError::OutputExists(_)));
    }

    struct UnreadableSource;

    impl GeoSource for UnreadableSource {
        fn collect(&self, dir: &Path) -> Result<GeoTable, SetupError> {
            Err(SetupError::ScanInput {
                path: dir.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        }
    }

    #[test]
    fn test_scan_failure_leaves_no_output_dir() {
        let root = tempdir().unwrap();
        let out = root.path().join("out");
        let config = RunConfig::new(root.path(), &out);
        let fetcher = EchoFetcher::default();

        let err = process(&config, &UnreadableSource, &fetcher, &NoDelay, &|_, _| {})
            .unwrap_err();
        assert!(matches!(err, SetupError::ScanInput { .. }));
        assert!(!out.exists());
        assert!(fetcher.urls.borrow().is_empty());

        // A rerun is not blocked by leftovers from the failed one.
        let report = process(&config, &FixedSource(table_a()), &fetcher, &NoDelay, &|_, _| {})
            .unwrap();
        assert_eq!(report.files_written, 2);
    }

    #[test]
    fn test_progress_reaches_borrowing_callback() {
        let root = tempdir().unwrap();
        let config = RunConfig::new(root.path(), root.path().join("out"));
        let seen = RefCell::new(Vec::new());

        process(
            &config,
            &FixedSource(table_a()),
            &EchoFetcher::default(),
            &NoDelay,
            &|current, total| seen.borrow_mut().push((current, total)),
        )
        .unwrap();

        assert_eq!(*seen.borrow(), vec![(1, 2), (2, 2)]);
    }

    #[test]
    fn test_missing_input_dir_is_fatal() {
        let root = tempdir().unwrap();
        let out = root.path().join("out");
        let config = RunConfig::new(root.path().join("photos"), &out);

        let err = process(
            &config,
            &FixedSource(table_a()),
            &EchoFetcher::default(),
            &NoDelay,
            &|_, _| {},
        )
        .unwrap_err();

        assert!(matches!(err, SetupError::InputNotDirectory(_)));
        assert!(!out.exists());
    }

    #[test]
    fn test_two_runs_produce_identical_files() {
        let root = tempdir().unwrap();
        let mut listings = Vec::new();

        for name in ["run1", "run2"] {
            let out = root.path().join(name);
            let config = RunConfig::new(root.path(), &out);
            let report = process(
                &config,
                &FixedSource(table_a()),
                &EchoFetcher::default(),
                &NoDelay,
                &|_, _| {},
            )
            .unwrap();
            assert_eq!(report.files_written, 2);

            let mut files: Vec<(String, Vec<u8>)> = fs::read_dir(&out)
                .unwrap()
                .map(|e| {
                    let e = e.unwrap();
                    (
                        e.file_name().to_string_lossy().into_owned(),
                        fs::read(e.path()).unwrap(),
                    )
                })
                .collect();
            files.sort();
            listings.push(files);
        }

        assert_eq!(listings[0], listings[1]);
        assert_eq!(listings[0][0].0, "00001.jpg");
        assert!(String::from_utf8_lossy(&listings[0][0].1).contains("location=37.1,-122.1&"));
        assert_eq!(listings[0][1].0, "00002.jpg");
    }
}
