pub mod gps;

use std::fs;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::SetupError;
use crate::geo::{GeoPoint, GeoTable};

/// Produces the timestamp-keyed location table for a photo directory.
pub trait GeoSource {
    fn collect(&self, dir: &Path) -> Result<GeoTable, SetupError>;
}

/// Reads capture time and GPS position from the EXIF of each image in a directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifGeoSource;

impl GeoSource for ExifGeoSource {
    fn collect(&self, dir: &Path) -> Result<GeoTable, SetupError> {
        let photos = list_images(dir)?;

        let pb = ProgressBar::new(photos.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("[{bar:40}] {pos}/{len} reading EXIF")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        // par_iter keeps input order in the collected Vec
        let found: Vec<(&PathBuf, Option<(i64, GeoPoint)>)> = photos
            .par_iter()
            .map(|path| {
                let geo = gps::read_geo_photo(path);
                pb.inc(1);
                (path, geo)
            })
            .collect();

        pb.finish_and_clear();

        let table = build_table(found);
        info!(
            "Found {} geotagged photos out of {} images in {}",
            table.len(),
            photos.len(),
            dir.display()
        );
        Ok(table)
    }
}

/// One entry per timestamp; the first photo in path order keeps it.
fn build_table(found: Vec<(&PathBuf, Option<(i64, GeoPoint)>)>) -> GeoTable {
    let mut table = GeoTable::new();
    for (path, geo) in found {
        let Some((timestamp, point)) = geo else {
            debug!("no usable time or location in {}", path.display());
            continue;
        };
        if table.contains_key(&timestamp) {
            debug!(
                "dropping {}: another photo has timestamp {}",
                path.display(),
                timestamp
            );
            continue;
        }
        table.insert(timestamp, point);
    }
    table
}

/// Image files directly inside `dir`, sorted by path.
fn list_images(dir: &Path) -> Result<Vec<PathBuf>, SetupError> {
    let entries = fs::read_dir(dir).map_err(|source| SetupError::ScanInput {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut photos: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_image(path))
        .collect();
    photos.sort();
    Ok(photos)
}

fn is_image(path: &Path) -> bool {
    mime_guess::from_path(path)
        .first()
        .map_or(false, |mime| mime.type_() == mime_guess::mime::IMAGE)
}
