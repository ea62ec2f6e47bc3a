use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::NaiveDateTime;
use exif::{Exif, In, Reader, Tag, Value};

use crate::geo::GeoPoint;

/// Capture time (unix seconds) and location of one photo, if both are present.
pub fn read_geo_photo(path: &Path) -> Option<(i64, GeoPoint)> {
    let file = File::open(path).ok()?;
    let exif = Reader::new()
        .read_from_container(&mut BufReader::new(file))
        .ok()?;

    let timestamp = extract_timestamp(&exif)?;
    let point = extract_location(&exif)?;
    Some((timestamp, point))
}

/// EXIF datetimes carry no zone; they are taken as UTC. Only the ordering matters.
fn extract_timestamp(exif: &Exif) -> Option<i64> {
    let tags = [Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime];

    tags.iter()
        .filter_map(|tag| exif.get_field(*tag, In::PRIMARY))
        .find_map(|field| parse_exif_datetime(&field.display_value().to_string()))
        .map(|dt| dt.and_utc().timestamp())
}

fn extract_location(exif: &Exif) -> Option<GeoPoint> {
    let lat = dms_to_degrees(&exif.get_field(Tag::GPSLatitude, In::PRIMARY)?.value)?;
    let lon = dms_to_degrees(&exif.get_field(Tag::GPSLongitude, In::PRIMARY)?.value)?;

    let lat_ref = exif
        .get_field(Tag::GPSLatitudeRef, In::PRIMARY)
        .and_then(|f| hemisphere(&f.value));
    let lon_ref = exif
        .get_field(Tag::GPSLongitudeRef, In::PRIMARY)
        .and_then(|f| hemisphere(&f.value));

    GeoPoint::new(signed(lat, lat_ref, b'S'), signed(lon, lon_ref, b'W'))
}

fn signed(degrees: f64, hemisphere: Option<u8>, negative: u8) -> f64 {
    if hemisphere == Some(negative) {
        -degrees
    } else {
        degrees
    }
}

/// Degrees, minutes, seconds rationals to decimal degrees.
pub(crate) fn dms_to_degrees(value: &Value) -> Option<f64> {
    let Value::Rational(parts) = value else {
        return None;
    };
    if parts.is_empty() || parts.iter().any(|r| r.denom == 0) {
        return None;
    }

    let scale = [1.0, 60.0, 3600.0];
    Some(
        parts
            .iter()
            .zip(scale)
            .map(|(r, s)| r.to_f64() / s)
            .sum(),
    )
}

/// First byte of an ASCII ref tag, upper-cased (`N`, `S`, `E`, `W`).
pub(crate) fn hemisphere(value: &Value) -> Option<u8> {
    let Value::Ascii(strings) = value else {
        return None;
    };
    strings
        .first()
        .and_then(|s| s.first())
        .map(|b| b.to_ascii_uppercase())
}

pub(crate) fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    let cleaned = s
        .trim()
        .replace('-', ":")
        .replace('/', ":")
        .replace('\\', ":")
        .replace('.', ":");

    if let Ok(dt) = NaiveDateTime::parse_from_str(&cleaned, "%Y:%m:%d %H:%M:%S") {
        return Some(dt);
    }

    if let Ok(d) = chrono::NaiveDate::parse_from_str(cleaned.split(' ').next()?, "%Y:%m:%d") {
        return d.and_hms_opt(0, 0, 0);
    }

    None
}
