use std::path::PathBuf;

use crate::geo::GeoPoint;

pub const DEFAULT_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/streetview";

/// Fixed parameters of every imagery request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestParams {
    pub endpoint: String,
    pub width: u32,
    pub height: u32,
    pub fov: u32,
    pub heading: u32,
    pub api_key: Option<String>,
}

impl Default for RequestParams {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            width: 640,
            height: 640,
            fov: 120,
            heading: 0,
            api_key: None,
        }
    }
}

impl RequestParams {
    /// Build the request URL for one location.
    ///
    /// The location is inserted as-is (`lat,lon`) so the coordinates stay
    /// readable in logs; only the API key is percent-encoded.
    pub fn url_for(&self, point: &GeoPoint) -> String {
        let mut url = format!(
            "{}?location={}&size={}x{}&fov={}&heading={}&sensor=false",
            self.endpoint,
            point.location(),
            self.width,
            self.height,
            self.fov,
            self.heading,
        );
        if let Some(key) = &self.api_key {
            url.push_str("&key=");
            url.push_str(&urlencoding::encode(key));
        }
        url
    }
}

/// Immutable settings for one run, shared by every stage.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub request: RequestParams,
    /// Delete the destination file when its fetch or write fails.
    pub remove_failed: bool,
}

impl RunConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            request: RequestParams::default(),
            remove_failed: false,
        }
    }

    pub fn with_request(mut self, request: RequestParams) -> Self {
        self.request = request;
        self
    }

    pub fn with_remove_failed(mut self, remove_failed: bool) -> Self {
        self.remove_failed = remove_failed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url() {
        let point = GeoPoint::new(37.1, -122.1).unwrap();
        let url = RequestParams::default().url_for(&point);
        assert_eq!(
            url,
            "https://maps.googleapis.com/maps/api/streetview?location=37.1,-122.1&size=640x640&fov=120&heading=0&sensor=false"
        );
    }

    #[test]
    fn test_api_key_is_encoded() {
        let params = RequestParams {
            api_key: Some("ab c&d".to_string()),
            ..RequestParams::default()
        };
        let url = params.url_for(&GeoPoint::new(0.0, 0.0).unwrap());
        assert!(url.starts_with(
            "https://maps.googleapis.com/maps/api/streetview?location=0.0,0.0&size=640x640"
        ));
        assert!(url.ends_with("&sensor=false&key=ab%20c%26d"));
    }

    #[test]
    fn test_defaults() {
        let config = RunConfig::new("in", "out");
        assert!(!config.remove_failed);
        assert_eq!(config.request, RequestParams::default());
    }
}
