use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use streetseq::config::DEFAULT_ENDPOINT;
use streetseq::fetch::DEFAULT_TIMEOUT;
use streetseq::throttle::DEFAULT_THROTTLE_INTERVAL;
use streetseq::{ExifGeoSource, FixedInterval, HttpFetcher, RequestParams, RunConfig, SetupError};

#[derive(Parser)]
#[command(
    name = "streetseq",
    version,
    about = "Download a time-ordered Street View image for every geotagged photo in a directory"
)]
struct Cli {
    /// Directory of geotagged photos
    input_dir: PathBuf,

    /// Output directory (must not exist yet)
    output_dir: PathBuf,

    /// Street View Static API key
    #[arg(long, env = "STREETSEQ_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Imagery endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Delay between requests in milliseconds
    #[arg(long, default_value_t = DEFAULT_THROTTLE_INTERVAL.as_millis() as u64)]
    delay_ms: u64,

    /// HTTP request timeout in seconds (0 disables the timeout)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,

    /// Delete the output file of a failed download instead of leaving it empty or truncated
    #[arg(long)]
    remove_failed: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not failures
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let t_total = std::time::Instant::now();

    let request = RequestParams {
        endpoint: cli.endpoint,
        api_key: cli.api_key,
        ..RequestParams::default()
    };
    let config = RunConfig::new(cli.input_dir, cli.output_dir)
        .with_request(request)
        .with_remove_failed(cli.remove_failed);

    let fetcher = HttpFetcher::new(request_timeout(cli.timeout_secs))
        .map_err(SetupError::HttpClient)?;
    let throttle = FixedInterval(Duration::from_millis(cli.delay_ms));

    let report = streetseq::process(
        &config,
        &ExifGeoSource,
        &fetcher,
        &throttle,
        &|current, total| println!("Downloading {} of {}", current, total),
    )?;

    debug!(
        "{} of {} files written ({:.2}s)",
        report.files_written,
        report.total,
        t_total.elapsed().as_secs_f64()
    );
    Ok(())
}

fn request_timeout(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
