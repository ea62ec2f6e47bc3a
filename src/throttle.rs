use std::time::Duration;

/// Spacing between requests that keeps us under the provider's rate limit.
pub const DEFAULT_THROTTLE_INTERVAL: Duration = Duration::from_secs(1);

/// Rate-limit policy applied between consecutive downloads.
pub trait Throttle {
    fn pause(&self);
}

/// Sleep a fixed interval between requests.
#[derive(Debug, Clone, Copy)]
pub struct FixedInterval(pub Duration);

impl Default for FixedInterval {
    fn default() -> Self {
        Self(DEFAULT_THROTTLE_INTERVAL)
    }
}

impl Throttle for FixedInterval {
    fn pause(&self) {
        if !self.0.is_zero() {
            std::thread::sleep(self.0);
        }
    }
}

/// No spacing at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Throttle for NoDelay {
    fn pause(&self) {}
}
