use once_cell::sync::OnceCell;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Spaces requests at least `min_interval` apart.
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

static EDGAR_RATE_LIMITER: OnceCell<RateLimiter> = OnceCell::new();

impl RateLimiter {
    pub fn new(max_per_second: u32) -> Self {
        Self::with_interval(Duration::from_secs(1) / max_per_second.max(1))
    }

    pub fn with_interval(min_interval: Duration) -> Self {
        RateLimiter {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    // SEC fair access policy: 10 requests per second
    pub fn edgar() -> &'static RateLimiter {
        EDGAR_RATE_LIMITER.get_or_init(|| RateLimiter::new(10))
    }
}
