mod alpha_vantage;

pub use alpha_vantage::{parse_shares_outstanding, AlphaVantageClient, ALPHA_VANTAGE_URL};

use async_trait::async_trait;

/// Source of company share counts, keyed by ticker.
#[async_trait]
pub trait SharesOutstandingProvider: Send + Sync {
    /// `None` when the figure is unavailable for any reason.
    async fn shares_outstanding(&self, ticker: &str) -> Option<u64>;
}
