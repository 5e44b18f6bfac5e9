use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, error, info, warn};
use reqwest::Client;
use serde_json::Value;
use url::Url;

use super::SharesOutstandingProvider;
use crate::core::config::DEMO_API_KEY;

pub const ALPHA_VANTAGE_URL: &str = "https://www.alphavantage.co";

// The demo key only serves the documented IBM examples.
const DEMO_SYMBOL: &str = "IBM";

pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AlphaVantageClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        AlphaVantageClient {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: ALPHA_VANTAGE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn is_demo(&self) -> bool {
        self.api_key == DEMO_API_KEY
    }

    pub async fn company_overview(&self, ticker: &str) -> Result<Value> {
        let url = Url::parse_with_params(
            &format!("{}/query", self.base_url),
            &[
                ("function", "OVERVIEW"),
                ("symbol", ticker),
                ("apikey", self.api_key.as_str()),
            ],
        )?;
        debug!("Alpha Vantage overview request for {}", ticker);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "Alpha Vantage request failed with status: {}",
                response.status()
            ));
        }

        let overview: Value = response.json().await?;
        for notice in ["Note", "Information", "Error Message"] {
            if let Some(message) = overview.get(notice).and_then(Value::as_str) {
                return Err(anyhow!("Alpha Vantage {}: {}", notice.to_lowercase(), message));
            }
        }
        Ok(overview)
    }
}

/// Reads `SharesOutstanding` from a company overview. Placeholders and zero
/// count as missing.
pub fn parse_shares_outstanding(overview: &Value) -> Option<u64> {
    let raw = overview.get("SharesOutstanding")?.as_str()?.trim();
    if raw.is_empty() || raw == "None" || raw == "0" {
        return None;
    }
    match raw.parse::<u64>() {
        Ok(shares) if shares > 0 => Some(shares),
        Ok(_) => None,
        Err(_) => {
            warn!("Could not convert SharesOutstanding {:?} to an integer", raw);
            None
        }
    }
}

#[async_trait]
impl SharesOutstandingProvider for AlphaVantageClient {
    async fn shares_outstanding(&self, ticker: &str) -> Option<u64> {
        if ticker.is_empty() {
            return None;
        }
        if self.is_demo() && !ticker.eq_ignore_ascii_case(DEMO_SYMBOL) {
            info!(
                "Demo key: skipping shares outstanding lookup for {} (only {} is served)",
                ticker, DEMO_SYMBOL
            );
            return None;
        }

        match self.company_overview(ticker).await {
            Ok(overview) => {
                let shares = parse_shares_outstanding(&overview);
                if shares.is_none() {
                    warn!("SharesOutstanding missing or zero for {}", ticker);
                }
                shares
            }
            Err(e) => {
                error!("Failed to fetch company overview for {}: {}", ticker, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_shares_outstanding() {
        assert_eq!(
            parse_shares_outstanding(&json!({"SharesOutstanding": "15204100000"})),
            Some(15_204_100_000)
        );
        assert_eq!(parse_shares_outstanding(&json!({"SharesOutstanding": "None"})), None);
        assert_eq!(parse_shares_outstanding(&json!({"SharesOutstanding": "0"})), None);
        assert_eq!(parse_shares_outstanding(&json!({"SharesOutstanding": "12.5"})), None);
        assert_eq!(parse_shares_outstanding(&json!({"Symbol": "IBM"})), None);
    }

    #[tokio::test]
    async fn test_demo_key_skips_other_symbols() {
        let client = AlphaVantageClient::new(DEMO_API_KEY).with_base_url("http://127.0.0.1:9");
        assert!(client.is_demo());
        assert_eq!(client.shares_outstanding("AAPL").await, None);
    }
}
