use anyhow::{anyhow, Result};
use mime::Mime;
use reqwest::Client;
use std::path::Path;
use url::Url;

use super::rate_limit::RateLimiter;

pub async fn fetch_text(
    client: &Client,
    url: &Url,
    user_agent: &str,
    accept: &Mime,
    rate_limiter: &RateLimiter,
) -> Result<String> {
    rate_limiter.acquire().await;
    log::debug!("Fetching URL: {}", url);

    let response = client
        .get(url.as_str())
        .header(reqwest::header::USER_AGENT, user_agent)
        .header(reqwest::header::ACCEPT, accept.as_ref())
        .send()
        .await?;

    log::debug!("Response status: {}", response.status());

    if !response.status().is_success() {
        return Err(anyhow!(
            "HTTP request to {} failed with status: {}",
            url,
            response.status()
        ));
    }

    let content = response.text().await?;
    log::debug!("Received content length: {}", content.len());
    Ok(content)
}

pub async fn fetch_and_save(
    client: &Client,
    url: &Url,
    filepath: &Path,
    user_agent: &str,
    accept: &Mime,
    rate_limiter: &RateLimiter,
) -> Result<()> {
    let content = fetch_text(client, url, user_agent, accept, rate_limiter).await?;

    if let Some(parent) = filepath.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(filepath, &content)?;
    log::debug!("Saved {} bytes to {:?}", content.len(), filepath);

    Ok(())
}
