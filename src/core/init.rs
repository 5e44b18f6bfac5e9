use anyhow::Result;
use log::info;

use crate::analysis::{AnalyzerSettings, FundAnalyzer};
use crate::core::config::Config;
use crate::edgar::filing::EdgarDownloader;
use crate::edgar::locator::FilingLocator;
use crate::market::AlphaVantageClient;
use crate::utils::dirs;

pub type DefaultAnalyzer = FundAnalyzer<EdgarDownloader, AlphaVantageClient>;

pub fn initialize_downloader(config: &Config) -> Result<EdgarDownloader> {
    dirs::ensure_edgar_dirs(&config.data_dir)?;
    info!("Storing filings under {:?}", config.data_dir);
    Ok(EdgarDownloader::new(&config.data_dir, &config.user_agent))
}

pub fn initialize_market(config: &Config) -> AlphaVantageClient {
    if config.is_demo_key() {
        info!("Using the Alpha Vantage demo key; ownership lookups will be limited");
    } else {
        info!("Using Alpha Vantage key {}", config.masked_key());
    }
    AlphaVantageClient::new(&config.alpha_vantage_key)
}

pub fn initialize_analyzer(config: &Config) -> Result<DefaultAnalyzer> {
    let downloader = initialize_downloader(config)?;
    let locator = FilingLocator::new(downloader, &config.data_dir);
    let settings = AnalyzerSettings {
        demo_mode: config.is_demo_key(),
        call_delay: config.call_delay(),
        ..Default::default()
    };

    Ok(FundAnalyzer::new(locator, initialize_market(config), settings))
}
