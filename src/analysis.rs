use log::{info, warn};
use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;

use crate::edgar::filing::FilingRetriever;
use crate::edgar::locator::FilingLocator;
use crate::edgar::parsing::{parse_nport_filing, HoldingRecord};
use crate::edgar::tickers::resolve_fund_cik;
use crate::market::SharesOutstandingProvider;

pub const DEMO_LOOKUP_LIMIT: usize = 3;

const IBM_NAME: &str = "INTERNATIONAL BUSINESS MACHINES";
const IBM_TICKER: &str = "IBM";

#[derive(Debug, Clone)]
pub struct AnalyzerSettings {
    /// Demo market-data key: caps lookups and infers the one symbol it serves.
    pub demo_mode: bool,
    pub call_delay: Duration,
    pub demo_lookup_limit: usize,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            demo_mode: false,
            call_delay: Duration::from_secs(1),
            demo_lookup_limit: DEMO_LOOKUP_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisStatus {
    CikResolutionFailed,
    DownloadFailed,
    MetadataOnly {
        fund_name: Option<String>,
        total_net_assets: Option<f64>,
    },
    NoHoldings,
    Complete,
}

impl AnalysisStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, AnalysisStatus::Complete)
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisStatus::CikResolutionFailed => write!(f, "CIK resolution failed."),
            AnalysisStatus::DownloadFailed => write!(f, "Download failed."),
            AnalysisStatus::MetadataOnly {
                fund_name,
                total_net_assets,
            } => write!(
                f,
                "Parsed metadata (Fund: {}, Assets: {}) but no holdings details.",
                fund_name.as_deref().unwrap_or("None"),
                total_net_assets.map_or("None".to_string(), |assets| format!("{:?}", assets))
            ),
            AnalysisStatus::NoHoldings => write!(f, "Parsing failed or no holdings found."),
            AnalysisStatus::Complete => write!(f, "Analysis complete."),
        }
    }
}

impl Serialize for AnalysisStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// What is known about the fund's stake in a holding's issuer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Ownership {
    NotProcessed,
    SkippedDemoLimit,
    NoTickerOrShares,
    LookupFailed,
    Computed {
        total_outstanding_shares: u64,
        percentage_owned: f64,
    },
}

impl Ownership {
    pub fn label(&self) -> &'static str {
        match self {
            Ownership::NotProcessed => "Not Processed",
            Ownership::SkippedDemoLimit => "Skipped (Demo Limit)",
            Ownership::NoTickerOrShares => "N/A (No Ticker/Shares)",
            Ownership::LookupFailed => "N/A (AV Fail/No Data)",
            Ownership::Computed { .. } => "Computed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingDetail {
    pub name: String,
    pub cusip: Option<String>,
    pub ticker: Option<String>,
    pub market_value_in_fund: Option<f64>,
    pub percentage_of_fund: Option<f64>,
    pub shares_held_by_fund: Option<String>,
    pub ownership: Ownership,
}

impl HoldingDetail {
    fn from_record(record: &HoldingRecord) -> Self {
        HoldingDetail {
            name: record.name.clone().unwrap_or_default(),
            cusip: record.cusip.clone(),
            ticker: record.ticker.clone(),
            market_value_in_fund: record.market_value,
            percentage_of_fund: record.percentage_of_fund,
            shares_held_by_fund: record.shares_or_principal.clone(),
            ownership: Ownership::NotProcessed,
        }
    }

    /// Balance as a number; principal amounts and unparseable text count as 0.
    fn shares_held(&self) -> f64 {
        self.shares_held_by_fund
            .as_deref()
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|shares| shares.is_finite())
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundAnalysis {
    pub fund_ticker: String,
    pub fund_cik: Option<String>,
    pub fund_name: Option<String>,
    pub total_net_assets: Option<f64>,
    pub holdings_count: usize,
    pub holdings_processed_for_company_ownership: usize,
    pub detailed_holdings: Vec<HoldingDetail>,
    pub status: AnalysisStatus,
}

impl FundAnalysis {
    fn failed(fund: &str, fund_cik: Option<String>, status: AnalysisStatus) -> Self {
        FundAnalysis {
            fund_ticker: fund.to_string(),
            fund_cik,
            fund_name: None,
            total_net_assets: None,
            holdings_count: 0,
            holdings_processed_for_company_ownership: 0,
            detailed_holdings: Vec::new(),
            status,
        }
    }
}

/// Locates and parses a fund's latest holdings filing, then sizes the fund's
/// stake in each issuer from market data.
pub struct FundAnalyzer<R, M> {
    locator: FilingLocator<R>,
    market: M,
    settings: AnalyzerSettings,
}

impl<R: FilingRetriever, M: SharesOutstandingProvider> FundAnalyzer<R, M> {
    pub fn new(locator: FilingLocator<R>, market: M, settings: AnalyzerSettings) -> Self {
        FundAnalyzer {
            locator,
            market,
            settings,
        }
    }

    pub fn locator(&self) -> &FilingLocator<R> {
        &self.locator
    }

    pub async fn analyze(&self, fund: &str) -> FundAnalysis {
        info!("Starting analysis for fund: {}", fund);
        match resolve_fund_cik(fund) {
            Some(cik) => {
                info!("Resolved {} to CIK: {}", fund, cik);
                self.analyze_cik(fund, &cik).await
            }
            None => {
                warn!("Could not determine CIK for {}", fund);
                FundAnalysis::failed(fund, None, AnalysisStatus::CikResolutionFailed)
            }
        }
    }

    pub async fn analyze_cik(&self, fund: &str, cik: &str) -> FundAnalysis {
        let Some(filing_dir) = self.locator.locate(cik).await else {
            warn!("Failed to download holdings for CIK {}", cik);
            return FundAnalysis::failed(fund, Some(cik.to_string()), AnalysisStatus::DownloadFailed);
        };

        let filing = parse_nport_filing(&filing_dir);
        if !filing.has_holdings() {
            let status = if filing.has_metadata() {
                AnalysisStatus::MetadataOnly {
                    fund_name: filing.fund_name.clone(),
                    total_net_assets: filing.total_net_assets,
                }
            } else {
                AnalysisStatus::NoHoldings
            };
            warn!("{} for CIK {} at {:?}", status, cik, filing_dir);
            return FundAnalysis {
                fund_name: filing.fund_name,
                total_net_assets: filing.total_net_assets,
                ..FundAnalysis::failed(fund, Some(cik.to_string()), status)
            };
        }

        info!(
            "Parsed {} holdings for {}",
            filing.holdings.len(),
            filing.fund_name.as_deref().unwrap_or(cik)
        );

        let mut lookups = 0;
        let mut detailed_holdings = Vec::with_capacity(filing.holdings.len());
        for record in &filing.holdings {
            let mut detail = HoldingDetail::from_record(record);
            if self.settings.demo_mode && lookups >= self.settings.demo_lookup_limit {
                detail.ownership = Ownership::SkippedDemoLimit;
            } else {
                let looked_up = self.size_ownership(&mut detail).await;
                if looked_up {
                    lookups += 1;
                }
            }
            detailed_holdings.push(detail);
        }

        FundAnalysis {
            fund_ticker: fund.to_string(),
            fund_cik: Some(cik.to_string()),
            fund_name: filing.fund_name,
            total_net_assets: filing.total_net_assets,
            holdings_count: filing.holdings.len(),
            holdings_processed_for_company_ownership: lookups,
            detailed_holdings,
            status: AnalysisStatus::Complete,
        }
    }

    /// Fills in `detail.ownership`; returns whether market data was queried.
    async fn size_ownership(&self, detail: &mut HoldingDetail) -> bool {
        let shares_held = detail.shares_held();

        let mut lookup_ticker = detail.ticker.clone();
        if lookup_ticker.is_none()
            && self.settings.demo_mode
            && detail.name.to_uppercase().contains(IBM_NAME)
        {
            lookup_ticker = Some(IBM_TICKER.to_string());
            detail.ticker = Some(format!("{} (Inferred)", IBM_TICKER));
        }

        let Some(ticker) = lookup_ticker.filter(|_| shares_held > 0.0) else {
            detail.ownership = Ownership::NoTickerOrShares;
            return false;
        };

        if !self.settings.call_delay.is_zero() {
            tokio::time::sleep(self.settings.call_delay).await;
        }

        detail.ownership = match self.market.shares_outstanding(&ticker).await {
            Some(outstanding) if outstanding > 0 => Ownership::Computed {
                total_outstanding_shares: outstanding,
                percentage_owned: shares_held / outstanding as f64 * 100.0,
            },
            _ => Ownership::LookupFailed,
        };
        true
    }
}
