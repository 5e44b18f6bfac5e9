use anyhow::Result;
use colored::*;
use log::info;
use std::fs;
use std::path::PathBuf;

use crate::analysis::{AnalysisStatus, FundAnalysis, HoldingDetail, Ownership};

/// Holdings listed in a report; the rest are summarized by count only.
pub const MAX_REPORTED_HOLDINGS: usize = 20;

const NOT_AVAILABLE: &str = "N/A";

/// Renders an analysis as a plain-text report.
pub fn format_report(analysis: &FundAnalysis) -> String {
    if matches!(
        analysis.status,
        AnalysisStatus::DownloadFailed | AnalysisStatus::NoHoldings
    ) {
        return format!(
            "Fund analysis could not be completed. Status: {}",
            analysis.status
        );
    }

    let mut lines = vec![
        "Fund Analysis Report".to_string(),
        "======================".to_string(),
    ];

    if let Some(name) = &analysis.fund_name {
        lines.push(format!("Fund Name: {}", name));
    }
    lines.push(format!(
        "Fund CIK: {}",
        analysis.fund_cik.as_deref().unwrap_or(NOT_AVAILABLE)
    ));
    lines.push(format!(
        "Total Net Assets: {}",
        analysis
            .total_net_assets
            .map_or(NOT_AVAILABLE.to_string(), format_currency)
    ));
    lines.push(format!("Total Holdings Parsed: {}", analysis.holdings_count));
    lines.push(format!(
        "Holdings Processed for Company Ownership: {}",
        analysis.holdings_processed_for_company_ownership
    ));
    lines.push("\n--- Holdings Details ---".to_string());

    if analysis.detailed_holdings.is_empty() {
        lines.push("No detailed holdings information available.".to_string());
    }

    for (i, holding) in analysis
        .detailed_holdings
        .iter()
        .take(MAX_REPORTED_HOLDINGS)
        .enumerate()
    {
        push_holding(&mut lines, i + 1, holding);
    }

    lines.push("\n\nNote: This report may be truncated for brevity if many holdings exist.".to_string());
    lines.push("Full data might be available in logs or a more detailed output.".to_string());
    lines.join("\n")
}

fn push_holding(lines: &mut Vec<String>, position: usize, holding: &HoldingDetail) {
    let or_na = |value: &Option<String>| value.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());

    lines.push(format!("\n{}. Name: {}", position, holding.name));
    lines.push(format!(
        "   CUSIP: {}, Ticker: {}",
        or_na(&holding.cusip),
        or_na(&holding.ticker)
    ));
    lines.push(format!(
        "   Shares/Principal Held by Fund: {}",
        or_na(&holding.shares_held_by_fund)
    ));
    lines.push(format!(
        "   Market Value in Fund: {}",
        holding
            .market_value_in_fund
            .map_or(NOT_AVAILABLE.to_string(), format_currency)
    ));
    lines.push(format!(
        "   Percentage of Fund Assets: {}",
        holding
            .percentage_of_fund
            .map_or(NOT_AVAILABLE.to_string(), |pct| format!("{:.4}%", pct))
    ));

    let (owned, outstanding) = match &holding.ownership {
        Ownership::Computed {
            total_outstanding_shares,
            percentage_owned,
        } => (
            format!("{:.6}%", percentage_owned),
            group_thousands(&total_outstanding_shares.to_string()),
        ),
        Ownership::NotProcessed => (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string()),
        other => (other.label().to_string(), other.label().to_string()),
    };
    lines.push(format!("   Percentage of Company Owned by Fund: {}", owned));
    lines.push(format!("   Total Outstanding Shares of Company: {}", outstanding));
}

/// `1234567.891` as `$1,234,567.89`.
pub fn format_currency(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (int_part, decimals) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));
    let sign = if amount < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, group_thousands(int_part), decimals)
}

/// Inserts a comma every three digits of an unsigned integer string.
pub fn group_thousands(digits: &str) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Where finished reports go.
pub trait ReportSink {
    fn deliver(&self, subject: &str, body: &str) -> Result<()>;
}

pub struct StdoutSink;

impl ReportSink for StdoutSink {
    fn deliver(&self, subject: &str, body: &str) -> Result<()> {
        println!("\n{}\n", subject.bold());
        println!("{}", body);
        Ok(())
    }
}

pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSink { path: path.into() }
    }
}

impl ReportSink for FileSink {
    fn deliver(&self, subject: &str, body: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, format!("{}\n\n{}\n", subject, body))?;
        info!("Report written to {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holding(name: &str, ownership: Ownership) -> HoldingDetail {
        HoldingDetail {
            name: name.to_string(),
            cusip: Some("037833100".to_string()),
            ticker: Some("AAPL".to_string()),
            market_value_in_fund: Some(10_000_000.0),
            percentage_of_fund: Some(0.081),
            shares_held_by_fund: Some("50000".to_string()),
            ownership,
        }
    }

    fn analysis(status: AnalysisStatus, detailed_holdings: Vec<HoldingDetail>) -> FundAnalysis {
        FundAnalysis {
            fund_ticker: "VFINX".to_string(),
            fund_cik: Some("0000036405".to_string()),
            fund_name: Some("Test Fund Alpha".to_string()),
            total_net_assets: Some(123_456_789.0),
            holdings_count: detailed_holdings.len(),
            holdings_processed_for_company_ownership: 1,
            detailed_holdings,
            status,
        }
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(123_456_789.0), "$123,456,789.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(0.5), "$0.50");
        assert_eq!(format_currency(-1234.5), "-$1,234.50");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("15000000000"), "15,000,000,000");
        assert_eq!(group_thousands("100"), "100");
        assert_eq!(group_thousands("1000"), "1,000");
    }

    #[test]
    fn test_failure_statuses_render_one_line() {
        let report = format_report(&analysis(AnalysisStatus::DownloadFailed, vec![]));
        assert_eq!(report, "Fund analysis could not be completed. Status: Download failed.");

        let report = format_report(&analysis(AnalysisStatus::NoHoldings, vec![]));
        assert_eq!(
            report,
            "Fund analysis could not be completed. Status: Parsing failed or no holdings found."
        );
    }

    #[test]
    fn test_complete_report() {
        let report = format_report(&analysis(
            AnalysisStatus::Complete,
            vec![
                holding(
                    "APPLE INC",
                    Ownership::Computed {
                        total_outstanding_shares: 15_000_000_000,
                        percentage_owned: 0.00033333,
                    },
                ),
                HoldingDetail {
                    cusip: None,
                    ticker: None,
                    ..holding("MICROSOFT CORP", Ownership::NoTickerOrShares)
                },
            ],
        ));

        assert!(report.starts_with("Fund Analysis Report\n======================\nFund Name: Test Fund Alpha"));
        assert!(report.contains("Fund CIK: 0000036405"));
        assert!(report.contains("Total Net Assets: $123,456,789.00"));
        assert!(report.contains("\n1. Name: APPLE INC\n   CUSIP: 037833100, Ticker: AAPL"));
        assert!(report.contains("   Market Value in Fund: $10,000,000.00"));
        assert!(report.contains("   Percentage of Fund Assets: 0.0810%"));
        assert!(report.contains("   Percentage of Company Owned by Fund: 0.000333%"));
        assert!(report.contains("   Total Outstanding Shares of Company: 15,000,000,000"));
        assert!(report.contains("2. Name: MICROSOFT CORP\n   CUSIP: N/A, Ticker: N/A"));
        assert!(report.contains("   Percentage of Company Owned by Fund: N/A (No Ticker/Shares)"));
    }

    #[test]
    fn test_report_lists_first_twenty_holdings() {
        let holdings = (1..=25)
            .map(|i| holding(&format!("HOLDING {}", i), Ownership::SkippedDemoLimit))
            .collect();
        let report = format_report(&analysis(AnalysisStatus::Complete, holdings));

        assert!(report.contains("20. Name: HOLDING 20"));
        assert!(!report.contains("HOLDING 21"));
        assert!(report.contains("Total Holdings Parsed: 25"));
        assert!(report.contains("Skipped (Demo Limit)"));
    }

    #[test]
    fn test_other_incomplete_statuses_render_full_report() {
        for status in [
            AnalysisStatus::CikResolutionFailed,
            AnalysisStatus::MetadataOnly {
                fund_name: Some("Test Fund Alpha".to_string()),
                total_net_assets: Some(123_456_789.0),
            },
        ] {
            let report = format_report(&analysis(status, vec![]));
            assert!(report.starts_with("Fund Analysis Report"));
        }
    }

    #[test]
    fn test_metadata_only_report_notes_missing_holdings() {
        let status = AnalysisStatus::MetadataOnly {
            fund_name: Some("Test Fund Alpha".to_string()),
            total_net_assets: None,
        };
        let mut result = analysis(status, vec![]);
        result.total_net_assets = None;
        let report = format_report(&result);

        assert!(report.contains("Total Net Assets: N/A"));
        assert!(report.contains("No detailed holdings information available."));
    }

    #[test]
    fn test_file_sink_writes_subject_and_body() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("reports/vfinx.txt");

        FileSink::new(&path).deliver("Fund Ownership Analysis: X", "body").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "Fund Ownership Analysis: X\n\nbody\n");
    }
}
