use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use log::{info, warn};
use mime::{APPLICATION_JSON, TEXT_PLAIN, TEXT_XML};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use super::filing_type::FilingType;
use crate::edgar::parsing::{DIRECT_DOCUMENT_NAMES, SUBMISSION_ENVELOPE_NAME};
use crate::utils::dirs;
use crate::utils::http::{fetch_and_save, fetch_text};
use crate::utils::rate_limit::RateLimiter;

pub const EDGAR_DATA_URL: &str = "https://data.sec.gov";
pub const EDGAR_ARCHIVES_URL: &str = "https://www.sec.gov/Archives/edgar/data";

/// Materializes filings on local storage.
///
/// `get` downloads at most `limit` of the most recent filings of `filing_type`
/// for the registrant and reports how many were obtained. Filings land under
/// `<root>/sec-edgar-filings/<registrant_id>/<filing_type>/<accession>/`.
#[async_trait]
pub trait FilingRetriever: Send + Sync {
    async fn get(&self, filing_type: FilingType, registrant_id: &str, limit: usize)
        -> Result<usize>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilingEntry {
    #[serde(rename = "accessionNumber", default)]
    pub accession_number: Vec<String>,
    #[serde(rename = "filingDate", default)]
    pub filing_date: Vec<NaiveDate>,
    #[serde(rename = "form", default)]
    pub form: Vec<String>,
    #[serde(rename = "primaryDocument", default)]
    pub primary_document: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilingsData {
    pub recent: FilingEntry,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompanyFilings {
    pub cik: String,
    #[serde(default)]
    pub name: String,
    pub filings: FilingsData,
}

/// One row of the `filings.recent` columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentFiling {
    pub accession_number: String,
    pub filing_date: Option<NaiveDate>,
    pub form: String,
    pub primary_document: String,
}

/// Picks up to `limit` filings of `filing_type`, keeping the newest-first order
/// EDGAR reports them in.
pub fn select_recent(entry: &FilingEntry, filing_type: FilingType, limit: usize) -> Vec<RecentFiling> {
    (0..entry.accession_number.len())
        .filter(|&i| {
            entry
                .form
                .get(i)
                .is_some_and(|form| form.eq_ignore_ascii_case(filing_type.as_str()))
        })
        .take(limit)
        .map(|i| RecentFiling {
            accession_number: entry.accession_number[i].clone(),
            filing_date: entry.filing_date.get(i).copied(),
            form: entry.form[i].clone(),
            primary_document: entry.primary_document.get(i).cloned().unwrap_or_default(),
        })
        .collect()
}

/// Zero-pads a numeric registrant identifier to the 10 digits EDGAR expects.
pub fn padded_cik(registrant_id: &str) -> Result<String> {
    let trimmed = registrant_id.trim();
    if trimmed.is_empty() || trimmed.len() > 10 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(anyhow!("Not a valid CIK: {:?}", registrant_id));
    }
    Ok(format!("{:0>10}", trimmed))
}

/// [`FilingRetriever`] backed by the SEC EDGAR submissions API and archives.
pub struct EdgarDownloader {
    client: Client,
    data_dir: PathBuf,
    user_agent: String,
    data_url: String,
    archives_url: String,
    rate_limiter: &'static RateLimiter,
}

impl EdgarDownloader {
    pub fn new(data_dir: impl Into<PathBuf>, user_agent: impl Into<String>) -> Self {
        EdgarDownloader {
            client: Client::new(),
            data_dir: data_dir.into(),
            user_agent: user_agent.into(),
            data_url: EDGAR_DATA_URL.to_string(),
            archives_url: EDGAR_ARCHIVES_URL.to_string(),
            rate_limiter: RateLimiter::edgar(),
        }
    }

    /// Points the downloader at alternative hosts (mirrors, test servers).
    pub fn with_base_urls(mut self, data_url: &str, archives_url: &str) -> Self {
        self.data_url = data_url.trim_end_matches('/').to_string();
        self.archives_url = archives_url.trim_end_matches('/').to_string();
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub async fn company_filings(&self, cik: &str) -> Result<CompanyFilings> {
        let padded = padded_cik(cik)?;
        let url = Url::parse(&format!("{}/submissions/CIK{}.json", self.data_url, padded))?;

        info!("Fetching company filings for CIK {}", padded);
        let content = fetch_text(
            &self.client,
            &url,
            &self.user_agent,
            &APPLICATION_JSON,
            self.rate_limiter,
        )
        .await?;

        serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse filings JSON for CIK {}: {}", padded, e))
    }

    async fn materialize(
        &self,
        registrant_id: &str,
        filing_type: FilingType,
        filing: &RecentFiling,
    ) -> Result<PathBuf> {
        let accession_dir = dirs::accession_dir(
            &self.data_dir,
            registrant_id,
            filing_type.as_str(),
            &filing.accession_number,
        );
        let submission_path = accession_dir.join(SUBMISSION_ENVELOPE_NAME);

        if submission_path.exists() {
            info!(
                "Filing {} already downloaded to {:?}",
                filing.accession_number, accession_dir
            );
            return Ok(accession_dir);
        }

        let cik = padded_cik(registrant_id)?;
        let archive_cik = cik.trim_start_matches('0');
        let compact_accession = filing.accession_number.replace('-', "");
        let archive_base = format!("{}/{}/{}", self.archives_url, archive_cik, compact_accession);

        let submission_url = Url::parse(&format!("{}/{}.txt", archive_base, filing.accession_number))?;
        info!("Fetching: {}", submission_url);
        fetch_and_save(
            &self.client,
            &submission_url,
            &submission_path,
            &self.user_agent,
            &TEXT_PLAIN,
            self.rate_limiter,
        )
        .await?;

        // The listed primary document is often an XSL rendering path; the raw XML
        // sits at the accession root under the same basename.
        if filing.primary_document.to_lowercase().ends_with(".xml") {
            if let Some(basename) = filing.primary_document.rsplit('/').next() {
                let document_url = Url::parse(&format!("{}/{}", archive_base, basename))?;
                let document_path = accession_dir.join(DIRECT_DOCUMENT_NAMES[0]);
                if let Err(e) = fetch_and_save(
                    &self.client,
                    &document_url,
                    &document_path,
                    &self.user_agent,
                    &TEXT_XML,
                    self.rate_limiter,
                )
                .await
                {
                    warn!(
                        "Could not fetch primary document for {}: {}",
                        filing.accession_number, e
                    );
                }
            }
        }

        info!("Saved filing {} to {:?}", filing.accession_number, accession_dir);
        Ok(accession_dir)
    }
}

#[async_trait]
impl FilingRetriever for EdgarDownloader {
    async fn get(
        &self,
        filing_type: FilingType,
        registrant_id: &str,
        limit: usize,
    ) -> Result<usize> {
        let filings = self.company_filings(registrant_id).await?;
        let selected = select_recent(&filings.filings.recent, filing_type, limit);

        info!(
            "Found {} {} filing(s) for {} ({})",
            selected.len(),
            filing_type,
            registrant_id,
            filings.name
        );

        let mut obtained = 0;
        for filing in &selected {
            self.materialize(registrant_id, filing_type, filing).await?;
            obtained += 1;
        }

        Ok(obtained)
    }
}
