use anyhow::Result;
use fundlens::edgar::{parse_nport_filing, EdgarDownloader, FilingLocator, FilingRetriever, FilingType};
use fundlens::utils::dirs;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER_AGENT: &str = "fundlens-tests test@example.com";
const ACCESSION: &str = "0000036405-24-000009";

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("src/edgar/parsing/tests/data")
        .join(name);
    fs::read_to_string(path).unwrap()
}

fn submissions_json() -> serde_json::Value {
    json!({
        "cik": "36405",
        "name": "VANGUARD INDEX FUNDS",
        "filings": {
            "recent": {
                "accessionNumber": ["0000036405-24-000010", ACCESSION],
                "filingDate": ["2024-11-26", "2024-08-28"],
                "form": ["N-CSR", "NPORT-P"],
                "primaryDocument": ["ncsr.htm", "xslFormNPORT-P_X01/primary_doc.xml"]
            },
            "files": []
        }
    })
}

async fn mount_edgar(server: &MockServer, archive_hits: u64) {
    Mock::given(method("GET"))
        .and(path("/submissions/CIK0000036405.json"))
        .and(header("user-agent", USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_json(submissions_json()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/archives/36405/000003640524000009/0000036405-24-000009.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fixture("full_submission.txt")))
        .expect(archive_hits)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/archives/36405/000003640524000009/primary_doc.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fixture("nport_sample.xml")))
        .expect(archive_hits)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_download_and_parse_latest_filing() -> Result<()> {
    // --- Arrange ---
    let server = MockServer::start().await;
    mount_edgar(&server, 1).await;
    let tmp = tempdir()?;
    let downloader = EdgarDownloader::new(tmp.path(), USER_AGENT)
        .with_base_urls(&server.uri(), &format!("{}/archives", server.uri()));

    // --- Act ---
    let obtained = downloader.get(FilingType::FormNPORTP, "0000036405", 1).await?;

    // --- Assert ---
    assert_eq!(obtained, 1);
    let accession_dir = dirs::accession_dir(tmp.path(), "0000036405", "NPORT-P", ACCESSION);
    assert!(accession_dir.join("full-submission.txt").is_file());
    assert!(accession_dir.join("primary_doc.xml").is_file());

    let filing = parse_nport_filing(&dirs::filing_type_dir(tmp.path(), "0000036405", "NPORT-P"));
    assert_eq!(filing.fund_name.as_deref(), Some("Test Fund Series A"));
    assert_eq!(filing.holdings.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_cached_filing_is_not_downloaded_again() -> Result<()> {
    let server = MockServer::start().await;
    mount_edgar(&server, 1).await;
    let tmp = tempdir()?;
    let downloader = EdgarDownloader::new(tmp.path(), USER_AGENT)
        .with_base_urls(&server.uri(), &format!("{}/archives", server.uri()));

    assert_eq!(downloader.get(FilingType::FormNPORTP, "0000036405", 1).await?, 1);
    assert_eq!(downloader.get(FilingType::FormNPORTP, "0000036405", 1).await?, 1);
    // Archive mocks verify their single expected hit when the server drops.
    Ok(())
}

#[tokio::test]
async fn test_locator_falls_through_missing_filing_types() -> Result<()> {
    let server = MockServer::start().await;
    mount_edgar(&server, 1).await;
    let tmp = tempdir()?;
    let downloader = EdgarDownloader::new(tmp.path(), USER_AGENT)
        .with_base_urls(&server.uri(), &format!("{}/archives", server.uri()));
    let locator = FilingLocator::new(downloader, tmp.path())
        .with_filing_types(vec![FilingType::FormNQ, FilingType::FormNPORTP]);

    let located = locator.locate("0000036405").await;
    assert_eq!(
        located,
        Some(dirs::filing_type_dir(tmp.path(), "0000036405", "NPORT-P"))
    );
    Ok(())
}

#[tokio::test]
async fn test_unknown_registrant_is_not_located() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let tmp = tempdir()?;
    let downloader = EdgarDownloader::new(tmp.path(), USER_AGENT)
        .with_base_urls(&server.uri(), &server.uri());

    assert!(downloader.get(FilingType::FormNPORTP, "0000000001", 1).await.is_err());
    assert_eq!(FilingLocator::new(downloader, tmp.path()).locate("0000000001").await, None);
    Ok(())
}
