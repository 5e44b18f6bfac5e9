use log::{debug, warn};
use roxmltree::{Document, Node, ParsingOptions};

use super::index::LocalNameIndex;
use super::types::{FilingMetadata, HoldingRecord, ParsedFiling};

const SERIES_NAME: &str = "seriesName";
const REGISTRANT_NAME_PATH: [&str; 2] = ["genInfo", "regName"];
const TOTAL_ASSETS_PATH: [&str; 2] = ["fundInfo", "totAssets"];
const HOLDINGS_PATH: [&str; 2] = ["invstOrSecs", "invstOrSec"];

const HOLDING_NAME: &str = "name";
const HOLDING_CUSIP: &str = "cusip";
const HOLDING_TICKER: &str = "securityTicker";
const HOLDING_VALUE_USD: &str = "valUSD";
const HOLDING_BALANCE: &str = "balance";
const HOLDING_PCT_VALUE: &str = "pctVal";

/// Parses N-PORT style XML into fund metadata and holdings.
///
/// Every field is optional; only malformed XML is an error. A DOCTYPE is
/// accepted as part of a well-formed document.
pub fn parse_document(xml: &str) -> Result<ParsedFiling, roxmltree::Error> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document = Document::parse_with_options(xml, options)?;
    let index = LocalNameIndex::build(&document);

    let metadata = extract_metadata(&index);
    let holdings = extract_holdings(&index);

    if metadata.fund_name.is_none() {
        warn!("Could not determine fund name from XML");
    }
    if metadata.total_net_assets.is_none() {
        warn!("Could not determine total net assets from XML");
    }
    if holdings.is_empty() {
        warn!("No holdings extracted; the XML structure may be unsupported");
    }

    Ok(ParsedFiling {
        fund_name: metadata.fund_name,
        total_net_assets: metadata.total_net_assets,
        holdings,
    })
}

pub fn extract_metadata(index: &LocalNameIndex) -> FilingMetadata {
    let root = index.root();

    let fund_name = first_text(index, root, &[SERIES_NAME])
        .or_else(|| first_text(index, root, &REGISTRANT_NAME_PATH));

    let total_net_assets = first_text(index, root, &TOTAL_ASSETS_PATH)
        .and_then(|raw| parse_decimal(&raw, "total net assets"));

    FilingMetadata {
        fund_name,
        total_net_assets,
    }
}

/// Holdings in document order, dropping the ones with nothing to report.
pub fn extract_holdings(index: &LocalNameIndex) -> Vec<HoldingRecord> {
    let root = index.root();
    let mut elements = index.at_path(root, &HOLDINGS_PATH);
    if elements.is_empty() {
        elements = index.descendants(root, HOLDINGS_PATH[1]).collect();
    }
    debug!("Found {} holding elements", elements.len());

    let total = elements.len();
    let holdings: Vec<HoldingRecord> = elements
        .into_iter()
        .map(|element| extract_holding(index, element))
        .filter(HoldingRecord::is_reportable)
        .collect();

    if holdings.len() < total {
        debug!(
            "Dropped {} holdings without a name and a value or balance",
            total - holdings.len()
        );
    }
    holdings
}

fn extract_holding<'a, 'input: 'a>(
    index: &LocalNameIndex<'a, 'input>,
    element: Node<'a, 'input>,
) -> HoldingRecord {
    let field = |name: &str| first_text(index, element, &[name]);

    HoldingRecord {
        name: field(HOLDING_NAME),
        cusip: field(HOLDING_CUSIP),
        ticker: field(HOLDING_TICKER),
        market_value: field(HOLDING_VALUE_USD).and_then(|raw| parse_decimal(&raw, HOLDING_VALUE_USD)),
        shares_or_principal: field(HOLDING_BALANCE),
        percentage_of_fund: field(HOLDING_PCT_VALUE).and_then(|raw| parse_decimal(&raw, HOLDING_PCT_VALUE)),
    }
}

/// Text of the first element along `path` below `scope`, or of the first one
/// anywhere below it when the path matches nothing. An empty element counts as
/// the field being absent; deeper matches are not consulted.
fn first_text<'a, 'input: 'a>(
    index: &LocalNameIndex<'a, 'input>,
    scope: Node<'a, 'input>,
    path: &[&str],
) -> Option<String> {
    let last = path.last()?;
    let element = index
        .at_path(scope, path)
        .into_iter()
        .next()
        .or_else(|| index.descendants(scope, last).next())?;
    text_of(element)
}

fn text_of(node: Node) -> Option<String> {
    node.text()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn parse_decimal(raw: &str, field: &str) -> Option<f64> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            warn!("Could not parse {}: {:?}", field, raw);
            None
        }
    }
}
