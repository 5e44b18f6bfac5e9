pub mod filing;
pub mod filing_type;
pub mod locator;
pub mod parsing;
pub mod tickers;

pub use filing::{EdgarDownloader, FilingRetriever};
pub use filing_type::FilingType;
pub use locator::FilingLocator;
pub use parsing::{parse_filing_dir, parse_nport_filing, HoldingRecord, ParseError, ParsedFiling};
pub use tickers::resolve_fund_cik;
