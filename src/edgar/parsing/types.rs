use serde::{Deserialize, Serialize};

/// Fund-level fields recovered from a filing. Either may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilingMetadata {
    pub fund_name: Option<String>,
    pub total_net_assets: Option<f64>,
}

/// One reported portfolio position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoldingRecord {
    pub name: Option<String>,
    pub cusip: Option<String>,
    pub ticker: Option<String>,
    pub market_value: Option<f64>,
    pub shares_or_principal: Option<String>,
    pub percentage_of_fund: Option<f64>,
}

impl HoldingRecord {
    /// A holding is kept only if it is named and carries a value or a balance.
    pub fn is_reportable(&self) -> bool {
        self.name.is_some() && (self.market_value.is_some() || self.shares_or_principal.is_some())
    }
}

/// Outcome of parsing one filing directory.
///
/// All three parts are independently optional; an empty value is the
/// "not found" result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedFiling {
    pub fund_name: Option<String>,
    pub total_net_assets: Option<f64>,
    /// In portfolio listing order.
    pub holdings: Vec<HoldingRecord>,
}

impl ParsedFiling {
    pub fn not_found() -> Self {
        Self::default()
    }

    pub fn metadata(&self) -> FilingMetadata {
        FilingMetadata {
            fund_name: self.fund_name.clone(),
            total_net_assets: self.total_net_assets,
        }
    }

    pub fn has_metadata(&self) -> bool {
        self.fund_name.is_some() || self.total_net_assets.is_some()
    }

    pub fn has_holdings(&self) -> bool {
        !self.holdings.is_empty()
    }

    pub fn is_not_found(&self) -> bool {
        !self.has_metadata() && !self.has_holdings()
    }

    pub fn into_parts(self) -> (Option<String>, Option<f64>, Vec<HoldingRecord>) {
        (self.fund_name, self.total_net_assets, self.holdings)
    }
}
