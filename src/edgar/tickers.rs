use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::filing::padded_cik;

// Fund ticker or registrant name -> CIK
static FUND_TO_CIK: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("VFINX", "0000036405"),
        ("VANGUARD STAR FUNDS", "0000751158"),
        ("VTSAX", "0000859027"),
        ("SPY", "0000894051"),
    ])
});

/// Resolves a fund ticker, registrant name or bare CIK to a 10 digit CIK.
pub fn resolve_fund_cik(fund: &str) -> Option<String> {
    let key = fund.trim().to_uppercase();
    if let Some(cik) = FUND_TO_CIK.get(key.as_str()) {
        return Some(cik.to_string());
    }

    match padded_cik(&key) {
        Ok(cik) => Some(cik),
        Err(_) => {
            log::warn!("CIK for {} not found in fund lookup table", fund);
            None
        }
    }
}
