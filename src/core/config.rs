use anyhow::{anyhow, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::utils::dirs::DATA_DIR;

pub const DEMO_API_KEY: &str = "demo";
pub const DEFAULT_USER_AGENT: &str = "My Financial Analysis Tool dev.email@example.com";

const DEMO_CALL_DELAY: Duration = Duration::from_secs(15);
const KEYED_CALL_DELAY: Duration = Duration::from_secs(1);

#[derive(Clone, Debug)]
pub struct Config {
    pub user_agent: String,
    pub data_dir: PathBuf,
    pub alpha_vantage_key: String,
    /// Explicit delay between market-data calls; derived from the key when unset.
    pub call_delay: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            data_dir: PathBuf::from(DATA_DIR),
            alpha_vantage_key: DEMO_API_KEY.to_string(),
            call_delay: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let user_agent =
            std::env::var("SEC_USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());

        let data_dir = PathBuf::from(
            std::env::var("FUNDLENS_DATA_DIR").unwrap_or_else(|_| DATA_DIR.to_string()),
        );

        let alpha_vantage_key =
            std::env::var("ALPHA_VANTAGE_API_KEY").unwrap_or_else(|_| DEMO_API_KEY.to_string());

        let call_delay = match std::env::var("ALPHA_VANTAGE_CALL_DELAY_SECS") {
            Ok(secs) => Some(Duration::from_secs(secs.trim().parse().map_err(|_| {
                anyhow!("ALPHA_VANTAGE_CALL_DELAY_SECS must be a whole number of seconds, got {:?}", secs)
            })?)),
            Err(_) => None,
        };

        Ok(Self {
            user_agent,
            data_dir,
            alpha_vantage_key,
            call_delay,
        })
    }

    pub fn is_demo_key(&self) -> bool {
        self.alpha_vantage_key == DEMO_API_KEY
    }

    /// The demo key is throttled hard by the provider.
    pub fn call_delay(&self) -> Duration {
        self.call_delay.unwrap_or(if self.is_demo_key() {
            DEMO_CALL_DELAY
        } else {
            KEYED_CALL_DELAY
        })
    }

    pub fn masked_key(&self) -> String {
        let length = self.alpha_vantage_key.chars().count();
        if self.is_demo_key() || length <= 4 {
            return self.alpha_vantage_key.clone();
        }
        let visible: String = self.alpha_vantage_key.chars().skip(length - 4).collect();
        format!("{}{}", "*".repeat(length - 4), visible)
    }
}
