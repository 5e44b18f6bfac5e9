pub mod analysis;
pub mod core;
pub mod edgar;
pub mod market;
pub mod report;
pub mod utils;

// Re-exports
pub use analysis::{AnalysisStatus, FundAnalysis, FundAnalyzer};
pub use core::config::Config;
pub use core::init;
pub use report::format_report;
