use anyhow::Result;
use colored::*;
use fundlens::{
    core::{config::Config, init},
    report::{format_report, FileSink, ReportSink, StdoutSink},
};
use log::error;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "fundlens", about = "Analyze what a mutual fund or ETF owns of the companies it holds")]
struct Opt {
    /// Ticker, name or CIK of the fund to analyze
    #[structopt(long)]
    fund: String,

    /// Alpha Vantage API key; the `demo` key is limited to a few lookups
    #[structopt(long, env = "ALPHA_VANTAGE_API_KEY", default_value = "demo")]
    alpha_vantage_key: String,

    /// Where downloaded filings are stored
    #[structopt(long, parse(from_os_str))]
    download_dir: Option<PathBuf>,

    /// Write the report to this file instead of printing it
    #[structopt(long, parse(from_os_str))]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let opt = Opt::from_args();

    let mut config = Config::from_env()?;
    config.alpha_vantage_key = opt.alpha_vantage_key.clone();
    if let Some(dir) = &opt.download_dir {
        config.data_dir = dir.clone();
    }
    println!("Using Alpha Vantage API Key: {}", config.masked_key());

    let sink: Box<dyn ReportSink> = match &opt.output {
        Some(path) => Box::new(FileSink::new(path)),
        None => Box::new(StdoutSink),
    };

    println!("\nStarting fund analysis for: {}...", opt.fund.cyan());
    let analyzer = init::initialize_analyzer(&config)?;
    let analysis = analyzer.analyze(&opt.fund).await;

    if !analysis.status.is_complete() {
        println!(
            "\n{} Fund analysis for {} could not be completed.",
            "✗".red(),
            opt.fund
        );
        println!("Status: {}", analysis.status.to_string().yellow());

        let subject = format!("Fund Analysis FAILED for {}", opt.fund);
        let body = format!("Analysis for fund '{}' failed.\nReason: {}\n", opt.fund, analysis.status);
        if let Err(e) = sink.deliver(&subject, &body) {
            error!("Failed to deliver failure report: {}", e);
        }
        std::process::exit(1);
    }

    println!("\n{} Analysis for {} complete.", "✓".green(), opt.fund);
    let subject = format!(
        "Fund Ownership Analysis: {}",
        analysis.fund_name.as_deref().unwrap_or(&opt.fund)
    );
    sink.deliver(&subject, &format_report(&analysis))?;

    Ok(())
}
