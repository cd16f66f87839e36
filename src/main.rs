//! Flow Comparison Service - Batch CLI
//!
//! Runs one reservoir-release vs. stream-gauge comparison end to end:
//! 1. Fetches hourly flow from USBR HDB and USGS NWIS for a date range
//! 2. Applies a travel-time lag to the upstream series
//! 3. Aligns the two series on shared timestamps
//! 4. Prints agreement statistics (Correlation, ME, RMSE, R Squared, NSE)
//!
//! Usage:
//!   cargo run --release -- --reach davis-big-bend --start 2024-05-01 --end 2024-05-07 --lag 7
//!   cargo run --release -- --list-reaches
//!
//! Options:
//!   --csv FILE   also write the aligned pair as CSV
//!   --no-me      drop Mean Error from the report
//!   --log FILE   append log entries to FILE

use chrono::NaiveDate;
use std::env;

use flowcomp_service::config;
use flowcomp_service::export;
use flowcomp_service::ingest::HttpFetcher;
use flowcomp_service::logging::{self, LogLevel};
use flowcomp_service::session::ComparisonSession;
use flowcomp_service::stations::REACH_REGISTRY;

struct CliArgs {
    reach: Option<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    lag: u32,
    csv_path: Option<String>,
    include_me: bool,
    log_file: Option<String>,
    list_reaches: bool,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = env::args().collect();
    let mut parsed = CliArgs {
        reach: None,
        start: None,
        end: None,
        lag: 0,
        csv_path: None,
        include_me: true,
        log_file: None,
        list_reaches: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--reach" => {
                parsed.reach = Some(take_value(&args, i, "--reach"));
                i += 2;
            }
            "--start" => {
                parsed.start = Some(parse_date(&take_value(&args, i, "--start")));
                i += 2;
            }
            "--end" => {
                parsed.end = Some(parse_date(&take_value(&args, i, "--end")));
                i += 2;
            }
            "--lag" => {
                let raw = take_value(&args, i, "--lag");
                parsed.lag = raw.parse().unwrap_or_else(|_| {
                    eprintln!("Error: --lag must be a non-negative integer, got '{}'", raw);
                    std::process::exit(1);
                });
                i += 2;
            }
            "--csv" => {
                parsed.csv_path = Some(take_value(&args, i, "--csv"));
                i += 2;
            }
            "--no-me" => {
                parsed.include_me = false;
                i += 1;
            }
            "--log" => {
                parsed.log_file = Some(take_value(&args, i, "--log"));
                i += 2;
            }
            "--list-reaches" => {
                parsed.list_reaches = true;
                i += 1;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!(
                    "Usage: {} --reach KEY --start YYYY-MM-DD --end YYYY-MM-DD [--lag N] [--csv FILE] [--no-me] [--log FILE]",
                    args[0]
                );
                eprintln!("       {} --list-reaches", args[0]);
                std::process::exit(1);
            }
        }
    }
    parsed
}

fn take_value(args: &[String], i: usize, flag: &str) -> String {
    if i + 1 < args.len() {
        args[i + 1].clone()
    } else {
        eprintln!("Error: {} requires a value", flag);
        std::process::exit(1);
    }
}

fn parse_date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap_or_else(|_| {
        eprintln!("Error: dates must be YYYY-MM-DD, got '{}'", raw);
        std::process::exit(1);
    })
}

fn main() {
    println!("🌊 Flow Comparison Service");
    println!("===========================\n");

    let args = parse_args();

    if args.list_reaches {
        println!("Available reaches (key — upstream vs downstream, max lag):");
        for reach in REACH_REGISTRY {
            println!(
                "   {:<28} {} vs {} (max lag {}h)",
                reach.key,
                reach.upstream.label(),
                reach.downstream.label(),
                reach.max_lag_hours
            );
        }
        return;
    }

    let (reach_key, start, end) = match (&args.reach, args.start, args.end) {
        (Some(r), Some(s), Some(e)) => (r.clone(), s, e),
        _ => {
            eprintln!("Error: --reach, --start and --end are all required");
            eprintln!("Run with --list-reaches to see the reach keys");
            std::process::exit(1);
        }
    };

    logging::init_logger(LogLevel::Info, args.log_file.as_deref());

    let mut service_config = config::load_config();
    service_config.include_mean_error = args.include_me && service_config.include_mean_error;

    let fetcher = match HttpFetcher::new(service_config.clone()) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("❌ Failed to set up HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let mut session = ComparisonSession::new(service_config.stats_options());

    println!("📋 Range: {} to {}", start, end);
    if let Err(e) = session.select_range(start, end) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    println!("📥 Fetching both stations for reach '{}'...", reach_key);
    if let Err(e) = session.select_reach(&reach_key, &fetcher) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    println!("⏱  Applying lag of {} hours...", args.lag);
    if let Err(e) = session.apply_lag(args.lag) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let report = match session.compute() {
        Ok(r) => r.rounded(3),
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let pair_len = session.aligned_pair().map(|p| p.len()).unwrap_or(0);
    println!("\n✓ Compared {} overlapping hourly readings\n", pair_len);
    println!("Statistic      Value");
    println!("---------------------");
    for row in &report.rows {
        match row.value {
            Some(v) => println!("{:<12}   {}", row.name, v),
            None => println!("{:<12}   undefined", row.name),
        }
    }

    if let Some(path) = &args.csv_path {
        // aligned_pair is always present once compute() succeeded
        if let Some(pair) = session.aligned_pair() {
            match std::fs::write(path, export::to_csv(pair)) {
                Ok(()) => println!("\n💾 Wrote aligned data to {}", path),
                Err(e) => {
                    eprintln!("❌ Failed to write {}: {}", path, e);
                    std::process::exit(1);
                }
            }
        }
    }
}
