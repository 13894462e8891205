mod cli;
mod config;
mod pipelines;
mod utils;

use std::env;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use env_logger::Builder;
use log::{debug, error, info, LevelFilter};
use tokio::sync::Semaphore;

use crate::cli::parse;
use crate::config::defs::{RunConfig, ValidateError};
use crate::pipelines::merge_check;

#[tokio::main]
async fn main() -> Result<()> {
    let run_start = Instant::now();

    let args = parse();

    let log_level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();

    println!("\n-------------\n MergeCheck\n-------------\n");

    let cwd = env::current_dir()?;
    info!("The current directory is {:?}", cwd);

    if args.threads == 0 {
        let e = ValidateError::InvalidConfig("--threads must be at least 1".to_string());
        error!("Validation failed: {}", e);
        std::process::exit(1);
    }
    debug!("Using {} parallel chunk searches", args.threads);

    // One permit pool for the whole run; the runtime itself is torn down
    // when main returns or exits.
    let search_permits = Arc::new(Semaphore::new(args.threads));

    let run_config = Arc::new(RunConfig {
        cwd,
        args,
        search_permits,
    });

    if let Err(e) = merge_check::run(run_config).await {
        error!(
            "Validation failed: {} at {} milliseconds.",
            e,
            run_start.elapsed().as_millis()
        );
        std::process::exit(1);
    }

    println!("Run complete: {} milliseconds.", run_start.elapsed().as_millis());
    Ok(())
}
