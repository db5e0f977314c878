//! Application entry point — stream-similarity.
//!
//! # Startup sequence
//!
//! 1. Parse the command line.
//! 2. Initialise logging from the verbosity level.
//! 3. Load [`AppConfig`] from disk (defaults on first run) and fold in the
//!    CLI overrides.
//! 4. Create the tokio runtime (multi-thread — the two capture tasks run in
//!    parallel).
//! 5. Run the comparison and print the final percentage.

use std::sync::Arc;

use anyhow::Context;
use stream_similarity::{
    cli::{CliArgs, Parsed, USAGE},
    AppConfig, FfmpegDecoder, StreamComparator,
};

fn main() -> anyhow::Result<()> {
    // 1. Command line
    let args = match CliArgs::parse(std::env::args().skip(1)) {
        Ok(Parsed::Help) => {
            println!("{USAGE}");
            return Ok(());
        }
        Ok(Parsed::Run(args)) => args,
        Err(e) => {
            eprintln!("error: {e}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    // 2. Logging — default warn, -v info, -vv debug; RUST_LOG still wins.
    let default_level = match args.verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    // 3. Configuration + overrides
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    args.apply_to(&mut config);
    log::info!("{}", args.describe(&config));

    // 4. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 5. Compare and report
    let decoder = Arc::new(FfmpegDecoder::new(config.capture.ffmpeg_path.clone()));
    let comparator = StreamComparator::new(config, decoder);

    let report = rt
        .block_on(comparator.compare(&args.url1, &args.url2))
        .context("stream comparison failed")?;

    println!("\nFinal Stream Similarity Score: {:.2}%", report.percent());
    Ok(())
}
