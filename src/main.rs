// for the quick data allocation on memory
#[global_allocator]
static ALLOC: rpmalloc::RpMalloc = rpmalloc::RpMalloc;

mod app;
mod arbitrage;
mod config;
mod enums;
mod exchange;
mod models;
mod utils;

use std::time::Duration;

use config::Config;
use anyhow::{ Context, Result };

use utils::logging;

const API_TIMEOUT: Duration = Duration::from_secs(15);

fn main() -> Result<()> {
    // Load configuration with helpful error messages
    let config = Config::from_env().context(
        "Failed to load configuration from environment. Check the TRI_* variables in your .env file."
    )?;

    // Initialize logging system
    logging
        ::init_logging(config.log_level, config.debug, &config.log_config)
        .context("Failed to initialize logging system")?;

    app::normal_mode::run_normal_mode(config)
}
