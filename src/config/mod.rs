use anyhow::{ bail, Context, Result };
use dotenv::dotenv;
use serde::{ Deserialize, Serialize };
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;
use crate::utils::serde_helpers::{ parse_level, serialize_level, deserialize_level };

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub debug: bool,
    #[serde(skip_serializing, default)]
    pub api_key: String,
    #[serde(skip_serializing, default)]
    pub api_secret: String,

    /// Amount of the base asset pushed through each triangle
    pub investment: f64,
    /// Profit required on top of investment and brokerage, in base asset units
    pub min_profit: f64,
    /// Fee charged per trade, in percent
    pub brokerage_percent: f64,
    pub base_asset: String,

    pub sandbox: bool,
    pub dispatch_orders: bool,
    pub pacing_delay_ms: u64,
    pub continuous: bool,

    #[serde(serialize_with = "serialize_level", deserialize_with = "deserialize_level")]
    pub log_level: Level,
    pub log_config: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub directory: PathBuf,
    pub filename_prefix: String,
    pub rotation: LogRotation,
    pub max_files: Option<usize>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum LogRotation {
    Hourly,
    Daily,
    Never,
}

/// Read `name` and parse it, falling back to `default` when unset
fn parse_var<T>(name: &str, default: &str) -> Result<T>
    where T: FromStr, T::Err: std::error::Error + Send + Sync + 'static
{
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .trim()
        .parse::<T>()
        .with_context(|| format!("Failed to parse {} environment variable", name))
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load environment variables from .env file
        match dotenv() {
            Ok(path) => {
                println!("✅ Loaded .env file from: {}", path.display());
            }
            Err(e) => {
                println!("⚠️  Warning: Could not load .env file: {}", e);
                println!("   Falling back to process environment and defaults");
            }
        }

        Self::from_current_env()
    }

    /// Build from whatever is in the process environment right now
    pub fn from_current_env() -> Result<Self> {
        let debug = parse_var::<bool>("TRI_DEBUG", "false")?;

        // Market data is public, credentials are only needed for placing orders
        let api_key = env::var("TRI_API_KEY").unwrap_or_default();
        let api_secret = env::var("TRI_API_SECRET").unwrap_or_default();

        let investment = parse_var::<f64>("TRI_INVESTMENT", "100")?;
        let min_profit = parse_var::<f64>("TRI_MIN_PROFIT", "0.5")?;
        let brokerage_percent = parse_var::<f64>("TRI_BROKERAGE_PERCENT", "0.2")?;

        let base_asset = env::var("TRI_BASE_ASSET").unwrap_or_else(|_| "USDT".to_string());

        let sandbox = parse_var::<bool>("TRI_SANDBOX", "true")?;
        let dispatch_orders = parse_var::<bool>("TRI_DISPATCH_ORDERS", "false")?;
        let pacing_delay_ms = parse_var::<u64>("TRI_PACING_DELAY_MS", "1000")?;
        let continuous = parse_var::<bool>("TRI_CONTINUOUS", "false")?;

        let log_level = parse_level(
            &env::var("TRI_LOG_LEVEL").unwrap_or_else(|_| "info".to_string())
        );

        // Set up logging configuration
        let log_dir = env::var("TRI_LOG_DIRECTORY").unwrap_or_else(|_| "logs".to_string());

        let log_prefix = env
            ::var("TRI_LOG_FILENAME_PREFIX")
            .unwrap_or_else(|_| "triangular_scanner".to_string());

        let log_rotation_str = env::var("TRI_LOG_ROTATION").unwrap_or_else(|_| "daily".to_string());

        let log_rotation = match log_rotation_str.to_lowercase().as_str() {
            "hourly" => LogRotation::Hourly,
            "never" => LogRotation::Never,
            _ => LogRotation::Daily,
        };

        let max_files = match env::var("TRI_LOG_MAX_FILES") {
            Ok(value) =>
                Some(
                    value
                        .trim()
                        .parse::<usize>()
                        .context("Failed to parse TRI_LOG_MAX_FILES environment variable")?
                ),
            Err(_) => None,
        };

        let config = Config {
            debug,
            api_key,
            api_secret,
            investment,
            min_profit,
            brokerage_percent,
            base_asset,
            sandbox,
            dispatch_orders,
            pacing_delay_ms,
            continuous,
            log_level,
            log_config: LogConfig {
                directory: PathBuf::from(log_dir),
                filename_prefix: log_prefix,
                rotation: log_rotation,
                max_files,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.investment.is_finite() && self.investment > 0.0) {
            bail!("TRI_INVESTMENT must be a positive amount, got {}", self.investment);
        }
        if !(self.brokerage_percent.is_finite() && self.brokerage_percent >= 0.0) {
            bail!("TRI_BROKERAGE_PERCENT must not be negative, got {}", self.brokerage_percent);
        }
        if !self.min_profit.is_finite() {
            bail!("TRI_MIN_PROFIT must be a finite amount");
        }
        if self.base_asset.trim().is_empty() {
            bail!("TRI_BASE_ASSET must not be empty");
        }
        Ok(())
    }

    #[inline]
    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }
}
