//! Command line configuration

use std::path::PathBuf;

use clap::{Args, Parser};
use jiff::{Timestamp, tz::TimeZone};

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Result output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum OutputFormat {
    /// Receipt table, or the order details sheet when submitting an order.
    Table,

    /// JSON record.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Pricing inputs.
#[derive(Debug, Args)]
pub(crate) struct PricingConfig {
    /// Settings snapshot (YAML or JSON)
    #[arg(
        short,
        long,
        env = "PHOTOPRINT_SETTINGS",
        default_value = "./fixtures/settings/default.yml"
    )]
    pub settings: PathBuf,

    /// Cart to price (YAML or JSON)
    #[arg(short, long, env = "PHOTOPRINT_CART")]
    pub cart: PathBuf,

    /// Checkout form; when given, the cart is submitted as an order
    #[arg(long, env = "PHOTOPRINT_ORDER")]
    pub order: Option<PathBuf>,

    /// Evaluate promotions at this instant instead of now (RFC 3339)
    #[arg(long, env = "PHOTOPRINT_NOW")]
    pub now: Option<Timestamp>,

    /// Time zone for promotion expiry times without an offset
    #[arg(long, env = "PHOTOPRINT_TIMEZONE", default_value = "UTC")]
    pub timezone: String,

    /// Output format (table, json)
    #[arg(short, long, env = "PHOTOPRINT_OUTPUT", value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

impl PricingConfig {
    /// Resolve the configured time zone.
    ///
    /// # Errors
    ///
    /// Returns an error if the zone is not in the time zone database.
    pub fn time_zone(&self) -> Result<TimeZone, jiff::Error> {
        if self.timezone.eq_ignore_ascii_case("UTC") {
            return Ok(TimeZone::UTC);
        }

        TimeZone::get(&self.timezone)
    }

    /// The instant to price at; sampled once per run.
    pub fn now(&self) -> Timestamp {
        self.now.unwrap_or_else(Timestamp::now)
    }
}

/// Photoprint configuration
#[derive(Debug, Parser)]
#[command(name = "photoprint", about = "Photo print order pricing", long_about = None)]
pub(crate) struct AppConfig {
    /// Pricing inputs.
    #[command(flatten)]
    pub pricing: PricingConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
