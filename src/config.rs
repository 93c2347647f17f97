//! Server configuration via CLI args and environment variables.

use clap::Parser;
use url::Url;

/// Form intake API server for the Formgate website.
#[derive(Parser, Debug, Clone)]
#[command(name = "formgate-server", version, about)]
pub struct Config {
    /// Bind address.
    #[arg(long, default_value = "0.0.0.0", env = "FORMGATE_HOST")]
    pub host: String,

    /// Bind port.
    #[arg(long, default_value_t = 8320, env = "FORMGATE_PORT")]
    pub port: u16,

    /// CORS allowed origins (comma-separated). Empty for no CORS.
    #[arg(long, env = "FORMGATE_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,

    /// Max contact-form submissions per client per window.
    #[arg(long, default_value_t = 5, env = "FORMGATE_CONTACT_LIMIT")]
    pub contact_limit: u32,

    /// Contact-form window length in seconds.
    #[arg(long, default_value_t = 60, env = "FORMGATE_CONTACT_WINDOW")]
    pub contact_window: u64,

    /// Max job applications per client per window.
    #[arg(long, default_value_t = 3, env = "FORMGATE_CAREERS_LIMIT")]
    pub careers_limit: u32,

    /// Job-application window length in seconds.
    #[arg(long, default_value_t = 3600, env = "FORMGATE_CAREERS_WINDOW")]
    pub careers_window: u64,

    /// Interval in seconds between sweeps of expired rate-limit entries.
    #[arg(long, default_value_t = 300, env = "FORMGATE_SWEEP_INTERVAL")]
    pub sweep_interval: u64,

    /// HTTP mail API endpoint. Omit to log submissions instead of sending.
    #[arg(long, env = "FORMGATE_MAIL_ENDPOINT")]
    pub mail_endpoint: Option<Url>,

    /// Bearer token for the mail API.
    #[arg(long, env = "FORMGATE_MAIL_TOKEN")]
    pub mail_token: Option<String>,

    /// Sender address for outbound notifications.
    #[arg(long, default_value = "website@formgate.dev", env = "FORMGATE_MAIL_FROM")]
    pub mail_from: String,

    /// Recipient address for outbound notifications.
    #[arg(long, default_value = "hello@formgate.dev", env = "FORMGATE_MAIL_TO")]
    pub mail_to: String,

    /// Log level.
    #[arg(long, default_value = "info", env = "FORMGATE_LOG_LEVEL")]
    pub log_level: String,

    /// Log format: "text" or "json".
    #[arg(long, default_value = "text", env = "FORMGATE_LOG_FORMAT")]
    pub log_format: String,
}

impl Config {
    /// Parses configuration from CLI args and env vars.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
