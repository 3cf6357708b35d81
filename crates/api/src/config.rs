//! # API Configuration Module
//!
//! Loads the Courtside server configuration from environment variables,
//! falling back to defaults where that is safe.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `JWT_SECRET`: HS256 secret shared with the identity provider (required)
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `PAYMENT_API_URL`: Base URL of the payment provider; payment is skipped when unset
//! - `PAYMENT_API_KEY`: API key for the payment provider (required with `PAYMENT_API_URL`)
//! - `PAYMENT_MODE`: Payment mode sent with every order (default: "card")
//! - `CHECKOUT_PAYMENT_TIMEOUT_MINUTES`: How long an order may stay unpaid (default: 30)

use courtside_core::{checkout::CheckoutConfig, models::payment::PaymentMode};
use eyre::{Result, WrapErr};
use std::env;
use tracing::Level;

/// Connection settings for the external payment provider.
#[derive(Debug, Clone)]
pub struct PaymentApiConfig {
    pub base_url: String,
    pub api_key: String,
}

/// Configuration for the Courtside API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use courtside_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}:{}", config.host, config.port);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Secret used to verify bearer tokens
    pub jwt_secret: String,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Payment provider; `None` books without payment
    pub payment: Option<PaymentApiConfig>,

    pub payment_mode: PaymentMode,

    pub payment_timeout_minutes: i64,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - `DATABASE_URL` or `JWT_SECRET` is not set
    /// - `API_PORT` cannot be parsed as a u16
    /// - `PAYMENT_API_URL` is set without `PAYMENT_API_KEY`
    /// - `PAYMENT_MODE` is not a known payment mode
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = env::var("DATABASE_URL")
            .wrap_err("DATABASE_URL environment variable must be set")?;

        // Logging settings
        let log_level = parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| {
            origins.split(',').map(|s| s.trim().to_string()).collect()
        });

        // Security settings
        let jwt_secret = env::var("JWT_SECRET")
            .wrap_err("JWT_SECRET environment variable must be set")?;

        // Performance settings
        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        // Payment settings
        let payment = match env::var("PAYMENT_API_URL") {
            Ok(base_url) => {
                let api_key = env::var("PAYMENT_API_KEY")
                    .wrap_err("PAYMENT_API_KEY must be set when PAYMENT_API_URL is")?;
                Some(PaymentApiConfig {
                    base_url: base_url.trim_end_matches('/').to_string(),
                    api_key,
                })
            }
            Err(_) => None,
        };
        let payment_mode = env::var("PAYMENT_MODE")
            .unwrap_or_else(|_| "card".to_string())
            .parse::<PaymentMode>()
            .map_err(|e| eyre::eyre!("Invalid PAYMENT_MODE value: {}", e))?;
        let payment_timeout_minutes = env::var("CHECKOUT_PAYMENT_TIMEOUT_MINUTES")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            jwt_secret,
            request_timeout,
            payment,
            payment_mode,
            payment_timeout_minutes,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn checkout_config(&self) -> CheckoutConfig {
        CheckoutConfig {
            payment_mode: self.payment_mode,
            payment_timeout: chrono::Duration::minutes(self.payment_timeout_minutes),
        }
    }
}

fn parse_log_level(level: &str) -> Level {
    match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
