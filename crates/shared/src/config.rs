//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Invoicing defaults.
    #[serde(default)]
    pub billing: BillingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT settings as read from configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    3600 // 1 hour
}

/// Defaults applied when an invoice is created without explicit terms.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// Tax rate given to newly created accounts.
    #[serde(default = "default_tax_rate", with = "rust_decimal::serde::str")]
    pub default_tax_rate: Decimal,
    /// Days between issue date and due date.
    #[serde(default = "default_due_days")]
    pub invoice_due_days: u32,
}

fn default_tax_rate() -> Decimal {
    Decimal::new(2000, 4)
}

fn default_due_days() -> u32 {
    30
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            default_tax_rate: default_tax_rate(),
            invoice_due_days: default_due_days(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("ORDERDESK").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Returns the `host:port` address the server binds to.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_billing_defaults() {
        let billing = BillingConfig::default();
        assert_eq!(billing.default_tax_rate, Decimal::new(20, 2));
        assert_eq!(billing.invoice_due_days, 30);
    }

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("ORDERDESK__SERVER__PORT", Some("9090")),
                (
                    "ORDERDESK__DATABASE__URL",
                    Some("postgres://localhost/orderdesk_test"),
                ),
                ("ORDERDESK__JWT__SECRET", Some("secret")),
                ("ORDERDESK__BILLING__INVOICE_DUE_DAYS", Some("14")),
                ("RUN_MODE", Some("config-test")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.server.host, "0.0.0.0");
                assert_eq!(config.database.url, "postgres://localhost/orderdesk_test");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.jwt.secret, "secret");
                assert_eq!(config.jwt.access_token_expiry_secs, 3600);
                assert_eq!(config.billing.invoice_due_days, 14);
                assert_eq!(config.billing.default_tax_rate, Decimal::new(2000, 4));
                assert_eq!(config.bind_address(), "0.0.0.0:9090");
            },
        );
    }

    #[test]
    fn test_load_fails_without_database_url() {
        temp_env::with_vars(
            [
                ("ORDERDESK__DATABASE__URL", None::<&str>),
                ("ORDERDESK__JWT__SECRET", Some("secret")),
                ("RUN_MODE", Some("config-test")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }
}
