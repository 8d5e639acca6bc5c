//! Application configuration management.
//!
//! Values are resolved in this order, later sources winning:
//! built-in defaults, `config/default`, `config/{RUN_MODE}`, `ITEMSYNC__*`
//! environment variables, and finally explicit [`ConfigOverrides`] coming
//! from the command line.

use std::time::Duration;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Remote fetch configuration.
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Bulk load configuration.
    #[serde(default)]
    pub bulk_load: BulkLoadConfig,
    /// SMTP configuration for the run report.
    pub email: EmailConfig,
    /// Report content configuration.
    #[serde(default)]
    pub report: ReportConfig,
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
    /// Upper bound for a single stored operation, in seconds.
    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_min_connections() -> u32 {
    1
}

fn default_command_timeout() -> u64 {
    1200 // 20 minutes
}

impl DatabaseConfig {
    /// Returns the stored operation timeout.
    #[must_use]
    pub const fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}

/// Remote fetch configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Retries after the first attempt; a unit gets `max_retries + 1` calls at most.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// HTTP timeout for one call, in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
    /// Fixed pause between attempts, in milliseconds. Zero retries immediately.
    #[serde(default)]
    pub retry_delay_ms: u64,
}

fn default_max_retries() -> u32 {
    3
}

fn default_fetch_timeout() -> u64 {
    7200 // 2 hours
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            timeout_secs: default_fetch_timeout(),
            retry_delay_ms: 0,
        }
    }
}

impl FetchConfig {
    /// Returns the per-call HTTP timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the pause between attempts.
    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Bulk load configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkLoadConfig {
    /// Rows sent per `COPY` batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Timeout for one batch, in seconds.
    #[serde(default = "default_batch_timeout")]
    pub batch_timeout_secs: u64,
}

fn default_batch_size() -> usize {
    50_000
}

fn default_batch_timeout() -> u64 {
    10
}

impl Default for BulkLoadConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            batch_timeout_secs: default_batch_timeout(),
        }
    }
}

impl BulkLoadConfig {
    /// Returns the per-batch timeout.
    #[must_use]
    pub const fn batch_timeout(&self) -> Duration {
        Duration::from_secs(self.batch_timeout_secs)
    }
}

/// SMTP connection security.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// Plain connection upgraded with `STARTTLS`.
    #[default]
    Starttls,
    /// Implicit TLS (SMTPS).
    Tls,
    /// No encryption. Local relays only.
    None,
}

/// Email configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// SMTP server host.
    pub smtp_host: String,
    /// SMTP server port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP login. Falls back to the sender address when absent.
    #[serde(default)]
    pub smtp_username: Option<String>,
    /// SMTP password. An empty password disables authentication.
    #[serde(default)]
    pub smtp_password: String,
    /// Connection security mode.
    #[serde(default)]
    pub security: SmtpSecurity,
    /// Sender address.
    pub from_email: String,
    /// Sender display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// Semicolon-delimited recipient addresses.
    pub recipients: String,
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_name() -> String {
    "Itemsync".to_string()
}

impl EmailConfig {
    /// Splits the recipient setting on `;`, dropping blank entries.
    #[must_use]
    pub fn recipient_list(&self) -> Vec<&str> {
        self.recipients
            .split(';')
            .map(str::trim)
            .filter(|address| !address.is_empty())
            .collect()
    }

    /// Returns the SMTP login name.
    #[must_use]
    pub fn login(&self) -> &str {
        self.smtp_username.as_deref().unwrap_or(&self.from_email)
    }
}

/// Report content configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Subject line of the report email.
    #[serde(default = "default_subject")]
    pub subject: String,
}

fn default_subject() -> String {
    "Expense item bulk load".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            subject: default_subject(),
        }
    }
}

/// Values given explicitly on invocation. Any `Some` wins over every other source.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Database connection URL.
    pub database_url: Option<String>,
    /// Maximum fetch retries.
    pub max_retries: Option<u32>,
    /// SMTP server host.
    pub smtp_host: Option<String>,
    /// SMTP server port.
    pub smtp_port: Option<u16>,
    /// SMTP login.
    pub smtp_username: Option<String>,
    /// SMTP password.
    pub smtp_password: Option<String>,
    /// Sender address.
    pub from_email: Option<String>,
    /// Semicolon-delimited recipients.
    pub recipients: Option<String>,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with(&ConfigOverrides::default())
    }

    /// Loads configuration, then applies explicit invocation overrides on top.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or a required key is missing.
    pub fn load_with(overrides: &ConfigOverrides) -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("ITEMSYNC")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("database.url", overrides.database_url.clone())?
            .set_override_option("fetch.max_retries", overrides.max_retries.map(i64::from))?
            .set_override_option("email.smtp_host", overrides.smtp_host.clone())?
            .set_override_option("email.smtp_port", overrides.smtp_port.map(i64::from))?
            .set_override_option("email.smtp_username", overrides.smtp_username.clone())?
            .set_override_option("email.smtp_password", overrides.smtp_password.clone())?
            .set_override_option("email.from_email", overrides.from_email.clone())?
            .set_override_option("email.recipients", overrides.recipients.clone())?
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
