//! Command line arguments.
//!
//! Every flag is optional; a given flag wins over the config files and the
//! `ITEMSYNC__*` environment.

use clap::Parser;
use itemsync_shared::ConfigOverrides;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "itemsync", version, about = "Loads expense items for every pending execution unit")]
pub struct Cli {
    /// Database connection URL.
    #[arg(long)]
    pub database_url: Option<String>,

    /// Retries after the first failed call to the expense service.
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// SMTP server host.
    #[arg(long)]
    pub smtp_host: Option<String>,

    /// SMTP server port.
    #[arg(long)]
    pub smtp_port: Option<u16>,

    /// SMTP login (defaults to the sender address).
    #[arg(long)]
    pub smtp_username: Option<String>,

    /// SMTP password.
    #[arg(long)]
    pub smtp_password: Option<String>,

    /// Report sender address.
    #[arg(long)]
    pub from_email: Option<String>,

    /// Semicolon-delimited report recipients.
    #[arg(long)]
    pub recipients: Option<String>,
}

impl Cli {
    /// Converts the flags into configuration overrides.
    pub fn into_overrides(self) -> ConfigOverrides {
        ConfigOverrides {
            database_url: self.database_url,
            max_retries: self.max_retries,
            smtp_host: self.smtp_host,
            smtp_port: self.smtp_port,
            smtp_username: self.smtp_username,
            smtp_password: self.smtp_password,
            from_email: self.from_email,
            recipients: self.recipients,
        }
    }
}
