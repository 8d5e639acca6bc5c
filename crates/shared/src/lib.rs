//! Shared configuration and report delivery for itemsync.
//!
//! This crate provides the ambient pieces every other crate needs:
//! - Layered configuration (files, environment, CLI overrides)
//! - SMTP delivery of the run report

pub mod config;
pub mod email;

pub use config::{
    AppConfig, BulkLoadConfig, ConfigOverrides, DatabaseConfig, EmailConfig, FetchConfig,
    ReportConfig, SmtpSecurity,
};
pub use email::{EmailError, EmailService};
