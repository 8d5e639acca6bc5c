//! Bounded-retry fetch of a unit's expense items.
//!
//! A unit gets at most `max_retries + 1` calls. The first successful response
//! ends the loop, even when it carries no items. Nothing is merged across
//! attempts.

use std::time::Duration;

use async_trait::async_trait;
use itemsync_core::{ExecutionUnit, ExpenseItem, FetchOutcome, ItemSource, ServiceDescriptor};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::decode::{DecodeError, decode_items};
use crate::transport::{SoapTransport, TransportError};

/// Why a single attempt failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The call itself failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The service answered but the body was unusable.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// [`ItemSource`] backed by the remote expense service.
pub struct RemoteFetcher<T> {
    transport: T,
    max_retries: u32,
    retry_delay: Duration,
}

impl<T: SoapTransport> RemoteFetcher<T> {
    /// Creates a fetcher that retries failed calls immediately.
    #[must_use]
    pub const fn new(transport: T, max_retries: u32) -> Self {
        Self {
            transport,
            max_retries,
            retry_delay: Duration::ZERO,
        }
    }

    /// Sets a fixed pause between attempts.
    #[must_use]
    pub const fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Returns the total number of calls a unit may get.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    async fn attempt(&self, service: &ServiceDescriptor) -> Result<Vec<ExpenseItem>, FetchError> {
        let body = self.transport.call(service).await?;
        Ok(decode_items(&body)?)
    }
}

#[async_trait]
impl<T: SoapTransport> ItemSource for RemoteFetcher<T> {
    async fn fetch_items(&self, unit: &ExecutionUnit) -> FetchOutcome {
        let service = match unit.service() {
            Ok(service) => service,
            Err(e) => {
                warn!(unit_id = %unit.unit_id, error = %e, "Unusable service descriptor");
                return FetchOutcome::Exhausted {
                    attempts: 0,
                    last_error: e.to_string(),
                };
            }
        };

        let max_attempts = self.max_attempts();
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            debug!(unit_id = %unit.unit_id, attempt, endpoint = %service.endpoint, "Calling expense service");
            match self.attempt(&service).await {
                Ok(items) => {
                    info!(unit_id = %unit.unit_id, attempt, items = items.len(), "Expense items retrieved");
                    return FetchOutcome::Fetched {
                        items,
                        attempts: attempt,
                    };
                }
                Err(e) => {
                    warn!(unit_id = %unit.unit_id, attempt, max_attempts, error = %e, "Expense service call failed");
                    last_error = e.to_string();
                }
            }

            if attempt < max_attempts && !self.retry_delay.is_zero() {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        FetchOutcome::Exhausted {
            attempts: max_attempts,
            last_error,
        }
    }
}

#[cfg(test)]
#[path = "fetcher_tests.rs"]
mod tests;
