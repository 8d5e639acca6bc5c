//! Execution unit data types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DescriptorError;

/// A budget-execution unit pending synchronization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionUnit {
    /// Unit code (`sec_ejec`), at most 20 characters.
    pub unit_id: String,
    /// Processing year.
    pub year: i32,
    /// Raw remote-call descriptor, `endpoint|payload|action`.
    pub descriptor: String,
}

impl ExecutionUnit {
    /// Creates a new execution unit.
    #[must_use]
    pub fn new(unit_id: impl Into<String>, year: i32, descriptor: impl Into<String>) -> Self {
        Self {
            unit_id: unit_id.into(),
            year,
            descriptor: descriptor.into(),
        }
    }

    /// Parses the remote-call descriptor of this unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor is malformed.
    pub fn service(&self) -> Result<ServiceDescriptor, DescriptorError> {
        self.descriptor.parse()
    }
}

impl fmt::Display for ExecutionUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.unit_id, self.year)
    }
}

/// Everything needed to call the remote expense service for one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// Service URL.
    pub endpoint: String,
    /// SOAP request envelope.
    pub payload: String,
    /// Value of the `SOAPAction` header.
    pub soap_action: String,
}

impl FromStr for ServiceDescriptor {
    type Err = DescriptorError;

    /// The payload sits between the first and the last `|`, so an envelope
    /// containing the separator still parses.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (endpoint, rest) = raw
            .split_once('|')
            .ok_or(DescriptorError::MissingSeparator)?;
        let (payload, soap_action) = rest
            .rsplit_once('|')
            .ok_or(DescriptorError::MissingSeparator)?;

        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return Err(DescriptorError::EmptyEndpoint);
        }
        let soap_action = soap_action.trim();
        if soap_action.is_empty() {
            return Err(DescriptorError::EmptyAction);
        }

        Ok(Self {
            endpoint: endpoint.to_string(),
            payload: payload.to_string(),
            soap_action: soap_action.to_string(),
        })
    }
}
