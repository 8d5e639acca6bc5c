//! Descriptor parsing errors.

use thiserror::Error;

/// Errors raised while parsing a unit's remote-call descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// The descriptor does not have the `endpoint|payload|action` shape.
    #[error("descriptor must have the form 'endpoint|payload|action'")]
    MissingSeparator,

    /// The endpoint part is blank.
    #[error("descriptor endpoint is empty")]
    EmptyEndpoint,

    /// The SOAP action part is blank.
    #[error("descriptor SOAP action is empty")]
    EmptyAction,
}
