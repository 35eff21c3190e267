//! Errors returned across the adapter boundary.

use contract::{ClientFailure, DomainError};
use thiserror::Error;

use crate::IntegrationSurface;

/// The loaded enterprise client is structurally incompatible with this plugin.
///
/// Displays only the remediation message. The original failure is kept as the
/// [`source`](std::error::Error::source) so it can be logged as supporting
/// detail; it is never discarded.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct CompatibilityError {
    message: String,
    documentation_url: String,
    #[source]
    cause: ClientFailure,
}

impl CompatibilityError {
    pub(crate) fn new(surface: &IntegrationSurface, cause: ClientFailure) -> Self {
        Self {
            message: surface.remediation_message(),
            documentation_url: surface.documentation_url.clone(),
            cause,
        }
    }

    /// The remediation message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The documentation URL named in the message.
    pub fn documentation_url(&self) -> &str {
        &self.documentation_url
    }

    /// The structural failure that triggered this error.
    pub fn cause(&self) -> &ClientFailure {
        &self.cause
    }

    /// Consumes the error, returning the structural failure.
    pub fn into_cause(self) -> ClientFailure {
        self.cause
    }
}

/// Why an invocation through the adapter failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvocationError {
    /// The call is structurally incompatible with the loaded client.
    #[error(transparent)]
    Compatibility(#[from] CompatibilityError),

    /// The client's own failure, passed through unchanged.
    #[error(transparent)]
    Client(ClientFailure),
}

impl InvocationError {
    /// Returns `true` for [`InvocationError::Compatibility`].
    pub fn is_compatibility(&self) -> bool {
        matches!(self, Self::Compatibility(_))
    }

    /// The domain error, if the client rejected the call deliberately.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Self::Client(ClientFailure::Domain(err)) => Some(err),
            _ => None,
        }
    }

    /// The underlying client failure: the cause for a compatibility error, the
    /// failure itself otherwise.
    pub fn client_failure(&self) -> &ClientFailure {
        match self {
            Self::Compatibility(err) => err.cause(),
            Self::Client(failure) => failure,
        }
    }
}
