//! Raw failure taxonomy for calls into the enterprise client.
//!
//! [`ClientFailure`] is the tagged form of everything a call can go wrong with:
//! absent or reshaped interface members, business errors the client raises on
//! purpose ([`DomainError`]), and infrastructure faults inside the client
//! ([`InfrastructureError`]). Deciding which of these are version skew is the
//! adapter's job, not this crate's.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{FieldName, OperationName, TypeName};

// ---------------------------------------------------------------------------
// Domain errors
// ---------------------------------------------------------------------------

/// A business-level failure the enterprise client raised deliberately.
///
/// Examples: invalid credentials, quota exceeded, invalid input. The code, the
/// message, and any attached details belong to the client and are never
/// rewritten on the way back to the caller.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message} ({code})")]
pub struct DomainError {
    code: String,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl DomainError {
    /// Creates a domain error with a machine-readable code and a message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Attaches structured details supplied by the client.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Returns the client's error code (e.g. `"invalid_input"`).
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the client's human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the structured details, if the client attached any.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }
}

// ---------------------------------------------------------------------------
// Infrastructure errors
// ---------------------------------------------------------------------------

/// Broad category of an [`InfrastructureError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfrastructureKind {
    /// File-system failure (e.g. the package archive could not be read).
    Io,
    /// Network failure talking to the enterprise service.
    Network,
    /// The enterprise service did not answer in time.
    Timeout,
    /// Any other operating-system or runtime failure.
    Other,
}

impl std::fmt::Display for InfrastructureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Io => "I/O",
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Other => "system",
        };
        f.write_str(label)
    }
}

/// An I/O, network, or operating-system fault inside the enterprise client.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{fault} failure: {message}")]
pub struct InfrastructureError {
    fault: InfrastructureKind,
    message: String,
}

impl InfrastructureError {
    /// Creates a new [`InfrastructureError`].
    pub fn new(fault: InfrastructureKind, message: impl Into<String>) -> Self {
        Self {
            fault,
            message: message.into(),
        }
    }

    /// Returns the fault category.
    pub fn kind(&self) -> InfrastructureKind {
        self.fault
    }

    /// Returns the fault description.
    pub fn message(&self) -> &str {
        &self.message
    }
}

// ---------------------------------------------------------------------------
// Client failures
// ---------------------------------------------------------------------------

/// Every way a single call into the enterprise client can fail.
///
/// The first five variants describe the shape of the client's interface
/// (something the plugin was built against is absent or different). The rest
/// describe failures of a call that reached a matching member.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClientFailure {
    /// The loaded client has no operation with this name.
    #[error("no such operation: {operation}")]
    MissingOperation {
        /// Operation the plugin tried to call.
        operation: OperationName,
    },

    /// A type the call depends on is absent from the loaded client.
    #[error("no such type: {type_name}")]
    MissingType {
        /// Type the plugin expected.
        type_name: TypeName,
    },

    /// A field or member is absent from a type in the loaded client.
    #[error("no such field: {owner}.{field}")]
    MissingField {
        /// Type that should declare the field.
        owner: TypeName,
        /// Field the plugin expected.
        field: FieldName,
    },

    /// The operation exists but takes a different number of parameters.
    #[error(
        "signature mismatch for {operation}: called with {expected_arity} argument(s), client accepts {}",
        format_arities(.advertised_arities)
    )]
    SignatureMismatch {
        /// Operation the plugin tried to call.
        operation: OperationName,
        /// Number of arguments the plugin passed.
        expected_arity: usize,
        /// Arities the loaded client accepts for the operation.
        advertised_arities: Vec<usize>,
    },

    /// The operation returned a value the plugin cannot decode.
    #[error("return shape mismatch for {operation}: expected {expected}: {detail}")]
    ReturnShapeMismatch {
        /// Operation whose result was decoded.
        operation: OperationName,
        /// Shape the plugin was built to decode.
        expected: String,
        /// Decoder diagnostic.
        detail: String,
    },

    /// The client deliberately rejected the call.
    #[error(transparent)]
    Domain(DomainError),

    /// The client hit an I/O, network, or system fault.
    #[error(transparent)]
    Infrastructure(InfrastructureError),

    /// A failure whose category the client did not report.
    #[error("{category}: {message}")]
    Unrecognised {
        /// Whatever category label the client supplied.
        category: String,
        /// Failure description.
        message: String,
    },
}

impl ClientFailure {
    /// Returns a stable label for the variant, for structured log fields.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::MissingOperation { .. } => "missing_operation",
            Self::MissingType { .. } => "missing_type",
            Self::MissingField { .. } => "missing_field",
            Self::SignatureMismatch { .. } => "signature_mismatch",
            Self::ReturnShapeMismatch { .. } => "return_shape_mismatch",
            Self::Domain(_) => "domain",
            Self::Infrastructure(_) => "infrastructure",
            Self::Unrecognised { .. } => "unrecognised",
        }
    }
}

impl From<DomainError> for ClientFailure {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<InfrastructureError> for ClientFailure {
    fn from(err: InfrastructureError) -> Self {
        Self::Infrastructure(err)
    }
}

fn format_arities(arities: &[usize]) -> String {
    match arities {
        [] => "no arity".to_owned(),
        [single] => single.to_string(),
        many => many
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(" or "),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_operation_reads_as_no_such_operation() {
        let failure = ClientFailure::MissingOperation {
            operation: OperationName::new("upload_package").unwrap(),
        };
        assert_eq!(failure.to_string(), "no such operation: upload_package");
        assert_eq!(failure.kind_name(), "missing_operation");
    }

    #[test]
    fn signature_mismatch_lists_every_advertised_arity() {
        let failure = ClientFailure::SignatureMismatch {
            operation: OperationName::new("start_simulation").unwrap(),
            expected_arity: 2,
            advertised_arities: vec![3, 4],
        };
        assert_eq!(
            failure.to_string(),
            "signature mismatch for start_simulation: called with 2 argument(s), client accepts 3 or 4"
        );
    }

    #[test]
    fn domain_failure_displays_the_client_message_verbatim() {
        let failure = ClientFailure::from(DomainError::new("quota_exceeded", "Quota exceeded"));
        assert_eq!(failure.to_string(), "Quota exceeded (quota_exceeded)");
    }

    #[test]
    fn failures_are_tagged_by_kind_in_json() {
        let failure: ClientFailure = serde_json::from_value(json!({
            "kind": "domain",
            "code": "invalid_input",
            "message": "Simulation id is not a UUID",
            "details": { "field": "simulation_id" }
        }))
        .unwrap();

        let ClientFailure::Domain(err) = failure else {
            panic!("expected a domain failure");
        };
        assert_eq!(err.code(), "invalid_input");
        assert_eq!(err.details(), Some(&json!({ "field": "simulation_id" })));
    }

    #[test]
    fn infrastructure_failure_names_its_category() {
        let err = InfrastructureError::new(InfrastructureKind::Network, "connection reset");
        assert_eq!(err.to_string(), "network failure: connection reset");
    }
}
