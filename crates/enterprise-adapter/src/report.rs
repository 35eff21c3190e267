//! What the surrounding build task shows for a failed invocation.
//!
//! Compatibility errors get the short remediation message, domain errors get
//! the client's own message, and everything else gets a generic build failure.
//! The original failure is carried as [`FailureReport::detail`] for logging at
//! a lower verbosity.

use contract::ClientFailure;

use crate::InvocationError;

/// Category of a [`FailureReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    /// Plugin and client are structurally incompatible.
    Compatibility,
    /// The client rejected the call deliberately.
    Domain,
    /// Any other failure.
    Build,
}

impl ReportKind {
    /// Process exit code for this kind of failure.
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Compatibility => 3,
            Self::Domain => 2,
            Self::Build => 1,
        }
    }
}

/// A user-facing rendering of an [`InvocationError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    kind: ReportKind,
    headline: String,
    detail: Option<String>,
}

impl FailureReport {
    /// Renders an invocation error.
    pub fn from_error(err: &InvocationError) -> Self {
        match err {
            InvocationError::Compatibility(compat) => Self {
                kind: ReportKind::Compatibility,
                headline: compat.message().to_owned(),
                detail: Some(compat.cause().to_string()),
            },
            InvocationError::Client(ClientFailure::Domain(domain)) => Self {
                kind: ReportKind::Domain,
                headline: domain.to_string(),
                detail: domain.details().map(|details| details.to_string()),
            },
            InvocationError::Client(other) => Self {
                kind: ReportKind::Build,
                headline: "Enterprise client call failed".to_owned(),
                detail: Some(other.to_string()),
            },
        }
    }

    /// Report category.
    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    /// Primary text shown to the user.
    pub fn headline(&self) -> &str {
        &self.headline
    }

    /// Supporting detail, if any.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

impl std::fmt::Display for FailureReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.headline)
    }
}

impl From<&InvocationError> for FailureReport {
    fn from(err: &InvocationError) -> Self {
        Self::from_error(err)
    }
}
