//! Value types exchanged across the enterprise client boundary.
//!
//! An [`EnterpriseAction`] goes in, a [`Payload`] or a
//! [`ClientFailure`](crate::ClientFailure) comes out. [`CapabilitySet`] is the
//! explicit interface contract a client may advertise in place of runtime
//! member lookup.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{ClientFailure, OperationName};

/// The outcome of one call into the enterprise client.
///
/// Produced once per call; never retried and never cached.
pub type InvocationResult = Result<Payload, ClientFailure>;

// ---------------------------------------------------------------------------
// Actions and payloads
// ---------------------------------------------------------------------------

/// A request destined for the enterprise client: an operation name plus its
/// ordered arguments.
///
/// The adapter treats the arguments as opaque; only their count takes part in
/// signature checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnterpriseAction {
    operation: OperationName,
    #[serde(default)]
    arguments: Vec<Value>,
}

impl EnterpriseAction {
    /// Creates an action for `operation` with the given arguments.
    pub fn new(operation: OperationName, arguments: Vec<Value>) -> Self {
        Self {
            operation,
            arguments,
        }
    }

    /// Returns the operation this action invokes.
    pub fn operation(&self) -> &OperationName {
        &self.operation
    }

    /// Returns the arguments in call order.
    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    /// Returns the number of arguments.
    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    /// Returns the signature this action expects the client to provide.
    pub fn signature(&self) -> OperationSignature {
        OperationSignature::new(self.operation.clone(), self.arity())
    }
}

// ---------------------------------------------------------------------------

/// A success value returned by the enterprise client.
///
/// Opaque to the adapter; it is handed back to the caller exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Value);

impl Payload {
    /// Wraps a raw JSON value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Returns the raw JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the payload, returning the raw JSON value.
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Decodes the payload into the shape the caller was built against.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.0)
    }
}

impl std::fmt::Display for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Signatures and capabilities
// ---------------------------------------------------------------------------

/// An operation name together with the number of parameters it takes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OperationSignature {
    /// Operation name.
    pub name: OperationName,
    /// Number of parameters.
    pub arity: usize,
}

impl OperationSignature {
    /// Creates a new [`OperationSignature`].
    pub fn new(name: OperationName, arity: usize) -> Self {
        Self { name, arity }
    }
}

impl std::fmt::Display for OperationSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}

// ---------------------------------------------------------------------------

/// The set of operations a loaded enterprise client advertises.
///
/// An operation may be overloaded, so each name maps to every arity the client
/// accepts for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<OperationSignature>", into = "Vec<OperationSignature>")]
pub struct CapabilitySet(BTreeMap<OperationName, BTreeSet<usize>>);

impl CapabilitySet {
    /// Creates an empty capability set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one signature to the set.
    pub fn insert(&mut self, signature: OperationSignature) {
        self.0
            .entry(signature.name)
            .or_default()
            .insert(signature.arity);
    }

    /// Returns `true` if the client offers `signature` exactly.
    pub fn supports(&self, signature: &OperationSignature) -> bool {
        self.0
            .get(&signature.name)
            .is_some_and(|arities| arities.contains(&signature.arity))
    }

    /// Returns the arities advertised for `operation`, if the operation exists.
    pub fn arities(&self, operation: &OperationName) -> Option<Vec<usize>> {
        self.0
            .get(operation)
            .map(|arities| arities.iter().copied().collect())
    }

    /// Checks an action against the advertised contract.
    ///
    /// Yields [`ClientFailure::MissingOperation`] when the operation is not
    /// advertised and [`ClientFailure::SignatureMismatch`] when it is advertised
    /// with different arities only.
    pub fn check(&self, action: &EnterpriseAction) -> Result<(), ClientFailure> {
        match self.0.get(action.operation()) {
            None => Err(ClientFailure::MissingOperation {
                operation: action.operation().clone(),
            }),
            Some(arities) if arities.contains(&action.arity()) => Ok(()),
            Some(arities) => Err(ClientFailure::SignatureMismatch {
                operation: action.operation().clone(),
                expected_arity: action.arity(),
                advertised_arities: arities.iter().copied().collect(),
            }),
        }
    }

    /// Returns the number of distinct signatures in the set.
    pub fn len(&self) -> usize {
        self.0.values().map(BTreeSet::len).sum()
    }

    /// Returns `true` if the set advertises nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over every advertised signature in name order.
    pub fn signatures(&self) -> impl Iterator<Item = OperationSignature> + '_ {
        self.0.iter().flat_map(|(name, arities)| {
            arities
                .iter()
                .map(move |arity| OperationSignature::new(name.clone(), *arity))
        })
    }
}

impl FromIterator<OperationSignature> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = OperationSignature>>(iter: I) -> Self {
        let mut set = Self::new();
        for signature in iter {
            set.insert(signature);
        }
        set
    }
}

impl From<Vec<OperationSignature>> for CapabilitySet {
    fn from(signatures: Vec<OperationSignature>) -> Self {
        signatures.into_iter().collect()
    }
}

impl From<CapabilitySet> for Vec<OperationSignature> {
    fn from(set: CapabilitySet) -> Self {
        set.signatures().collect()
    }
}

// ---------------------------------------------------------------------------
// Versioning
// ---------------------------------------------------------------------------

/// Release version advertised by a loaded enterprise client.
///
/// Recorded for diagnostics only. Compatibility is decided per call from
/// structural failures, never by comparing versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientVersion {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
    /// Patch version.
    pub patch: u32,
}

impl ClientVersion {
    /// Creates a new [`ClientVersion`].
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl std::fmt::Display for ClientVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// A version string was not of the form `major.minor.patch`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid client version '{0}': expected 'major.minor.patch'")]
pub struct VersionParseError(String);

impl FromStr for ClientVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || VersionParseError(s.to_owned());
        let mut parts = s.split('.').map(|part| part.parse::<u32>());
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(Ok(major)), Some(Ok(minor)), Some(Ok(patch)), None) => {
                Ok(Self::new(major, minor, patch))
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for ClientVersion {
    type Error = VersionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClientVersion> for String {
    fn from(version: ClientVersion) -> Self {
        version.to_string()
    }
}
