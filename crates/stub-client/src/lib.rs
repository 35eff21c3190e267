//! A scripted stand-in for the enterprise client.
//!
//! [`ScriptedClient`] implements [`contract::EnterpriseClient`] from a
//! [`ClientScript`]: which operations exist, how many parameters each takes,
//! and what each returns or raises. Scripts are built in code with
//! [`ScriptedClient::builder`] or loaded from JSON:
//!
//! ```json
//! {
//!   "version": "1.5.5",
//!   "advertise_capabilities": true,
//!   "operations": [
//!     { "name": "upload_package", "arity": 2, "respond": { "file_size": 1024 } },
//!     { "name": "start_simulation", "arity": 4,
//!       "fail": { "kind": "domain", "code": "invalid_input", "message": "Unknown simulation" } }
//!   ]
//! }
//! ```
//!
//! A call to an operation that is not scripted fails with
//! [`ClientFailure::MissingOperation`]; a call with the wrong number of
//! arguments fails with [`ClientFailure::SignatureMismatch`]. This mirrors how a
//! real client compiled against a different interface version behaves.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use contract::{
    CapabilitySet, ClientFailure, ClientVersion, EnterpriseAction, EnterpriseClient,
    InvocationResult, OperationName, OperationSignature, Payload,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::trace;

// ---------------------------------------------------------------------------
// Script model
// ---------------------------------------------------------------------------

/// What a scripted operation does when called.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Behaviour {
    /// Return this value as the success payload.
    Respond(Value),
    /// Fail with this failure.
    Fail(ClientFailure),
}

/// One scripted operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationScript {
    /// Operation name.
    pub name: OperationName,
    /// Number of parameters the operation takes.
    pub arity: usize,
    /// What the operation does.
    #[serde(flatten)]
    pub behaviour: Behaviour,
}

/// A complete client script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientScript {
    /// Version the client reports.
    #[serde(default)]
    pub version: Option<ClientVersion>,
    /// Whether the client advertises its capability set.
    #[serde(default = "default_advertise")]
    pub advertise_capabilities: bool,
    /// Scripted operations.
    #[serde(default)]
    pub operations: Vec<OperationScript>,
}

fn default_advertise() -> bool {
    true
}

/// A client script could not be loaded.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The script file could not be read.
    #[error("Failed to read client script {path}")]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The script is not valid JSON or does not match the script model.
    #[error("Invalid client script: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two scripted operations share a name and arity.
    #[error("Operation {0} is scripted more than once")]
    Duplicate(OperationSignature),
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// An [`EnterpriseClient`] driven by a [`ClientScript`].
#[derive(Debug)]
pub struct ScriptedClient {
    version: Option<ClientVersion>,
    advertise_capabilities: bool,
    operations: BTreeMap<OperationName, BTreeMap<usize, Behaviour>>,
    calls: AtomicUsize,
}

impl ScriptedClient {
    /// Starts building a client in code.
    pub fn builder() -> ScriptedClientBuilder {
        ScriptedClientBuilder {
            script: ClientScript {
                version: None,
                advertise_capabilities: true,
                operations: Vec::new(),
            },
        }
    }

    /// Builds a client from a script.
    pub fn from_script(script: ClientScript) -> Result<Self, ScriptError> {
        let mut operations: BTreeMap<OperationName, BTreeMap<usize, Behaviour>> = BTreeMap::new();
        for op in script.operations {
            let overloads = operations.entry(op.name.clone()).or_default();
            if overloads.insert(op.arity, op.behaviour).is_some() {
                return Err(ScriptError::Duplicate(OperationSignature::new(
                    op.name, op.arity,
                )));
            }
        }
        Ok(Self {
            version: script.version,
            advertise_capabilities: script.advertise_capabilities,
            operations,
            calls: AtomicUsize::new(0),
        })
    }

    /// Parses a JSON script.
    pub fn from_json_str(json: &str) -> Result<Self, ScriptError> {
        Self::from_script(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON script file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Number of calls that reached this client.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EnterpriseClient for ScriptedClient {
    fn version(&self) -> Option<ClientVersion> {
        self.version
    }

    fn capabilities(&self) -> Option<CapabilitySet> {
        if !self.advertise_capabilities {
            return None;
        }
        Some(
            self.operations
                .iter()
                .flat_map(|(name, overloads)| {
                    overloads
                        .keys()
                        .map(|arity| OperationSignature::new(name.clone(), *arity))
                })
                .collect(),
        )
    }

    fn call(&self, action: &EnterpriseAction) -> InvocationResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        trace!(operation = %action.operation(), arity = action.arity(), "scripted call");

        let overloads = self.operations.get(action.operation()).ok_or_else(|| {
            ClientFailure::MissingOperation {
                operation: action.operation().clone(),
            }
        })?;
        let behaviour = overloads.get(&action.arity()).ok_or_else(|| {
            ClientFailure::SignatureMismatch {
                operation: action.operation().clone(),
                expected_arity: action.arity(),
                advertised_arities: overloads.keys().copied().collect(),
            }
        })?;

        match behaviour {
            Behaviour::Respond(value) => Ok(Payload::new(value.clone())),
            Behaviour::Fail(failure) => Err(failure.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builds a [`ScriptedClient`] in code.
#[derive(Debug)]
pub struct ScriptedClientBuilder {
    script: ClientScript,
}

impl ScriptedClientBuilder {
    /// Sets the version the client reports.
    pub fn version(mut self, version: ClientVersion) -> Self {
        self.script.version = Some(version);
        self
    }

    /// Makes the client withhold its capability set, like a client that
    /// predates capability advertisement.
    pub fn without_capabilities(mut self) -> Self {
        self.script.advertise_capabilities = false;
        self
    }

    /// Scripts `name/arity` to return `value`.
    pub fn respond(self, name: OperationName, arity: usize, value: Value) -> Self {
        self.operation(name, arity, Behaviour::Respond(value))
    }

    /// Scripts `name/arity` to fail with `failure`.
    pub fn fail(self, name: OperationName, arity: usize, failure: ClientFailure) -> Self {
        self.operation(name, arity, Behaviour::Fail(failure))
    }

    fn operation(mut self, name: OperationName, arity: usize, behaviour: Behaviour) -> Self {
        self.script.operations.push(OperationScript {
            name,
            arity,
            behaviour,
        });
        self
    }

    /// Finishes the client.
    pub fn build(self) -> Result<ScriptedClient, ScriptError> {
        ScriptedClient::from_script(self.script)
    }
}
