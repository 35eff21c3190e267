//! The port through which the plugin reaches the enterprise client.
//!
//! The dependency-resolution subsystem locates and loads a concrete client and
//! hands it over as a [`ClientHandle`]. The adapter only ever reads through the
//! handle; it never initialises, refreshes, or closes the client.

use std::sync::Arc;

use crate::{CapabilitySet, ClientVersion, EnterpriseAction, InvocationResult};

/// Entry point of a loaded enterprise client.
///
/// Implementations are compiled independently of the plugin, so any call may
/// hit an operation that is absent or reshaped. Such calls must fail with one
/// of the structural [`ClientFailure`](crate::ClientFailure) variants rather
/// than with a domain error.
pub trait EnterpriseClient: Send + Sync {
    /// Release version of the loaded client, if it reports one.
    fn version(&self) -> Option<ClientVersion> {
        None
    }

    /// The operations this client advertises.
    ///
    /// Clients that predate capability advertisement return `None`; calls to
    /// them are made directly and rely on the client's own failures.
    fn capabilities(&self) -> Option<CapabilitySet> {
        None
    }

    /// Performs one call.
    fn call(&self, action: &EnterpriseAction) -> InvocationResult;
}

/// Shared, read-only reference to a loaded [`EnterpriseClient`].
///
/// Cloning the handle shares the same client.
#[derive(Clone)]
pub struct ClientHandle(Arc<dyn EnterpriseClient>);

impl ClientHandle {
    /// Wraps a concrete client.
    pub fn new<C: EnterpriseClient + 'static>(client: C) -> Self {
        Self(Arc::new(client))
    }

    /// Wraps a client that is already shared.
    pub fn from_arc(client: Arc<dyn EnterpriseClient>) -> Self {
        Self(client)
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &dyn EnterpriseClient {
        self.0.as_ref()
    }
}

impl std::fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientHandle")
            .field("version", &self.0.version())
            .finish_non_exhaustive()
    }
}
