//! The leaf component: one call into the loaded enterprise client.

use contract::{
    catalog, CapabilitySet, ClientHandle, EnterpriseAction, InvocationResult, OperationSignature,
};
use tracing::{debug, info};

/// Performs calls against the loaded enterprise client.
///
/// The client's advertised [`CapabilitySet`] is read once, when the invoker is
/// constructed. Each invocation is checked against that snapshot before the
/// client is called, so a call the client cannot accept fails structurally
/// without reaching it. Failures are returned exactly as produced; the invoker
/// never inspects or rewrites them.
#[derive(Debug, Clone)]
pub struct ClientInvoker {
    client: ClientHandle,
    capabilities: Option<CapabilitySet>,
}

impl ClientInvoker {
    /// Creates an invoker over a loaded client.
    pub fn new(client: ClientHandle) -> Self {
        let capabilities = client.client().capabilities();

        match client.client().version() {
            Some(version) => info!(client_version = %version, "Enterprise client loaded"),
            None => info!("Enterprise client loaded; version not reported"),
        }

        match &capabilities {
            Some(advertised) => {
                debug!(advertised = advertised.len(), "Enterprise client capabilities read");
                for signature in unadvertised_plugin_operations(advertised) {
                    debug!(
                        operation = %signature.name,
                        arity = signature.arity,
                        "Plugin operation not advertised by the enterprise client"
                    );
                }
            }
            None => debug!("Enterprise client does not advertise capabilities"),
        }

        Self {
            client,
            capabilities,
        }
    }

    /// The capability snapshot taken at construction, if the client advertised one.
    pub fn capabilities(&self) -> Option<&CapabilitySet> {
        self.capabilities.as_ref()
    }

    /// Invokes `action` on the client.
    ///
    /// The client is called at most once. It is not called at all when the
    /// advertised capabilities already show the call cannot succeed.
    pub fn invoke(&self, action: &EnterpriseAction) -> InvocationResult {
        if let Some(capabilities) = &self.capabilities {
            capabilities.check(action)?;
        }
        self.client.client().call(action)
    }
}

/// Signatures the plugin is built against that `advertised` lacks.
fn unadvertised_plugin_operations(advertised: &CapabilitySet) -> Vec<OperationSignature> {
    catalog::plugin_contract()
        .signatures()
        .filter(|signature| !advertised.supports(signature))
        .collect()
}
