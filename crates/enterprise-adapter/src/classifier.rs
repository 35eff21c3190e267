//! Classification of client failures and the adapter's public entry point.

use contract::{ClientFailure, ClientHandle, EnterpriseAction, InvocationId, Payload};
use serde::de::DeserializeOwned;
use tracing::{debug, info_span, warn, Span};

use crate::{AdapterConfig, ClientInvoker, CompatibilityError, IntegrationSurface, InvocationError};

/// How a client failure is treated at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureClass {
    /// An interface member is absent or reshaped: version skew.
    Structural,
    /// The client rejected the call deliberately.
    Domain,
    /// An I/O, network, or system fault inside the client.
    Infrastructure,
    /// The failure carries no usable category.
    Unknown,
}

impl FailureClass {
    /// Returns `true` only for [`FailureClass::Structural`]. Every other class
    /// is passed through unchanged.
    pub fn is_structural(self) -> bool {
        matches!(self, Self::Structural)
    }
}

/// Classifies a failure by its kind. Message text is never consulted.
pub fn classify(failure: &ClientFailure) -> FailureClass {
    match failure {
        ClientFailure::MissingOperation { .. }
        | ClientFailure::MissingType { .. }
        | ClientFailure::MissingField { .. }
        | ClientFailure::SignatureMismatch { .. }
        | ClientFailure::ReturnShapeMismatch { .. } => FailureClass::Structural,
        ClientFailure::Domain(_) => FailureClass::Domain,
        ClientFailure::Infrastructure(_) => FailureClass::Infrastructure,
        ClientFailure::Unrecognised { .. } => FailureClass::Unknown,
    }
}

/// Invokes the enterprise client and turns structural failures into a single
/// [`CompatibilityError`].
///
/// Holds no per-call state: concurrent invocations are independent and the
/// same action against an unchanged client is always classified the same way.
#[derive(Debug, Clone)]
pub struct CompatibilityClassifier {
    invoker: ClientInvoker,
    surface: IntegrationSurface,
}

impl CompatibilityClassifier {
    /// Creates a classifier over an invoker.
    pub fn new(invoker: ClientInvoker, surface: IntegrationSurface) -> Self {
        Self { invoker, surface }
    }

    /// Creates an invoker over `client` and wraps it with the configured
    /// integration surface.
    pub fn from_config(client: ClientHandle, config: &AdapterConfig) -> Self {
        Self::new(ClientInvoker::new(client), config.integration.clone())
    }

    /// The integration surface named in compatibility errors.
    pub fn surface(&self) -> &IntegrationSurface {
        &self.surface
    }

    /// Invokes `action`.
    ///
    /// Success payloads and non-structural failures come back unchanged;
    /// structural failures come back as [`InvocationError::Compatibility`] with
    /// the original failure as cause.
    pub fn invoke(&self, action: &EnterpriseAction) -> Result<Payload, InvocationError> {
        let span = invocation_span(action);
        let _entered = span.enter();

        self.invoker
            .invoke(action)
            .map_err(|failure| self.reclassify(failure))
    }

    /// Invokes `action` and decodes the payload into `T`.
    ///
    /// A payload that does not decode means the client returns a different
    /// shape than the plugin was built against, which is treated as a
    /// structural failure.
    pub fn invoke_as<T: DeserializeOwned>(
        &self,
        action: &EnterpriseAction,
    ) -> Result<T, InvocationError> {
        let span = invocation_span(action);
        let _entered = span.enter();

        let payload = self
            .invoker
            .invoke(action)
            .map_err(|failure| self.reclassify(failure))?;

        payload.decode::<T>().map_err(|err| {
            self.reclassify(ClientFailure::ReturnShapeMismatch {
                operation: action.operation().clone(),
                expected: std::any::type_name::<T>().to_owned(),
                detail: err.to_string(),
            })
        })
    }

    fn reclassify(&self, failure: ClientFailure) -> InvocationError {
        let class = classify(&failure);
        if class.is_structural() {
            warn!(
                failure_kind = failure.kind_name(),
                "Enterprise client is incompatible with this plugin version"
            );
            debug!(cause = %failure, "Structural failure from enterprise client");
            return CompatibilityError::new(&self.surface, failure).into();
        }

        debug!(
            failure_class = ?class,
            failure_kind = failure.kind_name(),
            "Passing enterprise client failure through"
        );
        InvocationError::Client(failure)
    }
}

fn invocation_span(action: &EnterpriseAction) -> Span {
    info_span!(
        "enterprise_invoke",
        invocation_id = %InvocationId::new_random(),
        operation = %action.operation(),
        arity = action.arity(),
    )
}
