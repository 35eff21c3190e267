//! Contract between the build-tool plugin and the enterprise client.
//!
//! The plugin and the enterprise client ship on different release cadences, so
//! neither is compiled against a fixed version of the other. This crate holds
//! everything both sides agree on at the boundary: the shape of a request, the
//! shape of a result, the tagged set of ways a call can fail, and the port trait
//! a loaded client implements.
//!
//! ## Architectural Layer
//!
//! **Domain types + port definitions.** This crate has no I/O dependencies.
//! The adapter crate decides what a failure means; concrete clients decide how
//! calls are carried out.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype names for interface members, invocation ids |
//! | [`types`] | `EnterpriseAction`, `Payload`, `OperationSignature`, `CapabilitySet`, `ClientVersion` |
//! | [`errors`] | `ClientFailure`, `DomainError`, `InfrastructureError` |
//! | [`client`] | `EnterpriseClient` port trait and `ClientHandle` |
//! | [`catalog`] | Operations the plugin is built against |

pub mod catalog;
pub mod client;
pub mod errors;
pub mod identifiers;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use client::{ClientHandle, EnterpriseClient};
pub use errors::{ClientFailure, DomainError, InfrastructureError, InfrastructureKind};
pub use identifiers::{EmptyIdentifier, FieldName, InvocationId, OperationName, TypeName};
pub use types::{
    CapabilitySet, ClientVersion, EnterpriseAction, InvocationResult, OperationSignature, Payload,
    VersionParseError,
};
