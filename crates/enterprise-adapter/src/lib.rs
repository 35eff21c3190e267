//! Enterprise client compatibility adapter.
//!
//! The build-tool plugin and the enterprise client are released independently,
//! so a build may pair an old plugin with a new client or the other way round.
//! This crate is the boundary between them: it performs the call, recognises
//! the failures that mean "this plugin and this client do not fit together",
//! and turns those into one [`CompatibilityError`] that tells the user to
//! update the plugin. Every other failure reaches the caller untouched.
//!
//! ## Architectural Layer
//!
//! **Infrastructure boundary.** [`ClientInvoker`] is the only place the loaded
//! client is called. [`CompatibilityClassifier`] wraps it and is the entry point
//! for build-task code:
//!
//! ```text
//! build task ─► CompatibilityClassifier::invoke ─► ClientInvoker::invoke ─► enterprise client
//! ```
//!
//! Failures are classified by their [`contract::ClientFailure`] variant, never
//! by message text. A failure without a usable category is passed through: a
//! raw error is preferable to a misleading instruction to upgrade.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`invoker`] | `ClientInvoker` |
//! | [`classifier`] | `CompatibilityClassifier`, `classify`, `FailureClass` |
//! | [`error`] | `CompatibilityError`, `InvocationError` |
//! | [`config`] | `AdapterConfig`, `IntegrationSurface`, message/URL constants |
//! | [`report`] | `FailureReport` for the surrounding build task |

pub mod classifier;
pub mod config;
pub mod error;
pub mod invoker;
pub mod report;

pub use classifier::{classify, CompatibilityClassifier, FailureClass};
pub use config::{
    AdapterConfig, ConfigError, IntegrationSurface, DEFAULT_DOCUMENTATION_URL,
    DEFAULT_PLUGIN_NAME, DEFAULT_PRODUCT_NAME,
};
pub use error::{CompatibilityError, InvocationError};
pub use invoker::ClientInvoker;
pub use report::{FailureReport, ReportKind};
