//! Operations the plugin is built against.
//!
//! These are the names and arities known when the plugin was compiled. A newer
//! or older enterprise client may drop or reshape any of them, which is exactly
//! the situation the adapter turns into a compatibility error.

use serde_json::Value;

use crate::{CapabilitySet, EnterpriseAction, OperationName, OperationSignature};

/// An operation in the plugin's built-in contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownOperation {
    name: &'static str,
    arity: usize,
}

impl KnownOperation {
    const fn new(name: &'static str, arity: usize) -> Self {
        Self { name, arity }
    }

    /// Returns the operation name.
    pub fn name(self) -> &'static str {
        self.name
    }

    /// Returns the number of parameters the plugin passes.
    pub fn arity(self) -> usize {
        self.arity
    }

    /// Returns the operation name as an [`OperationName`].
    pub fn operation(self) -> OperationName {
        OperationName::from_static(self.name)
    }

    /// Returns the signature the plugin expects the client to provide.
    pub fn signature(self) -> OperationSignature {
        OperationSignature::new(self.operation(), self.arity)
    }

    /// Builds an action invoking this operation.
    pub fn action(self, arguments: Vec<Value>) -> EnterpriseAction {
        EnterpriseAction::new(self.operation(), arguments)
    }
}

/// Uploads a packaged simulation: `(package_id, package_file)`.
pub const UPLOAD_PACKAGE: KnownOperation = KnownOperation::new("upload_package", 2);

/// Uploads a package for the package bound to a simulation:
/// `(simulation_id, package_file)`.
pub const UPLOAD_PACKAGE_WITH_SIMULATION_ID: KnownOperation =
    KnownOperation::new("upload_package_with_simulation_id", 2);

/// Uploads the package of a simulation and starts a run:
/// `(simulation_id, system_properties, environment_variables, package_file)`.
pub const START_SIMULATION: KnownOperation = KnownOperation::new("start_simulation", 4);

/// Creates a simulation (and its package if needed), uploads, and starts a run:
/// `(team_id, group_id, artifact_id, simulation_class, package_id,
/// system_properties, environment_variables, package_file)`.
pub const CREATE_AND_START_SIMULATION: KnownOperation =
    KnownOperation::new("create_and_start_simulation", 8);

/// Every operation in the plugin's built-in contract.
pub const ALL: &[KnownOperation] = &[
    UPLOAD_PACKAGE,
    UPLOAD_PACKAGE_WITH_SIMULATION_ID,
    START_SIMULATION,
    CREATE_AND_START_SIMULATION,
];

/// The plugin's built-in contract as a [`CapabilitySet`].
pub fn plugin_contract() -> CapabilitySet {
    ALL.iter().map(|op| op.signature()).collect()
}
