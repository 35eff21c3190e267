//! End-to-end behaviour of the adapter against scripted enterprise clients.

use std::error::Error as _;
use std::sync::Arc;

use contract::{
    catalog, ClientFailure, ClientHandle, ClientVersion, DomainError, EnterpriseAction,
    EnterpriseClient, InfrastructureError, InfrastructureKind, OperationName, Payload,
};
use enterprise_adapter::{
    AdapterConfig, CompatibilityClassifier, FailureReport, InvocationError, ReportKind,
};
use rstest::{fixture, rstest};
use serde::Deserialize;
use serde_json::{json, Value};
use stub_client::ScriptedClient;

const REMEDIATION: &str = "Please update the Gatling Gradle plugin to the latest version for \
    compatibility with Gatling Enterprise. See \
    https://docs.gatling.io/reference/integrations/build-tools/gradle-plugin/ for more \
    information about this plugin.";

fn op(name: &str) -> OperationName {
    OperationName::new(name).unwrap()
}

fn args(count: usize) -> Vec<Value> {
    (0..count).map(|i| json!(format!("arg-{i}"))).collect()
}

fn classifier_over(client: ScriptedClient) -> (Arc<ScriptedClient>, CompatibilityClassifier) {
    let client = Arc::new(client);
    let handle = ClientHandle::from_arc(client.clone() as Arc<dyn EnterpriseClient>);
    let classifier = CompatibilityClassifier::from_config(handle, &AdapterConfig::default());
    (client, classifier)
}

fn invalid_input() -> ClientFailure {
    ClientFailure::Domain(
        DomainError::new("invalid_input", "Simulation id is not a valid UUID")
            .with_details(json!({ "argument": 0 })),
    )
}

/// A client that speaks the plugin's current contract, with one operation that
/// rejects its input.
#[fixture]
fn current_client() -> ScriptedClient {
    ScriptedClient::builder()
        .version(ClientVersion::new(1, 5, 5))
        .respond(catalog::UPLOAD_PACKAGE.operation(), 2, json!({ "file_size": 4096 }))
        .fail(catalog::START_SIMULATION.operation(), 4, invalid_input())
        .build()
        .unwrap()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[rstest]
fn present_operation_returns_payload_unmodified(current_client: ScriptedClient) {
    let (client, classifier) = classifier_over(current_client);

    let result = classifier.invoke(&catalog::UPLOAD_PACKAGE.action(args(2)));

    assert_eq!(result, Ok(Payload::new(json!({ "file_size": 4096 }))));
    assert_eq!(client.call_count(), 1);
}

#[rstest]
fn absent_operation_is_a_compatibility_error(current_client: ScriptedClient) {
    let (_, classifier) = classifier_over(current_client);

    let err = classifier
        .invoke(&catalog::CREATE_AND_START_SIMULATION.action(args(8)))
        .unwrap_err();

    let InvocationError::Compatibility(compat) = &err else {
        panic!("expected a compatibility error, got {err:?}");
    };
    assert_eq!(compat.to_string(), REMEDIATION);
    assert_eq!(
        compat.cause(),
        &ClientFailure::MissingOperation {
            operation: op("create_and_start_simulation")
        }
    );
    assert_eq!(
        err.source().map(ToString::to_string).as_deref(),
        Some("no such operation: create_and_start_simulation")
    );
}

#[rstest]
fn absent_operation_on_unadvertised_client_is_a_compatibility_error() {
    let (client, classifier) = classifier_over(
        ScriptedClient::builder()
            .without_capabilities()
            .respond(op("upload_package"), 2, json!(null))
            .build()
            .unwrap(),
    );

    let err = classifier
        .invoke(&catalog::START_SIMULATION.action(args(4)))
        .unwrap_err();

    assert!(err.is_compatibility());
    assert_eq!(err.to_string(), REMEDIATION);
    assert_eq!(client.call_count(), 1);
}

#[rstest]
fn domain_error_passes_through_unchanged(current_client: ScriptedClient) {
    let (_, classifier) = classifier_over(current_client);

    let err = classifier
        .invoke(&catalog::START_SIMULATION.action(args(4)))
        .unwrap_err();

    assert_eq!(err, InvocationError::Client(invalid_input()));
    let domain = err.as_domain().unwrap();
    assert_eq!(domain.code(), "invalid_input");
    assert_eq!(domain.message(), "Simulation id is not a valid UUID");
    assert_eq!(domain.details(), Some(&json!({ "argument": 0 })));
}

#[rstest]
#[case::advertised(false)]
#[case::unadvertised(true)]
fn parameter_count_drift_is_a_compatibility_error(#[case] hide_capabilities: bool) {
    let mut builder = ScriptedClient::builder().respond(
        catalog::START_SIMULATION.operation(),
        5,
        json!({ "run_id": "r-1" }),
    );
    if hide_capabilities {
        builder = builder.without_capabilities();
    }
    let (_, classifier) = classifier_over(builder.build().unwrap());

    let err = classifier
        .invoke(&catalog::START_SIMULATION.action(args(4)))
        .unwrap_err();

    let InvocationError::Compatibility(compat) = err else {
        panic!("expected a compatibility error");
    };
    assert_eq!(compat.message(), REMEDIATION);
    assert_eq!(
        compat.into_cause(),
        ClientFailure::SignatureMismatch {
            operation: op("start_simulation"),
            expected_arity: 4,
            advertised_arities: vec![5],
        }
    );
}

// ---------------------------------------------------------------------------
// Pass-through of everything that is not structural
// ---------------------------------------------------------------------------

#[rstest]
#[case::infrastructure(ClientFailure::Infrastructure(InfrastructureError::new(
    InfrastructureKind::Network,
    "connection refused"
)))]
#[case::unrecognised(ClientFailure::Unrecognised {
    category: "LinkageError".into(),
    message: "no such method: uploadPackage".into(),
})]
#[case::domain_with_structural_wording(ClientFailure::Domain(DomainError::new(
    "not_found",
    "no such operation: simulation was deleted"
)))]
fn non_structural_failures_are_returned_exactly(#[case] failure: ClientFailure) {
    let (_, classifier) = classifier_over(
        ScriptedClient::builder()
            .fail(op("upload_package"), 2, failure.clone())
            .build()
            .unwrap(),
    );

    let err = classifier
        .invoke(&catalog::UPLOAD_PACKAGE.action(args(2)))
        .unwrap_err();

    assert_eq!(err, InvocationError::Client(failure));
}

// ---------------------------------------------------------------------------
// Typed invocation
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, PartialEq)]
struct UploadReceipt {
    file_size: u64,
}

#[rstest]
fn typed_payload_is_decoded(current_client: ScriptedClient) {
    let (_, classifier) = classifier_over(current_client);

    let receipt: UploadReceipt = classifier
        .invoke_as(&catalog::UPLOAD_PACKAGE.action(args(2)))
        .unwrap();

    assert_eq!(receipt, UploadReceipt { file_size: 4096 });
}

#[rstest]
fn return_shape_drift_is_a_compatibility_error() {
    let (_, classifier) = classifier_over(
        ScriptedClient::builder()
            .respond(op("upload_package"), 2, json!({ "size_bytes": "4096" }))
            .build()
            .unwrap(),
    );

    let err = classifier
        .invoke_as::<UploadReceipt>(&catalog::UPLOAD_PACKAGE.action(args(2)))
        .unwrap_err();

    assert!(err.is_compatibility());
    assert!(matches!(
        err.client_failure(),
        ClientFailure::ReturnShapeMismatch { operation, .. } if operation.as_str() == "upload_package"
    ));
}

#[rstest]
fn typed_invocation_still_passes_domain_errors_through(current_client: ScriptedClient) {
    let (_, classifier) = classifier_over(current_client);

    let err = classifier
        .invoke_as::<UploadReceipt>(&catalog::START_SIMULATION.action(args(4)))
        .unwrap_err();

    assert_eq!(err, InvocationError::Client(invalid_input()));
}

// ---------------------------------------------------------------------------
// Statelessness
// ---------------------------------------------------------------------------

#[rstest]
#[case::success(catalog::UPLOAD_PACKAGE.action(args(2)))]
#[case::domain(catalog::START_SIMULATION.action(args(4)))]
#[case::missing(catalog::CREATE_AND_START_SIMULATION.action(args(8)))]
#[case::drift(catalog::UPLOAD_PACKAGE.action(args(3)))]
fn repeated_invocations_classify_identically(
    current_client: ScriptedClient,
    #[case] action: EnterpriseAction,
) {
    let (_, classifier) = classifier_over(current_client);

    let first = classifier.invoke(&action);
    let second = classifier.invoke(&action);

    assert_eq!(first, second);
}

#[rstest]
fn concurrent_invocations_are_independent(current_client: ScriptedClient) {
    let (client, classifier) = classifier_over(current_client);
    let upload = catalog::UPLOAD_PACKAGE.action(args(2));
    let start = catalog::START_SIMULATION.action(args(4));
    let missing = catalog::UPLOAD_PACKAGE_WITH_SIMULATION_ID.action(args(2));

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                assert!(classifier.invoke(&upload).is_ok());
                assert!(classifier.invoke(&start).unwrap_err().as_domain().is_some());
                assert!(classifier.invoke(&missing).unwrap_err().is_compatibility());
            });
        }
    });

    // The missing operation is never advertised, so it never reaches the client.
    assert_eq!(client.call_count(), 16);
}

// ---------------------------------------------------------------------------
// Reporting
// ---------------------------------------------------------------------------

#[rstest]
#[case::compatibility(catalog::CREATE_AND_START_SIMULATION.action(args(8)), ReportKind::Compatibility)]
#[case::domain(catalog::START_SIMULATION.action(args(4)), ReportKind::Domain)]
fn reports_follow_the_classification(
    current_client: ScriptedClient,
    #[case] action: EnterpriseAction,
    #[case] expected: ReportKind,
) {
    let (_, classifier) = classifier_over(current_client);

    let err = classifier.invoke(&action).unwrap_err();

    assert_eq!(FailureReport::from_error(&err).kind(), expected);
}

#[rstest]
fn configured_documentation_url_appears_in_the_message(current_client: ScriptedClient) {
    let config = AdapterConfig::from_json_str(
        r#"{ "integration": { "documentation_url": "https://docs.gatling.io/integrations/gradle/" } }"#,
    )
    .unwrap();
    let classifier =
        CompatibilityClassifier::from_config(ClientHandle::new(current_client), &config);

    let err = classifier
        .invoke(&catalog::CREATE_AND_START_SIMULATION.action(args(8)))
        .unwrap_err();

    let InvocationError::Compatibility(compat) = err else {
        panic!("expected a compatibility error");
    };
    assert_eq!(
        compat.documentation_url(),
        "https://docs.gatling.io/integrations/gradle/"
    );
    assert!(compat
        .message()
        .contains("See https://docs.gatling.io/integrations/gradle/ for more information"));
}
