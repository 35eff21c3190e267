//! Enterprise bridge CLI entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Wire observability** — configure `tracing-subscriber` from `RUST_LOG`
//!    (default `info`), with JSON output when
//!    `ENTERPRISE_BRIDGE_LOG_FORMAT=json`.
//! 2. **Load configuration** — read the adapter configuration from the path in
//!    `ENTERPRISE_BRIDGE_CONFIG`, or use the defaults.
//! 3. **Construct the client** — load a scripted enterprise client from the
//!    first argument and hand it to the adapter as a [`ClientHandle`].
//! 4. **Invoke once** — read the action from the second argument, invoke it
//!    through [`CompatibilityClassifier`], and print the payload or the failure
//!    report. The exit code follows [`ReportKind::exit_code`].
//!
//! Usage: `enterprise-bridge <client-script.json> <action.json>`

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use contract::{ClientHandle, EnterpriseAction};
use enterprise_adapter::{AdapterConfig, CompatibilityClassifier, FailureReport, ReportKind};
use stub_client::ScriptedClient;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "ENTERPRISE_BRIDGE_CONFIG";
const LOG_FORMAT_ENV: &str = "ENTERPRISE_BRIDGE_LOG_FORMAT";

fn main() -> ExitCode {
    init_tracing();

    match run(std::env::args_os().skip(1).map(PathBuf::from)) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            error!(error = %format!("{err:#}"), "Enterprise bridge failed");
            eprintln!("error: {err:#}");
            ExitCode::from(ReportKind::Build.exit_code())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if std::env::var(LOG_FORMAT_ENV).is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Runs one invocation and returns the process exit code.
fn run(args: impl IntoIterator<Item = PathBuf>) -> anyhow::Result<u8> {
    let mut args = args.into_iter();
    let (Some(script_path), Some(action_path), None) = (args.next(), args.next(), args.next())
    else {
        bail!("usage: enterprise-bridge <client-script.json> <action.json>");
    };

    let config = load_config()?;

    let client = ScriptedClient::from_path(&script_path)
        .with_context(|| format!("loading enterprise client from {}", script_path.display()))?;

    let action_json = std::fs::read_to_string(&action_path)
        .with_context(|| format!("reading action {}", action_path.display()))?;
    let action: EnterpriseAction = serde_json::from_str(&action_json)
        .with_context(|| format!("parsing action {}", action_path.display()))?;

    let classifier = CompatibilityClassifier::from_config(ClientHandle::new(client), &config);

    match classifier.invoke(&action) {
        Ok(payload) => {
            info!(operation = %action.operation(), "Enterprise action succeeded");
            println!("{payload}");
            Ok(0)
        }
        Err(err) => {
            let report = FailureReport::from_error(&err);
            eprintln!("{report}");
            if let Some(detail) = report.detail() {
                debug!(detail, "Failure detail");
            }
            Ok(report.kind().exit_code())
        }
    }
}

fn load_config() -> anyhow::Result<AdapterConfig> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => {
            let path = PathBuf::from(path);
            info!(path = %path.display(), "Loading adapter configuration");
            AdapterConfig::from_path(&path)
                .with_context(|| format!("loading adapter configuration {}", path.display()))
        }
        None => Ok(AdapterConfig::default()),
    }
}
