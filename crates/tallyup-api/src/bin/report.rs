//! Settlement report for a group snapshot.
//!
//! Usage: `tallyup-report <snapshot.json> [--json]`
//!
//! Engine configuration is read from the file named by `TALLYUP_CONFIG`,
//! defaults otherwise. Set `RUST_LOG=debug` to trace every step and
//! `TALLYUP_LOG_FORMAT=json` for structured logs on stderr.

use tallyup_api::{ApiResponse, GroupSnapshot, SettlementReport, validation};
use tallyup_engine::{ConservationCheck, SettlementEngine, TracingObserver, digest_hex};
use tallyup_types::{EngineConfig, Result, TallyError, constants};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<()> {
    let json_logs = std::env::var("TALLYUP_LOG_FORMAT").is_ok_and(|f| f == "json");
    tracing_subscriber::registry()
        .with(json_logs.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json_logs).then(|| fmt::layer().with_writer(std::io::stderr)))
        .with(EnvFilter::from_default_env())
        .init();

    let mut snapshot_path = None;
    let mut as_json = false;
    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            as_json = true;
        } else if snapshot_path.is_none() {
            snapshot_path = Some(arg);
        } else {
            return Err(TallyError::Configuration(format!(
                "unexpected argument: {arg}"
            )));
        }
    }
    let snapshot_path = snapshot_path.ok_or_else(|| {
        TallyError::Configuration("usage: tallyup-report <snapshot.json> [--json]".into())
    })?;

    let config = if let Ok(config_path) = std::env::var(constants::CONFIG_ENV_VAR) {
        info!("Loading config from: {}", config_path);
        EngineConfig::from_file(&config_path)?
    } else {
        EngineConfig::default()
    };
    info!(
        split = %config.split_policy,
        orphans = %config.orphan_policy,
        epsilon = %config.epsilon,
        "{} {}",
        constants::ENGINE_NAME,
        constants::VERSION
    );

    let snapshot = GroupSnapshot::from_file(&snapshot_path)?;
    info!(
        members = snapshot.members.len(),
        expenses = snapshot.expenses.len(),
        "Loaded snapshot from {}",
        snapshot_path
    );
    validation::check_ledger(&snapshot.members, &snapshot.expenses, &config)?;

    let engine = SettlementEngine::new(config)?;
    let result = engine.calculate_group_balances_observed(
        &snapshot.members,
        &snapshot.expenses,
        &mut TracingObserver,
    )?;
    ConservationCheck::new(engine.config()).verify(&result)?;
    let digest = digest_hex(&result);

    if as_json {
        let body = ApiResponse::ok(&result);
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        print!("{}", SettlementReport(&result));
        println!("\nDigest: {digest}");
    }
    Ok(())
}
