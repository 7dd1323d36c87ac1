//! Subcommand implementations.

use crate::cli::{ListArgs, RunArgs, ValidateArgs};
use crate::{output, wiring};
use anyhow::{Context, Result};
use rcr_config::load_config;
use rcr_core::{GroupSpec, RunnerConfig};
use rcr_engine::{ExecuteOptions, ExecutorConfig, GroupExecutor};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn select_groups<'a>(config: &'a RunnerConfig, name: Option<&str>) -> Result<Vec<&'a GroupSpec>> {
    match name {
        Some(n) => {
            let group = config
                .group(n)
                .ok_or_else(|| anyhow::anyhow!("unknown group: {n}"))?;
            Ok(vec![group])
        }
        None => Ok(config.groups.iter().collect()),
    }
}

/// Run every selected group in declared order, stopping at the first
/// group-level failure (spec §4: groups themselves are independent runs;
/// the CLI's own sequencing stops early so a failed group's cause is the
/// first thing the operator sees).
pub async fn run(args: RunArgs) -> Result<i32> {
    let config = load_config(&args.config)
        .with_context(|| format!("failed to load config {}", args.config.display()))?;
    let groups = select_groups(&config, args.group.as_deref())?;

    let store = wiring::integrity_store(args.manifest_dir.as_deref())?;
    let executor = GroupExecutor::new(
        wiring::resource_manager(),
        wiring::notifier(args.webhook),
        Arc::new(store),
        wiring::security_policy(),
        wiring::search_path(),
        ExecutorConfig::default(),
    );

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_cancel.cancel();
        }
    });

    let options = ExecuteOptions {
        dry_run: args.dry_run,
        keep_scratch: args.keep_scratch,
    };

    for group in groups {
        match executor
            .execute_group(&config.global, group, cancel.clone(), options)
            .await
        {
            Ok(result) => {
                print!("{}", output::render_group_result(&result));
            }
            Err(e) => {
                eprintln!("group {} failed: {e}", group.name);
                return Ok(e.exit_code());
            }
        }
    }
    Ok(0)
}

pub async fn validate(args: ValidateArgs) -> Result<i32> {
    let config = load_config(&args.config)
        .with_context(|| format!("failed to load config {}", args.config.display()))?;
    let groups = select_groups(&config, args.group.as_deref())?;

    let store = wiring::integrity_store(args.manifest_dir.as_deref())?;
    let executor = GroupExecutor::new(
        wiring::resource_manager(),
        wiring::notifier(None),
        Arc::new(store),
        wiring::security_policy(),
        wiring::search_path(),
        ExecutorConfig::default(),
    );

    let mut exit_code = 0;
    for group in groups {
        match executor.validate_group(&config.global, group).await {
            Ok(report) => print!("{}", output::render_validation_report(&report)),
            Err(e) => {
                eprintln!("group {} invalid: {e}", group.name);
                exit_code = 1;
            }
        }
    }
    Ok(exit_code)
}

pub fn list(args: ListArgs) -> Result<()> {
    let config = load_config(&args.config)
        .with_context(|| format!("failed to load config {}", args.config.display()))?;
    print!("{}", output::render_config_list(&config));
    Ok(())
}
