//! Command Handlers
//!
//! Handler functions for CLI commands.

use rlm_core::{
    Actor, LegalHoldDraft, LegalHoldUpdate, ManagerConfig, PolicyDraft, PolicyUpdate,
    RetentionLifecycleManager,
};
use tracing::info;

use crate::commands::{
    config::{keys, ConfigCommands},
    evidence::EvidenceCommands,
    hold::HoldCommands,
    policy::PolicyCommands,
    scheduler::SchedulerCommands,
    Cli, Commands, OutputFormat,
};
use crate::error::{CliError, CliResult};
use crate::output;

/// Effective manager configuration: environment, then command-line overrides
pub fn manager_config(cli: &Cli) -> ManagerConfig {
    let mut config = ManagerConfig::from_env();
    config.api_url = cli.api_url.clone();
    config.request_timeout_secs = cli.timeout;
    config
}

/// Session actor from the command line
pub fn session_actor(cli: &Cli) -> CliResult<Actor> {
    let id = cli
        .actor
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| CliError::config(format!("actor id required (--actor or {})", keys::ACTOR_ID)))?;
    let role = cli
        .role
        .ok_or_else(|| CliError::config(format!("actor role required (--role or {})", keys::ACTOR_ROLE)))?;
    Ok(Actor::new(id, role))
}

async fn connect(cli: &Cli, config: ManagerConfig) -> CliResult<RetentionLifecycleManager> {
    let actor = session_actor(cli)?;
    let manager = RetentionLifecycleManager::connect(actor, config)?;
    manager.initialize().await?;
    Ok(manager)
}

/// Run the CLI with parsed arguments
pub async fn run(cli: Cli) -> CliResult<()> {
    let config = manager_config(&cli);
    let format = cli.format;

    match cli.command {
        Commands::Config(cmd) => handle_config(cmd, &config, format),
        Commands::Scheduler(SchedulerCommands::Run {
            interval,
            tick_on_start,
        }) => {
            let mut config = config;
            if let Some(interval) = interval {
                config.scheduler.interval_secs = interval;
            }
            let manager = connect(&cli, config).await?;
            handle_scheduler_run(&manager, tick_on_start, format).await
        }
        ref command => {
            let manager = connect(&cli, config).await?;
            match command {
                Commands::Policy(cmd) => handle_policy(&manager, cmd, format).await,
                Commands::Hold(cmd) => handle_hold(&manager, cmd, format).await,
                Commands::Evidence(cmd) => handle_evidence(&manager, cmd, format).await,
                Commands::Scheduler(SchedulerCommands::Tick) => {
                    let report = manager.scheduler().tick().await;
                    output::print_tick_report(&report, format);
                    Ok(())
                }
                Commands::Scheduler(SchedulerCommands::Run { .. }) | Commands::Config(_) => {
                    Ok(())
                }
            }
        }
    }
}

/// Handle policy commands
async fn handle_policy(
    manager: &RetentionLifecycleManager,
    cmd: &PolicyCommands,
    format: OutputFormat,
) -> CliResult<()> {
    let policies = manager.policies();

    match cmd {
        PolicyCommands::List => {
            output::print_policies(&policies.list().await, format);
        }
        PolicyCommands::Get { id } => {
            let policy = policies.get(id).await.ok_or_else(|| CliError::not_found(id))?;
            output::print_policy(&policy, format);
        }
        PolicyCommands::Create {
            name,
            days,
            types,
            jurisdiction,
            legal_basis,
            auto_archive,
        } => {
            let policy = policies
                .create(PolicyDraft {
                    name: name.clone(),
                    evidence_types: types.iter().cloned().collect(),
                    retention_days: *days,
                    jurisdiction: jurisdiction.clone(),
                    legal_basis: legal_basis.clone(),
                    auto_archive: *auto_archive,
                })
                .await?;
            output::print_policy(&policy, format);
        }
        PolicyCommands::Update {
            id,
            name,
            days,
            types,
            jurisdiction,
            legal_basis,
            auto_archive,
            active,
        } => {
            let update = PolicyUpdate {
                name: name.clone(),
                evidence_types: types.as_ref().map(|t| t.iter().cloned().collect()),
                retention_days: *days,
                jurisdiction: jurisdiction.clone(),
                legal_basis: legal_basis.clone(),
                auto_archive: *auto_archive,
                is_active: *active,
            };
            if update.is_empty() {
                return Err(CliError::invalid_arg("no fields to update"));
            }
            let policy = policies.update(id, update).await?;
            output::print_policy(&policy, format);
        }
        PolicyCommands::Delete { id } => {
            policies.delete(id).await?;
            output::print_success(&format!("Deleted retention policy {}", id));
        }
        PolicyCommands::Apply { id, evidence } => {
            let assignment = policies.apply(evidence, id).await?;
            output::print_assignment(&assignment, format);
        }
    }

    Ok(())
}

/// Handle legal hold commands
async fn handle_hold(
    manager: &RetentionLifecycleManager,
    cmd: &HoldCommands,
    format: OutputFormat,
) -> CliResult<()> {
    let holds = manager.holds();

    match cmd {
        HoldCommands::List {
            active,
            case,
            evidence,
        } => {
            let mut listed = match (case, evidence) {
                (_, Some(evidence_id)) => holds.holds_for_evidence(evidence_id).await,
                (Some(case_id), None) => holds.holds_for_case(case_id).await,
                (None, None) => holds.list().await,
            };
            if *active {
                listed.retain(|h| h.is_active);
            }
            if let Some(case_id) = case {
                listed.retain(|h| &h.case_id == case_id);
            }
            output::print_holds(&listed, format);
        }
        HoldCommands::Get { id } => {
            let hold = holds.get(id).await.ok_or_else(|| CliError::not_found(id))?;
            output::print_hold(&hold, format);
        }
        HoldCommands::Create {
            case,
            reason,
            legal_basis,
            court_order,
            evidence,
            end_date,
            stakeholders,
            frequency,
        } => {
            let outcome = holds
                .create(LegalHoldDraft {
                    case_id: case.clone(),
                    reason: reason.clone(),
                    legal_basis: legal_basis.clone(),
                    court_order: court_order.clone(),
                    evidence_ids: evidence.iter().cloned().collect(),
                    end_date: *end_date,
                    stakeholders: stakeholders.clone(),
                    notification_frequency: *frequency,
                })
                .await?;
            output::print_hold_outcome(&outcome, format);
        }
        HoldCommands::Update {
            id,
            reason,
            legal_basis,
            court_order,
            evidence,
            end_date,
            stakeholders,
            frequency,
        } => {
            let update = LegalHoldUpdate {
                reason: reason.clone(),
                legal_basis: legal_basis.clone(),
                court_order: court_order.clone(),
                evidence_ids: evidence.as_ref().map(|e| e.iter().cloned().collect()),
                end_date: *end_date,
                stakeholders: stakeholders.clone(),
                notification_frequency: *frequency,
            };
            if update == LegalHoldUpdate::default() {
                return Err(CliError::invalid_arg("no fields to update"));
            }
            let outcome = holds.update(id, update).await?;
            output::print_hold_outcome(&outcome, format);
        }
        HoldCommands::Release { id, reason } => {
            let outcome = holds.release(id, reason).await?;
            output::print_hold_outcome(&outcome, format);
        }
        HoldCommands::Stats => {
            output::print_hold_stats(&holds.stats().await, format);
        }
    }

    Ok(())
}

/// Handle evidence commands
async fn handle_evidence(
    manager: &RetentionLifecycleManager,
    cmd: &EvidenceCommands,
    format: OutputFormat,
) -> CliResult<()> {
    match cmd {
        EvidenceCommands::CanDelete { id } => {
            let verdict = manager.guard().can_delete(id).await?;
            output::print_verdict(id, &verdict, format);
        }
        EvidenceCommands::CanModify { id } => {
            let verdict = manager.guard().can_modify(id).await?;
            output::print_verdict(id, &verdict, format);
        }
        EvidenceCommands::Expiring { days } => {
            let records = manager.expiring_evidence(*days).await?;
            output::print_evidence(&records, format);
        }
        EvidenceCommands::Archive { ids, location } => {
            let request = manager.archive(ids, location).await?;
            output::print_archive(&request, format);
        }
    }

    Ok(())
}

/// Run the scheduler until Ctrl-C
async fn handle_scheduler_run(
    manager: &RetentionLifecycleManager,
    tick_on_start: bool,
    format: OutputFormat,
) -> CliResult<()> {
    let handle = manager
        .start_scheduler()
        .ok_or_else(|| CliError::config(format!("scheduler disabled ({}=false)", keys::SCHEDULER_ENABLED)))?;

    let mut reports = handle.subscribe();
    if tick_on_start {
        handle.tick_now().await;
    }

    info!(
        interval_secs = manager.config().scheduler.interval_secs,
        "Scheduler running; press Ctrl-C to stop"
    );

    loop {
        tokio::select! {
            changed = reports.changed() => {
                if changed.is_err() {
                    break;
                }
                let report = reports.borrow_and_update().clone();
                if let Some(report) = report {
                    output::print_tick_report(&report, format);
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                break;
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}

/// Handle config commands
fn handle_config(cmd: ConfigCommands, config: &ManagerConfig, format: OutputFormat) -> CliResult<()> {
    match cmd {
        ConfigCommands::Show => {
            output::print_config(config, format);
        }
        ConfigCommands::Env => match format {
            OutputFormat::Json => {
                let listed: Vec<_> = keys::ALL
                    .iter()
                    .map(|(key, description)| {
                        serde_json::json!({
                            "key": key,
                            "description": description,
                            "set": std::env::var(key).is_ok(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&listed)?);
            }
            OutputFormat::Table | OutputFormat::Plain => {
                for (key, description) in keys::ALL {
                    output::print_row(key, description);
                }
            }
        },
    }

    Ok(())
}
