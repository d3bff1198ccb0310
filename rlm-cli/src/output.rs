//! Output Formatting
//!
//! Utilities for formatting CLI output in various formats.

use chrono::{DateTime, Utc};
use rlm_core::{
    ArchiveRequest, EvidenceRecord, GuardVerdict, HoldOutcome, LegalHold, LegalHoldStats,
    ManagerConfig, RetentionAssignment, RetentionPolicy, SideEffectReport, TickReport,
};
use serde::Serialize;

use crate::commands::OutputFormat;

/// Format and print data based on output format
pub fn print_output<T: Serialize>(data: &T, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(data),
        OutputFormat::Table | OutputFormat::Plain => print_json(data),
    }
}

/// Print as JSON
fn print_json<T: Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error formatting JSON: {}", e),
    }
}

fn date(value: &DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}

fn optional_date(value: &Option<DateTime<Utc>>) -> String {
    value.as_ref().map(date).unwrap_or_else(|| "-".to_string())
}

fn join<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    let joined = items
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined
    }
}

/// Policy descriptor from a deletion check: a bare name, or a policy object
fn policy_label(policy: &serde_json::Value) -> String {
    match policy {
        serde_json::Value::String(name) => name.clone(),
        other => other
            .get("name")
            .or_else(|| other.get("id"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| other.to_string()),
    }
}

/// Print a single policy
pub fn print_policy(policy: &RetentionPolicy, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(policy),
        OutputFormat::Table | OutputFormat::Plain => {
            println!("Retention Policy");
            println!("================");
            print_row("ID:", &policy.id);
            print_row("Name:", &policy.name);
            print_row("Retention:", &format!("{} days", policy.retention_days));
            print_row("Evidence Types:", &join(&policy.evidence_types));
            print_row("Jurisdiction:", &policy.jurisdiction);
            print_row("Legal Basis:", &policy.legal_basis);
            print_row("Auto Archive:", &policy.auto_archive.to_string());
            print_row("Active:", &policy.is_active.to_string());
            print_row("Created:", &format!("{} by {}", date(&policy.created_at), policy.created_by));
            if let (Some(at), Some(by)) = (&policy.updated_at, &policy.updated_by) {
                print_row("Updated:", &format!("{} by {}", date(at), by));
            }
        }
    }
}

/// Print a list of policies
pub fn print_policies(policies: &[RetentionPolicy], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&policies),
        OutputFormat::Plain => {
            for policy in policies {
                println!("{}\t{}\t{}", policy.id, policy.retention_days, policy.name);
            }
        }
        OutputFormat::Table => {
            println!("{:<18} {:>6} {:<8} {:<7} {}", "ID", "DAYS", "ARCHIVE", "ACTIVE", "NAME");
            print_separator();
            for policy in policies {
                println!(
                    "{:<18} {:>6} {:<8} {:<7} {}",
                    policy.id, policy.retention_days, policy.auto_archive, policy.is_active, policy.name
                );
            }
            println!("{} policies", policies.len());
        }
    }
}

/// Print a single hold
pub fn print_hold(hold: &LegalHold, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(hold),
        OutputFormat::Table | OutputFormat::Plain => {
            println!("Legal Hold");
            println!("==========");
            print_row("ID:", &hold.id);
            print_row("Case:", &hold.case_id);
            print_row("Status:", if hold.is_active { "ACTIVE" } else { "RELEASED" });
            print_row("Reason:", &hold.reason);
            print_row("Legal Basis:", &hold.legal_basis);
            if let Some(order) = &hold.court_order {
                print_row("Court Order:", order);
            }
            print_row("Evidence:", &join(&hold.evidence_ids));
            print_row("Start:", &date(&hold.start_date));
            print_row("End:", &optional_date(&hold.end_date));
            print_row("Stakeholders:", &join(&hold.notifications.stakeholders));
            print_row("Reminders:", &hold.notifications.frequency.to_string());
            if let Some(reason) = &hold.release_reason {
                print_row("Release Reason:", reason);
            }
        }
    }
}

/// Print a list of holds
pub fn print_holds(holds: &[LegalHold], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&holds),
        OutputFormat::Plain => {
            for hold in holds {
                println!("{}\t{}\t{}", hold.id, hold.case_id, hold.is_active);
            }
        }
        OutputFormat::Table => {
            println!("{:<18} {:<16} {:<9} {:>8} {}", "ID", "CASE", "STATUS", "EVIDENCE", "REASON");
            print_separator();
            for hold in holds {
                println!(
                    "{:<18} {:<16} {:<9} {:>8} {}",
                    hold.id,
                    hold.case_id,
                    if hold.is_active { "active" } else { "released" },
                    hold.evidence_count(),
                    hold.reason
                );
            }
            println!("{} holds", holds.len());
        }
    }
}

fn print_side_effects(effects: &SideEffectReport) {
    for error in &effects.evidence_sync_errors {
        print_warning(&format!("evidence sync failed: {}", error));
    }
    if effects.notification.is_failed() {
        print_warning(&format!("notification failed: {:?}", effects.notification));
    }
    if !effects.audit_recorded {
        print_warning("admin action was not recorded in the audit log");
    }
}

/// Print a hold mutation outcome; side-effect failures go to stderr
pub fn print_hold_outcome(outcome: &HoldOutcome, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(outcome),
        OutputFormat::Table | OutputFormat::Plain => {
            print_hold(&outcome.hold, format);
            print_side_effects(&outcome.side_effects);
        }
    }
}

pub fn print_hold_stats(stats: &LegalHoldStats, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(stats),
        OutputFormat::Table | OutputFormat::Plain => {
            println!("Legal Hold Statistics");
            println!("=====================");
            print_row("Total Holds:", &stats.total_holds.to_string());
            print_row("Active Holds:", &stats.active_holds.to_string());
            print_row("Released Holds:", &stats.released_holds.to_string());
            print_row("Evidence Under Hold:", &stats.evidence_under_hold.to_string());
        }
    }
}

pub fn print_assignment(assignment: &RetentionAssignment, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(assignment),
        OutputFormat::Table | OutputFormat::Plain => {
            print_row("Policy:", &assignment.policy_id);
            print_row("Evidence:", &join(&assignment.evidence_ids));
            print_row("Expires:", &date(&assignment.expiry_date));
        }
    }
}

pub fn print_archive(request: &ArchiveRequest, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(request),
        OutputFormat::Table | OutputFormat::Plain => {
            print_row("Archived:", &join(&request.evidence_ids));
            print_row("Location:", &request.archive_location);
            print_row("Date:", &date(&request.archive_date));
        }
    }
}

/// Print a guard verdict for one evidence item
pub fn print_verdict(evidence_id: &str, verdict: &GuardVerdict, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "evidenceId": evidence_id,
            "permitted": verdict.is_permitted(),
            "detail": verdict,
        })),
        OutputFormat::Table | OutputFormat::Plain => {
            print_row("Evidence:", evidence_id);
            print_row(
                "Permitted:",
                if verdict.is_permitted() { "YES" } else { "NO" },
            );
            if let Some(reason) = verdict.reason() {
                print_row("Reason:", &reason);
            }
            match verdict {
                GuardVerdict::BlockedByLegalHold { hold_id: Some(id), .. } => {
                    print_row("Legal Hold:", id);
                }
                GuardVerdict::BlockedByRetention { policy: Some(policy), .. } => {
                    print_row("Policy:", &policy_label(policy));
                }
                _ => {}
            }
        }
    }
}

pub fn print_evidence(records: &[EvidenceRecord], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&records),
        OutputFormat::Plain => {
            for record in records {
                println!("{}\t{}", record.id, optional_date(&record.expiry_date));
            }
        }
        OutputFormat::Table => {
            println!("{:<18} {:<17} {:<18} {}", "ID", "EXPIRES", "POLICY", "TITLE");
            print_separator();
            for record in records {
                println!(
                    "{:<18} {:<17} {:<18} {}",
                    record.id,
                    optional_date(&record.expiry_date),
                    record.retention_policy_id.as_deref().unwrap_or("-"),
                    record.title.as_deref().unwrap_or("")
                );
            }
            println!("{} items", records.len());
        }
    }
}

pub fn print_tick_report(report: &TickReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Table | OutputFormat::Plain => {
            println!("Retention Tick");
            println!("==============");
            print_row("Started:", &date(&report.started_at));
            print_row("Expiring:", &report.expiring.to_string());
            print_row("Warnings:", &format!("{:?}", report.notification));
            print_row("Archived:", &join(&report.archived));
            for error in &report.errors {
                print_warning(error);
            }
        }
    }
}

pub fn print_config(config: &ManagerConfig, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(config),
        OutputFormat::Table | OutputFormat::Plain => {
            print_row("API URL:", &config.api_url);
            print_row("Timeout:", &format!("{}s", config.request_timeout_secs));
            print_row("Tick Interval:", &format!("{}s", config.scheduler.interval_secs));
            print_row("Warning Window:", &format!("{} days", config.scheduler.warning_days));
            print_row("Archive Location:", &config.scheduler.archive_location);
            print_row("Scheduler:", if config.scheduler.enabled { "enabled" } else { "disabled" });
        }
    }
}

/// Print success message
pub fn print_success(message: &str) {
    println!("{}", message);
}

/// Print warning message
pub fn print_warning(message: &str) {
    eprintln!("Warning: {}", message);
}

/// Print a table row
pub fn print_row(key: &str, value: &str) {
    println!("{:<20} {}", key, value);
}

/// Print a separator line
pub fn print_separator() {
    println!("{}", "-".repeat(72));
}
