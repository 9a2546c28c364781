//! Command implementations

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use tracing::error;

use fwsync_core::{Scheduler, SyncConfig, SyncService, canonical_ip};

use crate::error::{CliError, Result};

fn load_service(config_path: &Path) -> Result<SyncService> {
    let config = SyncConfig::load(config_path)?;
    Ok(SyncService::from_config(config)?)
}

/// Write the configuration template
pub fn run_init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        return Err(CliError::user(format!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        )));
    }

    std::fs::write(config_path, SyncConfig::template())?;
    println!(
        "{} Wrote configuration template to {}",
        "OK".green().bold(),
        config_path.display()
    );
    Ok(())
}

/// Validate the credential/zone pair
pub fn run_validate(config_path: &Path) -> Result<()> {
    let service = load_service(config_path)?;

    if service.validate() {
        println!("{} Credentials and zone are valid.", "OK".green().bold());
        Ok(())
    } else {
        Err(CliError::user(
            "Failed to validate credentials against the remote API",
        ))
    }
}

/// Run one sync pass
pub fn run_sync(config_path: &Path, json: bool) -> Result<()> {
    let service = load_service(config_path)?;
    let outcome = service.run_sync()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    if !outcome.started {
        return Err(CliError::user(
            "Sync pass declined (already running, or block source unavailable)",
        ));
    }

    println!(
        "{} Sync pass complete: {} synced, {} failed, {} skipped",
        "OK".green().bold(),
        outcome.synced.len(),
        outcome.failed.len(),
        outcome.skipped
    );
    for ip in &outcome.failed {
        println!("   {} {}", "FAILED".red().bold(), ip);
    }
    Ok(())
}

/// Run one cleanup sweep
pub fn run_cleanup(config_path: &Path, json: bool) -> Result<()> {
    let service = load_service(config_path)?;
    let outcome = service.run_cleanup()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!(
        "{} Cleanup sweep complete: {} deleted, {} retained for retry",
        "OK".green().bold(),
        outcome.deleted.len(),
        outcome.failed.len()
    );
    Ok(())
}

/// Report drift between the ledger and the remote store
pub fn run_reconcile(config_path: &Path, json: bool) -> Result<()> {
    let service = load_service(config_path)?;
    let report = service.reconcile()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.is_clean() {
        println!("{} Ledger and remote store agree.", "OK".green().bold());
        return Ok(());
    }

    if !report.missing_in_remote.is_empty() {
        println!(
            "{} In the ledger but not blocked remotely:",
            "MISSING".yellow().bold()
        );
        for ip in &report.missing_in_remote {
            println!("   {ip}");
        }
    }
    if !report.orphaned_in_remote.is_empty() {
        println!(
            "{} Blocked remotely with no ledger record:",
            "ORPHANED".yellow().bold()
        );
        for ip in &report.orphaned_in_remote {
            println!("   {ip}");
        }
    }
    Ok(())
}

/// Show ledger size and last sync time
pub fn run_status(config_path: &Path) -> Result<()> {
    let service = load_service(config_path)?;
    let ledger = service.open_ledger()?;

    println!("{} firewall-sync status", "=>".blue().bold());
    println!("   Synced blocks: {}", ledger.count()?);
    match ledger.last_sync()? {
        Some(at) => println!("   Last sync:     {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("   Last sync:     never"),
    }
    println!(
        "   Interval:      every {} minutes",
        service.config().sync.interval_minutes.minutes()
    );
    Ok(())
}

/// Show the block log, newest first
pub fn run_log(config_path: &Path, limit: u32, offset: u32) -> Result<()> {
    let service = load_service(config_path)?;
    let ledger = service.open_ledger()?;

    let records = ledger.recent(limit, offset)?;
    if records.is_empty() {
        println!("No blocks recorded.");
        return Ok(());
    }

    for record in records {
        let expiry = match record.expires_at {
            Some(at) => at.format("%Y-%m-%d %H:%M").to_string(),
            None => "permanent".to_string(),
        };
        println!(
            "{}  {:<40}  {}  (expires: {})",
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.ip,
            record.reason,
            expiry
        );
    }
    Ok(())
}

/// Block a single IP manually
pub fn run_block(config_path: &Path, ip: &str) -> Result<()> {
    let Some(ip) = canonical_ip(ip) else {
        return Err(CliError::user(format!("Not a valid IP address: {ip}")));
    };

    let service = load_service(config_path)?;
    let ledger = service.open_ledger()?;

    if ledger.contains(&ip)? {
        return Err(CliError::user(format!("{ip} is already synced")));
    }
    if !service.client().create_block(&ip) {
        return Err(CliError::user(format!("Remote create failed for {ip}")));
    }

    ledger.insert(&ip, "manual", None)?;
    println!("{} Blocked {ip}", "OK".green().bold());
    Ok(())
}

/// Remove a single IP manually
pub fn run_unblock(config_path: &Path, ip: &str) -> Result<()> {
    let Some(ip) = canonical_ip(ip) else {
        return Err(CliError::user(format!("Not a valid IP address: {ip}")));
    };

    let service = load_service(config_path)?;
    let ledger = service.open_ledger()?;

    if !service.client().delete_block(&ip) {
        return Err(CliError::user(format!(
            "Remote delete failed for {ip} (no matching rule, or network error)"
        )));
    }

    ledger.remove(&ip)?;
    println!("{} Unblocked {ip}", "OK".green().bold());
    Ok(())
}

/// Run the periodic jobs in the foreground
pub fn run_scheduler(config_path: &Path) -> Result<()> {
    let service = Arc::new(load_service(config_path)?);
    let interval = service.config().sync.interval_minutes.as_duration();

    let mut scheduler = Scheduler::new();

    let sync_service = Arc::clone(&service);
    scheduler.register("sync", interval, move || {
        if let Err(e) = sync_service.run_sync() {
            error!(error = %e, "sync pass failed");
        }
    });

    let cleanup_service = Arc::clone(&service);
    scheduler.register("cleanup", interval, move || {
        if let Err(e) = cleanup_service.run_cleanup() {
            error!(error = %e, "cleanup sweep failed");
        }
    });

    println!(
        "{} Scheduling sync and cleanup every {} minutes (Ctrl-C to stop)",
        "=>".blue().bold(),
        service.config().sync.interval_minutes.minutes()
    );
    scheduler.run();
    Ok(())
}
