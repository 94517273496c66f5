//! Association lifecycle subcommands.

use crate::config;
use anyhow::{Context, Result, bail};
use colored::Colorize;
use ssmkit::{Association, AssociationStatus, Client};
use std::path::Path;
use std::time::Duration;

pub async fn create(client: &Client, file: &Path, wait: Option<u64>, json: bool) -> Result<()> {
    let mut definition = config::load_association(file)?;
    if let Some(seconds) = wait {
        definition.wait_for_success_timeout_seconds = Some(seconds);
    }

    let association = client
        .create(&definition)
        .await
        .with_context(|| format!("creating association for document {}", definition.name))?;

    if !json {
        println!(
            "{} association {}",
            "Created".green().bold(),
            association.association_id
        );
    }
    print_association(&association, json)
}

pub async fn show(client: &Client, association_id: &str, json: bool) -> Result<()> {
    let Some(association) = client
        .read(association_id)
        .await
        .with_context(|| format!("reading association {association_id}"))?
    else {
        bail!("association {association_id} not found");
    };

    print_association(&association, json)
}

pub async fn update(client: &Client, association_id: &str, file: &Path, json: bool) -> Result<()> {
    let definition = config::load_association(file)?;

    let association = client
        .update(association_id, &definition)
        .await
        .with_context(|| format!("updating association {association_id}"))?;

    if !json {
        println!(
            "{} association {} (version {})",
            "Updated".green().bold(),
            association.association_id,
            association.association_version.as_deref().unwrap_or("?")
        );
    }
    print_association(&association, json)
}

pub async fn delete(client: &Client, association_id: &str) -> Result<()> {
    client
        .delete(association_id)
        .await
        .with_context(|| format!("deleting association {association_id}"))?;

    println!("{} association {}", "Deleted".green().bold(), association_id);
    Ok(())
}

pub async fn wait(client: &Client, association_id: &str, timeout: u64, json: bool) -> Result<()> {
    let waited = client
        .wait_for_success(association_id, Duration::from_secs(timeout))
        .await
        .with_context(|| format!("waiting for association {association_id}"))?;

    match waited {
        Some(association) => print_association(&association, json),
        None => {
            println!("timeout is zero, nothing to wait for");
            Ok(())
        }
    }
}

fn print_association(association: &Association, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(association)?);
        return Ok(());
    }

    println!("  id:        {}", association.association_id);
    if let Some(arn) = &association.arn {
        println!("  arn:       {arn}");
    }
    if let Some(name) = &association.name {
        println!("  document:  {name}");
    }
    if let Some(name) = &association.association_name {
        println!("  name:      {name}");
    }
    if let Some(version) = &association.association_version {
        println!("  version:   {version}");
    }
    if let Some(schedule) = &association.schedule_expression {
        println!("  schedule:  {schedule}");
    }
    if !association.targets.is_empty() {
        let summary: Vec<String> = association
            .targets
            .iter()
            .map(|t| format!("{} ({} values)", t.key, t.values.len()))
            .collect();
        println!("  targets:   {}", summary.join(", "));
    }
    if let Some(location) = &association.output_location {
        println!(
            "  output:    s3://{}/{}",
            location.s3_bucket_name,
            location.s3_key_prefix.as_deref().unwrap_or("")
        );
    }
    println!("  status:    {}", format_status(association.status));
    Ok(())
}

fn format_status(status: Option<AssociationStatus>) -> String {
    match status {
        Some(AssociationStatus::Success) => "Success".green().to_string(),
        Some(AssociationStatus::Pending) => "Pending".yellow().to_string(),
        Some(AssociationStatus::Failed) => "Failed".red().to_string(),
        None => "unknown".dimmed().to_string(),
    }
}
