//! Key commands - each runs against a seeded key manager and writes to `out`

use std::io::Write;

use anyhow::bail;

use crate::infrastructure::api_key::KeyManager;

/// Print every registered key, one per line
pub async fn list(manager: &KeyManager, out: &mut impl Write) -> anyhow::Result<()> {
    let entries = manager.list_all().await?;

    if entries.is_empty() {
        writeln!(out, "No API keys registered")?;
        return Ok(());
    }

    for (name, entry) in entries {
        let models = if entry.allowed_models().is_empty() {
            "-".to_string()
        } else {
            entry.allowed_models().join(",")
        };

        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            name,
            entry.masked_secret(),
            if entry.is_active() { "active" } else { "inactive" },
            models,
            entry.description().unwrap_or("")
        )?;
    }

    Ok(())
}

/// Print the access decision; fails when access is denied
pub async fn check(
    manager: &KeyManager,
    secret: &str,
    model: &str,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let decision = manager.check_access(secret, model).await?;

    if json {
        writeln!(out, "{}", serde_json::to_string(&decision)?)?;
    } else {
        writeln!(out, "{}", decision)?;
    }

    if !decision.is_allowed() {
        bail!("access to model '{}' denied", model);
    }

    Ok(())
}

/// Issue a key and print the new secret
pub async fn issue(
    manager: &KeyManager,
    name: &str,
    description: Option<String>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let secret = match description {
        Some(description) => manager.issue_key_with_description(name, description).await?,
        None => manager.issue_key(name).await?,
    };

    writeln!(out, "{}", secret)?;
    Ok(())
}

/// Print the secret registered under `name`, or the placeholder
pub async fn current(manager: &KeyManager, name: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let secret = manager.current_key_for(name).await?;
    writeln!(out, "{}", secret)?;
    Ok(())
}
