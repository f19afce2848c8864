// ABOUTME: Pulls every CRM contact and writes them to stdout as JSON lines.
// ABOUTME: Credentials come from REALNEX_* environment variables or .env.

use std::io::Write;

use anyhow::{Context, Result};
use realnex::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    realnex_cli::init();

    let config = CrmConfig::from_env().context("loading CRM configuration")?;
    let client = CrmClient::new(&config)?;

    let Some(contacts) = client.fetch_contacts().await? else {
        tracing::warn!("no contacts returned");
        return Ok(());
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for contact in &contacts {
        serde_json::to_writer(&mut out, contact)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    tracing::info!(count = contacts.len(), "contacts written");
    Ok(())
}
