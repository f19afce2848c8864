// ABOUTME: Reads phone numbers from stdin and prints each with its line type.
// ABOUTME: Paces lookups at one batch per second using PHONE_VALIDATOR_* settings.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use realnex::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    realnex_cli::init();

    let config = ValidatorConfig::from_env().context("loading validator configuration")?;

    let phones: Vec<String> = std::io::stdin()
        .lock()
        .lines()
        .map(|line| line.map(|l| l.trim().to_string()))
        .filter(|line| !matches!(line, Ok(l) if l.is_empty()))
        .collect::<Result<_, _>>()?;

    let client = PhoneValidatorClient::new(&config)?;
    let validator = BatchValidator::from_config(client, &config);
    let results = validator.validate(&phones).await;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for (phone, line_type) in phones.iter().zip(&results) {
        writeln!(out, "{}\t{}", phone, line_type)?;
    }
    out.flush()?;
    Ok(())
}
