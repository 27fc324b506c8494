// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! generate-testrail-swagger - Swagger 2.0 document for a TestRail instance
//!
//! Reads the instance's custom case and result field configuration and
//! prints a stamped Swagger document to stdout. Logs go to stderr.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use testrail_swagger::config::{API_KEY_ENV, DEFAULT_TIMEOUT_SECS, USER_ENV};
use testrail_swagger::stamp::{self, DigestAlgorithm, Stamp};
use testrail_swagger::{Credentials, GeneratorConfig, generate};
use tracing::{debug, info};

const DEFAULT_LOG_FILTER: &str = "testrail_swagger=info,testrail_client=info";

#[derive(Parser)]
#[command(
    name = "generate-testrail-swagger",
    version,
    about = "Generate a Swagger 2.0 document for a TestRail instance",
    long_about = "Generate a Swagger 2.0 document for a TestRail instance, including the \
                  instance's custom case and result fields. The document is written to stdout, \
                  preceded by its generation date and checksum.",
    after_help = concat!(
        "Example:\n",
        "  generate-testrail-swagger https://example.testrail.net/index.php?/api/v2 > testrail.yaml\n",
        "\n",
        "Environment variables:\n",
        "  TESTRAIL_API_USER       Username of an account on the instance\n",
        "  TESTRAIL_API_KEY        API key (or password) for that account\n",
        "  TESTRAIL_TIMEOUT_SECS   Per-request timeout in seconds\n",
        "  RUST_LOG                Log filter (default: testrail_swagger=info,testrail_client=info)",
    )
)]
struct Cli {
    /// TestRail API root, e.g. https://example.testrail.net/index.php?/api/v2
    #[arg(
        value_name = "BASE_URL",
        required_unless_present = "verify",
        conflicts_with = "verify"
    )]
    base_url: Option<String>,

    /// Digest used for the checksum line
    #[arg(long, value_enum, default_value_t = DigestArg::Sha256)]
    digest: DigestArg,

    /// Per-request timeout in seconds
    #[arg(
        long,
        env = "TESTRAIL_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: u64,

    /// Check the checksum of a previously generated file instead of generating
    #[arg(long, value_name = "FILE")]
    verify: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DigestArg {
    Sha256,
    /// Matches checksums written by the earlier Ruby generator
    Sha1,
}

impl From<DigestArg> for DigestAlgorithm {
    fn from(arg: DigestArg) -> Self {
        match arg {
            DigestArg::Sha256 => DigestAlgorithm::Sha256,
            DigestArg::Sha1 => DigestAlgorithm::Sha1,
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "testrail_swagger=debug,testrail_client=debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string())
    };

    // stdout carries the document
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();
}

fn verify_file(path: &Path) -> Result<ExitCode> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let verification = stamp::verify(&text)
        .with_context(|| format!("{} has no valid checksum header", path.display()))?;

    if verification.is_match() {
        println!(
            "{}: OK ({}:{})",
            path.display(),
            verification.algorithm,
            verification.computed
        );
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!(
            "{}: checksum mismatch\n  recorded {}:{}\n  computed {}:{}",
            path.display(),
            verification.algorithm,
            verification.recorded,
            verification.algorithm,
            verification.computed
        );
        Ok(ExitCode::FAILURE)
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    if let Some(path) = &cli.verify {
        return verify_file(path);
    }

    let base_url = cli
        .base_url
        .context("BASE_URL is required unless --verify is given")?;

    let config = GeneratorConfig::new(
        base_url,
        Credentials::from_env(),
        Duration::from_secs(cli.timeout),
    )
    .context("Invalid base URL")?;
    debug!(?config, "loaded configuration");

    let client = config
        .client()
        .context("Failed to create TestRail client")?;

    info!(base_url = %config.base_url, "generating swagger document");
    let document = generate(&client, &config.coordinates)
        .await
        .with_context(|| {
            format!(
                "Failed to generate swagger document from {}\n\nCheck the URL and that {} and {} are set.",
                config.base_url, USER_ENV, API_KEY_ENV
            )
        })?;

    let stamp = Stamp::new(
        &document,
        cli.digest.into(),
        chrono::Local::now().date_naive(),
    );
    info!(algorithm = %stamp.algorithm(), digest = stamp.digest(), "stamped document");

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(stamp.apply(&document).as_bytes())
        .context("Failed to write document")?;
    stdout.flush().context("Failed to write document")?;

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli).await
}
