//! `license-resolvr`: resolve license evidence files into per-package license reports.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config ([`load_config`]).
//! 3. Load the evidence file ([`FileProvider`]).
//! 4. Resolve every requested package in parallel ([`LicenseInfoResolver`]).
//! 5. Render the requested report ([`report`]).
//! 6. Exit `0` (clean) or `1` (at least one package failed to resolve).

mod cli;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, ReportFormat, StrictnessArg};
use license_resolvr::config::{load_config, Config};
use license_resolvr::evidence::{FileProvider, LoadOptions};
use license_resolvr::expression::{SpdxExpression, Strictness};
use license_resolvr::models::Identifier;
use license_resolvr::report::{self, Failure, PackageReport, Report};
use license_resolvr::resolver::LicenseInfoResolver;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = load_config(&base_dir, cli.config.as_deref())?;

    match cli.command {
        Command::Resolve {
            evidence,
            packages,
            report,
            keep_deprecated,
        } => {
            let mut options = LoadOptions::from(&config);
            if keep_deprecated {
                options.map_deprecated = false;
            }
            let succeeded = run_resolve(
                &evidence,
                &packages,
                &options,
                report,
                cli.verbose > 0,
                cli.quiet,
            )?;
            if !succeeded {
                std::process::exit(1);
            }
        }
        Command::Expr {
            expression,
            strictness,
            keep_deprecated,
        } => run_expr(&expression, strictness, keep_deprecated, &config, cli.quiet)?,
        Command::Deps { evidence } => {
            let provider = FileProvider::load(&evidence, &LoadOptions::from(&config))?;
            let navigator = provider.navigator();
            report::terminal::render_dependencies(
                navigator.as_ref(),
                &provider.project_ids(),
                cli.quiet,
            )?;
        }
    }

    Ok(())
}

/// Resolve and report; returns `false` when any package failed.
fn run_resolve(
    evidence: &Path,
    packages: &[String],
    options: &LoadOptions,
    format: ReportFormat,
    verbose: bool,
    quiet: bool,
) -> Result<bool> {
    let provider = FileProvider::load(evidence, options)?;

    let ids: Vec<Identifier> = if packages.is_empty() {
        provider.package_ids()
    } else {
        packages
            .iter()
            .map(|p| {
                p.parse()
                    .with_context(|| format!("invalid package id '{}'", p))
            })
            .collect::<Result<_>>()?
    };

    if !quiet && format == ReportFormat::Terminal {
        eprintln!(
            "  {} {} packages from {}",
            "→".cyan(),
            ids.len(),
            evidence.display()
        );
    }

    let resolver = LicenseInfoResolver::new(provider);

    let pb = if !quiet && format == ReportFormat::Terminal {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
        );
        pb.set_message("Resolving licenses");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let results = resolver.resolve_all(&ids);

    if let Some(pb) = pb {
        pb.finish_with_message(format!("Resolved {} packages", resolver.cached_len()));
    }

    let mut resolved = Vec::new();
    let mut failures = Vec::new();
    for (id, result) in results {
        match result {
            Ok(info) => resolved.push(info),
            Err(e) => failures.push(Failure {
                id,
                error: e.to_string(),
            }),
        }
    }

    let report = Report {
        packages: resolved
            .iter()
            .map(|info| PackageReport {
                resolved: info.as_ref(),
                issues: resolver.provider().issues_of(&info.id),
            })
            .collect(),
        failures,
    };

    match format {
        ReportFormat::Terminal => report::terminal::render(&report, verbose, quiet)?,
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(!report.has_failures())
}

fn run_expr(
    text: &str,
    strictness: Option<StrictnessArg>,
    keep_deprecated: bool,
    config: &Config,
    quiet: bool,
) -> Result<()> {
    let strictness = strictness
        .map(Strictness::from)
        .unwrap_or(config.expression.strictness);
    let map_deprecated = config.resolver.map_deprecated && !keep_deprecated;

    let expression = SpdxExpression::parse_with(text, strictness)?;
    let normalized = expression.normalize(map_deprecated);

    if quiet {
        println!("{}", normalized);
        return Ok(());
    }

    println!(" {:<11} {}", "Parsed".bold(), expression);
    println!(" {:<11} {}", "Normalized".bold(), normalized.to_string().green());
    println!(" {:<11} {}", "Strictness".bold(), strictness);
    println!(" {}", "Terms".bold());
    for term in normalized.decompose() {
        println!("   {} {}", "•".cyan(), term);
    }

    Ok(())
}
