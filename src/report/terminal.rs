use std::collections::HashMap;

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use super::{PackageReport, Report};
use crate::graph::{DependencyNavigator, ScopeRef};
use crate::models::{Identifier, LicenseSource, Severity};
use crate::resolver::ResolvedLicense;

/// Copyright statements listed per license unless `--verbose` is given.
const COPYRIGHT_PREVIEW: usize = 3;

/// Render resolved packages as a colored terminal report.
pub fn render(report: &Report<'_>, verbose: bool, quiet: bool) -> Result<()> {
    let packages = report.packages.len();
    let licenses: usize = report
        .packages
        .iter()
        .map(|p| p.resolved.licenses.len())
        .sum();
    let unmatched: usize = report
        .packages
        .iter()
        .flat_map(|p| p.resolved.unmatched_copyrights.values())
        .map(|c| c.len())
        .sum();
    let issues: usize = report.packages.iter().map(|p| p.issues.len()).sum();
    let failures = report.failures.len();

    if quiet {
        println!(
            "Packages: {}  Licenses: {}  Issues: {}  Failed: {}",
            packages,
            licenses,
            issues.to_string().yellow(),
            failures.to_string().red(),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}\n",
        "license-resolvr".bold(),
        env!("CARGO_PKG_VERSION")
    );

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Packages resolved   : {}", packages));
    println!(
        " │  {:<48} │",
        format!("Licenses            : {:>4}  {}", licenses, summarize_licenses(report))
    );
    println!(
        " │  {:<48} │",
        format!("Unmatched copyrights: {:>4}", unmatched)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Issues           : {:>4}", "⚠".yellow(), issues)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Failed           : {:>4}", "✗".red(), failures)
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if packages > 0 {
        render_licenses(&report.packages, verbose);
        println!();
    }

    if issues > 0 {
        println!(" {} Evidence issues:\n", "[WARN]".yellow().bold());
        for package in report.packages.iter().filter(|p| !p.issues.is_empty()) {
            for issue in package.issues {
                let severity = match issue.severity {
                    Severity::Error => issue.severity.to_string().red(),
                    Severity::Warning => issue.severity.to_string().yellow(),
                    Severity::Hint => issue.severity.to_string().dimmed(),
                };
                println!("   {} {}: {}", severity, package.resolved.id, issue.message);
            }
        }
        println!();
    }

    if failures > 0 {
        println!(" {} Packages that could not be resolved:\n", "[ERROR]".red().bold());
        for failure in &report.failures {
            println!("   {} {}", failure.id.to_string().red(), failure.error);
        }
        println!();
    }

    Ok(())
}

fn render_licenses(packages: &[PackageReport<'_>], verbose: bool) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Package").add_attribute(Attribute::Bold),
            Cell::new("License").add_attribute(Attribute::Bold),
            Cell::new("Sources").add_attribute(Attribute::Bold),
            Cell::new("Locations").add_attribute(Attribute::Bold),
            Cell::new("Copyrights").add_attribute(Attribute::Bold),
        ]);

    for package in packages {
        if package.resolved.licenses.is_empty() {
            table.add_row(vec![
                Cell::new(package.resolved.id.to_string()),
                Cell::new("none").fg(Color::DarkGrey),
                Cell::new(""),
                Cell::new(""),
                Cell::new(""),
            ]);
            continue;
        }

        for (index, license) in package.resolved.licenses.iter().enumerate() {
            let id = if index == 0 {
                package.resolved.id.to_string()
            } else {
                String::new()
            };
            table.add_row(vec![
                Cell::new(id),
                Cell::new(license.license.to_string()).fg(license_color(license)),
                Cell::new(sources(license)),
                Cell::new(locations(license, verbose)).set_alignment(if verbose {
                    CellAlignment::Left
                } else {
                    CellAlignment::Right
                }),
                Cell::new(copyrights(license, verbose)),
            ]);
        }
    }

    println!("{}", table);
}

/// Concluded licenses override everything else, so they stand out.
fn license_color(license: &ResolvedLicense) -> Color {
    if license.sources.contains(&LicenseSource::Concluded) {
        Color::Green
    } else if license.sources.contains(&LicenseSource::Declared) {
        Color::Cyan
    } else {
        Color::Yellow
    }
}

fn sources(license: &ResolvedLicense) -> String {
    license
        .sources
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn locations(license: &ResolvedLicense, verbose: bool) -> String {
    if !verbose {
        return license.locations.len().to_string();
    }
    license
        .locations
        .iter()
        .map(|l| format!("{}:{}-{}", l.path, l.start_line, l.end_line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn copyrights(license: &ResolvedLicense, verbose: bool) -> String {
    let statements = license.copyrights();
    let shown: Vec<&str> = if verbose {
        statements.iter().copied().collect()
    } else {
        statements.iter().take(COPYRIGHT_PREVIEW).copied().collect()
    };
    let mut text = shown.join("\n");
    if shown.len() < statements.len() {
        text.push_str(&format!("\n… {} more", statements.len() - shown.len()));
    }
    text
}

fn summarize_licenses(report: &Report<'_>) -> String {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for package in &report.packages {
        for license in &package.resolved.licenses {
            *counts.entry(license.license.to_string()).or_insert(0) += 1;
        }
    }

    let mut pairs: Vec<(String, usize)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let summary: Vec<String> = pairs
        .iter()
        .take(3)
        .map(|(license, count)| format!("{} ({})", license, count))
        .collect();

    if summary.is_empty() {
        String::new()
    } else {
        format!("[{}]", summary.join(", "))
    }
}

/// Render the scopes and transitive dependencies of `projects`.
pub fn render_dependencies(
    navigator: &dyn DependencyNavigator,
    projects: &[Identifier],
    quiet: bool,
) -> Result<()> {
    let scopes: Vec<ScopeRef> = projects
        .iter()
        .flat_map(|project| navigator.scopes_of(project))
        .collect();

    if quiet {
        let total: usize = projects
            .iter()
            .map(|p| navigator.all_dependencies_of(p).len())
            .sum();
        println!(
            "Projects: {}  Scopes: {}  Dependencies: {}",
            projects.len(),
            scopes.len(),
            total
        );
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Project").add_attribute(Attribute::Bold),
            Cell::new("Scope").add_attribute(Attribute::Bold),
            Cell::new("Dependency").add_attribute(Attribute::Bold),
            Cell::new("Issues").add_attribute(Attribute::Bold),
        ]);

    for scope in &scopes {
        for (index, dependency) in navigator.dependencies_of(scope).iter().enumerate() {
            let (project, name) = if index == 0 {
                (scope.project.to_string(), scope.name.clone())
            } else {
                (String::new(), String::new())
            };
            let issues = navigator.issues_of(dependency);
            let issues_cell = if issues.is_empty() {
                Cell::new("")
            } else {
                Cell::new(
                    issues
                        .iter()
                        .map(|i| i.to_string())
                        .collect::<Vec<_>>()
                        .join("\n"),
                )
                .fg(Color::Red)
            };
            table.add_row(vec![
                Cell::new(project),
                Cell::new(name),
                Cell::new(dependency.to_string()),
                issues_cell,
            ]);
        }
    }

    println!("{}", table);
    Ok(())
}
