use std::path::PathBuf;

use clap::{Parser, Subcommand};

use license_resolvr::expression::Strictness;

#[derive(Parser, Debug)]
#[command(
    name = "license-resolvr",
    about = "Resolve per-package license and copyright evidence into one license picture",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file [default: ./.license-resolvr/config.toml, fallback ~/.config/license-resolvr/config.toml]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print summary line
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve the licenses of every package in an evidence file
    Resolve {
        /// Evidence file (JSON)
        evidence: PathBuf,

        /// Only resolve these packages (`type:namespace:name:version`, repeatable)
        #[arg(long = "package", value_name = "ID")]
        packages: Vec<String>,

        /// Report format
        #[arg(long, default_value = "terminal", value_name = "FORMAT")]
        report: ReportFormat,

        /// Keep deprecated license ids instead of mapping them to current ones
        #[arg(long)]
        keep_deprecated: bool,
    },

    /// Parse a license expression and show its normalized form and terms
    Expr {
        /// The expression, e.g. "MIT OR Apache-2.0"
        expression: String,

        /// Validation strictness [default: from config]
        #[arg(long, value_name = "LEVEL")]
        strictness: Option<StrictnessArg>,

        /// Keep deprecated license ids instead of mapping them to current ones
        #[arg(long)]
        keep_deprecated: bool,
    },

    /// List project scopes and their transitive dependencies
    Deps {
        /// Evidence file (JSON) with `projects` or `graph`
        evidence: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StrictnessArg {
    Any,
    Deprecated,
    Current,
}

impl From<StrictnessArg> for Strictness {
    fn from(arg: StrictnessArg) -> Self {
        match arg {
            StrictnessArg::Any => Strictness::AllowAny,
            StrictnessArg::Deprecated => Strictness::AllowDeprecated,
            StrictnessArg::Current => Strictness::AllowCurrent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_args() {
        let cli = Cli::parse_from([
            "license-resolvr",
            "-vv",
            "resolve",
            "evidence.json",
            "--package",
            "NPM::left-pad:1.3.0",
            "--report",
            "json",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Resolve {
                evidence,
                packages,
                report,
                keep_deprecated,
            } => {
                assert_eq!(evidence, PathBuf::from("evidence.json"));
                assert_eq!(packages, vec!["NPM::left-pad:1.3.0"]);
                assert_eq!(report, ReportFormat::Json);
                assert!(!keep_deprecated);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_expr_strictness() {
        let cli = Cli::parse_from([
            "license-resolvr",
            "expr",
            "GPL-2.0+",
            "--strictness",
            "current",
        ]);
        match cli.command {
            Command::Expr { strictness, .. } => {
                assert_eq!(strictness.map(Strictness::from), Some(Strictness::AllowCurrent));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["license-resolvr", "deps", "e.json", "--quiet", "-v"]);
        assert!(cli.quiet);
        assert_eq!(cli.verbose, 1);
    }
}
