//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Args, Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::path::PathBuf;
use typedconfig_core::OptsPolicy;

/// TypedConfig CLI - typed configuration from declarative rule files
///
/// Synthesizes a configuration type from one or more rule files, then
/// inspects that type or validates configuration files against it.
#[derive(Parser, Debug)]
#[command(
    name = "typedconfig",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "TYPEDCONFIG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results [default: human]
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synthesize the configuration type of rule files and describe it
    Inspect(InspectArgs),

    /// Validate a configuration file against the type of rule files
    Validate(ValidateArgs),
}

/// Arguments for the inspect command
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Rule files (JSON or YAML), merged in order
    #[arg(value_name = "RULES", required = true, num_args = 1..)]
    pub rules: Vec<PathBuf>,

    /// Show the order in which nodes were resolved
    #[arg(long)]
    pub show_order: bool,

    #[command(flatten)]
    pub build: BuildArgs,
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Configuration file to validate (JSON or YAML)
    #[arg(value_name = "CONFIG")]
    pub config_file: PathBuf,

    /// Rule file (JSON or YAML); repeat to merge several, later files win
    #[arg(short, long = "rules", value_name = "RULES", required = true)]
    pub rules: Vec<PathBuf>,

    /// Write the validated configuration to this file (.yaml, .yml or .json)
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    #[command(flatten)]
    pub build: BuildArgs,
}

/// Synthesis settings shared by the commands
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// How to treat `opts` that are neither a sequence nor a mapping
    #[arg(long, value_enum)]
    pub opts_policy: Option<PolicyArg>,

    /// Directory that relative `ConfFilePath` values are resolved against
    #[arg(long, value_name = "DIR")]
    pub confdir: Option<PathBuf>,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Policy for ambiguous `opts`
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Ignore the value with a warning
    Warn,
    /// Fail the synthesis
    Deny,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl From<PolicyArg> for OptsPolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::Warn => OptsPolicy::Warn,
            PolicyArg::Deny => OptsPolicy::Deny,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli {
            verbose: 2,
            quiet: false,
            config: None,
            output: None,
            no_color: false,
            command: Commands::Inspect(InspectArgs {
                rules: vec![PathBuf::from("rules.yaml")],
                show_order: false,
                build: BuildArgs::default(),
            }),
        };
        assert_eq!(cli.verbosity_level(), 2);

        let quiet_cli = Cli { quiet: true, ..cli };
        assert_eq!(quiet_cli.verbosity_level(), 0);
    }

    #[test]
    fn test_validate_parsing() {
        let cli = Cli::parse_from([
            "typedconfig",
            "-o",
            "json-pretty",
            "validate",
            "-r",
            "base.yaml",
            "-r",
            "extra.yaml",
            "config.yaml",
            "--export",
            "out.json",
            "--opts-policy",
            "deny",
        ]);
        assert_eq!(cli.output, Some(OutputFormat::JsonPretty));

        let Commands::Validate(args) = cli.command else {
            panic!("expected the validate command");
        };
        assert_eq!(args.rules, [PathBuf::from("base.yaml"), PathBuf::from("extra.yaml")]);
        assert_eq!(args.config_file, PathBuf::from("config.yaml"));
        assert_eq!(args.export, Some(PathBuf::from("out.json")));
        assert_eq!(args.build.opts_policy.map(OptsPolicy::from), Some(OptsPolicy::Deny));
    }

    #[test]
    fn test_inspect_requires_rules() {
        assert!(Cli::try_parse_from(["typedconfig", "inspect"]).is_err());

        let cli = Cli::try_parse_from(["typedconfig", "-vv", "inspect", "a.yaml", "b.json"]).unwrap();
        assert_eq!(cli.verbosity_level(), 2);
        let Commands::Inspect(args) = cli.command else {
            panic!("expected the inspect command");
        };
        assert_eq!(args.rules.len(), 2);
    }
}
