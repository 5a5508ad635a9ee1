//! Inspect command handler

use super::utils::load_rules;
use crate::cli::InspectArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::{OutputWriter, TypeReport};
use tracing::{info, instrument, warn};

/// Handle the inspect command
#[instrument(skip_all, fields(files = args.rules.len()))]
pub fn handle_inspect(args: InspectArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::new("inspect_command");
    output.info(&format!("Inspecting {} rule file(s)", args.rules.len()))?;

    let rules = load_rules(&args.rules)?;
    let builder = config.type_builder(&args.build, None);
    let synthesis = {
        let _synthesis_timer = Timer::new("synthesis");
        builder.build_with_report(&rules)?
    };
    info!(
        fields = synthesis.config_type.fields().len(),
        warnings = synthesis.warnings.len(),
        "Rules synthesized"
    );

    for warning in &synthesis.warnings {
        warn!(%warning, "Rule warning");
        output.warning(&format!("⚠ {}", warning))?;
    }
    output.success(&format!(
        "✓ Synthesized '{}' with {} top-level field(s)",
        synthesis.config_type.name(),
        synthesis.config_type.fields().len()
    ))?;

    let report = TypeReport::new(&synthesis, args.show_order);
    output.type_report(&report, &synthesis.config_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{BuildArgs, OutputFormat, PolicyArg};
    use crate::error::Error;
    use std::fs;
    use tempfile::TempDir;

    fn sink() -> OutputWriter {
        OutputWriter::with_writer(OutputFormat::Json, false, false, Box::new(std::io::sink()))
    }

    #[test]
    fn test_inspect_merged_rules() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("base.yaml");
        let extra = dir.path().join("extra.yaml");
        fs::write(&base, "a:\n  b:\n    type: int\n").unwrap();
        fs::write(&extra, "a:\n  c:\n    type: str\n    default: x\n").unwrap();

        let args = InspectArgs {
            rules: vec![base, extra],
            show_order: true,
            build: BuildArgs::default(),
        };
        handle_inspect(args, &Config::default(), &mut sink()).unwrap();
    }

    #[test]
    fn test_deny_policy_fails_on_ambiguous_opts() {
        let dir = TempDir::new().unwrap();
        let rules = dir.path().join("rules.json");
        fs::write(&rules, r#"{"n": {"type": "int", "opts": 5}}"#).unwrap();

        let args = InspectArgs {
            rules: vec![rules.clone()],
            show_order: false,
            build: BuildArgs {
                opts_policy: Some(PolicyArg::Deny),
                confdir: None,
            },
        };
        let err = handle_inspect(args, &Config::default(), &mut sink()).unwrap_err();
        assert!(matches!(err, Error::Core(typedconfig_core::Error::AmbiguousOpts { .. })));

        let args = InspectArgs {
            rules: vec![rules],
            show_order: false,
            build: BuildArgs::default(),
        };
        assert!(handle_inspect(args, &Config::default(), &mut sink()).is_ok());
    }
}
