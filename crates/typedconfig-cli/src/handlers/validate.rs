//! Validation command handler

use super::utils::{load_rules, require_file};
use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use tracing::{debug, info, instrument, warn};

/// Handle the validate command
#[instrument(skip_all, fields(file = %args.config_file.display()))]
pub fn handle_validate(args: ValidateArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("validate_command", &format!("file: {}", args.config_file.display()));
    output.info(&format!("Validating configuration: {}", args.config_file.display()))?;

    require_file(&args.config_file)?;
    let rules = load_rules(&args.rules)?;

    // relative ConfFilePath values default to the configuration's directory
    let config_dir = args.config_file.parent().filter(|dir| !dir.as_os_str().is_empty());
    let builder = config.type_builder(&args.build, config_dir);
    let synthesis = builder.build_with_report(&rules)?;
    for warning in &synthesis.warnings {
        output.warning(&format!("⚠ {}", warning))?;
    }

    let record = {
        let _validation_timer = Timer::new("instance_validation");
        match synthesis.config_type.read_file(&args.config_file) {
            Ok(record) => record,
            Err(typedconfig_core::Error::Validation(errors)) => {
                warn!(count = errors.len(), "Validation failed");
                output.error("✗ Configuration validation failed")?;
                output.validation_errors(&errors)?;
                return Err(Error::ValidationFailed { count: errors.len() });
            }
            Err(e) => return Err(e.into()),
        }
    };

    info!("Validation completed successfully");
    output.success("✓ Configuration is valid")?;
    output.section("Validated Configuration")?;
    output.data(&record.to_value())?;

    if let Some(export) = &args.export {
        debug!(path = %export.display(), "Exporting validated configuration");
        record.write_file(export)?;
        output.success(&format!("✓ Configuration written to {}", export.display()))?;
    }

    Ok(())
}
