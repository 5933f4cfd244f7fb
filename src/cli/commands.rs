//! Command dispatch

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::AnalysisOptions;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Completion { shell }) => {
            print_completions(*shell);
            Ok(())
        }
        Some(Commands::Config { command }) => {
            execute_config(command, &Settings::load(cli.config.as_deref())?)
        }
        None => execute_report(cli, Settings::load(cli.config.as_deref())?),
    }
}

/// Merge command-line flags over the loaded settings.
///
/// `--splice` together with `--intermediate` is rejected; a configured
/// `intermediate = true` silently wins over a configured `splice`.
pub fn apply_flags(cli: &Cli, mut settings: Settings) -> CliResult<(Settings, AnalysisOptions)> {
    if cli.splice && cli.intermediate {
        return Err(CliError::InvalidArgs(
            "--splice has no effect with --intermediate".to_string(),
        ));
    }
    if let Some(input) = &cli.input {
        settings.input = Some(input.clone());
    }
    let intermediate = cli.intermediate || settings.intermediate;
    let options = AnalysisOptions {
        image: cli.image.clone(),
        intermediate,
        splice: !intermediate && (cli.splice || settings.splice),
        format: cli.format.unwrap_or(settings.format),
    };
    Ok((settings, options))
}

#[instrument(skip_all)]
fn execute_report(cli: &Cli, settings: Settings) -> CliResult<()> {
    let (settings, options) = apply_flags(cli, settings)?;
    debug!("options: {:?}", options);

    let container = ServiceContainer::new(settings);
    let report = container.analysis_service().report(&options)?;
    if report.is_empty() {
        output::warning("no image layers found");
        return Ok(());
    }
    output::data(&report).map_err(|e| InfraError::io("write report", e))?;
    Ok(())
}

fn execute_config(command: &ConfigCommands, settings: &Settings) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::header("# effective configuration");
            output::data(&settings.to_toml()?).map_err(|e| InfraError::io("write config", e))?;
        }
        ConfigCommands::Template => {
            output::data(&Settings::template()).map_err(|e| InfraError::io("write template", e))?;
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => println!("{}", path.display()),
            None => output::warning("cannot determine config directory"),
        },
    }
    Ok(())
}

fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
