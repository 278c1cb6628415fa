//! # fsd-lint - Revisor de imports Feature-Sliced Design
//!
//! Revisa los imports de un proyecto TypeScript/JavaScript contra la
//! estructura de capas declarada en `.fsdrc.toml`: imports absolutos solo
//! por la API pública, imports relativos dentro del mismo slice y capas que
//! solo dependen de capas inferiores. Puede reescribir los imports
//! corregibles con `--fix`.

use clap::Parser;
use commands::{Cli, Commands, OutputFormat, Project, get_output_mode};

// Módulos
pub mod commands;
pub mod config;
pub mod error;
pub mod rules;
pub mod ui;

/// Código de salida cuando quedan violaciones de nivel error.
const EXIT_VIOLATIONS: i32 = 1;
/// Código de salida para fallos de configuración o de E/S.
const EXIT_FATAL: i32 = 2;

fn run(cli: Cli) -> anyhow::Result<bool> {
    let output_mode = get_output_mode(cli.quiet, cli.verbose);

    match cli.command {
        Some(Commands::Check { target, fix, format, jobs }) => {
            let project = Project::load()?;
            commands::check::handle_check(&project, &target, fix, format, jobs, output_mode)
        }
        Some(Commands::Explain { path, import }) => {
            let project = Project::load()?;
            commands::explain::handle_explain(&project, &path, import.as_deref())?;
            Ok(false)
        }
        Some(Commands::Rules) => {
            let project_root = match config::FsdConfig::find_project_root() {
                Some(root) => root,
                None => std::env::current_dir()?,
            };
            commands::rules::handle_rules_command(&project_root)?;
            Ok(false)
        }
        Some(Commands::Init { force }) => {
            let project_root = std::env::current_dir()?;
            commands::init::handle_init_command(&project_root, force)?;
            Ok(false)
        }
        Some(Commands::Watch { target, fix }) => {
            let project = Project::load()?;
            commands::watch::handle_watch(&project, &target, fix, output_mode)?;
            Ok(false)
        }
        None => {
            // Sin subcomando: revisar todo el proyecto
            let project = Project::load()?;
            commands::check::handle_check(&project, ".", false, OutputFormat::Text, None, output_mode)
        }
    }
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(false) => {}
        // Exit 1 si hay errores → CI falla el build
        Ok(true) => std::process::exit(EXIT_VIOLATIONS),
        Err(err) => {
            ui::mostrar_error(&err);
            std::process::exit(EXIT_FATAL);
        }
    }
}
