pub mod check;
pub mod explain;
pub mod init;
pub mod render;
pub mod rules;
pub mod watch;

use crate::config::FsdConfig;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fsd-lint")]
#[command(about = "Revisor de imports Feature-Sliced Design", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Solo muestra el resumen y los errores
    #[arg(short, long, global = true)]
    pub quiet: bool,
    /// Muestra los archivos procesados y los detalles de cada import
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Revisa los imports de un archivo o directorio
    Check {
        /// Archivo o directorio a revisar
        #[arg(default_value = ".")]
        target: String,
        /// Reescribe en el archivo los imports corregibles
        #[arg(long)]
        fix: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Hilos de trabajo (por defecto: paralelismo disponible)
        #[arg(short, long)]
        jobs: Option<usize>,
    },
    /// Muestra cómo se clasifica una ruta según la estructura
    Explain {
        /// Ruta del archivo
        path: String,
        /// Evalúa también este import como si estuviera en PATH
        #[arg(long = "import")]
        import: Option<String>,
    },
    /// Lista las reglas y sus niveles
    Rules,
    /// Escribe un .fsdrc.toml inicial
    Init {
        #[arg(long)]
        force: bool,
    },
    /// Vuelve a revisar los archivos al cambiar
    Watch {
        #[arg(default_value = ".")]
        target: String,
        #[arg(long)]
        fix: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Sarif,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    Quiet,
    Normal,
    Verbose,
}

pub fn get_output_mode(quiet: bool, verbose: bool) -> OutputMode {
    if quiet {
        OutputMode::Quiet
    } else if verbose {
        OutputMode::Verbose
    } else {
        OutputMode::Normal
    }
}

/// Raíz del proyecto y su configuración.
pub struct Project {
    pub root: PathBuf,
    pub config: FsdConfig,
}

impl Project {
    /// Busca el proyecto configurado más cercano subiendo desde el directorio actual.
    pub fn load() -> anyhow::Result<Self> {
        let cwd = std::env::current_dir()?;
        let root = FsdConfig::find_project_root_from(&cwd).unwrap_or(cwd);
        let Some(config) = FsdConfig::load(&root)? else {
            anyhow::bail!(
                "No se encontró configuración (.fsdrc.toml) en {} ni en sus padres. Ejecuta 'fsd-lint init' primero.",
                root.display()
            );
        };
        Ok(Self { root, config })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_check_flags() {
        let cli = Cli::parse_from(["fsd-lint", "check", "src", "--fix", "--format", "json", "-j", "2"]);
        match cli.command {
            Some(Commands::Check { target, fix, format, jobs }) => {
                assert_eq!(target, "src");
                assert!(fix);
                assert_eq!(format, OutputFormat::Json);
                assert_eq!(jobs, Some(2));
            }
            _ => panic!("expected check"),
        }
    }

    #[test]
    fn test_quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["fsd-lint", "-q", "-v", "rules"]).is_err());
    }

    #[test]
    fn test_output_mode() {
        assert_eq!(get_output_mode(true, false), OutputMode::Quiet);
        assert_eq!(get_output_mode(false, true), OutputMode::Verbose);
        assert_eq!(get_output_mode(false, false), OutputMode::Normal);
    }
}
