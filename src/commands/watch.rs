//! # Modo watch
//!
//! Revisa los archivos al guardarlos. Las ráfagas de eventos se agrupan:
//! tras el primero el bucle espera [`DEBOUNCE`] y vacía el canal.

use crate::commands::check::{check_files, default_jobs};
use crate::commands::render::{self, Summary};
use crate::commands::{OutputMode, Project};
use crate::config::FsdConfig;
use crate::rules::RuleEngine;
use colored::*;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// Archivos de una ráfaga que siguen existiendo y no se ignoran.
pub fn pending_files(
    root: &Path,
    changed: impl IntoIterator<Item = PathBuf>,
    config: &FsdConfig,
) -> Vec<PathBuf> {
    changed
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .filter(|p| p.is_file())
        .filter(|p| !config.should_ignore(p.strip_prefix(root).unwrap_or(p)))
        .collect()
}

pub fn handle_watch(project: &Project, target: &str, fix: bool, output_mode: OutputMode) -> anyhow::Result<()> {
    let engine = RuleEngine::from_config(&project.config)?.with_fixes(true);
    let watch_root = project.root.join(target);
    if !watch_root.exists() {
        anyhow::bail!("El destino '{}' no existe en el proyecto.", target);
    }

    let (tx, rx) = mpsc::channel::<PathBuf>();
    let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
        if let Ok(event) = res {
            if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                for path in event.paths {
                    let _ = tx.send(path);
                }
            }
        }
    })?;
    watcher.watch(&watch_root, RecursiveMode::Recursive)?;

    println!(
        "\n{} {}",
        format!("👀 fsd-lint v{} vigilando:", crate::config::FSD_LINT_VERSION)
            .green()
            .bold(),
        watch_root.display()
    );
    println!("   Ctrl+C para salir.");

    while let Ok(first) = rx.recv() {
        thread::sleep(DEBOUNCE);
        let mut burst = vec![first];
        while let Ok(path) = rx.try_recv() {
            burst.push(path);
        }

        let files = pending_files(&project.root, burst, &project.config);
        if files.is_empty() {
            continue;
        }

        // Lo que reescribe --fix dispara otro evento; esa pasada no cambia nada.
        let reports = check_files(&engine, &project.root, &files, fix, default_jobs());
        let summary = Summary::from_reports(&reports);
        if summary.is_clean() && summary.failed == 0 && summary.fixed == 0 {
            if output_mode != OutputMode::Quiet {
                for report in &reports {
                    println!("   {} {}", "✔".green(), report.file.dimmed());
                }
            }
            continue;
        }
        render::render_text(&reports, output_mode);
        render::render_summary(&summary, output_mode);
    }

    Ok(())
}
