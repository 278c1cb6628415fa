use crate::commands::render::{self, Summary};
use crate::commands::{OutputFormat, OutputMode, Project};
use crate::config::FsdConfig;
use crate::rules::{RuleEngine, RuleViolation};
use anyhow::Context;
use colored::*;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Máximo de pasadas de reescritura por archivo. Un arreglo puede destapar
/// otra violación en el mismo import (relativo y luego API pública).
pub const MAX_FIX_PASSES: usize = 10;

/// Reemplazo de un especificador entre comillas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: Range<usize>,
    pub text: String,
}

/// Resultado de revisar un archivo.
#[derive(Debug, Default, Clone)]
pub struct FileReport {
    /// Ruta relativa a la raíz del proyecto, separada con `/`.
    pub file: String,
    /// Violaciones que quedan tras arreglar (todas sin `--fix`).
    pub violations: Vec<RuleViolation>,
    pub fixed: usize,
    pub error: Option<String>,
}

pub struct FixOutcome {
    pub source: String,
    pub fixed: usize,
    pub remaining: Vec<RuleViolation>,
}

/// Recolecta los archivos a revisar bajo `target`, respetando `.gitignore`
/// y los `ignore_patterns` de la configuración. Ordenados.
pub fn collect_files(root: &Path, target: &Path, config: &FsdConfig) -> Vec<PathBuf> {
    if target.is_file() {
        return vec![target.to_path_buf()];
    }

    let walker = ignore::WalkBuilder::new(target)
        .hidden(false)
        .git_ignore(true)
        .build();

    let mut files: Vec<PathBuf> = walker
        .flatten()
        .map(|entry| entry.into_path())
        .filter(|p| p.is_file())
        .filter(|p| !config.should_ignore(p.strip_prefix(root).unwrap_or(p)))
        .collect();
    files.sort();
    files
}

/// Una edición por literal: gana la primera violación con arreglo. Los
/// reemplazos que no cambian nada se descartan.
pub fn plan_edits(content: &str, violations: &[RuleViolation]) -> Vec<TextEdit> {
    let mut edits: Vec<TextEdit> = Vec::new();
    for v in violations {
        let (Some(replacement), Some(span)) = (&v.replacement, &v.span) else {
            continue;
        };
        if *replacement == v.specifier || edits.iter().any(|e| e.range == *span) {
            continue;
        }
        let Some(literal) = content.get(span.clone()) else {
            continue;
        };
        let quote = literal.chars().next().unwrap_or('\'');
        edits.push(TextEdit {
            range: span.clone(),
            text: format!("{quote}{replacement}{quote}"),
        });
    }
    edits
}

/// Aplica las ediciones de atrás hacia delante para no mover los rangos.
pub fn apply_edits(content: &str, edits: &[TextEdit]) -> String {
    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by(|a, b| b.range.start.cmp(&a.range.start));

    let mut out = content.to_string();
    for edit in sorted {
        out.replace_range(edit.range.clone(), &edit.text);
    }
    out
}

/// Reescribe los imports corregibles hasta que el archivo se estabiliza o se
/// alcanza el límite de pasadas.
///
/// Las dos direcciones de `fsd-relative-path` pueden marcar ambas grafías
/// de un mismo import (`@/entities` y `../..` dentro de un slice). Si una
/// pasada produce un estado ya visto, se vuelve a ese estado y las
/// ediciones del ciclo no se cuentan.
pub fn fix_source(engine: &RuleEngine, path: &Path, content: &str) -> anyhow::Result<FixOutcome> {
    let mut source = content.to_string();
    let mut fixed = 0;
    // (estado, ediciones acumuladas al llegar a él)
    let mut seen: Vec<(String, usize)> = vec![(source.clone(), 0)];

    for _ in 0..MAX_FIX_PASSES {
        let violations = engine.validate_file(path, &source)?;
        let edits = plan_edits(&source, &violations);
        if edits.is_empty() {
            return Ok(FixOutcome {
                source,
                fixed,
                remaining: violations,
            });
        }

        let next = apply_edits(&source, &edits);
        if let Some((state, fixed_then)) = seen.iter().find(|(state, _)| *state == next) {
            source = state.clone();
            fixed = *fixed_then;
            break;
        }
        fixed += edits.len();
        seen.push((next.clone(), fixed));
        source = next;
    }

    let remaining = engine.validate_file(path, &source)?;
    Ok(FixOutcome {
        source,
        fixed,
        remaining,
    })
}

fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn try_check_file(engine: &RuleEngine, root: &Path, path: &Path, fix: bool) -> anyhow::Result<FileReport> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("No se pudo leer {}", path.display()))?;
    // El motor recibe la ruta relativa a la raíz del proyecto: un `src` por
    // encima del proyecto no cuenta como raíz de código.
    let rel = path.strip_prefix(root).unwrap_or(path);
    let file = display_path(root, path);

    if !fix {
        let violations = engine.validate_file(rel, &content)?;
        return Ok(FileReport {
            file,
            violations,
            ..FileReport::default()
        });
    }

    let outcome = fix_source(engine, rel, &content)?;
    if outcome.source != content {
        fs::write(path, &outcome.source)
            .with_context(|| format!("No se pudo escribir {}", path.display()))?;
    }
    Ok(FileReport {
        file,
        violations: outcome.remaining,
        fixed: outcome.fixed,
        error: None,
    })
}

/// Los fallos de lectura, análisis o escritura se reportan en el archivo y
/// no detienen la ejecución.
pub fn check_file(engine: &RuleEngine, root: &Path, path: &Path, fix: bool) -> FileReport {
    try_check_file(engine, root, path, fix).unwrap_or_else(|err| FileReport {
        file: display_path(root, path),
        error: Some(format!("{:#}", err)),
        ..FileReport::default()
    })
}

/// Revisa `files` en `jobs` hilos que comparten el motor. Los reportes
/// vuelven en el orden de `files`.
pub fn check_files(
    engine: &RuleEngine,
    root: &Path,
    files: &[PathBuf],
    fix: bool,
    jobs: usize,
) -> Vec<FileReport> {
    if files.is_empty() {
        return Vec::new();
    }
    let jobs = jobs.clamp(1, files.len());
    let batch_size = files.len().div_ceil(jobs);

    std::thread::scope(|scope| {
        let handles: Vec<_> = files
            .chunks(batch_size)
            .map(|batch| {
                scope.spawn(move || {
                    batch
                        .iter()
                        .map(|path| check_file(engine, root, path, fix))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .zip(files.chunks(batch_size))
            .flat_map(|(handle, batch)| {
                handle.join().unwrap_or_else(|_| {
                    batch
                        .iter()
                        .map(|path| FileReport {
                            file: display_path(root, path),
                            error: Some("worker thread panicked".to_string()),
                            ..FileReport::default()
                        })
                        .collect()
                })
            })
            .collect()
    })
}

pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Ejecuta `fsd-lint check`. Devuelve `true` si quedan violaciones de nivel
/// error (o archivos ilegibles), para que el build falle.
pub fn handle_check(
    project: &Project,
    target: &str,
    fix: bool,
    format: OutputFormat,
    jobs: Option<usize>,
    output_mode: OutputMode,
) -> anyhow::Result<bool> {
    let path = project.root.join(target);
    if !path.exists() {
        anyhow::bail!("El destino '{}' no existe en el proyecto.", target);
    }

    let engine = RuleEngine::from_config(&project.config)?.with_fixes(true);
    let files = collect_files(&project.root, &path, &project.config);
    let text_mode = format == OutputFormat::Text;

    if text_mode && output_mode != OutputMode::Quiet {
        println!(
            "\n{} Revisando imports en {} archivo(s)...",
            "⚡".cyan(),
            files.len()
        );
    }
    if text_mode && output_mode == OutputMode::Verbose {
        let active: Vec<String> = engine
            .enabled_rules()
            .map(|(rule, level)| format!("{} ({})", rule, level.as_str()))
            .collect();
        println!("   Reglas activas: {}", active.join(", "));
    }
    if files.is_empty() && text_mode {
        println!("{} No se encontraron archivos para revisar en '{}'.", "⚠️".yellow(), target);
    }

    let spinner = (text_mode && output_mode == OutputMode::Normal)
        .then(|| crate::ui::crear_progreso("Analizando imports..."));
    let reports = check_files(
        &engine,
        &project.root,
        &files,
        fix,
        jobs.unwrap_or_else(default_jobs),
    );
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let summary = Summary::from_reports(&reports);
    match format {
        OutputFormat::Json => println!("{}", render::render_json(&reports)),
        OutputFormat::Sarif => println!("{}", render::render_sarif(&reports)),
        OutputFormat::Text => {
            render::render_text(&reports, output_mode);
            render::render_summary(&summary, output_mode);
        }
    }

    Ok(summary.errors > 0 || summary.failed > 0)
}
