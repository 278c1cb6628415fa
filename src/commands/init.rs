use crate::config::{CONFIG_FILES, FsdConfig, STARTER_CONFIG};
use crate::rules::schema::SchemaTree;
use colored::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const SUPPORTED: &[&str] = &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"];
const SKIP_DIRS: &[&str] = &["node_modules", ".git", "dist", "build", ".next", "coverage"];
const STARTER_EXTENSIONS_LINE: &str = r#"file_extensions = ["ts", "tsx", "js", "jsx"]"#;

/// Recorre `root` (hasta profundidad 3) y devuelve las extensiones que
/// fsd-lint puede analizar, sin repetir.
pub fn detect_project_extensions(root: &Path) -> Vec<String> {
    let mut found: HashSet<String> = HashSet::new();
    walk_extensions(root, 0, 3, &mut found);
    let mut result: Vec<String> = found.into_iter().collect();
    result.sort();
    result
}

fn walk_extensions(dir: &Path, depth: usize, max_depth: usize, found: &mut HashSet<String>) {
    if depth > max_depth {
        return;
    }
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if !SKIP_DIRS.contains(&name) {
                walk_extensions(&path, depth + 1, max_depth, found);
            }
        } else if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if SUPPORTED.contains(&ext) {
                found.insert(ext.to_string());
            }
        }
    }
}

/// Directorios bajo la raíz de código que no son capas declaradas.
pub fn undeclared_layers(project_root: &Path, config: &FsdConfig, tree: &SchemaTree) -> Vec<String> {
    let src = project_root.join(config.src_path.trim_end_matches('/'));
    let Ok(entries) = std::fs::read_dir(&src) else {
        return Vec::new();
    };
    let mut unknown: Vec<String> = entries
        .flatten()
        .filter(|e| e.path().is_dir())
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .filter(|name| !tree.is_layer(name))
        .collect();
    unknown.sort();
    unknown
}

fn render_config(extensions: &[String]) -> String {
    let ext_toml = extensions
        .iter()
        .map(|e| format!("\"{}\"", e))
        .collect::<Vec<_>>()
        .join(", ");
    STARTER_CONFIG.replacen(
        STARTER_EXTENSIONS_LINE,
        &format!("file_extensions = [{}]", ext_toml),
        1,
    )
}

/// Ejecuta `fsd-lint init` en `project_root` y devuelve la ruta escrita.
/// Falla si ya existe una configuración y `force` es false.
pub fn run_init(project_root: &Path, force: bool) -> anyhow::Result<PathBuf> {
    if let Some(existing) = FsdConfig::config_path(project_root) {
        if !force {
            anyhow::bail!(
                "Ya existe una configuración en {}. Usa --force para sobrescribir.",
                existing.display()
            );
        }
    }

    let extensions = detect_project_extensions(project_root);
    let content = if extensions.is_empty() {
        STARTER_CONFIG.to_string()
    } else {
        render_config(&extensions)
    };

    // Con --force queda un único archivo de configuración.
    for name in &CONFIG_FILES[1..] {
        let stale = project_root.join(name);
        if force && stale.is_file() {
            std::fs::remove_file(&stale)?;
        }
    }

    let config_path = project_root.join(CONFIG_FILES[0]);
    std::fs::write(&config_path, content)?;
    Ok(config_path)
}

pub fn handle_init_command(project_root: &Path, force: bool) -> anyhow::Result<()> {
    crate::ui::mostrar_encabezado("init");

    let extensions = detect_project_extensions(project_root);
    if extensions.is_empty() {
        println!("   ℹ️  No se detectaron archivos TS/JS. Usando las extensiones por defecto.");
    } else {
        println!("   🔍 Extensiones detectadas: {}", extensions.join(", ").cyan());
    }

    let config_path = run_init(project_root, force)?;
    println!("   ✅ Configuración creada en: {}", config_path.display().to_string().cyan());

    let config = FsdConfig::load_file(&config_path)?;
    let tree = SchemaTree::build(&config.project_structure)?;
    let unknown = undeclared_layers(project_root, &config, &tree);
    if !unknown.is_empty() {
        println!(
            "   {} Directorios en {} que no son capas: {}",
            "⚠️".yellow(),
            config.src_path,
            unknown.join(", ").yellow()
        );
        println!("      Agrégalos a [project_structure] si forman parte de la arquitectura.");
    }

    println!("\n   {} Próximos pasos:", "💡".yellow());
    println!("      fsd-lint check             # revisar todos los imports");
    println!("      fsd-lint check --fix       # reescribir los imports corregibles");
    println!("      fsd-lint explain <archivo> # ver cómo se clasifica una ruta");
    Ok(())
}
