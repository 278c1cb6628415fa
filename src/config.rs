//! # Configuración del proyecto
//!
//! `.fsdrc.toml` (o `.yaml` / `.yml` / `.json`) en la raíz del proyecto. Gana
//! el primero que se encuentra subiendo desde el directorio actual.

use crate::rules::schema::StructureConfig;
use crate::rules::{RuleId, RuleLevel};
use anyhow::Context;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Versión actual (leída desde Cargo.toml en tiempo de compilación)
pub const FSD_LINT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Archivos de configuración candidatos, en orden de búsqueda.
pub const CONFIG_FILES: &[&str] = &[".fsdrc.toml", ".fsdrc.yaml", ".fsdrc.yml", ".fsdrc.json"];

/// Configuración inicial que escribe `fsd-lint init`. Las tablas en línea
/// mantienen el orden de las capas al editar el archivo a mano.
pub const STARTER_CONFIG: &str = r#"# fsd-lint configuration
# Layers are listed from the highest (most dependent) to the lowest.

alias = "@/"
src_path = "src/"
file_extensions = ["ts", "tsx", "js", "jsx"]
ignore_patterns = ["node_modules", "dist", ".git", "build", ".next", "coverage"]

[rules.fsd-relative-path]
enabled = true
level = "error"

[rules.absolute-public-api-imports]
enabled = true
level = "error"

[rules.layer-imports]
enabled = true
level = "error"

[project_structure]
app = 1
pages = { "**" = 1 }
layouts = { "**" = 1 }
widgets = { "**" = 1 }
features = { "**" = 1 }
entities = { "**" = 1 }
shared = { api = 1, assets = { images = 1, icons = 1 }, config = 1, consts = 1, init = 1, routing = 1, types = 1, ui = { "**" = 1 }, lib = { "**" = 1 }, viewer = 1 }
"#;

static STARTER: Lazy<FsdConfig> =
    Lazy::new(|| toml::from_str(STARTER_CONFIG).expect("starter configuration must parse"));

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct RuleSettings {
    pub enabled: bool,
    pub level: RuleLevel,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: RuleLevel::Error,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RulesConfig {
    #[serde(rename = "absolute-public-api-imports")]
    pub public_api: RuleSettings,
    #[serde(rename = "fsd-relative-path")]
    pub relative_path: RuleSettings,
    #[serde(rename = "layer-imports")]
    pub layer_imports: RuleSettings,
}

impl RulesConfig {
    pub fn get(&self, rule: RuleId) -> RuleSettings {
        match rule {
            RuleId::AbsolutePublicApiImports => self.public_api,
            RuleId::FsdRelativePath => self.relative_path,
            RuleId::LayerImports => self.layer_imports,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FsdConfig {
    pub alias: String,
    #[serde(default = "default_src_path")]
    pub src_path: String,
    #[serde(default = "default_file_extensions")]
    pub file_extensions: Vec<String>,
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,
    #[serde(default)]
    pub rules: RulesConfig,
    pub project_structure: StructureConfig,
}

fn default_src_path() -> String {
    crate::rules::paths::DEFAULT_SRC_PATH.to_string()
}

fn default_file_extensions() -> Vec<String> {
    ["ts", "tsx", "js", "jsx"].iter().map(|s| s.to_string()).collect()
}

fn default_ignore_patterns() -> Vec<String> {
    ["node_modules", "dist", ".git", "build"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl FsdConfig {
    /// La estructura Feature-Sliced Design canónica.
    pub fn starter() -> Self {
        STARTER.clone()
    }

    /// Busca la raíz del proyecto subiendo desde el directorio actual.
    pub fn find_project_root() -> Option<PathBuf> {
        let cwd = std::env::current_dir().ok()?;
        Self::find_project_root_from(&cwd)
    }

    pub fn find_project_root_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| Self::config_path(dir).is_some())
            .map(Path::to_path_buf)
    }

    pub fn config_path(root: &Path) -> Option<PathBuf> {
        CONFIG_FILES
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.is_file())
    }

    /// Carga la configuración desde la raíz del proyecto.
    ///
    /// `Ok(None)` si allí no hay archivo de configuración.
    pub fn load(root: &Path) -> anyhow::Result<Option<Self>> {
        let Some(path) = Self::config_path(root) else {
            return Ok(None);
        };
        Self::load_file(&path).map(Some)
    }

    pub fn load_file(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("No se pudo leer {}", path.display()))?;
        Self::parse(&content, path)
    }

    /// Interpreta `content` según la extensión de `path`.
    pub fn parse(content: &str, path: &Path) -> anyhow::Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");
        let config = match ext {
            "yaml" | "yml" => serde_yaml::from_str(content)
                .with_context(|| format!("YAML inválido en {}", path.display()))?,
            "json" => serde_json::from_str(content)
                .with_context(|| format!("JSON inválido en {}", path.display()))?,
            _ => toml::from_str(content)
                .with_context(|| format!("TOML inválido en {}", path.display()))?,
        };
        Ok(config)
    }

    /// Indica si el archivo se omite: extensión no configurada o algún
    /// componente listado en `ignore_patterns`.
    pub fn should_ignore(&self, path: &Path) -> bool {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !self.file_extensions.iter().any(|allowed| allowed == ext) {
            return true;
        }

        path.components().any(|component| {
            let name = component.as_os_str().to_string_lossy();
            self.ignore_patterns.iter().any(|pattern| *pattern == name)
        })
    }
}
