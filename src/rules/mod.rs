pub mod classify;
pub mod engine;
pub mod fixer;
pub mod languages;
pub mod layer_imports;
pub mod paths;
pub mod pattern;
pub mod public_api;
pub mod relative_path;
pub mod schema;

pub use engine::RuleEngine;

use crate::rules::classify::{ImportTarget, PathSettings};
use crate::rules::pattern::Pattern;
use crate::rules::schema::SchemaTree;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    Error,
    Warning,
    Info,
}

impl RuleLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleLevel::Error => "error",
            RuleLevel::Warning => "warning",
            RuleLevel::Info => "info",
        }
    }
}

/// Las tres reglas de arquitectura, con el nombre que usa la configuración.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    AbsolutePublicApiImports,
    FsdRelativePath,
    LayerImports,
}

impl RuleId {
    pub const ALL: [RuleId; 3] = [
        RuleId::FsdRelativePath,
        RuleId::AbsolutePublicApiImports,
        RuleId::LayerImports,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::AbsolutePublicApiImports => "absolute-public-api-imports",
            RuleId::FsdRelativePath => "fsd-relative-path",
            RuleId::LayerImports => "layer-imports",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RuleId::AbsolutePublicApiImports => {
                "Absolute imports should be only from public api, not inside module"
            }
            RuleId::FsdRelativePath => "Imports within one slice should be relative",
            RuleId::LayerImports => {
                "Modules on one layer can only interact with modules from the layers strictly below"
            }
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    PublicApiBoundary,
    ShouldBeRelative,
    ShouldBeAbsolute,
    LayerOrder,
}

impl ViolationKind {
    pub fn rule(&self) -> RuleId {
        match self {
            ViolationKind::PublicApiBoundary => RuleId::AbsolutePublicApiImports,
            ViolationKind::ShouldBeRelative | ViolationKind::ShouldBeAbsolute => {
                RuleId::FsdRelativePath
            }
            ViolationKind::LayerOrder => RuleId::LayerImports,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ViolationKind::PublicApiBoundary => "Absolute import should be from public api",
            ViolationKind::ShouldBeRelative => "Import should be relative",
            ViolationKind::ShouldBeAbsolute => "Import should be absolute",
            ViolationKind::LayerOrder => {
                "Modules on one layer can only interact with modules from the layers strictly below"
            }
        }
    }
}

/// Resultado de una política para un import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub replacement: Option<String>,
}

/// Un import tal como lo ve el host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEdge {
    pub containing_file: String,
    pub raw_specifier: String,
}

impl ImportEdge {
    pub fn new(containing_file: impl Into<String>, raw_specifier: impl Into<String>) -> Self {
        Self {
            containing_file: containing_file.into(),
            raw_specifier: raw_specifier.into(),
        }
    }
}

/// Todo lo que una política puede consultar de un import. El motor lo
/// construye una vez por import, con ambos lados ya normalizados.
pub struct EdgeContext<'a> {
    pub tree: &'a SchemaTree,
    pub settings: &'a PathSettings,
    pub subject: &'a [String],
    pub subject_pattern: &'a Pattern,
    pub target: &'a ImportTarget,
    pub target_pattern: &'a Pattern,
    pub fixes: bool,
}

impl EdgeContext<'_> {
    /// Construye la violación, con reemplazo si los arreglos están activos y
    /// se puede calcular.
    pub fn violation(&self, kind: ViolationKind) -> Violation {
        let replacement = if self.fixes {
            fixer::compute_replacement(
                kind,
                self.settings,
                self.subject,
                &self.target.segments,
                self.target_pattern,
            )
            .ok()
            .flatten()
        } else {
            None
        };
        Violation { kind, replacement }
    }
}

pub trait ImportPolicy {
    fn rule(&self) -> RuleId;
    fn check(&self, edge: &EdgeContext<'_>) -> Option<Violation>;
}

/// Violación ubicada en un archivo, lista para el reporte.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleViolation {
    pub rule: RuleId,
    pub kind: ViolationKind,
    pub message: String,
    pub level: RuleLevel,
    pub line: Option<usize>,
    pub specifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    /// Rango de bytes del especificador entre comillas.
    #[serde(skip)]
    pub span: Option<Range<usize>>,
}
