//! # Clasificador de imports
//!
//! Decide si un especificador es relativo o usa el alias y lo convierte en
//! una secuencia de segmentos comparable con la del archivo que importa.

use crate::error::FsdResult;
use crate::rules::paths;
use crate::rules::schema::SchemaTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Relative,
    Absolute,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportTarget {
    pub kind: ImportKind,
    /// Segmentos tras la raíz de código.
    pub segments: Vec<String>,
}

/// Ajustes comunes a toda clasificación: cómo se escriben los imports
/// absolutos y dónde empieza el código.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSettings {
    pub alias: String,
    pub src_path: String,
}

impl PathSettings {
    pub fn new(alias: impl Into<String>, src_path: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            src_path: src_path.into(),
        }
    }

    /// Quita el alias de `specifier`. Un alias sin barra final (`"@"`)
    /// también acepta la forma `@/capa`.
    pub fn strip_alias<'a>(&self, specifier: &'a str) -> Option<&'a str> {
        let rest = specifier.strip_prefix(self.alias.as_str())?;
        if self.alias.is_empty() || self.alias.ends_with('/') {
            Some(rest)
        } else {
            Some(rest.strip_prefix('/').unwrap_or(rest))
        }
    }

    /// Inverso de [`PathSettings::strip_alias`].
    pub fn with_alias(&self, path: &str) -> String {
        if self.alias.is_empty() || self.alias.ends_with('/') {
            format!("{}{}", self.alias, path)
        } else {
            format!("{}/{}", self.alias, path)
        }
    }
}

pub fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// Segmentos normalizados de un especificador con alias, o `None` si no
/// empieza por el alias o su primer segmento no es una capa declarada.
pub fn absolute_segments(
    specifier: &str,
    settings: &PathSettings,
    tree: &SchemaTree,
) -> Option<Vec<String>> {
    if is_relative(specifier) {
        return None;
    }
    let rest = settings.strip_alias(specifier)?;
    let segments = paths::components(rest);

    match segments.first() {
        Some(layer) if layer != ".." && tree.is_layer(layer) => Some(segments),
        _ => None,
    }
}

/// Clasifica un import.
///
/// * `Ok(Some(_))`: el especificador apunta dentro de la arquitectura.
/// * `Ok(None)`: import ajeno (paquete, otro alias, capa desconocida);
///   ninguna política lo revisa.
/// * `Err(NotInSourceTree)`: un especificador relativo que sale de la raíz
///   de código.
pub fn classify(
    specifier: &str,
    containing_file: &str,
    settings: &PathSettings,
    tree: &SchemaTree,
) -> FsdResult<Option<ImportTarget>> {
    if is_relative(specifier) {
        let segments = paths::resolve_relative(containing_file, specifier, &settings.src_path)?;
        return Ok(Some(ImportTarget {
            kind: ImportKind::Relative,
            segments,
        }));
    }

    Ok(absolute_segments(specifier, settings, tree).map(|segments| ImportTarget {
        kind: ImportKind::Absolute,
        segments,
    }))
}
