pub mod typescript;

use std::ops::Range;
use tree_sitter::Language;

/// Un import o re-export estático encontrado en el archivo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDeclaration {
    /// Especificador sin comillas.
    pub specifier: String,
    /// Línea del especificador, desde 1.
    pub line: usize,
    /// Rango de bytes del literal, comillas incluidas.
    pub span: Range<usize>,
    pub quote: char,
}

/// Devuelve el Language de tree-sitter para la extensión dada.
/// None si la extensión no está soportada.
pub fn get_language(ext: &str) -> Option<Language> {
    match ext {
        "ts" | "mts" | "cts" => Some(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
        "tsx" => Some(tree_sitter_typescript::LANGUAGE_TSX.into()),
        "js" | "jsx" | "mjs" | "cjs" => Some(tree_sitter_javascript::LANGUAGE.into()),
        _ => None,
    }
}
