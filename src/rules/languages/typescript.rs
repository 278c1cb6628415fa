use crate::rules::languages::ImportDeclaration;
use anyhow::{Context, anyhow};
use tree_sitter::{Language, Parser, Query, QueryCursor, StreamingIterator};

/// Orígenes de imports estáticos en las gramáticas TypeScript y JavaScript.
/// `import()` dinámico y `require()` no se capturan.
const IMPORT_SOURCE_QUERY: &str = r#"
    (import_statement source: (string) @source)
    (export_statement source: (string) @source)
"#;

/// Extrae las declaraciones `import ... from` / `export ... from` del archivo.
pub fn extract_imports(
    language: &Language,
    source_code: &str,
) -> anyhow::Result<Vec<ImportDeclaration>> {
    let mut parser = Parser::new();
    parser
        .set_language(language)
        .context("Error al cargar lenguaje")?;

    let tree = parser
        .parse(source_code, None)
        .ok_or_else(|| anyhow!("tree-sitter could not parse the file"))?;
    let root_node = tree.root_node();

    let query = Query::new(language, IMPORT_SOURCE_QUERY)?;
    let mut cursor = QueryCursor::new();
    let mut captures = cursor.captures(&query, root_node, source_code.as_bytes());

    let mut imports = Vec::new();
    while let Some((m, _)) = captures.next() {
        for capture in m.captures {
            let node = capture.node;
            let text = node.utf8_text(source_code.as_bytes()).unwrap_or("");

            let mut chars = text.chars();
            let (Some(quote), Some(_)) = (chars.next(), chars.next_back()) else {
                continue;
            };

            imports.push(ImportDeclaration {
                specifier: chars.as_str().to_string(),
                line: node.start_position().row + 1,
                span: node.byte_range(),
                quote,
            });
        }
    }

    Ok(imports)
}
