//! # Emparejador de patrones
//!
//! Reduce una secuencia de segmentos al prefijo que reconoce el esquema, el
//! que identifica su módulo.
//!
//! `["pages", "page-name", "ui", "index.ts"]` → `["pages", "**"]`

use crate::error::{FsdError, FsdResult};
use crate::rules::schema::{SchemaNode, SchemaTree, WILDCARD};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternElem {
    Literal(String),
    Wildcard,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pattern {
    elems: Vec<PatternElem>,
}

impl Pattern {
    pub fn len(&self) -> usize {
        self.elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    pub fn elems(&self) -> &[PatternElem] {
        &self.elems
    }

    /// Segmentos concretos que el patrón cubre en `segments`: la identidad
    /// del módulo. Solo tiene sentido con la secuencia de la que salió.
    pub fn identity<'a, S: AsRef<str>>(&self, segments: &'a [S]) -> Vec<&'a str> {
        segments
            .iter()
            .take(self.len())
            .map(AsRef::as_ref)
            .collect()
    }

    /// Como [`Pattern::identity`], pero rechaza comodines que no nombran un
    /// componente real. Se usa cuando la identidad se escribe en el código.
    pub fn materialize<S: AsRef<str>>(&self, segments: &[S]) -> FsdResult<Vec<String>> {
        if segments.len() < self.len() {
            return Err(FsdError::UnresolvableWildcardSegment {
                position: segments.len(),
            });
        }

        self.elems
            .iter()
            .zip(segments)
            .enumerate()
            .map(|(position, (elem, segment))| match elem {
                PatternElem::Literal(name) => Ok(name.clone()),
                PatternElem::Wildcard => match segment.as_ref() {
                    "" | "." | ".." => Err(FsdError::UnresolvableWildcardSegment { position }),
                    concrete => Ok(concrete.to_string()),
                },
            })
            .collect()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, elem) in self.elems.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            match elem {
                PatternElem::Literal(name) => f.write_str(name)?,
                PatternElem::Wildcard => f.write_str(WILDCARD)?,
            }
        }
        Ok(())
    }
}

/// Descenso voraz sin retroceso. Un hijo literal gana siempre al comodín del
/// mismo nivel; se detiene tras una hoja o en el primer segmento que el
/// nivel actual no reconoce.
pub fn match_pattern<S: AsRef<str>>(segments: &[S], tree: &SchemaTree) -> Pattern {
    let mut elems = Vec::new();
    let mut level = tree.root();

    for segment in segments {
        let segment = segment.as_ref();
        let (elem, node) = if let Some(child) = level.child(segment) {
            (PatternElem::Literal(segment.to_string()), child)
        } else if let Some(child) = level.wildcard() {
            (PatternElem::Wildcard, child)
        } else {
            break;
        };

        elems.push(elem);
        match node {
            SchemaNode::Leaf => break,
            SchemaNode::Branch(branch) => level = branch,
        }
    }

    Pattern { elems }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FsdConfig;
    use rstest::rstest;

    fn tree() -> SchemaTree {
        SchemaTree::build(&FsdConfig::starter().project_structure).unwrap()
    }

    fn split(path: &str) -> Vec<&str> {
        if path.is_empty() {
            Vec::new()
        } else {
            path.split('/').collect()
        }
    }

    #[rstest]
    #[case("pages/page-name/ui/index.ts", "pages/**")]
    #[case("app/styles/index.ts", "app")]
    #[case("shared/ui/molecules/index.ts", "shared/ui/**")]
    #[case("shared/ui/molecules", "shared/ui/**")]
    #[case("shared/api/client.ts", "shared/api")]
    #[case("shared/assets/icons/close.svg", "shared/assets/icons")]
    #[case("shared/unknown/thing.ts", "shared")]
    #[case("shared", "shared")]
    #[case("vendor/lodash", "")]
    #[case("", "")]
    fn test_match_pattern(#[case] path: &str, #[case] expected: &str) {
        let pattern = match_pattern(&split(path), &tree());
        assert_eq!(pattern.to_string(), expected);
    }

    #[test]
    fn test_literal_child_wins_over_wildcard() {
        let config = toml::from_str(
            r#"
            shared = { "**" = { model = 1 }, ui = 1 }
            "#,
        )
        .unwrap();
        let tree = SchemaTree::build(&config).unwrap();

        assert_eq!(match_pattern(&["shared", "ui", "button"], &tree).to_string(), "shared/ui");
        assert_eq!(
            match_pattern(&["shared", "lib", "model", "x.ts"], &tree).to_string(),
            "shared/**/model"
        );
    }

    #[test]
    fn test_wildcard_descends_into_its_own_children() {
        let config = toml::from_str(r#"features = { "**" = { ui = 1, model = 1 } }"#).unwrap();
        let tree = SchemaTree::build(&config).unwrap();
        let segments = ["features", "auth", "model", "store.ts"];
        let pattern = match_pattern(&segments, &tree);

        assert_eq!(pattern.to_string(), "features/**/model");
        assert_eq!(pattern.identity(&segments), vec!["features", "auth", "model"]);
    }

    #[test]
    fn test_pattern_never_longer_than_input() {
        let tree = tree();
        let inputs = [
            "", "app", "app/x", "shared/ui", "shared/ui/a/b/c", "entities/e", "pages/**/x",
            "shared/assets/images/logo.png", "nope/nope",
        ];
        for input in inputs {
            let segments = split(input);
            assert!(match_pattern(&segments, &tree).len() <= segments.len(), "{input}");
        }
    }

    #[test]
    fn test_materialize_substitutes_wildcards() {
        let segments = ["shared", "ui", "molecules", "index.ts"];
        let pattern = match_pattern(&segments, &tree());
        assert_eq!(pattern.materialize(&segments).unwrap(), vec!["shared", "ui", "molecules"]);
    }

    #[test]
    fn test_materialize_rejects_empty_wildcard_segment() {
        let segments = ["entities", ""];
        let pattern = match_pattern(&segments, &tree());
        assert_eq!(pattern.to_string(), "entities/**");
        assert_eq!(
            pattern.materialize(&segments),
            Err(FsdError::UnresolvableWildcardSegment { position: 1 })
        );
    }
}
