//! # Esquema de la estructura del proyecto
//!
//! `StructureConfig` es lo que serde lee de `.fsdrc.*`; [`SchemaTree::build`]
//! lo valida una vez y produce el árbol inmutable que recorre el
//! emparejador. Se conserva el orden del documento: las claves de primer
//! nivel son las capas, de la más alta a la más baja.

use crate::error::{FsdError, FsdResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Clave que casa con exactamente un segmento cualquiera.
pub const WILDCARD: &str = "**";

/// Valor que marca un nodo como opaco en la configuración.
pub const LEAF_MARKER: i64 = 1;

/// Estructura tal como está escrita en el archivo de configuración.
pub type StructureConfig = IndexMap<String, StructureEntry>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum StructureEntry {
    Marker(i64),
    Nested(StructureConfig),
    /// Cualquier otro valor; se guarda para nombrar la clave inválida.
    Invalid(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// No se mira más allá de este nodo.
    Leaf,
    Branch(Branch),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Branch {
    children: IndexMap<String, SchemaNode>,
    wildcard: Option<Box<SchemaNode>>,
}

impl Branch {
    pub fn child(&self, name: &str) -> Option<&SchemaNode> {
        self.children.get(name)
    }

    pub fn wildcard(&self) -> Option<&SchemaNode> {
        self.wildcard.as_deref()
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Esquema validado y de solo lectura. Se construye una vez y se comparte.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaTree {
    root: Branch,
}

impl SchemaTree {
    pub fn build(config: &StructureConfig) -> FsdResult<Self> {
        let root = build_branch(config, "")?;
        if root.children.is_empty() {
            return Err(FsdError::malformed(
                "project_structure",
                "at least one named layer is required",
            ));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Branch {
        &self.root
    }

    /// Nombres de las capas, de la más alta (más dependiente) a la más baja.
    pub fn layers(&self) -> impl Iterator<Item = &str> {
        self.root.children.keys().map(String::as_str)
    }

    pub fn is_layer(&self, name: &str) -> bool {
        self.root.children.contains_key(name)
    }

    pub fn layer_index(&self, name: &str) -> Option<usize> {
        self.root.children.get_index_of(name)
    }
}

fn build_branch(config: &StructureConfig, parent: &str) -> FsdResult<Branch> {
    let mut branch = Branch::default();

    for (key, entry) in config {
        let path = if parent.is_empty() {
            key.clone()
        } else {
            format!("{parent}.{key}")
        };
        validate_key(key, &path)?;

        let node = match entry {
            StructureEntry::Marker(LEAF_MARKER) => SchemaNode::Leaf,
            StructureEntry::Marker(other) => {
                return Err(FsdError::malformed(
                    path,
                    format!("expected {LEAF_MARKER} or a nested table, found {other}"),
                ));
            }
            StructureEntry::Nested(nested) => SchemaNode::Branch(build_branch(nested, &path)?),
            StructureEntry::Invalid(value) => {
                return Err(FsdError::malformed(
                    path,
                    format!("expected {LEAF_MARKER} or a nested table, found {value}"),
                ));
            }
        };

        if key == WILDCARD {
            branch.wildcard = Some(Box::new(node));
        } else {
            branch.children.insert(key.clone(), node);
        }
    }

    Ok(branch)
}

fn validate_key(key: &str, path: &str) -> FsdResult<()> {
    if key.is_empty() {
        return Err(FsdError::malformed(path, "empty segment name"));
    }
    if key.contains(['/', '\\']) {
        return Err(FsdError::malformed(
            path,
            "segment names cannot contain path separators",
        ));
    }
    if key == "." || key == ".." {
        return Err(FsdError::malformed(path, "'.' and '..' are not segment names"));
    }
    if key != WILDCARD && key.contains('*') {
        return Err(FsdError::malformed(
            path,
            format!("only a bare '{WILDCARD}' key may hold a wildcard"),
        ));
    }
    Ok(())
}
