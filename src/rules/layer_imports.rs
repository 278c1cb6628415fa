use crate::rules::classify::ImportKind;
use crate::rules::{EdgeContext, ImportPolicy, RuleId, Violation, ViolationKind};

/// Un módulo solo importa de capas declaradas después de la suya. Los
/// imports dentro de la misma capa los revisa
/// [`super::relative_path::RelativePathPolicy`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LayerImportsPolicy;

impl ImportPolicy for LayerImportsPolicy {
    fn rule(&self) -> RuleId {
        RuleId::LayerImports
    }

    fn check(&self, edge: &EdgeContext<'_>) -> Option<Violation> {
        if edge.target.kind != ImportKind::Absolute {
            return None;
        }

        let subject_layer = edge.tree.layer_index(edge.subject.first()?)?;
        let target_layer = edge.tree.layer_index(edge.target.segments.first()?)?;

        if target_layer < subject_layer {
            return Some(edge.violation(ViolationKind::LayerOrder));
        }
        None
    }
}
