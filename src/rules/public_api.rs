use crate::rules::classify::ImportKind;
use crate::rules::{EdgeContext, ImportPolicy, RuleId, Violation, ViolationKind};

/// Un import absoluto solo llega a un módulo por su API pública: debe
/// terminar justo donde termina el patrón del esquema.
#[derive(Debug, Default, Clone, Copy)]
pub struct PublicApiPolicy;

impl ImportPolicy for PublicApiPolicy {
    fn rule(&self) -> RuleId {
        RuleId::AbsolutePublicApiImports
    }

    fn check(&self, edge: &EdgeContext<'_>) -> Option<Violation> {
        if edge.target.kind != ImportKind::Absolute {
            return None;
        }

        if edge.target.segments.len() > edge.target_pattern.len() {
            return Some(edge.violation(ViolationKind::PublicApiBoundary));
        }
        None
    }
}
