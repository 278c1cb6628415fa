use crate::rules::classify::ImportKind;
use crate::rules::{EdgeContext, ImportPolicy, RuleId, Violation, ViolationKind};

/// Dentro de un slice los imports son relativos; para salir de él se usa el
/// alias.
///
/// Los slices se comparan por identidad de módulo (los segmentos concretos
/// que cubre cada patrón), no por el patrón: `entities/user` y
/// `entities/order` son slices distintos aunque ambos casen con
/// `entities/**`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RelativePathPolicy;

impl ImportPolicy for RelativePathPolicy {
    fn rule(&self) -> RuleId {
        RuleId::FsdRelativePath
    }

    fn check(&self, edge: &EdgeContext<'_>) -> Option<Violation> {
        let subject = edge.subject_pattern.identity(edge.subject);
        let target = edge.target_pattern.identity(&edge.target.segments);

        if subject.is_empty() || target.is_empty() {
            return None;
        }

        match edge.target.kind {
            ImportKind::Relative if !covers_subject(&subject, &target) => {
                Some(edge.violation(ViolationKind::ShouldBeAbsolute))
            }
            ImportKind::Absolute if shares_prefix(&subject, &target) => {
                Some(edge.violation(ViolationKind::ShouldBeRelative))
            }
            _ => None,
        }
    }
}

/// Dirección relativa: el destino debe coincidir con toda la identidad del
/// archivo. Un destino más corto significa que el import salió del slice.
fn covers_subject(subject: &[&str], target: &[&str]) -> bool {
    target.len() >= subject.len() && subject.iter().zip(target).all(|(a, b)| a == b)
}

/// Dirección absoluta: basta coincidir en la más corta de las dos
/// identidades (una capa hoja como `app` solo tiene un segmento).
fn shares_prefix(subject: &[&str], target: &[&str]) -> bool {
    subject.iter().zip(target).all(|(a, b)| a == b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::engine::tests::{engine, violations_of};
    use rstest::rstest;

    const APP_WINDOWS: &str = "C:\\projects\\src\\app\\index.ts";
    const APP_UNIX: &str = "home/projects/src/app/index.ts";
    const ENTITIES_WINDOWS: &str = "C:\\projects\\src\\entities\\entity-name\\index.ts";
    const ENTITIES_UNIX: &str = "home/projects/src/entities/entity-name/index.ts";
    const FEATURES_WINDOWS: &str = "C:\\projects\\src\\features\\feature-name\\index.ts";
    const FEATURES_UNIX: &str = "home/projects/src/features/feature-name/index.ts";

    #[rstest]
    #[case(APP_WINDOWS, "./styles/index.ts")]
    #[case(APP_UNIX, "@/entities/entity-name/index.ts")]
    #[case(ENTITIES_WINDOWS, "./styles/index.ts")]
    #[case(ENTITIES_UNIX, "@/shared/ui/button.ts")]
    #[case(FEATURES_WINDOWS, "./styles/index.ts")]
    #[case(FEATURES_UNIX, "@/shared/ui/button.ts")]
    #[case(FEATURES_UNIX, "../feature-name/model")]
    #[case(FEATURES_UNIX, "lodash")]
    fn test_relative_path_valid(#[case] file: &str, #[case] specifier: &str) {
        let found = violations_of(&engine(), file, specifier, RuleId::FsdRelativePath);
        assert!(found.is_empty(), "{file} -> {specifier}: {found:?}");
    }

    #[rstest]
    #[case(APP_WINDOWS, "../entities/entity-name", ViolationKind::ShouldBeAbsolute, "@/entities/entity-name")]
    #[case(APP_UNIX, "@/app/styles/index.ts", ViolationKind::ShouldBeRelative, "./styles/index.ts")]
    #[case(ENTITIES_WINDOWS, "../../shared/ui/button.ts", ViolationKind::ShouldBeAbsolute, "@/shared/ui/button.ts")]
    #[case(ENTITIES_UNIX, "@/entities/entity-name/ui/index.ts", ViolationKind::ShouldBeRelative, "./ui/index.ts")]
    #[case(FEATURES_WINDOWS, "../../shared/ui/button.ts", ViolationKind::ShouldBeAbsolute, "@/shared/ui/button.ts")]
    #[case(FEATURES_UNIX, "@/features/feature-name/ui/index.ts", ViolationKind::ShouldBeRelative, "./ui/index.ts")]
    #[case(FEATURES_UNIX, "../other-feature", ViolationKind::ShouldBeAbsolute, "@/features/other-feature")]
    fn test_relative_path_invalid(
        #[case] file: &str,
        #[case] specifier: &str,
        #[case] kind: ViolationKind,
        #[case] fix: &str,
    ) {
        let found = violations_of(&engine(), file, specifier, RuleId::FsdRelativePath);
        assert_eq!(found.len(), 1, "{file} -> {specifier}");
        assert_eq!(found[0].kind, kind);
        assert_eq!(found[0].replacement.as_deref(), Some(fix));
    }

    #[test]
    fn test_relative_fix_from_nested_file() {
        let found = violations_of(
            &engine(),
            "home/projects/src/entities/user/ui/card/card.tsx",
            "@/entities/user/model/types.ts",
            RuleId::FsdRelativePath,
        );
        assert_eq!(found[0].replacement.as_deref(), Some("../../model/types.ts"));
    }

    #[test]
    fn test_subject_outside_schema_is_skipped() {
        let found = violations_of(
            &engine(),
            "home/projects/src/main.ts",
            "./app/index.ts",
            RuleId::FsdRelativePath,
        );
        assert!(found.is_empty());
    }

    #[test]
    fn test_trailing_slash_specifiers() {
        let file = "home/projects/src/entities/user/index.ts";
        let found = violations_of(&engine(), file, "@/entities/user/", RuleId::FsdRelativePath);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, ViolationKind::ShouldBeRelative);
        assert_eq!(found[0].replacement.as_deref(), Some("./"));

        // El comodín casó con un segmento vacío: otro slice, sin nombre.
        let found = violations_of(&engine(), file, "@/entities/", RuleId::FsdRelativePath);
        assert!(found.is_empty());
    }

    #[test]
    fn test_asymmetric_tie_break() {
        // Archivo a nivel de capa importando un slice de su propia capa.
        let file = "home/projects/src/shared/index.ts";
        let absolute = violations_of(&engine(), file, "@/shared/ui/button", RuleId::FsdRelativePath);
        assert_eq!(absolute[0].kind, ViolationKind::ShouldBeRelative);
        assert_eq!(absolute[0].replacement.as_deref(), Some("./ui/button"));

        let relative = violations_of(&engine(), file, "./ui/button", RuleId::FsdRelativePath);
        assert!(relative.is_empty());

        // Archivo de un slice subiendo al archivo de la capa.
        let file = "home/projects/src/shared/ui/button/index.ts";
        let up = violations_of(&engine(), file, "../../index.ts", RuleId::FsdRelativePath);
        assert_eq!(up[0].kind, ViolationKind::ShouldBeAbsolute);
    }

    #[test]
    fn test_renaming_root_marker_and_alias_keeps_outcomes() {
        let renamed = crate::rules::engine::tests::engine_with("~/", "client/");
        let found = violations_of(
            &renamed,
            "repo/client/entities/entity-name/index.ts",
            "~/entities/entity-name/ui/index.ts",
            RuleId::FsdRelativePath,
        );
        assert_eq!(found[0].kind, ViolationKind::ShouldBeRelative);
        assert_eq!(found[0].replacement.as_deref(), Some("./ui/index.ts"));

        let found = violations_of(
            &renamed,
            "repo/client/entities/entity-name/index.ts",
            "../../shared/ui/button.ts",
            RuleId::FsdRelativePath,
        );
        assert_eq!(found[0].replacement.as_deref(), Some("~/shared/ui/button.ts"));
    }
}
