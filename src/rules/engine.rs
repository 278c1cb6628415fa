use crate::config::FsdConfig;
use crate::error::FsdResult;
use crate::rules::classify::{self, ImportTarget, PathSettings};
use crate::rules::languages;
use crate::rules::layer_imports::LayerImportsPolicy;
use crate::rules::paths;
use crate::rules::pattern::{Pattern, match_pattern};
use crate::rules::public_api::PublicApiPolicy;
use crate::rules::relative_path::RelativePathPolicy;
use crate::rules::schema::SchemaTree;
use crate::rules::{
    EdgeContext, ImportEdge, ImportPolicy, RuleId, RuleLevel, RuleViolation, Violation,
};
use std::path::Path;
use std::sync::Arc;

struct ActivePolicy {
    policy: Box<dyn ImportPolicy + Send + Sync>,
    level: RuleLevel,
}

/// Ejecuta las políticas activas sobre cada import.
///
/// El árbol del esquema se comparte en solo lectura: un mismo motor se usa
/// desde varios hilos a la vez.
pub struct RuleEngine {
    tree: Arc<SchemaTree>,
    settings: PathSettings,
    policies: Vec<ActivePolicy>,
    fixes: bool,
}

/// Lo que el motor deduce de una ruta; lo imprime `fsd-lint explain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathReport {
    pub segments: Vec<String>,
    pub pattern: Pattern,
    pub layer: Option<(String, usize)>,
    pub module: Vec<String>,
}

impl RuleEngine {
    pub fn from_config(config: &FsdConfig) -> FsdResult<Self> {
        let tree = Arc::new(SchemaTree::build(&config.project_structure)?);
        let mut engine = Self {
            tree,
            settings: PathSettings::new(&config.alias, &config.src_path),
            policies: Vec::new(),
            fixes: false,
        };
        for rule in RuleId::ALL {
            let rule_cfg = config.rules.get(rule);
            if rule_cfg.enabled {
                engine.enable(rule, rule_cfg.level);
            }
        }
        Ok(engine)
    }

    fn enable(&mut self, rule: RuleId, level: RuleLevel) {
        let policy: Box<dyn ImportPolicy + Send + Sync> = match rule {
            RuleId::FsdRelativePath => Box::new(RelativePathPolicy),
            RuleId::AbsolutePublicApiImports => Box::new(PublicApiPolicy),
            RuleId::LayerImports => Box::new(LayerImportsPolicy),
        };
        self.policies.push(ActivePolicy { policy, level });
    }

    pub fn with_fixes(mut self, fixes: bool) -> Self {
        self.fixes = fixes;
        self
    }

    pub fn tree(&self) -> &SchemaTree {
        &self.tree
    }

    pub fn settings(&self) -> &PathSettings {
        &self.settings
    }

    pub fn enabled_rules(&self) -> impl Iterator<Item = (RuleId, RuleLevel)> + '_ {
        self.policies.iter().map(|p| (p.policy.rule(), p.level))
    }

    /// Evalúa un import contra todas las políticas activas.
    ///
    /// Los imports ajenos a la arquitectura (archivo fuera de la raíz de
    /// código, paquete externo, ruta relativa que escapa de la raíz) no
    /// producen violaciones.
    pub fn check_edge(&self, edge: &ImportEdge) -> Vec<Violation> {
        self.evaluate(edge)
            .into_iter()
            .map(|(violation, _)| violation)
            .collect()
    }

    fn evaluate(&self, edge: &ImportEdge) -> Vec<(Violation, RuleLevel)> {
        let Ok(subject) = paths::source_segments(&edge.containing_file, &self.settings.src_path)
        else {
            return Vec::new();
        };

        let target = match classify::classify(
            &edge.raw_specifier,
            &edge.containing_file,
            &self.settings,
            &self.tree,
        ) {
            Ok(Some(target)) => target,
            Ok(None) | Err(_) => return Vec::new(),
        };

        self.run_policies(&subject, &target)
    }

    fn run_policies(&self, subject: &[String], target: &ImportTarget) -> Vec<(Violation, RuleLevel)> {
        let subject_pattern = match_pattern(subject, &self.tree);
        let target_pattern = match_pattern(&target.segments, &self.tree);

        let ctx = EdgeContext {
            tree: &self.tree,
            settings: &self.settings,
            subject,
            subject_pattern: &subject_pattern,
            target,
            target_pattern: &target_pattern,
            fixes: self.fixes,
        };

        self.policies
            .iter()
            .filter_map(|active| active.policy.check(&ctx).map(|v| (v, active.level)))
            .collect()
    }

    /// Extrae los imports de `content` y devuelve sus violaciones con línea y
    /// posición. `path` elige la gramática y es el archivo de cada import.
    pub fn validate_file(&self, path: &Path, content: &str) -> anyhow::Result<Vec<RuleViolation>> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let Some(language) = languages::get_language(ext) else {
            return Ok(Vec::new());
        };

        let containing_file = path.to_string_lossy();
        let mut violations = Vec::new();

        for import in languages::typescript::extract_imports(&language, content)? {
            let edge = ImportEdge::new(&*containing_file, import.specifier.as_str());
            for (violation, level) in self.evaluate(&edge) {
                violations.push(RuleViolation {
                    rule: violation.kind.rule(),
                    kind: violation.kind,
                    message: violation.kind.message().to_string(),
                    level,
                    line: Some(import.line),
                    specifier: import.specifier.clone(),
                    replacement: violation.replacement,
                    span: Some(import.span.clone()),
                });
            }
        }

        Ok(violations)
    }

    pub fn describe(&self, path: &str) -> FsdResult<PathReport> {
        let segments = paths::source_segments(path, &self.settings.src_path)?;
        let pattern = match_pattern(&segments, &self.tree);
        let layer = segments
            .first()
            .and_then(|first| self.tree.layer_index(first).map(|i| (first.clone(), i)));
        let module = pattern
            .identity(&segments)
            .into_iter()
            .map(str::to_string)
            .collect();

        Ok(PathReport {
            segments,
            pattern,
            layer,
            module,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::rules::ViolationKind;

    pub(crate) fn engine() -> RuleEngine {
        engine_with("@/", "src/")
    }

    pub(crate) fn engine_with(alias: &str, src_path: &str) -> RuleEngine {
        let mut config = FsdConfig::starter();
        config.alias = alias.to_string();
        config.src_path = src_path.to_string();
        RuleEngine::from_config(&config).unwrap().with_fixes(true)
    }

    pub(crate) fn violations_of(
        engine: &RuleEngine,
        file: &str,
        specifier: &str,
        rule: RuleId,
    ) -> Vec<Violation> {
        engine
            .check_edge(&ImportEdge::new(file, specifier))
            .into_iter()
            .filter(|v| v.kind.rule() == rule)
            .collect()
    }

    #[test]
    fn test_file_outside_source_tree_is_not_applicable() {
        let found = engine().check_edge(&ImportEdge::new(
            "home/projects/lib/app/index.ts",
            "@/widgets/widget-name/internal.ts",
        ));
        assert!(found.is_empty());
    }

    #[test]
    fn test_bare_packages_never_trigger() {
        let engine = engine();
        for specifier in ["react", "@reduxjs/toolkit", "node:path", "@/unknown/x"] {
            let found = engine.check_edge(&ImportEdge::new(
                "home/projects/src/features/auth/index.ts",
                specifier,
            ));
            assert!(found.is_empty(), "{specifier}");
        }
    }

    #[test]
    fn test_several_rules_can_fire_on_one_edge() {
        let found = engine().check_edge(&ImportEdge::new(
            "home/projects/src/features/auth/index.ts",
            "@/widgets/header/ui/index.ts",
        ));
        let kinds: Vec<ViolationKind> = found.iter().map(|v| v.kind).collect();
        assert_eq!(kinds, vec![ViolationKind::PublicApiBoundary, ViolationKind::LayerOrder]);
    }

    #[test]
    fn test_redundant_parts_in_aliased_specifiers() {
        let engine = engine();
        let found = engine.check_edge(&ImportEdge::new(
            "home/projects/src/features/auth/index.ts",
            "@/shared//ui/button",
        ));
        assert!(found.is_empty());

        let found = engine.check_edge(&ImportEdge::new(
            "home/projects/src/features/a/ui/Form.tsx",
            "@/features/a/./model",
        ));
        assert_eq!(found[0].kind, ViolationKind::ShouldBeRelative);
        assert_eq!(found[0].replacement.as_deref(), Some("../model"));

        let found = engine.check_edge(&ImportEdge::new(
            "home/projects/src/entities/user/ui/Card.tsx",
            "@/entities/user/../../app",
        ));
        assert_eq!(
            found,
            vec![Violation {
                kind: ViolationKind::LayerOrder,
                replacement: None,
            }]
        );
    }

    #[test]
    fn test_fixes_are_only_computed_when_enabled() {
        let engine = engine().with_fixes(false);
        let found = engine.check_edge(&ImportEdge::new(
            "home/projects/src/app/index.ts",
            "@/shared/ui/molecules/index.ts",
        ));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].replacement, None);
    }

    #[test]
    fn test_disabled_rules_are_skipped_and_levels_applied() {
        let mut config = FsdConfig::starter();
        config.rules.layer_imports.enabled = false;
        config.rules.public_api.level = RuleLevel::Warning;
        let engine = RuleEngine::from_config(&config).unwrap();

        let rules: Vec<(RuleId, RuleLevel)> = engine.enabled_rules().collect();
        assert_eq!(
            rules,
            vec![
                (RuleId::FsdRelativePath, RuleLevel::Error),
                (RuleId::AbsolutePublicApiImports, RuleLevel::Warning),
            ]
        );
    }

    #[test]
    fn test_policies_build_from_default() {
        let policies: Vec<Box<dyn ImportPolicy + Send + Sync>> = vec![
            Box::new(RelativePathPolicy::default()),
            Box::new(PublicApiPolicy::default()),
            Box::new(LayerImportsPolicy::default()),
        ];
        let rules: Vec<RuleId> = policies.iter().map(|p| p.rule()).collect();
        assert_eq!(rules, RuleId::ALL.to_vec());
    }

    #[test]
    fn test_validate_file_locates_violations() {
        let content = "import { Button } from '@/shared/ui/button/Button.tsx';\nimport React from 'react';\nimport { api } from '../../shared/api';\n";
        let path = Path::new("home/projects/src/features/auth/index.ts");
        let found = engine().validate_file(path, content).unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].rule, RuleId::AbsolutePublicApiImports);
        assert_eq!(found[0].line, Some(1));
        assert_eq!(found[0].replacement.as_deref(), Some("@/shared/ui/button"));
        assert_eq!(found[1].kind, ViolationKind::ShouldBeAbsolute);
        assert_eq!(found[1].line, Some(3));
        assert_eq!(found[1].replacement.as_deref(), Some("@/shared/api"));
        assert_eq!(&content[found[1].span.clone().unwrap()], "'../../shared/api'");
    }

    #[test]
    fn test_validate_file_ignores_unknown_extensions() {
        let found = engine()
            .validate_file(Path::new("src/app/styles.css"), "@import '@/shared/x';")
            .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_describe_path() {
        let report = engine()
            .describe("C:\\projects\\src\\shared\\ui\\molecules\\index.ts")
            .unwrap();
        assert_eq!(report.pattern.to_string(), "shared/ui/**");
        assert_eq!(report.module, vec!["shared", "ui", "molecules"]);
        assert_eq!(report.layer, Some(("shared".to_string(), 6)));
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RuleEngine>();

        let engine = Arc::new(engine());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || {
                    engine
                        .check_edge(&ImportEdge::new(
                            "home/projects/src/features/a/index.ts",
                            "@/widgets/w",
                        ))
                        .len()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1);
        }
    }
}
