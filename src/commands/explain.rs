//! # Explain
//!
//! Muestra lo que el motor deduce de una ruta: segmentos, patrón de la
//! estructura, capa e identidad del módulo. Con `--import` hace lo mismo con
//! el destino del import y añade el veredicto de cada regla.

use crate::commands::Project;
use crate::rules::classify::{self, ImportKind};
use crate::rules::engine::PathReport;
use crate::rules::pattern::match_pattern;
use crate::rules::{ImportEdge, RuleEngine};
use colored::*;

fn print_report(report: &PathReport) {
    println!("   segments : {}", report.segments.join(" / "));
    println!("   pattern  : {}", report.pattern.to_string().cyan());
    match &report.layer {
        Some((name, index)) => println!("   layer    : {} (#{})", name.green(), index),
        None => println!("   layer    : {}", "none".dimmed()),
    }
    if report.module.is_empty() {
        println!("   module   : {}", "outside the project structure".yellow());
    } else {
        println!("   module   : {}", report.module.join("/").bold());
    }
}

pub fn handle_explain(project: &Project, path: &str, import: Option<&str>) -> anyhow::Result<()> {
    let engine = RuleEngine::from_config(&project.config)?.with_fixes(true);
    let path = path.replace('\\', "/");

    println!("\n📄 {}", path.bold().cyan());
    let report = match engine.describe(&path) {
        Ok(report) => report,
        Err(err) => {
            println!("   {} {}", "ℹ️".blue(), err);
            println!("   Las reglas no se aplican a este archivo.");
            return Ok(());
        }
    };
    print_report(&report);

    let Some(specifier) = import else {
        return Ok(());
    };

    println!("\n🔗 import '{}'", specifier.bold());
    let target = classify::classify(specifier, &path, engine.settings(), engine.tree());
    let target = match target {
        Ok(Some(target)) => target,
        Ok(None) => {
            println!("   {} Import externo (paquete o alias ajeno): no se revisa.", "ℹ️".blue());
            return Ok(());
        }
        Err(err) => {
            println!("   {} {}", "ℹ️".blue(), err);
            return Ok(());
        }
    };

    let kind = match target.kind {
        ImportKind::Relative => "relative",
        ImportKind::Absolute => "absolute",
    };
    let pattern = match_pattern(&target.segments, engine.tree());
    println!("   kind     : {}", kind);
    println!("   segments : {}", target.segments.join(" / "));
    println!("   pattern  : {}", pattern.to_string().cyan());
    println!("   module   : {}", pattern.identity(&target.segments).join("/").bold());

    let violations = engine.check_edge(&ImportEdge::new(path.as_str(), specifier));
    if violations.is_empty() {
        println!("\n   ✅ Import permitido.");
    }
    for v in violations {
        println!("\n   ❌ [{}] {}", v.kind.rule().as_str().yellow(), v.kind.message());
        if let Some(replacement) = v.replacement {
            println!("      {} fixable: '{}'", "👉".dimmed(), replacement);
        }
    }
    Ok(())
}
