use crate::config::{FsdConfig, RulesConfig};
use crate::rules::{RuleId, RuleLevel};
use colored::Colorize;

pub fn handle_rules_command(project_root: &std::path::Path) -> anyhow::Result<()> {
    let config = FsdConfig::load(project_root)?;
    let rules_cfg = config.as_ref().map(|c| c.rules.clone()).unwrap_or_default();

    println!("\n{}", "Reglas:".bold());
    for line in rule_lines(&rules_cfg) {
        println!("{}", line);
    }

    println!();
    if config.is_none() {
        println!("   Info: No se encontró .fsdrc.toml. Usando valores por defecto.");
    } else {
        println!("   Info: Para cambiar una regla, edita su sección en .fsdrc.toml:");
    }
    println!("   [rules.layer-imports]");
    println!("   enabled = {}", rules_cfg.layer_imports.enabled);
    println!("   level = \"{}\"", rules_cfg.layer_imports.level.as_str());
    Ok(())
}

fn rule_lines(rules_cfg: &RulesConfig) -> Vec<String> {
    RuleId::ALL
        .iter()
        .map(|&rule| {
            let settings = rules_cfg.get(rule);
            let status = if settings.enabled {
                "[ON] ".green()
            } else {
                "[OFF]".red()
            };
            let level = format!("[{}]", settings.level.as_str().to_uppercase());
            let level = match settings.level {
                RuleLevel::Error => level.red(),
                RuleLevel::Warning => level.yellow(),
                RuleLevel::Info => level.blue(),
            };
            format!(
                "  {} {:<30} {:<10} {}",
                status,
                rule.as_str().yellow(),
                level,
                rule.description()
            )
        })
        .collect()
}
