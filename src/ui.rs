//! Módulo de interfaz de usuario
//!
//! Helpers de terminal compartidos por los comandos.

use colored::*;

/// Spinner mostrado mientras se revisan los archivos.
pub fn crear_progreso(mensaje: &str) -> indicatif::ProgressBar {
    let pb = indicatif::ProgressBar::new_spinner();
    if let Ok(style) = indicatif::ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(mensaje.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

pub fn mostrar_encabezado(titulo: &str) {
    println!();
    println!("{}", format!("🧭 fsd-lint · {}", titulo).bright_cyan().bold());
    println!("{}", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_cyan());
}

pub fn mostrar_error(err: &anyhow::Error) {
    eprintln!("{} {}", "❌".red(), err.to_string().red().bold());
    for cause in err.chain().skip(1) {
        eprintln!("   {} {}", "↳".dimmed(), cause);
    }
}
