//! # Normalización de rutas
//!
//! Convierte rutas de cualquier sistema en las secuencias de segmentos que
//! usa el emparejador. Todo trabaja sobre cadenas, sin tocar el disco:
//! `C:\projects\src\app\index.ts` y `home/projects/src/app/index.ts` se
//! clasifican igual en cualquier máquina.

use crate::error::{FsdError, FsdResult};

/// Marcador de la raíz de código cuando la configuración no define `src_path`.
pub const DEFAULT_SRC_PATH: &str = "src/";

/// Divide una ruta en componentes: `\` pasa a `/`, se descartan los vacíos
/// y `.`, y cada `..` se colapsa con el componente anterior.
///
/// Un `..` inicial sin nada contra qué colapsar se conserva.
pub fn components(path: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    push_components(&mut out, path);
    out
}

fn push_components(out: &mut Vec<String>, path: &str) {
    for part in path.split(['/', '\\']) {
        match part {
            "" | "." => {}
            ".." => match out.last().map(String::as_str) {
                Some("..") | None => out.push("..".to_string()),
                Some(_) => {
                    out.pop();
                }
            },
            other => out.push(other.to_string()),
        }
    }
}

/// `path` con `/` como separador y sin componentes redundantes.
pub fn normalize_path(path: &str) -> String {
    components(path).join("/")
}

/// Quita todo hasta la primera aparición del marcador de la raíz de código,
/// incluida, y devuelve los segmentos que siguen.
///
/// El marcador se compara por componentes completos: `"src/"` encaja en
/// `home/projects/src/app` pero no en `home/mysrc/app`. Un marcador vacío
/// indica que la ruta ya es relativa a la raíz de código.
pub fn source_segments(path: &str, src_marker: &str) -> FsdResult<Vec<String>> {
    strip_source_root(components(path), path, src_marker)
}

fn strip_source_root(
    parts: Vec<String>,
    original: &str,
    src_marker: &str,
) -> FsdResult<Vec<String>> {
    let marker = components(src_marker);
    if marker.is_empty() {
        return Ok(parts);
    }

    let start = parts
        .windows(marker.len())
        .position(|window| window == marker.as_slice());

    match start {
        Some(index) => Ok(parts[index + marker.len()..].to_vec()),
        None => Err(FsdError::NotInSourceTree {
            path: original.to_string(),
            marker: src_marker.to_string(),
        }),
    }
}

/// Resuelve un especificador relativo desde el directorio de
/// `containing_file` y devuelve los segmentos tras la raíz de código.
///
/// ```text
/// resolve_relative("home/projects/src/entities/user/index.ts", "../../shared/ui", "src/")
///   -> ["shared", "ui"]
/// ```
pub fn resolve_relative(
    containing_file: &str,
    specifier: &str,
    src_marker: &str,
) -> FsdResult<Vec<String>> {
    let mut parts = components(containing_file);
    // Directorio del archivo
    parts.pop();
    push_components(&mut parts, specifier);
    strip_source_root(parts, containing_file, src_marker)
}

/// Especificador relativo más corto del directorio `from_dir` a `to`, ambos
/// bajo la misma raíz.
///
/// Las rutas que no suben empiezan con `./`.
pub fn relative_between<A, B>(from_dir: &[A], to: &[B]) -> String
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let common = from_dir
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a.as_ref() == b.as_ref())
        .count();

    let ups = from_dir.len() - common;
    let rest: Vec<&str> = to[common..].iter().map(AsRef::as_ref).collect();

    if ups == 0 {
        return if rest.is_empty() {
            ".".to_string()
        } else {
            format!("./{}", rest.join("/"))
        };
    }

    let mut parts: Vec<&str> = vec![".."; ups];
    parts.extend(rest);
    parts.join("/")
}
