//! # Arreglos automáticos
//!
//! Solo produce el texto del nuevo especificador. Insertarlo en el archivo
//! (con las comillas originales) lo hace `commands::check`.

use crate::error::FsdResult;
use crate::rules::ViolationKind;
use crate::rules::classify::PathSettings;
use crate::rules::paths;
use crate::rules::pattern::Pattern;

/// `alias + patrón`, con cada comodín sustituido por su segmento.
pub fn absolute_specifier<S: AsRef<str>>(
    settings: &PathSettings,
    target_segments: &[S],
    target_pattern: &Pattern,
) -> FsdResult<String> {
    let concrete = target_pattern.materialize(target_segments)?;
    Ok(settings.with_alias(&concrete.join("/")))
}

/// Ruta relativa del directorio del archivo al destino completo.
pub fn relative_specifier<A, B>(
    subject_segments: &[A],
    target_segments: &[B],
    target_pattern: &Pattern,
) -> FsdResult<String>
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    // Solo comprueba que cada comodín nombre un directorio real.
    target_pattern.materialize(target_segments)?;

    let subject_dir = &subject_segments[..subject_segments.len().saturating_sub(1)];
    Ok(paths::relative_between(subject_dir, target_segments))
}

/// Texto de reemplazo para una violación de `kind`, u `Ok(None)` si la
/// política no tiene arreglo (orden de capas).
pub fn compute_replacement<A, B>(
    kind: ViolationKind,
    settings: &PathSettings,
    subject_segments: &[A],
    target_segments: &[B],
    target_pattern: &Pattern,
) -> FsdResult<Option<String>>
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    match kind {
        ViolationKind::PublicApiBoundary | ViolationKind::ShouldBeAbsolute => {
            absolute_specifier(settings, target_segments, target_pattern).map(Some)
        }
        ViolationKind::ShouldBeRelative => {
            relative_specifier(subject_segments, target_segments, target_pattern).map(Some)
        }
        ViolationKind::LayerOrder => Ok(None),
    }
}
