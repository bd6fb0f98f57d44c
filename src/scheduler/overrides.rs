use super::{util, SchedError};
use crate::model::{Interval, Override, Shift};
use crate::timeline::Timeline;

/// Applique les overrides sur les shifts de base et renvoie la chronologie résolue.
///
/// Les overrides sont triés par début d'origine (stable : à égalité, l'ordre
/// d'entrée est conservé), bornés à `window`, puis appliqués dans cet ordre ; chacun
/// recouvre la base et les overrides déjà appliqués. Les shifts contigus d'un
/// même utilisateur sont ensuite fusionnés.
pub fn resolve(
    base: &[Shift],
    overrides: &[Override],
    window: &Interval,
) -> Result<Timeline, SchedError> {
    util::validate_window(window)?;
    validate_base(base)?;
    validate_overrides(overrides)?;

    // Tri sur le début non borné : l'ordre ne dépend pas de la fenêtre.
    let mut sorted: Vec<&Override> = overrides.iter().collect();
    sorted.sort_by_key(|o| o.interval.start);
    let active: Vec<Shift> = sorted
        .into_iter()
        .filter_map(|o| o.interval.clip(window).map(|iv| Shift::new(o.user.clone(), iv)))
        .collect();

    #[cfg(feature = "logging")]
    tracing::debug!(
        given = overrides.len(),
        applied = active.len(),
        "overrides clipped to window"
    );

    let mut canvas: Vec<Shift> = base
        .iter()
        .filter_map(|s| s.interval.clip(window).map(|iv| s.with_interval(iv)))
        .collect();
    canvas.sort_by_key(|s| s.start());
    let base_tiles = util::tiles(window, &canvas);

    for shift in active {
        canvas = paint(canvas, shift);
    }
    canvas.sort_by_key(|s| s.start());

    let shifts = merge_adjacent(canvas);
    debug_assert!(!base_tiles || util::tiles(window, &shifts));
    debug_assert!(shifts
        .windows(2)
        .all(|pair| pair[0].user != pair[1].user || pair[0].end() != pair[1].start()));

    Ok(Timeline::new(*window, shifts))
}

fn validate_base(base: &[Shift]) -> Result<(), SchedError> {
    match base.iter().enumerate().find(|(_, s)| !s.interval.is_valid()) {
        Some((idx, s)) => Err(SchedError::InvalidSpec(format!(
            "base shift #{idx} for {}: start ({}) must be strictly before end ({})",
            s.user,
            s.start().to_rfc3339(),
            s.end().to_rfc3339()
        ))),
        None => Ok(()),
    }
}

fn validate_overrides(overrides: &[Override]) -> Result<(), SchedError> {
    match overrides.iter().enumerate().find(|(_, o)| !o.interval.is_valid()) {
        Some((idx, o)) => Err(SchedError::InvalidOverride(format!(
            "override #{idx} for {}: start_at ({}) must be strictly before end_at ({})",
            o.user,
            o.interval.start.to_rfc3339(),
            o.interval.end.to_rfc3339()
        ))),
        None => Ok(()),
    }
}

/// Retire de `canvas` tout ce que couvre `top`, puis y ajoute `top`.
fn paint(canvas: Vec<Shift>, top: Shift) -> Vec<Shift> {
    let mut out = Vec::with_capacity(canvas.len() + 2);
    for entry in canvas {
        if entry.interval.overlaps(&top.interval) {
            out.extend(util::carve(&entry, &top.interval));
        } else {
            out.push(entry);
        }
    }
    out.push(top);
    out
}

/// Fusionne les shifts consécutifs et contigus d'un même utilisateur.
/// `shifts` doit être trié par début.
fn merge_adjacent(shifts: Vec<Shift>) -> Vec<Shift> {
    let mut merged: Vec<Shift> = Vec::with_capacity(shifts.len());
    for shift in shifts {
        match merged.last_mut() {
            Some(last) if last.user == shift.user && last.end() == shift.start() => {
                *last = last.with_interval(Interval::new(last.start(), shift.end()));
            }
            _ => merged.push(shift),
        }
    }

    #[cfg(feature = "logging")]
    tracing::debug!(shifts = merged.len(), "timeline merged");

    merged
}
