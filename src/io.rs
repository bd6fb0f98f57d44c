use crate::model::{Interval, Override, RotationSpec, Shift, UserId};
use crate::timeline::Timeline;
use anyhow::Context;
use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Fichier de planning : `{users, handover_start_at, handover_interval_days}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleFile {
    pub users: Vec<String>,
    pub handover_start_at: String,
    pub handover_interval_days: i64,
}

impl ScheduleFile {
    pub fn into_spec(self) -> anyhow::Result<RotationSpec> {
        let anchor = parse_point(&self.handover_start_at).context("handover_start_at")?;
        Ok(RotationSpec::new(
            self.users,
            anchor,
            self.handover_interval_days,
        ))
    }
}

/// Entrée d'override ou de chronologie : `{user, start_at, end_at}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftEntry {
    pub user: String,
    pub start_at: String,
    pub end_at: String,
}

impl ShiftEntry {
    pub fn into_override(self) -> anyhow::Result<Override> {
        let start = parse_point(&self.start_at)
            .with_context(|| format!("start_at of override for {}", self.user))?;
        let end = parse_point(&self.end_at)
            .with_context(|| format!("end_at of override for {}", self.user))?;
        Ok(Override::new(UserId::from(self.user), start, end))
    }
}

impl From<&Shift> for ShiftEntry {
    fn from(shift: &Shift) -> Self {
        Self {
            user: shift.user.as_str().to_string(),
            start_at: format_point(shift.start()),
            end_at: format_point(shift.end()),
        }
    }
}

/// Instant RFC3339 (tout décalage, ramené en UTC) ou date seule `YYYY-MM-DD`
/// (minuit UTC).
pub fn parse_point(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = raw.parse::<DateTime<Utc>>() {
        return Ok(dt);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date/datetime: {raw}"))?;
    let datetime = date
        .and_hms_opt(0, 0, 0)
        .context("invalid midnight conversion")?;
    Ok(Utc.from_utc_datetime(&datetime))
}

/// `2025-11-07T17:00:00Z` ; fraction de seconde seulement si non nulle.
pub fn format_point(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Fenêtre `[from, until)` à partir des paramètres texte.
pub fn parse_window(from: &str, until: &str) -> anyhow::Result<Interval> {
    let start = parse_point(from).context("--from")?;
    let end = parse_point(until).context("--until")?;
    Ok(Interval::new(start, end))
}

pub fn load_schedule<P: AsRef<Path>>(path: P) -> anyhow::Result<RotationSpec> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file: ScheduleFile = serde_json::from_slice(&data)
        .with_context(|| format!("parsing schedule {}", path.display()))?;
    file.into_spec()
        .with_context(|| format!("invalid schedule {}", path.display()))
}

pub fn load_overrides<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Override>> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let entries: Vec<ShiftEntry> = serde_json::from_slice(&data)
        .with_context(|| format!("parsing overrides {}", path.display()))?;
    entries
        .into_iter()
        .map(ShiftEntry::into_override)
        .collect::<anyhow::Result<Vec<_>>>()
        .with_context(|| format!("invalid overrides {}", path.display()))
}

pub fn timeline_entries(timeline: &Timeline) -> Vec<ShiftEntry> {
    timeline.iter().map(ShiftEntry::from).collect()
}

/// JSON de la chronologie, indenté sur 2 espaces.
pub fn timeline_to_json(timeline: &Timeline) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&timeline_entries(timeline))?)
}

/// CSV de la chronologie: header `user,start_at,end_at`
pub fn write_timeline_csv<W: Write>(out: W, timeline: &Timeline) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_writer(out);
    for entry in timeline_entries(timeline) {
        w.serialize(entry)?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_point_normalizes_offsets() {
        let utc = parse_point("2025-11-07T17:00:00Z").unwrap();
        let paris = parse_point("2025-11-07T18:00:00+01:00").unwrap();
        assert_eq!(utc, paris);
        assert_eq!(format_point(paris), "2025-11-07T17:00:00Z");
    }

    #[test]
    fn parse_point_accepts_bare_date() {
        let dt = parse_point("2025-11-07").unwrap();
        assert_eq!(format_point(dt), "2025-11-07T00:00:00Z");
    }

    #[test]
    fn parse_point_rejects_garbage() {
        assert!(parse_point("next tuesday").is_err());
    }

    #[test]
    fn format_point_keeps_fraction_when_present() {
        let dt = parse_point("2025-11-07T17:00:00.250Z").unwrap();
        assert_eq!(format_point(dt), "2025-11-07T17:00:00.250Z");
    }
}
