use crate::timeline::{Timeline, UserLoad};
use anyhow::Result;
use chrono::SecondsFormat;
use std::fmt::Write as _;

/// Permet de choisir le rendu de la chronologie (JSON, CSV, texte).
pub trait TimelineRenderer {
    fn render(&self, timeline: &Timeline) -> Result<String>;
}

/// Une ligne par shift : `user | start → end`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

impl TimelineRenderer for TextRenderer {
    fn render(&self, timeline: &Timeline) -> Result<String> {
        let mut out = String::new();
        for shift in timeline {
            writeln!(
                out,
                "{} | {} → {}",
                shift.user,
                shift.start().to_rfc3339_opts(SecondsFormat::AutoSi, true),
                shift.end().to_rfc3339_opts(SecondsFormat::AutoSi, true)
            )?;
        }
        Ok(out)
    }
}

/// Tableau `[{user, start_at, end_at}]`, indenté.
#[cfg(feature = "serde")]
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer;

#[cfg(feature = "serde")]
impl TimelineRenderer for JsonRenderer {
    fn render(&self, timeline: &Timeline) -> Result<String> {
        let mut json = crate::io::timeline_to_json(timeline)?;
        json.push('\n');
        Ok(json)
    }
}

#[cfg(feature = "serde")]
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvRenderer;

#[cfg(feature = "serde")]
impl TimelineRenderer for CsvRenderer {
    fn render(&self, timeline: &Timeline) -> Result<String> {
        let mut buf = Vec::new();
        crate::io::write_timeline_csv(&mut buf, timeline)?;
        Ok(String::from_utf8(buf)?)
    }
}

/// Résumé de charge : `user  shifts  hours`.
pub fn render_load(loads: &[UserLoad]) -> String {
    let width = loads
        .iter()
        .map(|l| l.user.as_str().len())
        .max()
        .unwrap_or(0)
        .max("user".len());
    let mut out = format!("{:<width$}  {:>6}  {:>8}\n", "user", "shifts", "hours");
    for load in loads {
        out.push_str(&format!(
            "{:<width$}  {:>6}  {:>8.2}\n",
            load.user.as_str(),
            load.shifts,
            load.hours()
        ));
    }
    out
}
