mod overrides;
mod rotation;
mod types;
mod util;

pub use overrides::resolve;
pub use rotation::{generate, Slots};
pub use types::SchedError;

use crate::model::{Interval, Override, RotationSpec, Shift};
use crate::timeline::Timeline;
use chrono::{DateTime, Utc};

/// Scheduler : une rotation validée et ses overrides
#[derive(Debug, Clone)]
pub struct Scheduler {
    spec: RotationSpec,
    overrides: Vec<Override>,
}

impl Scheduler {
    pub fn new(spec: RotationSpec) -> Result<Self, SchedError> {
        spec.validate()?;
        Ok(Self {
            spec,
            overrides: Vec::new(),
        })
    }

    pub fn with_overrides(mut self, overrides: Vec<Override>) -> Self {
        self.overrides.extend(overrides);
        self
    }

    pub fn spec(&self) -> &RotationSpec {
        &self.spec
    }

    pub fn overrides(&self) -> &[Override] {
        &self.overrides
    }

    /// Chronologie résolue sur `window` : rotation de base puis overrides.
    pub fn timeline(&self, window: &Interval) -> Result<Timeline, SchedError> {
        let base = generate(&self.spec, window)?;
        resolve(&base, &self.overrides, window)
    }

    /// Shift résolu couvrant `at`.
    ///
    /// La résolution se fait sur une période de rotation de part et d'autre de
    /// `at` : les bornes du shift renvoyé sont limitées à cette fenêtre.
    pub fn on_call_at(&self, at: DateTime<Utc>) -> Result<Shift, SchedError> {
        let period = self.spec.period()?;
        let start = at.checked_sub_signed(period).unwrap_or(DateTime::<Utc>::MIN_UTC);
        let end = at.checked_add_signed(period).unwrap_or(DateTime::<Utc>::MAX_UTC);
        let timeline = self.timeline(&Interval::new(start, end))?;
        timeline.on_call_at(at).cloned().ok_or_else(|| {
            SchedError::InvalidWindow(format!("no shift covers {}", at.to_rfc3339()))
        })
    }
}
