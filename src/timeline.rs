use crate::model::{Interval, Shift, UserId};
use chrono::{DateTime, Duration, Utc};

/// Chronologie résolue : shifts triés, contigus, sans chevauchement, sans
/// deux shifts consécutifs du même utilisateur. Recalculée à chaque appel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    window: Interval,
    shifts: Vec<Shift>,
}

/// Charge d'astreinte d'un utilisateur sur la fenêtre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserLoad {
    pub user: UserId,
    pub shifts: usize,
    pub on_call: Duration,
}

impl UserLoad {
    pub fn hours(&self) -> f64 {
        self.on_call.num_seconds() as f64 / 3600.0
    }
}

impl Timeline {
    pub(crate) fn new(window: Interval, shifts: Vec<Shift>) -> Self {
        Self { window, shifts }
    }

    pub fn window(&self) -> &Interval {
        &self.window
    }

    pub fn shifts(&self) -> &[Shift] {
        &self.shifts
    }

    pub fn into_shifts(self) -> Vec<Shift> {
        self.shifts
    }

    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Shift> {
        self.shifts.iter()
    }

    /// Shift couvrant `at`, `None` hors de la fenêtre.
    pub fn on_call_at(&self, at: DateTime<Utc>) -> Option<&Shift> {
        let idx = self.shifts.partition_point(|s| s.end() <= at);
        self.shifts.get(idx).filter(|s| s.interval.contains(at))
    }

    /// Nombre de shifts et durée cumulée par utilisateur, dans l'ordre de
    /// première apparition.
    pub fn load_by_user(&self) -> Vec<UserLoad> {
        let mut loads: Vec<UserLoad> = Vec::new();
        for shift in &self.shifts {
            match loads.iter_mut().find(|l| l.user == shift.user) {
                Some(load) => {
                    load.shifts += 1;
                    load.on_call = load.on_call + shift.interval.duration();
                }
                None => loads.push(UserLoad {
                    user: shift.user.clone(),
                    shifts: 1,
                    on_call: shift.interval.duration(),
                }),
            }
        }
        loads
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a Shift;
    type IntoIter = std::slice::Iter<'a, Shift>;

    fn into_iter(self) -> Self::IntoIter {
        self.shifts.iter()
    }
}

impl IntoIterator for Timeline {
    type Item = Shift;
    type IntoIter = std::vec::IntoIter<Shift>;

    fn into_iter(self) -> Self::IntoIter {
        self.shifts.into_iter()
    }
}
