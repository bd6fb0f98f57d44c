use super::{util, SchedError};
use crate::model::{Interval, RotationSpec, Shift};
use chrono::{DateTime, Duration, Utc};

const SECONDS_PER_DAY: i64 = 86_400;

impl RotationSpec {
    /// Vérifie le roster et la période de relève.
    pub fn validate(&self) -> Result<(), SchedError> {
        if self.users.is_empty() {
            return Err(SchedError::InvalidSpec(
                "users must contain at least one user".to_string(),
            ));
        }
        if self.handover_interval_days <= 0 {
            return Err(SchedError::InvalidSpec(format!(
                "handover_interval_days must be > 0 (got {})",
                self.handover_interval_days
            )));
        }
        Ok(())
    }

    fn period_seconds(&self) -> Result<i64, SchedError> {
        self.validate()?;
        self.handover_interval_days
            .checked_mul(SECONDS_PER_DAY)
            .ok_or_else(|| {
                SchedError::InvalidSpec(format!(
                    "handover_interval_days too large (got {})",
                    self.handover_interval_days
                ))
            })
    }

    /// Durée d'un slot.
    pub fn period(&self) -> Result<Duration, SchedError> {
        let secs = self.period_seconds()?;
        Duration::try_seconds(secs).ok_or_else(|| {
            SchedError::InvalidSpec(format!(
                "handover_interval_days too large (got {})",
                self.handover_interval_days
            ))
        })
    }

    fn slot_start(&self, k: i64, period_secs: i64) -> Result<DateTime<Utc>, SchedError> {
        k.checked_mul(period_secs)
            .and_then(Duration::try_seconds)
            .and_then(|offset| self.handover_start_at.checked_add_signed(offset))
            .ok_or_else(|| {
                SchedError::InvalidWindow(format!(
                    "rotation slot {k} falls outside the representable time range"
                ))
            })
    }

    /// Slot `k` non borné ; `k` négatif désigne les relèves antérieures à
    /// `handover_start_at`.
    pub fn slot(&self, k: i64) -> Result<Shift, SchedError> {
        let period_secs = self.period_seconds()?;
        let next = k.checked_add(1).ok_or_else(|| {
            SchedError::InvalidWindow(format!("rotation slot {k} has no successor"))
        })?;
        let start = self.slot_start(k, period_secs)?;
        let end = self.slot_start(next, period_secs)?;
        let idx = k.rem_euclid(self.users.len() as i64) as usize;
        Ok(Shift::new(
            self.users[idx].clone(),
            Interval::new(start, end),
        ))
    }

    /// Index du slot contenant `at`.
    pub fn slot_index_at(&self, at: DateTime<Utc>) -> Result<i64, SchedError> {
        let period_secs = self.period_seconds()?;
        let elapsed = at - self.handover_start_at;
        // num_seconds tronque vers zéro : on recale sur les bornes exactes.
        let mut k = elapsed.num_seconds().div_euclid(period_secs);
        while self.slot_start(k, period_secs)? > at {
            k -= 1;
        }
        while self.slot_start(k + 1, period_secs)? <= at {
            k += 1;
        }
        Ok(k)
    }

    /// Suite infinie et paresseuse des slots à partir de `k`.
    pub fn slots_from(&self, k: i64) -> Result<Slots<'_>, SchedError> {
        self.validate()?;
        Ok(Slots {
            spec: self,
            next: Some(k),
        })
    }
}

/// Itérateur sur les slots consécutifs d'une rotation.
///
/// S'arrête seulement si l'instant suivant sort de la plage représentable.
#[derive(Debug, Clone)]
pub struct Slots<'a> {
    spec: &'a RotationSpec,
    next: Option<i64>,
}

impl Iterator for Slots<'_> {
    type Item = Shift;

    fn next(&mut self) -> Option<Shift> {
        let k = self.next?;
        let Ok(shift) = self.spec.slot(k) else {
            self.next = None;
            return None;
        };
        self.next = k.checked_add(1);
        Some(shift)
    }
}

/// Génère les shifts de base de la rotation, bornés à `window`.
///
/// Le résultat est trié, contigu, et couvre exactement `window`.
pub fn generate(spec: &RotationSpec, window: &Interval) -> Result<Vec<Shift>, SchedError> {
    spec.validate()?;
    util::validate_window(window)?;

    let first = spec.slot_index_at(window.start)?;
    let shifts: Vec<Shift> = spec
        .slots_from(first)?
        .take_while(|slot| slot.start() < window.end)
        .filter_map(|slot| slot.interval.clip(window).map(|iv| slot.with_interval(iv)))
        .collect();

    if !util::tiles(window, &shifts) {
        return Err(SchedError::InvalidWindow(format!(
            "rotation cannot cover {window} within the representable time range"
        )));
    }

    #[cfg(feature = "logging")]
    tracing::debug!(slots = shifts.len(), first_slot = first, "base rotation generated");

    Ok(shifts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserId;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 7, 17, 0, 0).unwrap()
    }

    fn spec(users: &[&str], days: i64) -> RotationSpec {
        RotationSpec::new(users.iter().copied(), t0(), days)
    }

    fn users(shifts: &[Shift]) -> Vec<&str> {
        shifts.iter().map(|s| s.user.as_str()).collect()
    }

    #[test]
    fn two_users_two_weeks() {
        let window = Interval::new(t0(), t0() + Duration::days(14));
        let shifts = generate(&spec(&["A", "B"], 7), &window).unwrap();
        assert_eq!(shifts.len(), 2);
        assert_eq!(shifts[0], Shift::new(UserId::new("A"), Interval::new(t0(), t0() + Duration::days(7))));
        assert_eq!(
            shifts[1],
            Shift::new(
                UserId::new("B"),
                Interval::new(t0() + Duration::days(7), t0() + Duration::days(14))
            )
        );
    }

    #[test]
    fn window_before_anchor_uses_negative_slots() {
        let window = Interval::new(t0() - Duration::days(10), t0() + Duration::days(1));
        let shifts = generate(&spec(&["alice", "bob", "charlie"], 7), &window).unwrap();
        // slot -2 -> bob, -1 -> charlie, 0 -> alice
        assert_eq!(users(&shifts), vec!["bob", "charlie", "alice"]);
        assert_eq!(shifts[0].start(), window.start);
        assert_eq!(shifts[0].end(), t0() - Duration::days(7));
        assert_eq!(shifts[2].end(), window.end);
    }

    #[test]
    fn far_future_window_wraps_roster() {
        // 100 semaines après l'ancre : slot 100, 100 mod 3 = 1
        let start = t0() + Duration::days(700) + Duration::hours(3);
        let window = Interval::new(start, start + Duration::hours(1));
        let shifts = generate(&spec(&["alice", "bob", "charlie"], 7), &window).unwrap();
        assert_eq!(users(&shifts), vec!["bob"]);
        assert_eq!(shifts[0].interval, window);
    }

    #[test]
    fn window_ending_on_handover_has_no_empty_tail() {
        let window = Interval::new(t0() + Duration::days(3), t0() + Duration::days(7));
        let shifts = generate(&spec(&["A", "B"], 7), &window).unwrap();
        assert_eq!(users(&shifts), vec!["A"]);
    }

    #[test]
    fn duplicate_users_are_distinct_slots() {
        let window = Interval::new(t0(), t0() + Duration::days(3));
        let shifts = generate(&spec(&["A", "A", "B"], 1), &window).unwrap();
        assert_eq!(users(&shifts), vec!["A", "A", "B"]);
    }

    #[test]
    fn sub_second_instant_before_handover() {
        let at = t0() - Duration::milliseconds(500);
        assert_eq!(spec(&["A", "B"], 7).slot_index_at(at).unwrap(), -1);
        assert_eq!(spec(&["A", "B"], 7).slot_index_at(t0()).unwrap(), 0);
    }

    #[test]
    fn slots_iterator_is_lazy_and_contiguous() {
        let rotation = spec(&["A", "B", "C"], 2);
        let slots: Vec<Shift> = rotation.slots_from(-1).unwrap().take(4).collect();
        assert_eq!(users(&slots), vec!["C", "A", "B", "C"]);
        assert!(slots.windows(2).all(|p| p[0].end() == p[1].start()));
    }

    #[test]
    fn rejects_empty_roster() {
        let window = Interval::new(t0(), t0() + Duration::days(1));
        let err = generate(&spec(&[], 7), &window).unwrap_err();
        assert!(matches!(err, SchedError::InvalidSpec(_)));
    }

    #[test]
    fn rejects_non_positive_interval() {
        let window = Interval::new(t0(), t0() + Duration::days(1));
        for days in [0, -7] {
            let err = generate(&spec(&["A"], days), &window).unwrap_err();
            assert!(matches!(err, SchedError::InvalidSpec(ref msg) if msg.contains("handover_interval_days")));
        }
    }

    #[test]
    fn rejects_inverted_or_empty_window() {
        let rotation = spec(&["A"], 7);
        let empty = Interval::new(t0(), t0());
        let inverted = Interval::new(t0() + Duration::days(1), t0());
        assert!(matches!(generate(&rotation, &empty), Err(SchedError::InvalidWindow(_))));
        assert!(matches!(generate(&rotation, &inverted), Err(SchedError::InvalidWindow(_))));
    }
}
