use super::SchedError;
use crate::model::{Interval, Shift};

pub(super) fn validate_window(window: &Interval) -> Result<(), SchedError> {
    if !window.is_valid() {
        return Err(SchedError::InvalidWindow(format!(
            "from ({}) must be strictly before until ({})",
            window.start.to_rfc3339(),
            window.end.to_rfc3339()
        )));
    }
    Ok(())
}

/// Morceaux de `shift` qui restent hors de `hole` (0, 1 ou 2), même utilisateur.
pub(super) fn carve(shift: &Shift, hole: &Interval) -> impl Iterator<Item = Shift> {
    let before = (shift.start() < hole.start)
        .then(|| shift.with_interval(Interval::new(shift.start(), hole.start.min(shift.end()))));
    let after = (hole.end < shift.end())
        .then(|| shift.with_interval(Interval::new(hole.end.max(shift.start()), shift.end())));
    before.into_iter().chain(after)
}

/// Vrai si `shifts` pave exactement `window` : triés, contigus, sans trou ni chevauchement.
pub(super) fn tiles(window: &Interval, shifts: &[Shift]) -> bool {
    let (Some(first), Some(last)) = (shifts.first(), shifts.last()) else {
        return false;
    };
    first.start() == window.start
        && last.end() == window.end
        && shifts.iter().all(|s| s.interval.is_valid())
        && shifts.windows(2).all(|pair| pair[0].end() == pair[1].start())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserId;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 10, h, 0, 0).unwrap()
    }

    fn shift(user: &str, from: u32, to: u32) -> Shift {
        Shift::new(UserId::new(user), Interval::new(at(from), at(to)))
    }

    #[test]
    fn carve_splits_around_inner_hole() {
        let pieces: Vec<_> = carve(&shift("alice", 0, 10), &Interval::new(at(3), at(5))).collect();
        assert_eq!(pieces, vec![shift("alice", 0, 3), shift("alice", 5, 10)]);
    }

    #[test]
    fn carve_truncates_one_side() {
        let left: Vec<_> = carve(&shift("bob", 4, 10), &Interval::new(at(2), at(6))).collect();
        assert_eq!(left, vec![shift("bob", 6, 10)]);
        let right: Vec<_> = carve(&shift("bob", 4, 10), &Interval::new(at(8), at(12))).collect();
        assert_eq!(right, vec![shift("bob", 4, 8)]);
    }

    #[test]
    fn carve_removes_covered_shift() {
        assert_eq!(carve(&shift("bob", 4, 10), &Interval::new(at(4), at(10))).count(), 0);
    }

    #[test]
    fn tiles_detects_gaps_and_overlaps() {
        let window = Interval::new(at(0), at(10));
        assert!(tiles(&window, &[shift("a", 0, 4), shift("b", 4, 10)]));
        assert!(!tiles(&window, &[shift("a", 0, 4), shift("b", 5, 10)]));
        assert!(!tiles(&window, &[shift("a", 0, 6), shift("b", 4, 10)]));
        assert!(!tiles(&window, &[]));
    }
}
