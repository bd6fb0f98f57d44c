use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// Identifiant fort pour un membre d'astreinte
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(String);

impl UserId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Intervalle UTC semi-ouvert `[start, end)`.
///
/// Aucune validation à la construction : `generate` et `resolve` rejettent
/// les intervalles vides ou inversés avec l'erreur correspondant à leur rôle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// `start < end`
    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Intersection avec `window`, `None` si elle est vide.
    pub fn clip(&self, window: &Interval) -> Option<Interval> {
        let start = self.start.max(window.start);
        let end = self.end.min(window.end);
        (start < end).then_some(Interval { start, end })
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

/// Créneau d'astreinte résolu : un utilisateur sur un intervalle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shift {
    pub user: UserId,
    pub interval: Interval,
}

impl Shift {
    pub fn new(user: UserId, interval: Interval) -> Self {
        Self { user, interval }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.interval.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.interval.end
    }

    /// Copie du shift restreinte à `interval`, même utilisateur.
    pub fn with_interval(&self, interval: Interval) -> Self {
        Self {
            user: self.user.clone(),
            interval,
        }
    }
}

/// Remplacement ponctuel : `user` est d'astreinte sur `interval`, quelle que
/// soit la rotation. L'utilisateur n'a pas besoin de faire partie du roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Override {
    pub user: UserId,
    pub interval: Interval,
}

impl Override {
    pub fn new(user: UserId, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            user,
            interval: Interval::new(start, end),
        }
    }

    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.interval.contains(at)
    }
}

/// Rotation round-robin : le slot `k` couvre
/// `[handover_start_at + k·période, handover_start_at + (k+1)·période)`
/// et revient à `users[k mod len(users)]`, pour tout `k` (négatif compris).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationSpec {
    pub users: Vec<UserId>,
    pub handover_start_at: DateTime<Utc>,
    pub handover_interval_days: i64,
}

impl RotationSpec {
    pub fn new<I, U>(users: I, handover_start_at: DateTime<Utc>, handover_interval_days: i64) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<UserId>,
    {
        Self {
            users: users.into_iter().map(Into::into).collect(),
            handover_start_at,
            handover_interval_days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 10, h, 0, 0).unwrap()
    }

    #[test]
    fn clip_keeps_intersection_only() {
        let window = Interval::new(at(8), at(12));
        let inner = Interval::new(at(6), at(10)).clip(&window).unwrap();
        assert_eq!(inner, Interval::new(at(8), at(10)));
        assert!(Interval::new(at(12), at(14)).clip(&window).is_none());
        assert!(Interval::new(at(2), at(8)).clip(&window).is_none());
    }

    #[test]
    fn half_open_bounds() {
        let iv = Interval::new(at(8), at(12));
        assert!(iv.contains(at(8)));
        assert!(!iv.contains(at(12)));
        assert!(!iv.overlaps(&Interval::new(at(12), at(13))));
        assert!(iv.overlaps(&Interval::new(at(11), at(13))));
    }

    #[test]
    fn inverted_interval_is_not_valid() {
        assert!(!Interval::new(at(10), at(10)).is_valid());
        assert!(!Interval::new(at(11), at(10)).is_valid());
        assert!(Interval::new(at(10), at(11)).is_valid());
    }
}
