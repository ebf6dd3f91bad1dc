#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Piecewise-linear curve through `(time, value)` control points.
///
/// Used as a timing envelope: it maps output times onto the times at which
/// source partials are sampled.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinearEnvelope {
    /// Sorted by time, times unique
    points: Vec<(f64, f64)>,
}

impl LinearEnvelope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Envelope holding the single point `(0, value)`, constant everywhere.
    pub fn constant(value: f64) -> Self {
        Self {
            points: vec![(0.0, value)],
        }
    }

    /// Add a control point, replacing any point already at `time`.
    pub fn insert(&mut self, time: f64, value: f64) {
        let idx = self.points.partition_point(|(t, _)| *t < time);
        match self.points.get_mut(idx) {
            Some(point) if point.0 == time => point.1 = value,
            _ => self.points.insert(idx, (time, value)),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_time(&self) -> Option<f64> {
        self.points.first().map(|(t, _)| *t)
    }

    pub fn last_time(&self) -> Option<f64> {
        self.points.last().map(|(t, _)| *t)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (f64, f64)> + ExactSizeIterator + '_ {
        self.points.iter().copied()
    }

    /// Interpolated value at `time`, held constant past either end.
    /// An empty envelope is 0 everywhere.
    pub fn value_at(&self, time: f64) -> f64 {
        let (Some(&(t_first, v_first)), Some(&(t_last, v_last))) =
            (self.points.first(), self.points.last())
        else {
            return 0.0;
        };

        if time <= t_first {
            return v_first;
        }
        if time >= t_last {
            return v_last;
        }

        let hi = self.points.partition_point(|(t, _)| *t <= time);
        let (t0, v0) = self.points[hi - 1];
        let (t1, v1) = self.points[hi];
        v0 + (v1 - v0) * (time - t0) / (t1 - t0)
    }
}

impl FromIterator<(f64, f64)> for LinearEnvelope {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(iter: I) -> Self {
        let mut env = LinearEnvelope::new();
        for (time, value) in iter {
            env.insert(time, value);
        }
        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_envelope_is_zero() {
        let env = LinearEnvelope::new();
        assert!(env.is_empty());
        assert_eq!(env.value_at(3.0), 0.0);
        assert_eq!(env.first_time(), None);
    }

    #[test]
    fn values_are_clamped_outside_range() {
        let env: LinearEnvelope = [(1.0, 10.0), (2.0, 20.0)].into_iter().collect();
        assert_eq!(env.value_at(0.0), 10.0);
        assert_eq!(env.value_at(5.0), 20.0);
        assert!((env.value_at(1.25) - 12.5).abs() < 1e-12);
    }

    #[test]
    fn insert_orders_and_replaces() {
        let mut env = LinearEnvelope::new();
        env.insert(2.0, 1.0);
        env.insert(0.0, 0.0);
        env.insert(2.0, 4.0);
        let points: Vec<_> = env.iter().collect();
        assert_eq!(points, vec![(0.0, 0.0), (2.0, 4.0)]);
        assert_eq!(env.last_time(), Some(2.0));
    }
}
