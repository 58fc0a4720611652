//! Per-scan alignment state machine.
//!
//! The tracker owns every in-orb combination of one scan. It is pure
//! bookkeeping: the scan driver feeds it sampled deviations and acts on the
//! returned [`Transition`] (refining and emitting on exit).

use std::collections::BTreeMap;

use crate::alignment_types::{ActiveAlignment, AlignmentKey};

/// Outcome of observing one combination at one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Newly within orb.
    Entered,
    /// Still within orb, closer than any earlier sample.
    Tightened,
    /// Still within orb, not closer.
    Held,
    /// Left orb; the removed state is returned for finalization.
    Exited(ActiveAlignment),
    /// Out of orb and not tracked.
    Idle,
}

impl Transition {
    /// Whether the driver should stop trying further relationships for this
    /// pair at this sample.
    pub fn ends_pair(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Active alignments keyed by combination; at most one entry per key.
#[derive(Debug, Default)]
pub struct AlignmentTracker {
    active: BTreeMap<AlignmentKey, ActiveAlignment>,
}

impl AlignmentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one sampled deviation. In orb means `deviation <= orb_limit`.
    pub fn observe(
        &mut self,
        key: AlignmentKey,
        deviation_deg: f64,
        orb_limit_deg: f64,
        jd_tdb: f64,
    ) -> Transition {
        if deviation_deg <= orb_limit_deg {
            match self.active.get_mut(&key) {
                None => {
                    self.active.insert(
                        key,
                        ActiveAlignment {
                            entry_jd: jd_tdb,
                            best_deviation_deg: deviation_deg,
                            best_jd: jd_tdb,
                            orb_limit_deg,
                        },
                    );
                    Transition::Entered
                }
                Some(active) if deviation_deg < active.best_deviation_deg => {
                    active.best_deviation_deg = deviation_deg;
                    active.best_jd = jd_tdb;
                    Transition::Tightened
                }
                Some(_) => Transition::Held,
            }
        } else {
            match self.active.remove(&key) {
                Some(active) => Transition::Exited(active),
                None => Transition::Idle,
            }
        }
    }

    pub fn get(&self, key: &AlignmentKey) -> Option<&ActiveAlignment> {
        self.active.get(key)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Remove and return every remaining alignment in key order.
    pub fn drain(&mut self) -> impl Iterator<Item = (AlignmentKey, ActiveAlignment)> {
        std::mem::take(&mut self.active).into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gochara_core::{Body, ChartPoint};

    fn key(rel: usize) -> AlignmentKey {
        AlignmentKey {
            body: Body::Mars,
            point: ChartPoint::Body(Body::Venus),
            relationship: rel,
        }
    }

    #[test]
    fn full_lifecycle() {
        let mut t = AlignmentTracker::new();
        assert_eq!(t.observe(key(0), 5.0, 4.0, 0.0), Transition::Idle);
        assert_eq!(t.observe(key(0), 3.0, 4.0, 0.5), Transition::Entered);
        assert_eq!(t.observe(key(0), 1.0, 4.0, 1.0), Transition::Tightened);
        assert_eq!(t.observe(key(0), 2.0, 4.0, 1.5), Transition::Held);

        let active = *t.get(&key(0)).unwrap();
        assert_eq!(active.entry_jd, 0.5);
        assert_eq!(active.best_jd, 1.0);
        assert_eq!(active.best_deviation_deg, 1.0);

        assert_eq!(t.observe(key(0), 4.5, 4.0, 2.0), Transition::Exited(active));
        assert!(t.is_empty());
    }

    #[test]
    fn orb_boundary_is_inclusive() {
        let mut t = AlignmentTracker::new();
        assert_eq!(t.observe(key(0), 4.0, 4.0, 0.0), Transition::Entered);
    }

    #[test]
    fn equal_deviation_keeps_earlier_best() {
        let mut t = AlignmentTracker::new();
        t.observe(key(0), 1.0, 4.0, 0.0);
        assert_eq!(t.observe(key(0), 1.0, 4.0, 0.5), Transition::Held);
        assert_eq!(t.get(&key(0)).unwrap().best_jd, 0.0);
    }

    #[test]
    fn keys_are_independent() {
        let mut t = AlignmentTracker::new();
        t.observe(key(0), 1.0, 4.0, 0.0);
        t.observe(key(2), 1.0, 4.0, 0.0);
        assert_eq!(t.len(), 2);
        assert!(matches!(t.observe(key(0), 9.0, 4.0, 0.5), Transition::Exited(_)));
        assert!(t.get(&key(2)).is_some());
    }

    #[test]
    fn drain_is_in_key_order() {
        let mut t = AlignmentTracker::new();
        t.observe(key(3), 1.0, 4.0, 0.0);
        t.observe(key(1), 1.0, 4.0, 0.0);
        let drained: Vec<_> = t.drain().map(|(k, _)| k.relationship).collect();
        assert_eq!(drained, vec![1, 3]);
        assert!(t.is_empty());
    }

    #[test]
    fn only_idle_lets_the_pair_continue() {
        assert!(!Transition::Idle.ends_pair());
        assert!(Transition::Entered.ends_pair());
        assert!(Transition::Held.ends_pair());
    }
}
