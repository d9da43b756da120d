//! Rejection reasons and per-run tallies.
use std::fmt;

const REASON_COUNT: usize = 9;

/// Why a candidate (or a cluster anchor) was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RejectionReason {
    NoHit,
    CeilingCheck,
    EdgeCheck,
    FloorCheck,
    NearObstacle,
    InvalidLayer,
    OutOfBounds,
    TooCloseToOther,
    ClusterFailed,
}

impl RejectionReason {
    pub const ALL: [RejectionReason; REASON_COUNT] = [
        RejectionReason::NoHit,
        RejectionReason::CeilingCheck,
        RejectionReason::EdgeCheck,
        RejectionReason::FloorCheck,
        RejectionReason::NearObstacle,
        RejectionReason::InvalidLayer,
        RejectionReason::OutOfBounds,
        RejectionReason::TooCloseToOther,
        RejectionReason::ClusterFailed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RejectionReason::NoHit => "no_hit",
            RejectionReason::CeilingCheck => "ceiling_check",
            RejectionReason::EdgeCheck => "edge_check",
            RejectionReason::FloorCheck => "floor_check",
            RejectionReason::NearObstacle => "near_obstacle",
            RejectionReason::InvalidLayer => "invalid_layer",
            RejectionReason::OutOfBounds => "out_of_bounds",
            RejectionReason::TooCloseToOther => "too_close_to_other",
            RejectionReason::ClusterFailed => "cluster_failed",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Count of rejections per reason.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureStatistics {
    counts: [usize; REASON_COUNT],
}

impl FailureStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, reason: RejectionReason) {
        self.record_many(reason, 1);
    }

    pub fn record_many(&mut self, reason: RejectionReason, count: usize) {
        self.counts[reason.slot()] += count;
    }

    pub fn get(&self, reason: RejectionReason) -> usize {
        self.counts[reason.slot()]
    }

    /// Sum over all reasons.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Non-zero entries, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (RejectionReason, usize)> + '_ {
        RejectionReason::ALL
            .into_iter()
            .map(|r| (r, self.get(r)))
            .filter(|(_, n)| *n > 0)
    }

    /// Reason with the highest count, if any.
    pub fn dominant(&self) -> Option<(RejectionReason, usize)> {
        self.iter().max_by_key(|(_, n)| *n)
    }

    pub fn clear(&mut self) {
        self.counts = Default::default();
    }
}

impl fmt::Display for FailureStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for (reason, count) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{reason}={count}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_query() {
        let mut stats = FailureStatistics::new();
        assert!(stats.is_empty());
        stats.record(RejectionReason::NoHit);
        stats.record(RejectionReason::NoHit);
        stats.record_many(RejectionReason::ClusterFailed, 4);

        assert_eq!(stats.get(RejectionReason::NoHit), 2);
        assert_eq!(stats.get(RejectionReason::ClusterFailed), 4);
        assert_eq!(stats.get(RejectionReason::EdgeCheck), 0);
        assert_eq!(stats.total(), 6);
        assert_eq!(stats.dominant(), Some((RejectionReason::ClusterFailed, 4)));
        assert_eq!(stats.iter().count(), 2);
    }

    #[test]
    fn display_lists_non_zero_entries() {
        let mut stats = FailureStatistics::new();
        assert_eq!(stats.to_string(), "none");
        stats.record(RejectionReason::OutOfBounds);
        stats.record(RejectionReason::NoHit);
        assert_eq!(stats.to_string(), "no_hit=1, out_of_bounds=1");
    }

    #[test]
    fn clear_resets_counts() {
        let mut stats = FailureStatistics::new();
        stats.record(RejectionReason::FloorCheck);
        stats.clear();
        assert!(stats.is_empty());
        assert_eq!(stats, FailureStatistics::default());
    }
}
