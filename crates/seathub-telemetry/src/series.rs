//! Per-pool minute-bucketed borrow aggregates.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One minute of borrow activity for one pool.
///
/// Buckets are keyed by their minute-floored timestamp and updated on every
/// borrow event; after the minute passes they are read-only until retention
/// pruning discards them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinuteBucket {
    /// Bucket start, floored to the minute.
    pub timestamp: DateTime<Utc>,
    /// Borrow events in this minute.
    pub count: u64,
    /// Overage borrow events in this minute.
    pub overage_count: u64,
    /// Distinct holders seen in this minute.
    pub users: BTreeSet<String>,
}

impl MinuteBucket {
    /// Create an empty bucket for the given minute start.
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            count: 0,
            overage_count: 0,
            users: BTreeSet::new(),
        }
    }

    /// Fold one borrow event into the bucket.
    pub fn observe(&mut self, user: &str, is_overage: bool) {
        self.count += 1;
        if is_overage {
            self.overage_count += 1;
        }
        self.users.insert(user.to_string());
    }
}

/// Floor a timestamp's epoch seconds to its minute start.
pub fn minute_floor(ts: DateTime<Utc>) -> i64 {
    let secs = ts.timestamp();
    secs - secs.rem_euclid(60)
}
