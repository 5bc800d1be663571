//! Single-pool counters and the borrow/return transition logic.

use seathub_core::events::pool::{FAILURE_EXHAUSTED, FAILURE_MAX_OVERAGE};
use seathub_core::config::pool::PoolSeed;
use seathub_core::types::PoolStatus;

/// Outcome of one borrow attempt against a pool's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowDecision {
    /// A seat was allocated.
    Granted {
        /// Whether the seat came from the overage allowance.
        is_overage: bool,
    },
    /// No seat was allocated.
    Refused {
        /// Machine-readable refusal reason.
        reason: &'static str,
    },
}

/// Counters and pricing for one license pool.
///
/// All mutation goes through [`try_borrow`](PoolState::try_borrow) and
/// [`release`](PoolState::release); callers hold the pool's mutex for
/// exactly the duration of those calls.
#[derive(Debug, Clone)]
pub struct PoolState {
    /// Tool identifier (pool name).
    pub tool: String,
    /// Total seats.
    pub total: u32,
    /// Committed seat quantity.
    pub commit: u32,
    /// Maximum overage seats allowed.
    pub max_overage: u32,
    /// Fixed fee for the committed quantity.
    pub commit_price: f64,
    /// Per-seat price for each overage checkout.
    pub overage_price: f64,
    /// Seats currently checked out.
    pub borrowed: u32,
    /// Cumulative count of overage checkouts. Never decreases, even on
    /// return: the accrued cost is a usage ledger, not an occupancy count.
    pub overage_borrows: u64,
    /// Soft-deactivation flag. Inactive pools refuse borrows but keep
    /// serving status reads until their outstanding borrows drain.
    pub active: bool,
}

impl PoolState {
    /// Build pool state from a seed configuration entry.
    pub fn from_seed(seed: &PoolSeed) -> Self {
        Self {
            tool: seed.tool.clone(),
            total: seed.total,
            commit: seed.commit,
            max_overage: seed.max_overage,
            commit_price: seed.commit_price,
            overage_price: seed.overage_price_per_license,
            borrowed: 0,
            overage_borrows: 0,
            active: true,
        }
    }

    /// Attempt to allocate one seat.
    ///
    /// The capacity check and counter update happen together; the caller
    /// must hold the pool's lock across this call and nothing else.
    pub fn try_borrow(&mut self) -> BorrowDecision {
        if self.borrowed >= self.total {
            return BorrowDecision::Refused {
                reason: FAILURE_EXHAUSTED,
            };
        }

        let is_overage = self.borrowed >= self.commit;
        if is_overage && self.borrowed - self.commit >= self.max_overage {
            return BorrowDecision::Refused {
                reason: FAILURE_MAX_OVERAGE,
            };
        }

        self.borrowed += 1;
        if is_overage {
            self.overage_borrows += 1;
        }

        BorrowDecision::Granted { is_overage }
    }

    /// Release one seat. Saturates at zero; the ledger guarantees a release
    /// only happens for an outstanding borrow.
    pub fn release(&mut self) {
        self.borrowed = self.borrowed.saturating_sub(1);
    }

    /// Overage seats currently in use.
    pub fn overage_in_use(&self) -> u32 {
        self.borrowed.saturating_sub(self.commit)
    }

    /// Accrued overage cost.
    pub fn accrued_overage_cost(&self) -> f64 {
        self.overage_borrows as f64 * self.overage_price
    }

    /// Current status snapshot.
    pub fn status(&self) -> PoolStatus {
        let current_overage_cost = self.accrued_overage_cost();
        PoolStatus {
            tool: self.tool.clone(),
            total: self.total,
            borrowed: self.borrowed,
            available: self.total.saturating_sub(self.borrowed),
            commit: self.commit,
            max_overage: self.max_overage,
            overage: self.overage_in_use(),
            overage_borrows: self.overage_borrows,
            in_commit: self.borrowed <= self.commit,
            commit_price: self.commit_price,
            overage_price_per_license: self.overage_price,
            current_overage_cost,
            total_cost: self.commit_price + current_overage_cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(total: u32, commit: u32, max_overage: u32) -> PoolState {
        PoolState::from_seed(&PoolSeed {
            tool: "cad_tool".to_string(),
            total,
            commit,
            max_overage,
            commit_price: 5000.0,
            overage_price_per_license: 500.0,
        })
    }

    #[test]
    fn test_commit_then_overage_then_exhausted() {
        let mut p = pool(20, 5, 15);

        for _ in 0..5 {
            assert_eq!(p.try_borrow(), BorrowDecision::Granted { is_overage: false });
        }
        assert!(p.status().in_commit);
        assert_eq!(p.overage_in_use(), 0);

        // Sixth borrow crosses into overage and accrues one unit price.
        assert_eq!(p.try_borrow(), BorrowDecision::Granted { is_overage: true });
        assert_eq!(p.overage_borrows, 1);
        assert_eq!(p.accrued_overage_cost(), 500.0);

        for _ in 0..14 {
            assert_eq!(p.try_borrow(), BorrowDecision::Granted { is_overage: true });
        }
        assert_eq!(p.borrowed, 20);

        assert_eq!(
            p.try_borrow(),
            BorrowDecision::Refused {
                reason: FAILURE_EXHAUSTED
            }
        );
        assert_eq!(p.borrowed, 20);
    }

    #[test]
    fn test_overage_cap_tighter_than_total() {
        let mut p = pool(10, 5, 2);

        for _ in 0..7 {
            assert!(matches!(p.try_borrow(), BorrowDecision::Granted { .. }));
        }
        assert_eq!(
            p.try_borrow(),
            BorrowDecision::Refused {
                reason: FAILURE_MAX_OVERAGE
            }
        );
        assert_eq!(p.borrowed, 7);
    }

    #[test]
    fn test_zero_overage_pool_stops_at_commit() {
        let mut p = pool(10, 10, 0);

        for _ in 0..10 {
            assert_eq!(p.try_borrow(), BorrowDecision::Granted { is_overage: false });
        }
        assert_eq!(
            p.try_borrow(),
            BorrowDecision::Refused {
                reason: FAILURE_EXHAUSTED
            }
        );
    }

    #[test]
    fn test_release_restores_capacity_but_not_cost() {
        let mut p = pool(6, 5, 1);

        for _ in 0..6 {
            assert!(matches!(p.try_borrow(), BorrowDecision::Granted { .. }));
        }
        assert_eq!(p.overage_borrows, 1);

        p.release();
        assert_eq!(p.borrowed, 5);
        assert_eq!(p.overage_in_use(), 0);
        // Cost is cumulative and survives the return.
        assert_eq!(p.overage_borrows, 1);
        assert_eq!(p.accrued_overage_cost(), 500.0);

        // Borrowing again re-enters overage and accrues again.
        assert_eq!(p.try_borrow(), BorrowDecision::Granted { is_overage: true });
        assert_eq!(p.overage_borrows, 2);
    }

    #[test]
    fn test_release_saturates_at_zero() {
        let mut p = pool(3, 3, 0);
        p.release();
        assert_eq!(p.borrowed, 0);
    }

    #[test]
    fn test_status_shape() {
        let mut p = pool(20, 5, 15);
        for _ in 0..7 {
            p.try_borrow();
        }

        let s = p.status();
        assert_eq!(s.total, 20);
        assert_eq!(s.borrowed, 7);
        assert_eq!(s.available, 13);
        assert_eq!(s.overage, 2);
        assert_eq!(s.overage_borrows, 2);
        assert!(!s.in_commit);
        assert_eq!(s.current_overage_cost, 1000.0);
        assert_eq!(s.total_cost, 6000.0);
    }
}
