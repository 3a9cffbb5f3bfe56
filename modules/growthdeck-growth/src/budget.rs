//! Per-run cap on expensive (profile-fetch-class) API calls.
//!
//! A plain counter threaded through the run context — phases consult
//! `remaining()` before spending and `charge()` what they actually used.
//! Single-writer by construction: one run, one budget, fully sequential.

/// Tracks expensive API calls against a fixed per-run limit.
#[derive(Debug)]
pub struct CallBudget {
    limit: u32,
    used: u32,
}

impl CallBudget {
    pub fn new(limit: u32) -> Self {
        Self { limit, used: 0 }
    }

    /// Record calls spent.
    pub fn charge(&mut self, calls: u32) {
        self.used = self.used.saturating_add(calls);
    }

    /// Calls left before the cap.
    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.used)
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn exhausted(&self) -> bool {
        self.used >= self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_tracks_spend() {
        let mut budget = CallBudget::new(10);
        budget.charge(4);
        assert_eq!(budget.used(), 4);
        assert_eq!(budget.remaining(), 6);
        assert!(!budget.exhausted());
    }

    #[test]
    fn remaining_never_underflows() {
        let mut budget = CallBudget::new(3);
        budget.charge(5);
        assert_eq!(budget.remaining(), 0);
        assert!(budget.exhausted());
    }

    #[test]
    fn zero_limit_is_immediately_exhausted() {
        let budget = CallBudget::new(0);
        assert_eq!(budget.remaining(), 0);
        assert!(budget.exhausted());
    }
}
