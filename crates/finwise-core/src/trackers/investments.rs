//! Investment overview container

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::models::{Investment, InvestmentKind};

/// In-memory investment list with portfolio totals
#[derive(Debug, Default)]
pub struct InvestmentTracker {
    investments: Vec<Investment>,
}

impl InvestmentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an investment. Non-positive amounts are a silent no-op.
    pub fn add(&mut self, kind: InvestmentKind, amount: f64) -> Option<&Investment> {
        if !amount.is_finite() || amount <= 0.0 {
            return None;
        }

        self.investments.push(Investment {
            id: Uuid::new_v4(),
            kind,
            amount,
        });
        self.investments.last()
    }

    /// Remove all investments
    pub fn reset(&mut self) {
        self.investments.clear();
    }

    pub fn investments(&self) -> &[Investment] {
        &self.investments
    }

    pub fn is_empty(&self) -> bool {
        self.investments.is_empty()
    }

    /// Total portfolio value
    pub fn total(&self) -> f64 {
        self.investments.iter().map(|i| i.amount).sum()
    }

    /// Portfolio value grouped by investment type
    pub fn kind_totals(&self) -> BTreeMap<InvestmentKind, f64> {
        let mut totals = BTreeMap::new();
        for investment in &self.investments {
            *totals.entry(investment.kind).or_insert(0.0) += investment.amount;
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_totals() {
        let mut tracker = InvestmentTracker::new();
        tracker.add(InvestmentKind::Stocks, 1000.0).unwrap();
        tracker.add(InvestmentKind::Stocks, 500.0).unwrap();
        tracker.add(InvestmentKind::Bonds, 250.0).unwrap();

        assert_eq!(tracker.total(), 1750.0);
        let by_kind = tracker.kind_totals();
        assert_eq!(by_kind[&InvestmentKind::Stocks], 1500.0);
        assert_eq!(by_kind[&InvestmentKind::Bonds], 250.0);
    }

    #[test]
    fn test_invalid_amount_is_silent_noop() {
        let mut tracker = InvestmentTracker::new();
        assert!(tracker.add(InvestmentKind::Crypto, 0.0).is_none());
        assert!(tracker.add(InvestmentKind::Crypto, -100.0).is_none());
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_reset() {
        let mut tracker = InvestmentTracker::new();
        tracker.add(InvestmentKind::Savings, 300.0);
        tracker.reset();
        assert!(tracker.is_empty());
        assert_eq!(tracker.total(), 0.0);
        assert!(tracker.kind_totals().is_empty());
    }
}
