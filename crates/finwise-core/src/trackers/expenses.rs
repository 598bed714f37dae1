//! Expense tracker container

use std::collections::BTreeMap;

use chrono::Utc;
use uuid::Uuid;

use crate::models::{Expense, ExpenseCategory};

/// In-memory expense list with derived spend metrics
#[derive(Debug, Default)]
pub struct ExpenseTracker {
    expenses: Vec<Expense>,
}

impl ExpenseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new expense.
    ///
    /// The amount must be a positive, finite number; otherwise nothing is
    /// recorded and `None` is returned. The description may be empty.
    pub fn add(
        &mut self,
        amount: f64,
        category: ExpenseCategory,
        description: &str,
    ) -> Option<&Expense> {
        if !amount.is_finite() || amount <= 0.0 {
            return None;
        }

        self.expenses.push(Expense {
            id: Uuid::new_v4(),
            amount,
            category,
            description: description.trim().to_string(),
            date: Utc::now(),
        });
        self.expenses.last()
    }

    /// Clear all recorded expenses
    pub fn reset(&mut self) {
        self.expenses.clear();
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Total spend across all expenses
    pub fn total(&self) -> f64 {
        self.expenses.iter().map(|e| e.amount).sum()
    }

    /// Spend grouped by category, only categories with at least one expense
    pub fn category_totals(&self) -> BTreeMap<ExpenseCategory, f64> {
        let mut totals = BTreeMap::new();
        for expense in &self.expenses {
            *totals.entry(expense.category).or_insert(0.0) += expense.amount;
        }
        totals
    }

    /// The most recent `limit` expenses, newest first
    pub fn recent(&self, limit: usize) -> Vec<&Expense> {
        self.expenses.iter().rev().take(limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_increases_total_and_category() {
        let mut tracker = ExpenseTracker::new();
        tracker.add(150.0, ExpenseCategory::Food, "groceries").unwrap();
        tracker.add(45.0, ExpenseCategory::Food, "takeout").unwrap();
        tracker.add(200.0, ExpenseCategory::Utilities, "power").unwrap();

        assert_eq!(tracker.total(), 395.0);
        let by_cat = tracker.category_totals();
        assert_eq!(by_cat[&ExpenseCategory::Food], 195.0);
        assert_eq!(by_cat[&ExpenseCategory::Utilities], 200.0);
        assert_eq!(by_cat.len(), 2);
    }

    #[test]
    fn test_invalid_amount_is_silent_noop() {
        let mut tracker = ExpenseTracker::new();
        assert!(tracker.add(0.0, ExpenseCategory::Other, "zero").is_none());
        assert!(tracker.add(-5.0, ExpenseCategory::Other, "negative").is_none());
        assert!(tracker.add(f64::NAN, ExpenseCategory::Other, "nan").is_none());
        assert!(tracker.add(f64::INFINITY, ExpenseCategory::Other, "inf").is_none());
        assert!(tracker.is_empty());
        assert_eq!(tracker.total(), 0.0);
    }

    #[test]
    fn test_empty_description_allowed() {
        let mut tracker = ExpenseTracker::new();
        let expense = tracker.add(10.0, ExpenseCategory::Shopping, "").unwrap();
        assert_eq!(expense.description, "");
    }

    #[test]
    fn test_reset_returns_to_initial_state() {
        let mut tracker = ExpenseTracker::new();
        tracker.add(150.0, ExpenseCategory::Food, "groceries");
        tracker.reset();

        assert!(tracker.is_empty());
        assert_eq!(tracker.total(), 0.0);
        assert!(tracker.category_totals().is_empty());
    }

    #[test]
    fn test_recent_newest_first() {
        let mut tracker = ExpenseTracker::new();
        for i in 1..=7 {
            tracker.add(i as f64, ExpenseCategory::Other, &format!("e{}", i));
        }
        let recent = tracker.recent(5);
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].amount, 7.0);
        assert_eq!(recent[4].amount, 3.0);
    }
}
