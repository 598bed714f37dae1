//! Savings goal container

use chrono::Utc;
use uuid::Uuid;

use crate::models::{Frequency, SavingsGoal};

/// In-memory savings goal list
#[derive(Debug, Default)]
pub struct GoalTracker {
    goals: Vec<SavingsGoal>,
}

impl GoalTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new goal starting at zero progress.
    ///
    /// Requires a non-empty name and positive target and contribution
    /// amounts; anything else is a silent no-op.
    pub fn add(
        &mut self,
        name: &str,
        target_amount: f64,
        contribution_amount: f64,
        frequency: Frequency,
    ) -> Option<&SavingsGoal> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        if !target_amount.is_finite() || target_amount <= 0.0 {
            return None;
        }
        if !contribution_amount.is_finite() || contribution_amount <= 0.0 {
            return None;
        }

        self.goals.push(SavingsGoal {
            id: Uuid::new_v4(),
            name: name.to_string(),
            target_amount,
            current_amount: 0.0,
            frequency,
            contribution_amount,
            start_date: Utc::now(),
        });
        self.goals.last()
    }

    /// Apply one fixed contribution to a goal.
    ///
    /// Progress is not capped at the target; the displayed percentage is
    /// clamped instead. Returns `None` for an unknown id.
    pub fn contribute(&mut self, goal_id: Uuid) -> Option<&SavingsGoal> {
        let goal = self.goals.iter_mut().find(|g| g.id == goal_id)?;
        goal.current_amount += goal.contribution_amount;
        Some(goal)
    }

    /// Remove all goals
    pub fn reset(&mut self) {
        self.goals.clear();
    }

    pub fn goals(&self) -> &[SavingsGoal] {
        &self.goals
    }

    pub fn get(&self, goal_id: Uuid) -> Option<&SavingsGoal> {
        self.goals.iter().find(|g| g.id == goal_id)
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    /// Total saved across all goals
    pub fn total_saved(&self) -> f64 {
        self.goals.iter().map(|g| g.current_amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_starts_at_zero() {
        let mut tracker = GoalTracker::new();
        let goal = tracker.add("Vacation", 1200.0, 100.0, Frequency::Monthly).unwrap();
        assert_eq!(goal.current_amount, 0.0);
        assert_eq!(goal.target_amount, 1200.0);
        assert_eq!(goal.progress_percent(), 0.0);
    }

    #[test]
    fn test_invalid_inputs_are_silent_noops() {
        let mut tracker = GoalTracker::new();
        assert!(tracker.add("", 100.0, 10.0, Frequency::Weekly).is_none());
        assert!(tracker.add("   ", 100.0, 10.0, Frequency::Weekly).is_none());
        assert!(tracker.add("Car", 0.0, 10.0, Frequency::Weekly).is_none());
        assert!(tracker.add("Car", 100.0, -1.0, Frequency::Weekly).is_none());
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_contribute_is_monotonic_and_uncapped() {
        let mut tracker = GoalTracker::new();
        let id = tracker.add("Bike", 100.0, 60.0, Frequency::Weekly).unwrap().id;

        tracker.contribute(id).unwrap();
        assert_eq!(tracker.get(id).unwrap().current_amount, 60.0);

        // A second contribution pushes past the target
        let goal = tracker.contribute(id).unwrap();
        assert_eq!(goal.current_amount, 120.0);
        assert!(goal.progress_ratio() > 1.0);
        assert_eq!(goal.progress_percent(), 100.0);
    }

    #[test]
    fn test_contribute_unknown_id() {
        let mut tracker = GoalTracker::new();
        tracker.add("Bike", 100.0, 60.0, Frequency::Weekly);
        assert!(tracker.contribute(Uuid::new_v4()).is_none());
        assert_eq!(tracker.total_saved(), 0.0);
    }

    #[test]
    fn test_reset() {
        let mut tracker = GoalTracker::new();
        let id = tracker.add("Bike", 100.0, 60.0, Frequency::Weekly).unwrap().id;
        tracker.contribute(id);
        tracker.reset();
        assert!(tracker.is_empty());
        assert_eq!(tracker.total_saved(), 0.0);
    }
}
