//! Emergency fund container

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default seed values for a fresh fund
const SEED_CURRENT: f64 = 5000.0;
const SEED_TARGET: f64 = 15000.0;
const SEED_MONTHLY: f64 = 500.0;

/// Emergency fund state with monthly contribution tracking
///
/// Unlike the list-shaped trackers this is a single record; it is its own
/// container. Seeded with demo defaults, reset drops the balance to zero
/// while keeping the target and contribution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyFund {
    pub current_amount: f64,
    pub target_amount: f64,
    pub monthly_contribution: f64,
    pub last_contribution: DateTime<Utc>,
}

impl Default for EmergencyFund {
    fn default() -> Self {
        Self {
            current_amount: SEED_CURRENT,
            target_amount: SEED_TARGET,
            monthly_contribution: SEED_MONTHLY,
            last_contribution: Utc::now(),
        }
    }
}

impl EmergencyFund {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one monthly contribution and stamp the contribution time
    pub fn add_contribution(&mut self) {
        self.current_amount += self.monthly_contribution;
        self.last_contribution = Utc::now();
    }

    /// Manually adjust the target. Non-positive values are a silent no-op.
    pub fn set_target(&mut self, target_amount: f64) -> bool {
        if !target_amount.is_finite() || target_amount <= 0.0 {
            return false;
        }
        self.target_amount = target_amount;
        true
    }

    /// Drop the balance to zero, keeping target and contribution settings
    pub fn reset(&mut self) {
        self.current_amount = 0.0;
        self.last_contribution = Utc::now();
    }

    /// Raw progress toward the target (1.0 == 100%)
    pub fn progress_ratio(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 0.0;
        }
        self.current_amount / self.target_amount
    }

    /// Progress percentage clamped to [0, 100] for display
    pub fn progress_percent(&self) -> f64 {
        (self.progress_ratio() * 100.0).clamp(0.0, 100.0)
    }

    /// Months until the target is reached at the current contribution rate:
    /// `ceil((target - current) / monthly)`. Zero or negative once the
    /// target is met.
    pub fn months_to_goal(&self) -> i64 {
        if self.monthly_contribution <= 0.0 {
            return 0;
        }
        ((self.target_amount - self.current_amount) / self.monthly_contribution).ceil() as i64
    }
}
