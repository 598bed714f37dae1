//! Domain models for FinWise

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recorded expense
///
/// Immutable after creation; only removed by resetting the tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub amount: f64,
    pub category: ExpenseCategory,
    pub description: String,
    pub date: DateTime<Utc>,
}

/// Fixed expense category set
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Housing,
    Transportation,
    Food,
    Utilities,
    Healthcare,
    Entertainment,
    Shopping,
    Other,
}

impl ExpenseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Housing => "Housing",
            Self::Transportation => "Transportation",
            Self::Food => "Food",
            Self::Utilities => "Utilities",
            Self::Healthcare => "Healthcare",
            Self::Entertainment => "Entertainment",
            Self::Shopping => "Shopping",
            Self::Other => "Other",
        }
    }

    pub fn all() -> &'static [ExpenseCategory] {
        &[
            Self::Housing,
            Self::Transportation,
            Self::Food,
            Self::Utilities,
            Self::Healthcare,
            Self::Entertainment,
            Self::Shopping,
            Self::Other,
        ]
    }
}

impl std::str::FromStr for ExpenseCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "housing" => Ok(Self::Housing),
            "transportation" => Ok(Self::Transportation),
            "food" => Ok(Self::Food),
            "utilities" => Ok(Self::Utilities),
            "healthcare" => Ok(Self::Healthcare),
            "entertainment" => Ok(Self::Entertainment),
            "shopping" => Ok(Self::Shopping),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown expense category: {}", s)),
        }
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A savings goal with a fixed recurring contribution amount
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: Uuid,
    pub name: String,
    pub target_amount: f64,
    /// Starts at 0 and only grows through contributions
    pub current_amount: f64,
    pub frequency: Frequency,
    pub contribution_amount: f64,
    pub start_date: DateTime<Utc>,
}

impl SavingsGoal {
    /// Raw progress toward the target (1.0 == 100%), not clamped
    pub fn progress_ratio(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 0.0;
        }
        self.current_amount / self.target_amount
    }

    /// Progress percentage clamped to [0, 100] for display
    ///
    /// Contributions can push current_amount past the target; the stored
    /// value keeps growing but the displayed bar stops at 100%.
    pub fn progress_percent(&self) -> f64 {
        (self.progress_ratio() * 100.0).clamp(0.0, 100.0)
    }
}

/// Contribution frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::str::FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(format!("Unknown frequency: {}", s)),
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single investment position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Investment {
    pub id: Uuid,
    pub kind: InvestmentKind,
    pub amount: f64,
}

/// Fixed investment type set
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentKind {
    Savings,
    Stocks,
    MutualFunds,
    Bonds,
    Crypto,
}

impl InvestmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Savings => "Savings",
            Self::Stocks => "Stocks",
            Self::MutualFunds => "Mutual Funds",
            Self::Bonds => "Bonds",
            Self::Crypto => "Crypto",
        }
    }

    pub fn all() -> &'static [InvestmentKind] {
        &[
            Self::Savings,
            Self::Stocks,
            Self::MutualFunds,
            Self::Bonds,
            Self::Crypto,
        ]
    }
}

impl std::str::FromStr for InvestmentKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '_'], "").as_str() {
            "savings" => Ok(Self::Savings),
            "stocks" => Ok(Self::Stocks),
            "mutualfunds" => Ok(Self::MutualFunds),
            "bonds" => Ok(Self::Bonds),
            "crypto" => Ok(Self::Crypto),
            _ => Err(format!("Unknown investment type: {}", s)),
        }
    }
}

impl std::fmt::Display for InvestmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user's profile as stored remotely and cached locally
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Currency code; resolved against the catalog with a `$` fallback
    pub currency: String,
    pub uid: String,
}

/// A single chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Sequential within a session, monotonically increasing
    pub id: u64,
    pub text: String,
    pub sender: Sender,
}

/// Who produced a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expense_category_roundtrip() {
        for cat in ExpenseCategory::all() {
            let parsed: ExpenseCategory = cat.as_str().parse().unwrap();
            assert_eq!(parsed, *cat);
        }
        assert!("groceries".parse::<ExpenseCategory>().is_err());
    }

    #[test]
    fn test_investment_kind_parse_spacing() {
        assert_eq!(
            "mutual funds".parse::<InvestmentKind>().unwrap(),
            InvestmentKind::MutualFunds
        );
        assert_eq!(
            "mutual_funds".parse::<InvestmentKind>().unwrap(),
            InvestmentKind::MutualFunds
        );
    }

    #[test]
    fn test_goal_progress_clamped() {
        let goal = SavingsGoal {
            id: Uuid::new_v4(),
            name: "Vacation".to_string(),
            target_amount: 100.0,
            current_amount: 150.0,
            frequency: Frequency::Monthly,
            contribution_amount: 50.0,
            start_date: Utc::now(),
        };
        assert!(goal.progress_ratio() > 1.0);
        assert_eq!(goal.progress_percent(), 100.0);
    }

    #[test]
    fn test_goal_progress_zero_target() {
        let goal = SavingsGoal {
            id: Uuid::new_v4(),
            name: "Broken".to_string(),
            target_amount: 0.0,
            current_amount: 10.0,
            frequency: Frequency::Weekly,
            contribution_amount: 5.0,
            start_date: Utc::now(),
        };
        assert_eq!(goal.progress_percent(), 0.0);
    }
}
