//! Feature state containers
//!
//! Each dashboard feature owns its entities in memory and recomputes derived
//! metrics (totals, breakdowns, progress) on every read. Invalid input to an
//! `add` operation is a silent no-op: the container returns `None` and its
//! state is untouched. Entities do not survive the session; there is no
//! persistence layer behind these containers.

mod emergency;
mod expenses;
mod goals;
mod investments;

pub use emergency::EmergencyFund;
pub use expenses::ExpenseTracker;
pub use goals::GoalTracker;
pub use investments::InvestmentTracker;
