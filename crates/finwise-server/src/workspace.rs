//! Per-user in-memory workspaces
//!
//! A workspace holds a user's dashboard containers and chat log for the
//! lifetime of the server process; the entities are deliberately not
//! persisted. Logging out removes the workspace.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::RwLock;

use finwise_core::{ChatLog, EmergencyFund, ExpenseTracker, GoalTracker, InvestmentTracker};

/// The dashboard feature containers
#[derive(Default)]
pub struct Trackers {
    pub expenses: ExpenseTracker,
    pub goals: GoalTracker,
    pub investments: InvestmentTracker,
    pub emergency: EmergencyFund,
}

impl Trackers {
    fn new() -> Self {
        Self {
            expenses: ExpenseTracker::new(),
            goals: GoalTracker::new(),
            investments: InvestmentTracker::new(),
            emergency: EmergencyFund::new(),
        }
    }
}

/// One user's in-memory state
///
/// Both locks are sync mutexes held only for short, non-awaiting sections;
/// the chat state machine itself provides the single-in-flight guarantee
/// across the await on the advisor call.
pub struct UserWorkspace {
    pub trackers: Mutex<Trackers>,
    pub chat: Mutex<ChatLog>,
}

impl UserWorkspace {
    fn new() -> Self {
        Self {
            trackers: Mutex::new(Trackers::new()),
            chat: Mutex::new(ChatLog::new()),
        }
    }
}

/// In-memory workspace map keyed by user id
#[derive(Default)]
pub struct WorkspaceManager {
    inner: RwLock<HashMap<String, Arc<UserWorkspace>>>,
}

impl WorkspaceManager {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Get a user's workspace, creating a fresh one on first access
    pub async fn get_or_create(&self, uid: &str) -> Arc<UserWorkspace> {
        if let Some(workspace) = self.inner.read().await.get(uid) {
            return workspace.clone();
        }

        let mut map = self.inner.write().await;
        map.entry(uid.to_string())
            .or_insert_with(|| Arc::new(UserWorkspace::new()))
            .clone()
    }

    /// Drop a user's workspace (logout)
    pub async fn remove(&self, uid: &str) {
        self.inner.write().await.remove(uid);
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finwise_core::ExpenseCategory;

    #[tokio::test]
    async fn test_workspace_is_per_user_and_sticky() {
        let manager = WorkspaceManager::new();

        let ws = manager.get_or_create("u1").await;
        ws.trackers
            .lock()
            .unwrap()
            .expenses
            .add(10.0, ExpenseCategory::Food, "");

        // same user sees the same workspace
        let again = manager.get_or_create("u1").await;
        assert_eq!(again.trackers.lock().unwrap().expenses.total(), 10.0);

        // another user gets a fresh one
        let other = manager.get_or_create("u2").await;
        assert_eq!(other.trackers.lock().unwrap().expenses.total(), 0.0);
        assert_eq!(manager.len().await, 2);
    }

    #[tokio::test]
    async fn test_remove_discards_state() {
        let manager = WorkspaceManager::new();
        let ws = manager.get_or_create("u1").await;
        ws.trackers
            .lock()
            .unwrap()
            .expenses
            .add(10.0, ExpenseCategory::Food, "");

        manager.remove("u1").await;
        let fresh = manager.get_or_create("u1").await;
        assert_eq!(fresh.trackers.lock().unwrap().expenses.total(), 0.0);
    }
}
