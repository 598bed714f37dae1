//! Integration tests for finwise-core
//!
//! These tests exercise the full flows: dashboard mutations with derived
//! metrics, advice generation over the banking + LLM collaborators, chat
//! turn ordering, learning content fallback, and the auth/profile cache
//! hierarchy.

use finwise_core::auth::{MockProfileStore, ProfileStoreClient};
use finwise_core::banking::MockBank;
use finwise_core::llm::MOCK_ADVICE;
use finwise_core::{
    currency, AdviceGenerator, AuthConfig, BankClient, ChatOrchestrator, ContentSource,
    EmergencyFund, ExpenseCategory, ExpenseTracker, Frequency, GoalTracker, IdentityClient,
    InvestmentKind, InvestmentTracker, LearningContentLoader, LlmClient, LocalStore, MockBackend,
    SessionManager, APOLOGY_PREFIX,
};

fn mocked_manager(dir: &tempfile::TempDir) -> SessionManager {
    SessionManager::new(
        IdentityClient::mock(),
        ProfileStoreClient::mock(),
        LocalStore::at(dir.path().join("store.json")),
        AuthConfig::default(),
    )
}

// =============================================================================
// Dashboard Feature Tests
// =============================================================================

#[test]
fn test_dashboard_mutation_and_metrics_flow() {
    let mut expenses = ExpenseTracker::new();
    let mut goals = GoalTracker::new();
    let mut investments = InvestmentTracker::new();
    let mut fund = EmergencyFund::new();

    // expenses
    expenses.add(120.0, ExpenseCategory::Food, "groceries");
    expenses.add(80.0, ExpenseCategory::Entertainment, "cinema");
    expenses.add(400.0, ExpenseCategory::Housing, "rent share");
    assert_eq!(expenses.total(), 600.0);
    assert_eq!(expenses.category_totals().len(), 3);

    // goals: contribute twice
    let goal_id = goals.add("Laptop", 1000.0, 250.0, Frequency::Monthly).unwrap().id;
    goals.contribute(goal_id);
    goals.contribute(goal_id);
    let goal = goals.get(goal_id).unwrap();
    assert_eq!(goal.current_amount, 500.0);
    assert_eq!(goal.progress_percent(), 50.0);

    // investments
    investments.add(InvestmentKind::Stocks, 2000.0);
    investments.add(InvestmentKind::Crypto, 500.0);
    assert_eq!(investments.total(), 2500.0);

    // emergency fund
    fund.add_contribution();
    assert_eq!(fund.current_amount, 5500.0);
    assert_eq!(fund.months_to_goal(), 19);

    // resets return every container to its documented initial state
    expenses.reset();
    goals.reset();
    investments.reset();
    fund.reset();
    assert_eq!(expenses.total(), 0.0);
    assert!(goals.goals().is_empty());
    assert_eq!(investments.total(), 0.0);
    assert_eq!(fund.current_amount, 0.0);
}

#[test]
fn test_currency_catalog_contract() {
    assert_eq!(currency::symbol_for("USD"), "$");
    assert_eq!(currency::symbol_for("INR"), "₹");
    assert_eq!(currency::symbol_for("NOPE"), currency::DEFAULT_SYMBOL);
}

// =============================================================================
// Advice + Chat Flow Tests
// =============================================================================

#[tokio::test]
async fn test_advice_happy_path_is_verbatim_llm_output() {
    let advisor = AdviceGenerator::new(BankClient::mock(), LlmClient::mock());
    let advice = advisor.generate("How do I budget better?").await.unwrap();
    assert_eq!(advice, MOCK_ADVICE);
}

#[tokio::test]
async fn test_advice_degrades_with_apology_prefix() {
    let advisor = AdviceGenerator::new(
        BankClient::Mock(MockBank::failing()),
        LlmClient::mock(),
    );
    let advice = advisor.generate("How do I budget better?").await.unwrap();
    assert!(advice.starts_with(APOLOGY_PREFIX));
}

#[tokio::test]
async fn test_chat_conversation_flow() {
    let advisor = AdviceGenerator::new(BankClient::mock(), LlmClient::mock());
    let mut chat = ChatOrchestrator::new(advisor);

    // greeting only
    assert_eq!(chat.messages().len(), 1);

    // whitespace input: nothing happens
    assert!(chat.send("  \t ").await.is_none());
    assert_eq!(chat.messages().len(), 1);

    // two full turns: user then bot, ids monotonic
    chat.send("first question").await.unwrap();
    chat.send("second question").await.unwrap();

    let messages = chat.messages();
    assert_eq!(messages.len(), 5);
    let ids: Vec<u64> = messages.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    assert_eq!(messages[1].text, "first question");
    assert_eq!(messages[2].text, MOCK_ADVICE);
}

// =============================================================================
// Learning Content Tests
// =============================================================================

#[tokio::test]
async fn test_learning_content_generated_and_fallback() {
    let generated = LearningContentLoader::new(LlmClient::mock()).load().await;
    assert_eq!(generated.quiz.source, ContentSource::Generated);
    assert_eq!(generated.quiz.items.len(), 10);

    let degraded = LearningContentLoader::new(LlmClient::Mock(MockBackend::failing()))
        .load()
        .await;
    assert_eq!(degraded.quiz.source, ContentSource::Fallback);
    assert_eq!(degraded.quiz.items.len(), 10);
    assert_eq!(degraded.quotes.items.len(), 3);
    assert_eq!(degraded.blogs.items.len(), 3);
}

// =============================================================================
// Auth/Profile Gateway Tests
// =============================================================================

#[tokio::test]
async fn test_signup_signin_signout_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let manager = mocked_manager(&dir);

    let rx = manager.subscribe();
    assert!(rx.borrow().is_none());

    let session = manager
        .sign_up("ada@example.com", "secret1", "Ada", "Lovelace", Some("EUR"))
        .await
        .unwrap();
    assert_eq!(session.profile.currency, "EUR");
    assert!(rx.borrow().is_some());

    // sign in again: resolved from cache
    let session = manager.sign_in("ada@example.com", "secret1").await.unwrap();
    assert_eq!(session.profile.first_name, "Ada");

    manager.sign_out();
    assert!(rx.borrow().is_none());
    assert!(manager.cached_profile(&session.user.uid).is_none());
}

#[tokio::test]
async fn test_profile_survives_in_local_store_across_managers() {
    let dir = tempfile::tempdir().unwrap();
    let local_path = dir.path().join("store.json");

    let store = MockProfileStore::new();
    let identity = IdentityClient::mock();

    {
        let manager = SessionManager::new(
            identity.clone(),
            ProfileStoreClient::Mock(store.clone()),
            LocalStore::at(&local_path),
            AuthConfig::default(),
        );
        manager
            .sign_up("ada@example.com", "secret1", "Ada", "Lovelace", Some("CHF"))
            .await
            .unwrap();
    }

    // A fresh manager (empty memory cache) with a failing remote store still
    // resolves the profile from the durable local store.
    let manager = SessionManager::new(
        identity,
        ProfileStoreClient::Mock(MockProfileStore::failing()),
        LocalStore::at(&local_path),
        AuthConfig::default(),
    );
    let session = manager.sign_in("ada@example.com", "secret1").await.unwrap();
    assert_eq!(session.profile.currency, "CHF");
}

#[tokio::test]
async fn test_dark_mode_flag_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let manager = mocked_manager(&dir);

    assert!(!manager.dark_mode());
    manager.set_dark_mode(true);
    assert!(manager.dark_mode());
}
