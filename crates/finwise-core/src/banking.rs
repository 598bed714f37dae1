//! Open-banking sandbox gateway
//!
//! Fetches an account balance and recent transactions for the advisor
//! context. The sandbox integration performs a real DirectLogin token
//! exchange and accounts call, but the live payload is discarded and fixed
//! demo values are returned: the sandbox cannot guarantee account access,
//! so the advisor context is fed stable data either way. The substitution
//! is isolated behind [`BankBackend`]; a real integration replaces the
//! client without touching the advisor.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

const DEFAULT_HOST: &str = "https://apisandbox.openbankproject.com";

/// An account balance snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalance {
    pub amount: f64,
    pub currency: String,
}

/// A bank transaction as reported by the banking collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankTransaction {
    pub id: String,
    pub amount: f64,
    pub currency: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub category: String,
}

/// Trait defining the interface for banking data sources
#[async_trait]
pub trait BankBackend: Send + Sync {
    /// Fetch the current account balance
    async fn account_balance(&self) -> Result<AccountBalance>;

    /// Fetch recent transactions
    async fn recent_transactions(&self) -> Result<Vec<BankTransaction>>;
}

/// Concrete banking client enum (Clone + compile-time dispatch)
#[derive(Clone)]
pub enum BankClient {
    /// Open Bank Project sandbox
    OpenBank(OpenBankClient),
    /// Mock source for testing
    Mock(MockBank),
}

impl BankClient {
    /// Create a banking client from environment variables
    ///
    /// Optional overrides: `OPENBANK_HOST`, `OPENBANK_USERNAME`,
    /// `OPENBANK_PASSWORD`, `OPENBANK_CONSUMER_KEY`. Without a consumer key
    /// the sandbox call is skipped entirely and demo data is served.
    pub fn from_env() -> Self {
        BankClient::OpenBank(OpenBankClient::from_env())
    }

    /// Create a mock banking client for testing
    pub fn mock() -> Self {
        BankClient::Mock(MockBank::new())
    }
}

#[async_trait]
impl BankBackend for BankClient {
    async fn account_balance(&self) -> Result<AccountBalance> {
        match self {
            BankClient::OpenBank(b) => b.account_balance().await,
            BankClient::Mock(b) => b.account_balance().await,
        }
    }

    async fn recent_transactions(&self) -> Result<Vec<BankTransaction>> {
        match self {
            BankClient::OpenBank(b) => b.recent_transactions().await,
            BankClient::Mock(b) => b.recent_transactions().await,
        }
    }
}

/// Demo balance served to the advisor
pub fn demo_balance() -> AccountBalance {
    AccountBalance {
        amount: 5000.0,
        currency: "USD".to_string(),
    }
}

/// Demo transactions served to the advisor
pub fn demo_transactions() -> Vec<BankTransaction> {
    let now = Utc::now();
    vec![
        BankTransaction {
            id: "1".to_string(),
            amount: 150.0,
            currency: "USD".to_string(),
            description: "Grocery Shopping".to_string(),
            date: now,
            category: "Food".to_string(),
        },
        BankTransaction {
            id: "2".to_string(),
            amount: 45.0,
            currency: "USD".to_string(),
            description: "Transportation".to_string(),
            date: now,
            category: "Transport".to_string(),
        },
        BankTransaction {
            id: "3".to_string(),
            amount: 200.0,
            currency: "USD".to_string(),
            description: "Utilities".to_string(),
            date: now,
            category: "Bills".to_string(),
        },
    ]
}

/// Open Bank Project sandbox client
///
/// DirectLogin token exchange followed by an accounts fetch. See the module
/// docs for why the live payload is replaced with demo values.
#[derive(Clone)]
pub struct OpenBankClient {
    http_client: Client,
    host: String,
    username: String,
    password: String,
    consumer_key: Option<String>,
}

impl OpenBankClient {
    pub fn new(host: &str, username: &str, password: &str, consumer_key: Option<&str>) -> Self {
        Self {
            http_client: Client::new(),
            host: host.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
            consumer_key: consumer_key.map(|k| k.to_string()),
        }
    }

    /// Create from environment variables, with sandbox defaults
    pub fn from_env() -> Self {
        let host = std::env::var("OPENBANK_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let username = std::env::var("OPENBANK_USERNAME").unwrap_or_else(|_| "karan".to_string());
        let password = std::env::var("OPENBANK_PASSWORD").unwrap_or_else(|_| "123456".to_string());
        let consumer_key = std::env::var("OPENBANK_CONSUMER_KEY").ok();
        Self::new(&host, &username, &password, consumer_key.as_deref())
    }

    async fn direct_login_token(&self) -> Result<String> {
        let consumer_key = self.consumer_key.as_deref().unwrap_or_default();
        let auth = format!(
            "DirectLogin username=\"{}\",password=\"{}\",consumer_key=\"{}\"",
            self.username, self.password, consumer_key
        );

        let response = self
            .http_client
            .post(format!("{}/my/logins/direct", self.host))
            .header("Authorization", auth)
            .send()
            .await?
            .error_for_status()?;

        let token: DirectLoginResponse = response.json().await?;
        Ok(token.token)
    }

    /// Fetch `/my/accounts` with a DirectLogin token; the payload is logged
    /// and discarded (demo substitution, see module docs).
    async fn fetch_accounts(&self) -> Result<()> {
        let token = self.direct_login_token().await?;

        let response = self
            .http_client
            .get(format!("{}/obp/v4.0.0/my/accounts", self.host))
            .header("Authorization", format!("DirectLogin token=\"{}\"", token))
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await.unwrap_or_default();
        debug!(bytes = body.len(), "Fetched sandbox accounts (discarded)");
        Ok(())
    }
}

#[async_trait]
impl BankBackend for OpenBankClient {
    async fn account_balance(&self) -> Result<AccountBalance> {
        if self.consumer_key.is_some() {
            if let Err(e) = self.fetch_accounts().await {
                warn!(error = %e, "Sandbox balance fetch failed, serving demo data");
            }
        }
        Ok(demo_balance())
    }

    async fn recent_transactions(&self) -> Result<Vec<BankTransaction>> {
        if self.consumer_key.is_some() {
            if let Err(e) = self.fetch_accounts().await {
                warn!(error = %e, "Sandbox transaction fetch failed, serving demo data");
            }
        }
        Ok(demo_transactions())
    }
}

#[derive(Debug, Deserialize)]
struct DirectLoginResponse {
    token: String,
}

/// Mock banking source for testing
#[derive(Clone)]
pub struct MockBank {
    balance: AccountBalance,
    transactions: Vec<BankTransaction>,
    fail: bool,
}

impl Default for MockBank {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBank {
    /// Mock serving the demo dataset
    pub fn new() -> Self {
        Self {
            balance: demo_balance(),
            transactions: demo_transactions(),
            fail: false,
        }
    }

    /// Mock whose calls always fail
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Override the served balance
    pub fn with_balance(mut self, amount: f64, currency: &str) -> Self {
        self.balance = AccountBalance {
            amount,
            currency: currency.to_string(),
        };
        self
    }

    /// Override the served transactions
    pub fn with_transactions(mut self, transactions: Vec<BankTransaction>) -> Self {
        self.transactions = transactions;
        self
    }
}

#[async_trait]
impl BankBackend for MockBank {
    async fn account_balance(&self) -> Result<AccountBalance> {
        if self.fail {
            return Err(crate::error::Error::InvalidData(
                "mock bank configured to fail".into(),
            ));
        }
        Ok(self.balance.clone())
    }

    async fn recent_transactions(&self) -> Result<Vec<BankTransaction>> {
        if self.fail {
            return Err(crate::error::Error::InvalidData(
                "mock bank configured to fail".into(),
            ));
        }
        Ok(self.transactions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_dataset_shapes() {
        let bank = BankClient::mock();
        let balance = bank.account_balance().await.unwrap();
        assert_eq!(balance.amount, 5000.0);
        assert_eq!(balance.currency, "USD");

        let transactions = bank.recent_transactions().await.unwrap();
        assert_eq!(transactions.len(), 3);
        assert_eq!(transactions[0].category, "Food");
    }

    #[tokio::test]
    async fn test_failing_mock() {
        let bank = BankClient::Mock(MockBank::failing());
        assert!(bank.account_balance().await.is_err());
        assert!(bank.recent_transactions().await.is_err());
    }

    #[tokio::test]
    async fn test_openbank_without_key_serves_demo_data() {
        // No consumer key: the sandbox is never contacted
        let client = OpenBankClient::new("http://localhost:1", "u", "p", None);
        let balance = client.account_balance().await.unwrap();
        assert_eq!(balance.amount, 5000.0);
        assert_eq!(client.recent_transactions().await.unwrap().len(), 3);
    }
}
