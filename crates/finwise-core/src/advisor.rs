//! Financial advice generation
//!
//! Given a free-text question, assembles a financial context from the
//! banking collaborator (balance + recent transactions, fetched in
//! parallel), renders a prompt, and forwards it to the text-generation
//! collaborator. Any failure along the way degrades to a context-free
//! fallback call prefixed with an apology; only a failure of the fallback
//! itself propagates to the caller.

use std::collections::BTreeMap;

use tracing::warn;

use crate::banking::{AccountBalance, BankBackend, BankClient, BankTransaction};
use crate::error::Result;
use crate::llm::{LlmBackend, LlmClient};

/// Prefix on degraded responses when financial data is unavailable
pub const APOLOGY_PREFIX: &str = "I apologize, but I'm having trouble accessing your financial \
data at the moment. Here's some general advice based on your question:\n\n";

/// Balance below this triggers the low-balance advisory note
pub const LOW_BALANCE_THRESHOLD: f64 = 1000.0;

/// Mean transaction above this triggers the high-average advisory note
pub const HIGH_AVG_TRANSACTION_THRESHOLD: f64 = 100.0;

/// Assembled financial context for the advisor prompt
#[derive(Debug)]
pub struct AdvisorContext {
    pub balance: AccountBalance,
    pub transactions: Vec<BankTransaction>,
}

impl AdvisorContext {
    pub fn new(balance: AccountBalance, transactions: Vec<BankTransaction>) -> Self {
        Self {
            balance,
            transactions,
        }
    }

    /// Spend grouped by transaction category
    pub fn category_totals(&self) -> BTreeMap<String, f64> {
        let mut totals = BTreeMap::new();
        for tx in &self.transactions {
            let category = if tx.category.is_empty() {
                "Uncategorized".to_string()
            } else {
                tx.category.clone()
            };
            *totals.entry(category).or_insert(0.0) += tx.amount;
        }
        totals
    }

    /// Per-category spend breakdown as prompt text
    pub fn spending_summary(&self) -> String {
        let mut summary = String::from("Based on your recent transactions:\n\n");
        for (category, amount) in self.category_totals() {
            summary.push_str(&format!("- {}: ${:.2}\n", category, amount));
        }
        summary
    }

    /// Rule-based advisory notes derived from fixed thresholds
    pub fn advisory_notes(&self) -> String {
        let mut notes = String::new();

        if self.balance.amount < LOW_BALANCE_THRESHOLD {
            notes.push_str(
                "Warning: your balance is getting low. Consider reducing non-essential expenses.\n\n",
            );
        }

        if !self.transactions.is_empty() {
            let total: f64 = self.transactions.iter().map(|t| t.amount).sum();
            let average = total / self.transactions.len() as f64;
            if average > HIGH_AVG_TRANSACTION_THRESHOLD {
                notes.push_str(
                    "Tip: your average transaction is relatively high. Look for opportunities \
                     to save on regular purchases.\n\n",
                );
            }
        }

        notes
    }

    /// Render the full context block for the prompt
    pub fn render(&self) -> String {
        let mut context = format!(
            "Current balance: {:.2} {}\n",
            self.balance.amount, self.balance.currency
        );
        if !self.transactions.is_empty() {
            context.push_str(&self.spending_summary());
        }
        context.push_str(&self.advisory_notes());
        context
    }
}

/// Render the advisor prompt from a context block and the user's question
pub fn advice_prompt(context: &str, user_query: &str) -> String {
    format!(
        "As an AI financial advisor, please provide advice based on the following context \
         and user question:\n\n\
         Financial Context:\n{}\n\n\
         User Question:\n{}\n\n\
         Please provide specific, actionable advice considering the user's current \
         financial situation.",
        context, user_query
    )
}

/// Generates financial advice from banking context + an LLM call
#[derive(Clone)]
pub struct AdviceGenerator {
    bank: BankClient,
    llm: LlmClient,
}

impl AdviceGenerator {
    pub fn new(bank: BankClient, llm: LlmClient) -> Self {
        Self { bank, llm }
    }

    /// Answer a user question with full financial context.
    ///
    /// On any failure (banking call, prompt generation, LLM call) the
    /// question is retried without context, prefixed with
    /// [`APOLOGY_PREFIX`]; an error from that fallback propagates.
    pub async fn generate(&self, user_query: &str) -> Result<String> {
        match self.generate_with_context(user_query).await {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!(error = %e, "Advice generation failed, falling back to context-free advice");
                let fallback = self.llm.generate(user_query).await?;
                Ok(format!("{}{}", APOLOGY_PREFIX, fallback))
            }
        }
    }

    async fn generate_with_context(&self, user_query: &str) -> Result<String> {
        // Balance and transactions are independent; fetch both in parallel.
        let (balance, transactions) =
            tokio::join!(self.bank.account_balance(), self.bank.recent_transactions());

        let context = AdvisorContext::new(balance?, transactions?);
        let prompt = advice_prompt(&context.render(), user_query);

        self.llm.generate(&prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banking::MockBank;
    use crate::llm::MOCK_ADVICE;
    use chrono::Utc;

    fn tx(amount: f64, category: &str) -> BankTransaction {
        BankTransaction {
            id: "t".to_string(),
            amount,
            currency: "USD".to_string(),
            description: category.to_string(),
            date: Utc::now(),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_context_renders_balance_and_categories() {
        let ctx = AdvisorContext::new(
            AccountBalance {
                amount: 5000.0,
                currency: "USD".to_string(),
            },
            vec![tx(150.0, "Food"), tx(45.0, "Transport"), tx(10.0, "Food")],
        );

        let rendered = ctx.render();
        assert!(rendered.contains("Current balance: 5000.00 USD"));
        assert!(rendered.contains("- Food: $160.00"));
        assert!(rendered.contains("- Transport: $45.00"));
    }

    #[test]
    fn test_low_balance_note() {
        let ctx = AdvisorContext::new(
            AccountBalance {
                amount: 900.0,
                currency: "USD".to_string(),
            },
            vec![],
        );
        assert!(ctx.advisory_notes().contains("balance is getting low"));
    }

    #[test]
    fn test_high_average_note() {
        let ctx = AdvisorContext::new(
            AccountBalance {
                amount: 5000.0,
                currency: "USD".to_string(),
            },
            vec![tx(150.0, "Food"), tx(200.0, "Bills")],
        );
        assert!(ctx.advisory_notes().contains("average transaction is relatively high"));
    }

    #[test]
    fn test_no_notes_when_under_thresholds() {
        let ctx = AdvisorContext::new(
            AccountBalance {
                amount: 5000.0,
                currency: "USD".to_string(),
            },
            vec![tx(10.0, "Food")],
        );
        assert!(ctx.advisory_notes().is_empty());
    }

    #[tokio::test]
    async fn test_generate_returns_llm_output_verbatim() {
        let advisor = AdviceGenerator::new(BankClient::mock(), LlmClient::mock());
        let advice = advisor.generate("How am I doing?").await.unwrap();
        assert_eq!(advice, MOCK_ADVICE);
    }

    #[tokio::test]
    async fn test_bank_failure_falls_back_with_apology() {
        let advisor = AdviceGenerator::new(
            BankClient::Mock(MockBank::failing()),
            LlmClient::mock(),
        );
        let advice = advisor.generate("How am I doing?").await.unwrap();
        assert!(advice.starts_with(APOLOGY_PREFIX));
        assert!(advice.ends_with(MOCK_ADVICE));
        // the apology appears exactly once
        assert_eq!(advice.matches("I apologize").count(), 1);
    }

    #[tokio::test]
    async fn test_fallback_failure_propagates() {
        let advisor = AdviceGenerator::new(
            BankClient::Mock(MockBank::failing()),
            LlmClient::Mock(crate::llm::MockBackend::failing()),
        );
        assert!(advisor.generate("How am I doing?").await.is_err());
    }
}
