//! Savings advisor: request building, tip generation and the
//! single-flight gate.

use crate::models::{Bill, BillCategory};
use crate::services::prompt;
use crate::services::providers::{GenerationParams, ProviderError, TextProvider};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Output cap sized for the ~200-word tip list the prompt asks for.
const MAX_TIP_TOKENS: i32 = 512;

/// Error type for tip generation.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Savings tips backend failed: {0}")]
    Backend(#[from] ProviderError),

    #[error("Backend returned no text content")]
    EmptyResponse,

    #[error("Backend returned a malformed tips payload: {0}")]
    MalformedResponse(String),
}

/// Input for one tips generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct TipRequest {
    /// Pretty-printed JSON array of {category, amount, description}.
    pub expense_data: String,

    /// User-supplied spending limit.
    pub spending_limit: f64,

    /// Sum of amounts over unpaid bills.
    pub current_spending: f64,
}

#[derive(Debug, Serialize)]
struct ExpenseEntry {
    category: BillCategory,
    amount: f64,
    description: String,
}

/// Derive a TipRequest from the bill collection and the user's limit.
///
/// Current spending counts unpaid bills only; the expense listing covers
/// every bill, in insertion order. Does not mutate its input.
pub fn build_tip_request(bills: &[Bill], spending_limit: f64) -> TipRequest {
    let current_spending = bills
        .iter()
        .filter(|b| !b.is_paid)
        .map(|b| b.amount)
        .sum();

    let entries: Vec<ExpenseEntry> = bills
        .iter()
        .map(|b| ExpenseEntry {
            category: b.category,
            amount: b.amount,
            description: b.description.clone(),
        })
        .collect();
    let expense_data = serde_json::to_string_pretty(&entries).unwrap_or_default();

    TipRequest {
        expense_data,
        spending_limit,
        current_spending,
    }
}

/// Generates savings tips through the configured text provider.
#[derive(Clone)]
pub struct TipAdvisor {
    provider: Arc<dyn TextProvider>,
}

impl TipAdvisor {
    pub fn new(provider: Arc<dyn TextProvider>) -> Self {
        Self { provider }
    }

    /// Render the instruction template, call the backend with the
    /// structured-output schema and validate the reply.
    ///
    /// Callers get either the tips text unmodified or a typed error;
    /// nothing escapes this boundary as a panic.
    pub async fn generate(&self, request: &TipRequest) -> Result<String, GenerationError> {
        let prompt_text = prompt::render_savings_prompt(request);
        let params = GenerationParams {
            max_tokens: Some(MAX_TIP_TOKENS),
            output_schema: Some(prompt::savings_tips_schema().to_string()),
            ..Default::default()
        };

        let response = self.provider.generate(&prompt_text, &params).await?;
        let raw = response.text.ok_or(GenerationError::EmptyResponse)?;
        prompt::parse_tips_response(&raw)
    }

    pub async fn health_check(&self) -> Result<(), ProviderError> {
        self.provider.health_check().await
    }
}

/// Phase of the single permitted in-flight tips generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipPhase {
    Idle,
    Pending,
    Settled,
}

/// Allows at most one tips generation in flight per process.
///
/// The dashboard disables its button while a request is pending; the
/// invariant is also enforced server-side as an explicit state machine.
#[derive(Clone)]
pub struct TipGate {
    phase: Arc<Mutex<TipPhase>>,
}

impl TipGate {
    pub fn new() -> Self {
        Self {
            phase: Arc::new(Mutex::new(TipPhase::Idle)),
        }
    }

    pub fn phase(&self) -> TipPhase {
        *self.phase.lock().expect("tip gate lock poisoned")
    }

    /// Claim the gate. Returns a guard while Idle or Settled; None while a
    /// generation is already Pending. Dropping the guard settles the gate.
    pub fn try_begin(&self) -> Option<TipGateGuard> {
        let mut phase = self.phase.lock().expect("tip gate lock poisoned");
        if *phase == TipPhase::Pending {
            return None;
        }
        *phase = TipPhase::Pending;
        Some(TipGateGuard {
            phase: Arc::clone(&self.phase),
        })
    }
}

impl Default for TipGate {
    fn default() -> Self {
        Self::new()
    }
}

pub struct TipGateGuard {
    phase: Arc<Mutex<TipPhase>>,
}

impl Drop for TipGateGuard {
    fn drop(&mut self) {
        *self.phase.lock().expect("tip gate lock poisoned") = TipPhase::Settled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::{FinishReason, ProviderResponse};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn bill(description: &str, amount: f64, category: BillCategory, is_paid: bool) -> Bill {
        Bill {
            bill_id: Uuid::new_v4(),
            description: description.to_string(),
            amount,
            due_date: NaiveDate::from_ymd_opt(2024, 7, 25).unwrap(),
            category,
            is_paid,
            reminders: true,
        }
    }

    /// Provider stub returning a fixed payload.
    struct StubProvider {
        reply: Option<String>,
    }

    #[async_trait]
    impl TextProvider for StubProvider {
        async fn generate(
            &self,
            _prompt: &str,
            _params: &GenerationParams,
        ) -> Result<ProviderResponse, ProviderError> {
            Ok(ProviderResponse {
                text: self.reply.clone(),
                input_tokens: 1,
                output_tokens: 1,
                finish_reason: FinishReason::Complete,
            })
        }

        async fn health_check(&self) -> Result<(), ProviderError> {
            Ok(())
        }
    }

    /// Provider stub that always fails.
    struct FailingProvider;

    #[async_trait]
    impl TextProvider for FailingProvider {
        async fn generate(
            &self,
            _prompt: &str,
            _params: &GenerationParams,
        ) -> Result<ProviderResponse, ProviderError> {
            Err(ProviderError::NetworkError("connection refused".to_string()))
        }

        async fn health_check(&self) -> Result<(), ProviderError> {
            Err(ProviderError::NetworkError("connection refused".to_string()))
        }
    }

    #[test]
    fn current_spending_counts_unpaid_bills_only() {
        let bills = vec![
            bill("Electricity Bill", 100.0, BillCategory::Utilities, false),
            bill("Groceries", 50.0, BillCategory::Groceries, true),
        ];

        let request = build_tip_request(&bills, 1000.0);

        assert_eq!(request.current_spending, 100.0);
        assert_eq!(request.spending_limit, 1000.0);
    }

    #[test]
    fn expense_data_preserves_length_and_order() {
        let bills = vec![
            bill("Rent", 900.0, BillCategory::Housing, false),
            bill("Bus Pass", 40.0, BillCategory::Transportation, true),
            bill("Gym", 25.0, BillCategory::Health, false),
        ];

        let request = build_tip_request(&bills, 1200.0);
        let entries: Vec<serde_json::Value> =
            serde_json::from_str(&request.expense_data).expect("expense data should be JSON");

        assert_eq!(entries.len(), bills.len());
        assert_eq!(entries[0]["description"], "Rent");
        assert_eq!(entries[1]["description"], "Bus Pass");
        assert_eq!(entries[2]["description"], "Gym");
        // Entries carry exactly {category, amount, description}.
        assert_eq!(entries[0].as_object().unwrap().len(), 3);
        assert_eq!(entries[0]["category"], "housing");
    }

    #[test]
    fn empty_bill_collection_yields_empty_request() {
        let request = build_tip_request(&[], 500.0);

        assert_eq!(request.current_spending, 0.0);
        let entries: Vec<serde_json::Value> =
            serde_json::from_str(&request.expense_data).expect("expense data should be JSON");
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn generate_unwraps_stubbed_tips() {
        let advisor = TipAdvisor::new(Arc::new(StubProvider {
            reply: Some(r#"{"savingsTips": "X"}"#.to_string()),
        }));

        let tips = advisor
            .generate(&build_tip_request(&[], 1000.0))
            .await
            .expect("generation should succeed");

        assert_eq!(tips, "X");
    }

    #[tokio::test]
    async fn generate_surfaces_backend_failure_as_typed_error() {
        let advisor = TipAdvisor::new(Arc::new(FailingProvider));

        let err = advisor
            .generate(&build_tip_request(&[], 1000.0))
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::Backend(_)));
    }

    #[tokio::test]
    async fn generate_rejects_empty_text_content() {
        let advisor = TipAdvisor::new(Arc::new(StubProvider { reply: None }));

        let err = advisor
            .generate(&build_tip_request(&[], 1000.0))
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::EmptyResponse));
    }

    #[tokio::test]
    async fn generate_rejects_malformed_payload() {
        let advisor = TipAdvisor::new(Arc::new(StubProvider {
            reply: Some("not json".to_string()),
        }));

        let err = advisor
            .generate(&build_tip_request(&[], 1000.0))
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[test]
    fn gate_allows_one_pending_generation() {
        let gate = TipGate::new();
        assert_eq!(gate.phase(), TipPhase::Idle);

        let guard = gate.try_begin().expect("gate should open from idle");
        assert_eq!(gate.phase(), TipPhase::Pending);
        assert!(gate.try_begin().is_none());

        drop(guard);
        assert_eq!(gate.phase(), TipPhase::Settled);
        assert!(gate.try_begin().is_some());
    }
}
