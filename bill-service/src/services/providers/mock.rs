//! Mock provider for tests and local development.

use super::{FinishReason, GenerationParams, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use serde_json::json;

/// Mock text provider.
///
/// When enabled it answers with a canned, schema-shaped tips payload; when
/// disabled every call fails with NotConfigured, which drives the error
/// path in tests.
pub struct MockTextProvider {
    enabled: bool,
}

impl MockTextProvider {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            ));
        }

        // Simulate some processing
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        let payload = json!({
            "savingsTips": "- Review your subscriptions and cancel the ones you have not opened this month.\n- Batch errands into a single weekly trip to cut transportation costs.\n- Pack lunch three times a week instead of buying it."
        });

        Ok(ProviderResponse {
            text: Some(payload.to_string()),
            input_tokens: prompt.len() as i32 / 4,
            output_tokens: 40,
            finish_reason: FinishReason::Complete,
        })
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.enabled {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured(
                "Mock text provider not enabled".to_string(),
            ))
        }
    }
}
