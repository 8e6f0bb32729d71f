use super::LlmClient;
use crate::model::LlmResponse;
use async_trait::async_trait;
use std::collections::HashSet;

/// Deterministic stand-in for a real provider. Every model answers with a
/// canned line unless it is in the failing set.
#[derive(Debug, Default)]
pub struct FakeClient {
    fail_models: HashSet<String>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing<I, S>(models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fail_models: models.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl LlmClient for FakeClient {
    async fn complete(&self, model: &str, prompt: &str) -> anyhow::Result<LlmResponse> {
        if self.fail_models.contains(model) {
            anyhow::bail!("simulated provider failure for {}", model);
        }
        Ok(LlmResponse {
            text: format!("Simulated response from {} for prompt: \"{}\"", model, prompt),
            provider: "fake".to_string(),
            model: model.to_string(),
            meta: serde_json::json!({}),
        })
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}
