use crate::model::LlmResponse;
use async_trait::async_trait;

/// Chat-completion backend. One client serves several model identifiers;
/// the runner passes the model id per call.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, model: &str, prompt: &str) -> anyhow::Result<LlmResponse>;
    fn provider_name(&self) -> &'static str;
}

pub mod fake;
pub mod openai;
