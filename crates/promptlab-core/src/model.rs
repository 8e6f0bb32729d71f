use serde::{Deserialize, Serialize};

/// Raw output of one provider call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
    #[serde(default)]
    pub meta: serde_json::Value,
}

/// One model's graded answer within a run, as returned to the caller.
/// Field names are camelCase on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelResponse {
    pub model: String,
    pub response_text: String,
    pub time_ms: u64,
    pub score: u32,
}

/// Everything a finished single-prompt run reports back: the created row
/// identifiers, the per-model answers, and the mean score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRunReport {
    pub experiment_id: i64,
    pub experiment_run_id: i64,
    pub test_case_id: i64,
    pub responses: Vec<ModelResponse>,
    pub aggregate_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSettings {
    pub timeout_seconds: u64,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self { timeout_seconds: 30 }
    }
}
