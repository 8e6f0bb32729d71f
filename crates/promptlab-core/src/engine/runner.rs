use crate::grading::Grader;
use crate::model::{LlmResponse, ModelResponse, PromptRunReport, RunSettings};
use crate::providers::llm::LlmClient;
use crate::storage::store::Store;
use std::sync::Arc;
use tokio::time::{timeout, Duration};

pub const EXPERIMENT_NAME: &str = "Single-Prompt Experiment";
pub const RUN_NAME: &str = "Single Prompt Run";
pub const EXPECTED_OUTPUT_PLACEHOLDER: &str = "N/A (not used in this simple scenario)";

/// Runs one prompt against every configured model, sequentially, and
/// persists the comparison as an experiment.
pub struct Runner {
    pub store: Store,
    pub client: Arc<dyn LlmClient>,
    pub grader: Arc<dyn Grader>,
    pub models: Vec<String>,
    pub settings: RunSettings,
}

impl Runner {
    /// Records an Experiment, a TestCase, the link row, and an
    /// ExperimentRun, then fans out to each model in order. A failed model
    /// call becomes a zero-score sentinel result; it never aborts the run.
    /// Database errors propagate.
    pub async fn run_one_prompt(&self, prompt: &str) -> anyhow::Result<PromptRunReport> {
        if prompt.is_empty() {
            anyhow::bail!("prompt must not be empty");
        }

        let experiment_id = self.store.create_experiment(
            EXPERIMENT_NAME,
            prompt,
            &format!("Comparing {} LLMs", self.models.len()),
        )?;

        let test_case_id = self.store.create_test_case(
            prompt,
            EXPECTED_OUTPUT_PLACEHOLDER,
            self.grader.grader_type(),
        )?;
        self.store.link_test_case(experiment_id, test_case_id)?;

        let experiment_run_id = self.store.create_run(experiment_id, RUN_NAME)?;

        let mut responses: Vec<ModelResponse> = Vec::with_capacity(self.models.len());

        for model in &self.models {
            let start = std::time::Instant::now();
            match self.call_model(model, prompt).await {
                Ok(resp) => {
                    let time_ms = start.elapsed().as_millis() as u64;
                    let score = self
                        .grader
                        .grade(prompt, EXPECTED_OUTPUT_PLACEHOLDER, &resp.text)
                        .await?;
                    self.store.insert_result(
                        experiment_run_id,
                        test_case_id,
                        &resp.text,
                        score,
                        &format!("Auto-graded. Model used: {}", model),
                    )?;
                    responses.push(ModelResponse {
                        model: model.clone(),
                        response_text: resp.text,
                        time_ms,
                        score,
                    });
                }
                Err(e) => {
                    // One bad backend must not abort the comparison.
                    tracing::warn!(event = "model_call_failed", model = %model, error = %e);
                    let response_text = format!("ERROR: no response from {}", model);
                    self.store.insert_result(
                        experiment_run_id,
                        test_case_id,
                        &response_text,
                        0,
                        &format!("Call failed: {}", e),
                    )?;
                    responses.push(ModelResponse {
                        model: model.clone(),
                        response_text,
                        time_ms: 0,
                        score: 0,
                    });
                }
            }
        }

        let aggregate_score = if responses.is_empty() {
            0.0
        } else {
            responses.iter().map(|r| r.score as f64).sum::<f64>() / responses.len() as f64
        };

        self.store.finalize_run(
            experiment_run_id,
            aggregate_score,
            &chrono::Utc::now().to_rfc3339(),
        )?;

        Ok(PromptRunReport {
            experiment_id,
            experiment_run_id,
            test_case_id,
            responses,
            aggregate_score,
        })
    }

    async fn call_model(&self, model: &str, prompt: &str) -> anyhow::Result<LlmResponse> {
        let t = self.settings.timeout_seconds;
        let fut = self.client.complete(model, prompt);
        let resp = timeout(Duration::from_secs(t), fut).await??;
        Ok(resp)
    }
}
