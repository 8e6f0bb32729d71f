use async_trait::async_trait;
use promptlab_core::engine::runner::Runner;
use promptlab_core::grading::{FixedGrader, Grader};
use promptlab_core::model::RunSettings;
use promptlab_core::providers::llm::fake::FakeClient;
use promptlab_core::storage::store::Store;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

fn models(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn runner(store: Store, client: FakeClient, grader: Arc<dyn Grader>, names: &[&str]) -> Runner {
    Runner {
        store,
        client: Arc::new(client),
        grader,
        models: models(names),
        settings: RunSettings::default(),
    }
}

/// Hands out a pre-seeded score per call, in order.
struct SequenceGrader(Mutex<VecDeque<u32>>);

impl SequenceGrader {
    fn new(scores: &[u32]) -> Self {
        Self(Mutex::new(scores.iter().copied().collect()))
    }
}

#[async_trait]
impl Grader for SequenceGrader {
    async fn grade(&self, _p: &str, _e: &str, _r: &str) -> anyhow::Result<u32> {
        self.0
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("sequence exhausted"))
    }

    fn grader_type(&self) -> &'static str {
        "sequence"
    }
}

#[tokio::test]
async fn all_success_run_reports_every_model() -> anyhow::Result<()> {
    let store = Store::memory()?;
    store.init_schema()?;

    let r = runner(
        store.clone(),
        FakeClient::new(),
        Arc::new(FixedGrader(4)),
        &["m1", "m2", "m3"],
    );
    let report = r.run_one_prompt("What is Rust?").await?;

    assert_eq!(report.responses.len(), 3);
    assert_eq!(report.aggregate_score, 4.0);
    for (resp, model) in report.responses.iter().zip(["m1", "m2", "m3"]) {
        assert_eq!(resp.model, model);
        assert_eq!(resp.score, 4);
        assert!(resp.response_text.contains(model));
        assert!(resp.response_text.contains("What is Rust?"));
    }

    // Exactly one row per entity, one result per model.
    assert_eq!(store.count_rows("experiments")?, 1);
    assert_eq!(store.count_rows("test_cases")?, 1);
    assert_eq!(store.count_rows("experiment_test_cases")?, 1);
    assert_eq!(store.count_rows("experiment_runs")?, 1);
    assert_eq!(store.count_rows("results")?, 3);

    let summary = store.run_summary(report.experiment_run_id)?.expect("run exists");
    assert_eq!(summary.aggregate_score, Some(4.0));
    assert!(summary.completed_at.is_some());
    assert_eq!(summary.results, 3);
    Ok(())
}

#[tokio::test]
async fn aggregate_is_the_mean_of_scores() -> anyhow::Result<()> {
    let store = Store::memory()?;
    store.init_schema()?;

    let r = runner(
        store,
        FakeClient::new(),
        Arc::new(SequenceGrader::new(&[3, 5, 4])),
        &["m1", "m2", "m3"],
    );
    let report = r.run_one_prompt("prompt").await?;

    let scores: Vec<u32> = report.responses.iter().map(|r| r.score).collect();
    assert_eq!(scores, vec![3, 5, 4]);
    assert_eq!(report.aggregate_score, 4.0);
    Ok(())
}

#[tokio::test]
async fn failed_model_becomes_zero_score_sentinel() -> anyhow::Result<()> {
    let store = Store::memory()?;
    store.init_schema()?;

    let r = runner(
        store.clone(),
        FakeClient::failing(["m2"]),
        Arc::new(FixedGrader(3)),
        &["m1", "m2", "m3"],
    );
    let report = r.run_one_prompt("prompt").await?;

    assert_eq!(report.responses.len(), 3);
    let failed = &report.responses[1];
    assert_eq!(failed.model, "m2");
    assert_eq!(failed.score, 0);
    assert_eq!(failed.time_ms, 0);
    assert!(failed.response_text.starts_with("ERROR:"));

    // 3 + 0 + 3 over three models.
    assert_eq!(report.aggregate_score, 2.0);
    // The sentinel is persisted too.
    assert_eq!(store.count_rows("results")?, 3);
    Ok(())
}

#[tokio::test]
async fn all_failures_aggregate_to_zero() -> anyhow::Result<()> {
    let store = Store::memory()?;
    store.init_schema()?;

    let r = runner(
        store.clone(),
        FakeClient::failing(["m1", "m2"]),
        Arc::new(FixedGrader(5)),
        &["m1", "m2"],
    );
    let report = r.run_one_prompt("prompt").await?;

    assert!(report.responses.iter().all(|r| r.score == 0));
    assert_eq!(report.aggregate_score, 0.0);
    assert_eq!(store.count_rows("results")?, 2);
    Ok(())
}

#[tokio::test]
async fn zero_configured_models_yield_empty_run() -> anyhow::Result<()> {
    let store = Store::memory()?;
    store.init_schema()?;

    let r = runner(store.clone(), FakeClient::new(), Arc::new(FixedGrader(5)), &[]);
    let report = r.run_one_prompt("prompt").await?;

    assert!(report.responses.is_empty());
    assert_eq!(report.aggregate_score, 0.0);
    assert_eq!(store.count_rows("results")?, 0);
    // The run is still finalized.
    let summary = store.run_summary(report.experiment_run_id)?.expect("run exists");
    assert_eq!(summary.aggregate_score, Some(0.0));
    assert!(summary.completed_at.is_some());
    Ok(())
}

#[tokio::test]
async fn empty_prompt_is_rejected_before_any_write() -> anyhow::Result<()> {
    let store = Store::memory()?;
    store.init_schema()?;

    let r = runner(store.clone(), FakeClient::new(), Arc::new(FixedGrader(5)), &["m1"]);
    assert!(r.run_one_prompt("").await.is_err());

    assert_eq!(store.count_rows("experiments")?, 0);
    assert_eq!(store.count_rows("experiment_runs")?, 0);
    Ok(())
}
