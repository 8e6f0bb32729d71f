//! SQLite DDL for the experiment tables.

pub const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS experiments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    system_prompt TEXT NOT NULL,
    model_name TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS test_cases (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_message TEXT NOT NULL,
    expected_output TEXT NOT NULL,
    grader_type TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS experiment_test_cases (
    experiment_id INTEGER NOT NULL REFERENCES experiments(id),
    test_case_id INTEGER NOT NULL REFERENCES test_cases(id),
    PRIMARY KEY (experiment_id, test_case_id)
);

CREATE TABLE IF NOT EXISTS experiment_runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    experiment_id INTEGER NOT NULL REFERENCES experiments(id),
    run_name TEXT NOT NULL,
    aggregate_score REAL,
    started_at TEXT NOT NULL,
    completed_at TEXT
);

CREATE TABLE IF NOT EXISTS results (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    experiment_run_id INTEGER NOT NULL REFERENCES experiment_runs(id),
    test_case_id INTEGER NOT NULL REFERENCES test_cases(id),
    llm_response TEXT NOT NULL,
    score INTEGER NOT NULL,
    grader_details TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_runs_experiment ON experiment_runs(experiment_id);
CREATE INDEX IF NOT EXISTS idx_results_run ON results(experiment_run_id);
"#;
