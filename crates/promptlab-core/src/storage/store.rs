use anyhow::Context;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// SQLite-backed experiment store. Each write commits independently; no
/// transaction spans the multi-step record sequence of a run.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

/// Snapshot of one run row plus its result count.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_name: String,
    pub aggregate_score: Option<f64>,
    pub completed_at: Option<String>,
    pub results: i64,
}

impl Store {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path).context("failed to open sqlite db")?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory sqlite db")?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn init_schema(&self) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(crate::storage::schema::DDL)?;
        Ok(())
    }

    pub fn create_experiment(
        &self,
        name: &str,
        system_prompt: &str,
        model_name: &str,
    ) -> anyhow::Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO experiments(name, system_prompt, model_name, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![name, system_prompt, model_name, now_rfc3339()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn create_test_case(
        &self,
        user_message: &str,
        expected_output: &str,
        grader_type: &str,
    ) -> anyhow::Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO test_cases(user_message, expected_output, grader_type, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![user_message, expected_output, grader_type, now_rfc3339()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn link_test_case(&self, experiment_id: i64, test_case_id: i64) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO experiment_test_cases(experiment_id, test_case_id) VALUES (?1, ?2)",
            params![experiment_id, test_case_id],
        )?;
        Ok(())
    }

    pub fn create_run(&self, experiment_id: i64, run_name: &str) -> anyhow::Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO experiment_runs(experiment_id, run_name, started_at)
             VALUES (?1, ?2, ?3)",
            params![experiment_id, run_name, now_rfc3339()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn insert_result(
        &self,
        experiment_run_id: i64,
        test_case_id: i64,
        llm_response: &str,
        score: u32,
        grader_details: &str,
    ) -> anyhow::Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO results(experiment_run_id, test_case_id, llm_response, score, grader_details, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                experiment_run_id,
                test_case_id,
                llm_response,
                score as i64,
                grader_details,
                now_rfc3339()
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn finalize_run(
        &self,
        run_id: i64,
        aggregate_score: f64,
        completed_at: &str,
    ) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE experiment_runs SET aggregate_score=?1, completed_at=?2 WHERE id=?3",
            params![aggregate_score, completed_at, run_id],
        )?;
        Ok(())
    }

    pub fn run_summary(&self, run_id: i64) -> anyhow::Result<Option<RunSummary>> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                "SELECT run_name, aggregate_score, completed_at,
                        (SELECT COUNT(*) FROM results WHERE experiment_run_id = experiment_runs.id)
                 FROM experiment_runs WHERE id = ?1",
                params![run_id],
                |r| {
                    Ok(RunSummary {
                        run_name: r.get(0)?,
                        aggregate_score: r.get(1)?,
                        completed_at: r.get(2)?,
                        results: r.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    pub fn count_rows(&self, table: &str) -> anyhow::Result<i64> {
        // Allowlist to keep the identifier out of untrusted hands.
        if !CLEAR_ORDER.contains(&table) {
            anyhow::bail!("Invalid table name for count_rows: {}", table);
        }
        let conn = self.conn.lock().unwrap();
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        let n: i64 = conn.query_row(&sql, [], |r| r.get(0))?;
        Ok(n)
    }

    /// Deletes every row from every experiment table. Deletion order
    /// respects the foreign key constraints.
    pub fn clear_all(&self) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        for table in CLEAR_ORDER {
            let sql = format!("DELETE FROM {}", table);
            conn.execute(&sql, [])?;
        }
        Ok(())
    }
}

const CLEAR_ORDER: [&str; 5] = [
    "results",
    "experiment_runs",
    "experiment_test_cases",
    "test_cases",
    "experiments",
];

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
