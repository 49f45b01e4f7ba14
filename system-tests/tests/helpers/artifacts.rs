// system-tests/tests/helpers/artifacts.rs
// ============================================================================
// Module: Test Artifacts
// Description: Artifact helpers for system-tests.
// Purpose: Create per-test run roots and write deterministic summaries.
// Dependencies: system-tests, serde, serde_jcs, storecheck-core
// ============================================================================

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;
use storecheck_core::PlanReport;
use system_tests::config::SystemTestConfig;

/// One serializable row of a plan report.
#[derive(Debug, Serialize)]
struct PlanRow {
    /// Step name.
    step: String,
    /// Terminal state label.
    state: String,
    /// Failure or skip diagnostic, when present.
    detail: Option<String>,
}

/// Serializable summary of a finished suite scenario.
#[derive(Debug, Serialize)]
struct ScenarioSummary {
    /// Scenario name.
    scenario: String,
    /// Overall status label.
    status: String,
    /// Wall-clock end of the scenario in unix milliseconds.
    ended_at_ms: u128,
    /// Per-step outcomes.
    steps: Vec<PlanRow>,
}

fn now_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

fn default_run_root(scenario: &str) -> PathBuf {
    let stamp = now_millis();
    PathBuf::from("target/system-tests").join(format!("run_{stamp}")).join(scenario)
}

/// Artifact writer for a single suite scenario.
#[derive(Debug, Clone)]
pub struct ScenarioArtifacts {
    /// Root directory the artifacts are written under.
    root: PathBuf,
    /// Scenario name used in summaries.
    scenario: String,
}

impl ScenarioArtifacts {
    /// Creates the artifact root for a scenario.
    pub fn new(scenario: &str) -> io::Result<Self> {
        let config =
            SystemTestConfig::load().map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        let root = config.run_root.unwrap_or_else(|| default_run_root(scenario));
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            scenario: scenario.to_string(),
        })
    }

    /// Returns the root directory for the scenario artifacts.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes a JSON artifact using canonical JCS serialization.
    pub fn write_json<T: Serialize>(&self, name: &str, value: &T) -> io::Result<PathBuf> {
        let path = self.root.join(name);
        let bytes = serde_jcs::to_vec(value)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?;
        fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Writes the plan report as the scenario summary artifact.
    pub fn write_plan_report(&self, report: &PlanReport) -> io::Result<PathBuf> {
        let steps = report
            .outcomes()
            .iter()
            .map(|outcome| PlanRow {
                step: outcome.name.clone(),
                state: outcome.state.as_str().to_string(),
                detail: outcome.detail.clone(),
            })
            .collect();
        let summary = ScenarioSummary {
            scenario: self.scenario.clone(),
            status: if report.all_passed() { "passed".to_string() } else { "failed".to_string() },
            ended_at_ms: now_millis(),
            steps,
        };
        self.write_json("plan_report.json", &summary)
    }
}
