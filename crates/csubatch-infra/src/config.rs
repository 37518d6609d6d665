//! Engine configuration: the tunables named in the engine specification's
//! external-interfaces section, loadable from an optional YAML/JSON file and
//! otherwise defaulting to the documented values.

use std::path::Path;

use serde::{Deserialize, Serialize};

use csubatch_core::{EngineError, EngineResult};
use csubatch_scheduler::Policy;

/// Default scheduler re-sort interval, milliseconds.
pub const DEFAULT_SCHEDULER_TICK_MS: u64 = 500;
/// Default dispatcher idle-poll interval, milliseconds.
pub const DEFAULT_DISPATCHER_IDLE_MS: u64 = 100;

/// Engine-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum simulated seconds a job runs before being time-sliced.
    /// `None` (the default) means a job always runs to completion.
    pub cpu_time_slice: Option<u64>,
    /// How often the scheduler re-sorts the pending sequence, milliseconds.
    pub scheduler_tick_ms: u64,
    /// How long the dispatcher sleeps between polls of an empty queue,
    /// milliseconds.
    pub dispatcher_idle_ms: u64,
    /// Ordering policy the engine starts with.
    pub initial_policy: Policy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cpu_time_slice: None,
            scheduler_tick_ms: DEFAULT_SCHEDULER_TICK_MS,
            dispatcher_idle_ms: DEFAULT_DISPATCHER_IDLE_MS,
            initial_policy: Policy::Fcfs,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from a YAML or JSON file, chosen by extension
    /// (`.yaml`/`.yml` or `.json`). Unknown extensions are read as YAML,
    /// since YAML is a superset of JSON.
    pub fn from_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| EngineError::NotFound(format!("{}: {e}", path.display())))?;

        if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
            serde_json::from_str(&contents)
                .map_err(|e| EngineError::TransientUnavailable(format!("invalid config: {e}")))
        } else {
            serde_yaml::from_str(&contents)
                .map_err(|e| EngineError::TransientUnavailable(format!("invalid config: {e}")))
        }
    }
}
