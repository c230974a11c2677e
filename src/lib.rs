//! graphmetrics
//!
//! A graph analytics and layout computation engine:
//! - adjacency-map graph model with a transport-neutral wire format
//! - pure centrality / community / topology algorithms with progress
//!   reporting
//! - layout algorithms (random, circular, spiral, shell, spectral,
//!   force-directed, Kamada–Kawai, bipartite, multipartite, BFS layers)
//! - an asynchronous dispatch layer running compute functions in isolated
//!   parallel workers with timeouts and cancellation
//!
//! ```rust,ignore
//! use graphmetrics::{ComputeDispatcher, DispatchConfig, ExecuteOptions, Graph, TaskDescriptor};
//!
//! let mut graph = Graph::new();
//! graph.add_edge("a", "b", 1.0);
//! graph.add_edge("b", "c", 1.0);
//!
//! let pool = ComputeDispatcher::new(DispatchConfig::default());
//! let task = TaskDescriptor::new("statistics", "degree")
//!     .arg(graph.to_wire())
//!     .arg(serde_json::Value::Null);
//! let degrees = pool.run(task, ExecuteOptions::default()).await?;
//! ```

pub mod algorithms;
pub mod dispatch;
pub mod graph;
pub mod layout;
pub mod registry;

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;

pub use algorithms::{ComputeError, ProgressReporter, StatOptions};
pub use dispatch::{
    ComputeDispatcher, ComputeEngine, DispatchConfig, DispatchError, ExecuteOptions,
    TaskDescriptor, TaskHandle, TaskStatus,
};
pub use graph::{Connection, Graph, GraphData, GraphError, NodeId};
pub use layout::{LayoutOptions, Point, Positions};
pub use registry::{catalog, resolve, Algorithm, AlgorithmInfo, ComputeValue, ResultScope};

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub pool: PoolYamlConfig,
    pub algorithms: AlgorithmYamlConfig,
}

/// Worker-pool configuration section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PoolYamlConfig {
    pub workers: usize,
    pub task_timeout_ms: u64,
}

impl Default for PoolYamlConfig {
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(4);
        Self {
            workers,
            task_timeout_ms: 30_000,
        }
    }
}

/// Algorithm default parameters section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlgorithmYamlConfig {
    pub eigenvector_tolerance: f64,
    pub eigenvector_max_iterations: usize,
    pub louvain_resolution: f64,
    pub louvain_max_levels: usize,
    pub layout_iterations: usize,
}

impl Default for AlgorithmYamlConfig {
    fn default() -> Self {
        Self {
            eigenvector_tolerance: 1e-6,
            eigenvector_max_iterations: 100,
            louvain_resolution: 1.0,
            louvain_max_levels: 10,
            layout_iterations: 50,
        }
    }
}

impl AlgorithmYamlConfig {
    /// Statistic options carrying these defaults explicitly.
    pub fn stat_options(&self) -> StatOptions {
        StatOptions {
            tolerance: Some(self.eigenvector_tolerance),
            max_iterations: Some(self.eigenvector_max_iterations),
            ..StatOptions::default()
        }
    }

    /// Layout options carrying these defaults explicitly.
    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            iterations: Some(self.layout_iterations),
            ..LayoutOptions::default()
        }
    }

    /// Louvain options carrying these defaults explicitly.
    pub fn louvain_options(&self) -> algorithms::community::LouvainOptions {
        algorithms::community::LouvainOptions {
            resolution: self.louvain_resolution,
            max_levels: self.louvain_max_levels,
            ..algorithms::community::LouvainOptions::default()
        }
    }
}

// ============================================================================
// Runtime config (what the engine actually uses)
// ============================================================================

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub workers: usize,
    pub task_timeout: Duration,
    pub algorithms: AlgorithmYamlConfig,
}

impl EngineConfig {
    /// Load configuration from environment variables only.
    /// Equivalent to `from_yaml_and_env(None)`.
    pub fn from_env() -> Result<Self> {
        Self::from_yaml_and_env(None)
    }

    /// Load configuration from an optional YAML file, then override with
    /// env vars.
    ///
    /// Priority: env var > YAML > default.
    ///
    /// If `yaml_path` is `None`, tries `config.yaml` in the CWD. A missing
    /// or malformed file falls back to pure env vars / defaults.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path);

        let workers = std::env::var("GRAPH_WORKERS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(yaml.pool.workers)
            .max(1);
        let task_timeout_ms = std::env::var("GRAPH_TASK_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(yaml.pool.task_timeout_ms);

        Ok(Self {
            workers,
            task_timeout: Duration::from_millis(task_timeout_ms),
            algorithms: yaml.algorithms,
        })
    }

    /// Try to load and parse a YAML config file. Returns defaults on any
    /// failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }

    /// Pool settings for a [`ComputeDispatcher`].
    pub fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            workers: self.workers,
            default_timeout: self.task_timeout,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
