use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::routing::RuleOrder;
use crate::topology::{parse_fat_tree_name, FatTreeDimensions};

/// Default output directory
pub const DEFAULT_OUTPUT_DIR: &str = "fabric_output";

/// Top-level configuration file
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    pub fabric: Fabric,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.fabric {
            Fabric::Generate { topology, addresses_per_host, .. } => {
                let pod = parse_fat_tree_name(topology)
                    .map_err(|e| ValidationError::InvalidFabric(e.to_string()))?;
                let dims = FatTreeDimensions::new(pod)
                    .map_err(|e| ValidationError::InvalidFabric(e.to_string()))?;

                if *addresses_per_host == 0 {
                    return Err(ValidationError::InvalidFabric(
                        "addresses_per_host must be at least 1".to_string(),
                    ));
                }
                let demand = dims.hosts as u128 * *addresses_per_host as u128;
                if demand > 1u128 << 32 {
                    return Err(ValidationError::InvalidFabric(format!(
                        "{} hosts x {} addresses exceeds the 32-bit address space",
                        dims.hosts, addresses_per_host
                    )));
                }
            }
            Fabric::Import { topology, routes, .. } => {
                if topology.as_os_str().is_empty() {
                    return Err(ValidationError::InvalidFabric(
                        "import topology path cannot be empty".to_string(),
                    ));
                }
                if routes.as_os_str().is_empty() {
                    return Err(ValidationError::InvalidFabric(
                        "import routes directory cannot be empty".to_string(),
                    ));
                }
            }
        }

        if let Some(level) = &self.general.log_level {
            if level.parse::<log::LevelFilter>().is_err() {
                return Err(ValidationError::InvalidGeneral(format!(
                    "unknown log_level '{}'",
                    level
                )));
            }
        }

        Ok(())
    }
}

/// Shared general configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GeneralConfig {
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    /// Leave host-facing links out of `topology.json`
    #[serde(default)]
    pub exclude_host_links: bool,
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_addresses_per_host() -> usize {
    1
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            log_level: None,
            exclude_host_links: false,
        }
    }
}

/// How the fabric is obtained
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Fabric {
    /// Build a fat-tree, assign addresses and compute ECMP routes
    Generate {
        /// Topology name, e.g. "FatTree-8"
        topology: String,
        #[serde(default = "default_addresses_per_host")]
        addresses_per_host: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
    },
    /// Load an adjacency list and per-switch route tables
    Import {
        topology: PathBuf,
        routes: PathBuf,
        #[serde(default)]
        rule_order: RuleOrder,
    },
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid fabric configuration: {0}")]
    InvalidFabric(String),
}
