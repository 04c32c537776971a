use crate::config::Config;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Load and parse configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    // Open the configuration file
    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration '{}'", config_path.display()))?;

    // Parse the YAML content
    let mut config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration '{}'", config_path.display()))?;

    // Relative input paths are taken from the configuration file's directory
    if let Some(base) = config_path.parent() {
        resolve_input_paths(&mut config, base);
    }

    // Validate the configuration
    config.validate()?;

    Ok(config)
}

/// CLI arguments that override YAML settings
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub output: Option<PathBuf>,
    pub exclude_host_links: bool,
}

/// Apply CLI overrides to a loaded configuration
pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) -> Result<()> {
    if let Some(output) = &overrides.output {
        info!("Output directory overridden from command line: {:?}", output);
        config.general.output = output.clone();
    }

    if overrides.exclude_host_links {
        config.general.exclude_host_links = true;
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}

fn resolve_input_paths(config: &mut Config, base: &Path) {
    use crate::config::Fabric;

    if let Fabric::Import { topology, routes, .. } = &mut config.fabric {
        for path in [topology, routes] {
            if path.is_relative() && !path.as_os_str().is_empty() {
                *path = base.join(&*path);
            }
        }
    }
}
