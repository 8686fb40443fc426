use std::path::{Path, PathBuf};

use clap::Parser;
use todoist_core::ClientConfig;

use crate::error::{HelperError, Result};

#[derive(Parser, Debug)]
#[command(
    name = "todoist-helper",
    version,
    about = "Relays Todoist tasks to a dashboard front-end over stdin/stdout"
)]
pub struct Cli {
    /// TOML file holding an initial client config (same keys as the
    /// FETCH_TODOIST payload)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Fetch tasks once at startup using the --config file
    #[arg(long, requires = "config")]
    pub fetch_on_start: bool,
}

impl Cli {
    /// Load the bootstrap config, if one was given.
    pub fn load_config(&self) -> Result<Option<ClientConfig>> {
        self.config.as_deref().map(load_config).transpose()
    }
}

pub fn load_config(path: &Path) -> Result<ClientConfig> {
    if !path.exists() {
        return Err(HelperError::ConfigNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<ClientConfig> {
    Ok(toml::from_str(content)?)
}
