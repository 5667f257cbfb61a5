//! Command line and environment layer.
//!
//! Each flag falls back to an environment variable (clap's `env` support),
//! and both override the optional TOML file, which overrides the built-in
//! defaults.

use clap::Parser;
use std::path::PathBuf;

use crate::rpc_config::timeout_from_secs;
use crate::{Result, RpcConfig};

/// Prompt for two strings and have a remote service concatenate them.
#[derive(Debug, Clone, Parser)]
#[command(name = "concat-client", version, about)]
pub struct Cli {
    /// TOML file with `host`, `port`, `service_name`, `request_timeout_secs`
    #[arg(long, env = "CONCAT_RPC_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Registry host [default: localhost]
    #[arg(long, env = "CONCAT_RPC_HOST")]
    pub host: Option<String>,

    /// Registry port [default: 1030]
    #[arg(long, env = "CONCAT_RPC_PORT")]
    pub port: Option<u16>,

    /// Name the service is bound under [default: DBServ]
    #[arg(long = "service", env = "CONCAT_RPC_SERVICE", value_name = "NAME")]
    pub service_name: Option<String>,

    /// Bound each connect and call, in seconds (0 = wait forever)
    #[arg(long, env = "CONCAT_RPC_TIMEOUT_SECS", value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Debug diagnostics on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Merge defaults, config file and flags into a validated config.
    pub fn resolve_config(&self) -> Result<RpcConfig> {
        // ---
        let mut config = RpcConfig::default();

        if let Some(path) = &self.config {
            config = config.merge_file(path)?;
        }
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(name) = &self.service_name {
            config.service_name = name.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout = timeout_from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }
}
