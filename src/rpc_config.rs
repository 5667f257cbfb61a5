//! Client configuration.
//!
//! `RpcConfig` names where the registry lives and which service to resolve
//! there. Values come from built-in defaults, optionally overlaid by a TOML
//! file, then by the command line layer in [`crate::cli`].

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::{Endpoint, Result, RpcError};

/// Registry host used when nothing else is configured.
pub const DEFAULT_HOST: &str = "localhost";

/// Registry port used when nothing else is configured.
pub const DEFAULT_PORT: u16 = 1030;

/// Service name looked up when nothing else is configured.
pub const DEFAULT_SERVICE_NAME: &str = "DBServ";

/// Registry location, service name and call timeout.
///
/// # Example
///
/// ```
/// use concat_rpc::RpcConfig;
/// use std::time::Duration;
///
/// let config = RpcConfig::new("registry.internal", 4000, "Joiner")
///     .with_request_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.registry_endpoint().to_string(), "registry.internal:4000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcConfig {
    // ---
    /// Host the registry listens on.
    pub host: String,

    /// Port the registry listens on.
    pub port: u16,

    /// Name the service is bound under in the registry.
    pub service_name: String,

    /// Upper bound on each connect and each call.
    ///
    /// `None` blocks until the peer replies or the connection fails.
    pub request_timeout: Option<Duration>,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            request_timeout: None,
        }
    }
}

/// On-disk form of [`RpcConfig`]; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    host: Option<String>,
    port: Option<u16>,
    service_name: Option<String>,
    request_timeout_secs: Option<u64>,
}

impl RpcConfig {
    /// Create a config for an explicit registry address and service name.
    pub fn new(host: impl Into<String>, port: u16, service_name: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            service_name: service_name.into(),
            request_timeout: None,
        }
    }

    /// Bound every connect and call by `timeout`.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Overlay TOML text onto this config.
    ///
    /// Keys: `host`, `port`, `service_name`, `request_timeout_secs`
    /// (0 disables the timeout). Unknown keys are rejected.
    pub fn merge_toml(mut self, text: &str) -> Result<Self> {
        // ---
        let file: ConfigFile =
            toml::from_str(text).map_err(|e| RpcError::Config(format!("invalid TOML: {e}")))?;

        if let Some(host) = file.host {
            self.host = host;
        }
        if let Some(port) = file.port {
            self.port = port;
        }
        if let Some(name) = file.service_name {
            self.service_name = name;
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout = timeout_from_secs(secs);
        }
        Ok(self)
    }

    /// Overlay the TOML file at `path` onto this config.
    pub fn merge_file(self, path: &Path) -> Result<Self> {
        // ---
        let text = std::fs::read_to_string(path).map_err(|e| {
            RpcError::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        self.merge_toml(&text)
    }

    /// Reject values that can never resolve a service.
    pub fn validate(&self) -> Result<()> {
        // ---
        if self.host.trim().is_empty() {
            return Err(RpcError::Config("registry host must not be empty".into()));
        }
        if self.port == 0 {
            return Err(RpcError::Config("registry port must not be 0".into()));
        }
        if self.service_name.is_empty() {
            return Err(RpcError::Config("service name must not be empty".into()));
        }
        Ok(())
    }

    /// Address of the registry.
    pub fn registry_endpoint(&self) -> Endpoint {
        Endpoint::new(self.host.clone(), self.port)
    }
}

/// `0` means "no timeout".
pub(crate) fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_defaults_match_registry_contract() {
        // ---
        let config = RpcConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 1030);
        assert_eq!(config.service_name, "DBServ");
        assert_eq!(config.request_timeout, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_merge_toml_overrides_only_present_keys() {
        // ---
        let config = RpcConfig::default()
            .merge_toml("port = 4100\nrequest_timeout_secs = 3\n")
            .unwrap();

        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 4100);
        assert_eq!(config.service_name, "DBServ");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_merge_toml_zero_timeout_disables() {
        // ---
        let config = RpcConfig::default()
            .with_request_timeout(Duration::from_secs(9))
            .merge_toml("request_timeout_secs = 0")
            .unwrap();
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn test_merge_toml_rejects_unknown_keys() {
        // ---
        let err = RpcConfig::default()
            .merge_toml("hostname = \"x\"")
            .unwrap_err();
        assert!(matches!(err, RpcError::Config(_)));
    }

    #[test]
    fn test_merge_file_missing_path() {
        // ---
        let err = RpcConfig::default()
            .merge_file(Path::new("/definitely/not/here.toml"))
            .unwrap_err();
        assert!(matches!(err, RpcError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_empty_values() {
        // ---
        assert!(RpcConfig::new("", 1030, "DBServ").validate().is_err());
        assert!(RpcConfig::new("localhost", 0, "DBServ").validate().is_err());
        assert!(RpcConfig::new("localhost", 1030, "").validate().is_err());
    }
}
