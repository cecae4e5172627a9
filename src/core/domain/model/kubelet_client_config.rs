//! Configuration of the kubelet summary client.

use crate::core::domain::{
    error::{KubeletResult, ValidationError},
    value_object::{DEFAULT_KUBELET_PORT, serde_helpers::option_duration_secs},
};
use serde::{Deserialize, Serialize};
use std::{env, str::FromStr, time::Duration};

pub const ENV_PORT: &str = "KUBELET_PORT";
pub const ENV_INSECURE_NO_TLS: &str = "KUBELET_INSECURE_NO_TLS";
pub const ENV_USE_API_SERVER_PROXY: &str = "KUBELET_USE_API_SERVER_PROXY";
pub const ENV_API_SERVER_HOST: &str = "KUBELET_API_SERVER_HOST";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "KUBELET_REQUEST_TIMEOUT_SECS";

/// Settings that decide how node summaries are addressed.
///
/// `port` is only used when kubelets are contacted directly, `api_server_host`
/// only when requests go through the API server proxy.
///
/// The struct can be embedded in a larger configuration file:
///
/// ```
/// use kubelet_summary::KubeletClientConfig;
///
/// let config: KubeletClientConfig = serde_json::from_str(
///     r#"{ "use_api_server_proxy": true, "api_server_host": "https://apiserver:6443" }"#,
/// )
/// .unwrap();
/// assert_eq!(config.port, 10250);
/// assert!(config.use_api_server_proxy);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct KubeletClientConfig {
    /// Port of the kubelet when it is addressed directly.
    pub port: u16,
    /// Talk plain `http` to the kubelet (or the API server when proxying).
    ///
    /// Deprecated. Only meant for clusters whose kubelets do not serve TLS.
    pub insecure_no_tls: bool,
    /// Reach kubelets through `api/v1/nodes/{node}/proxy/` on the API server.
    pub use_api_server_proxy: bool,
    /// URL of the API server, e.g. `https://apiserver:6443`.
    pub api_server_host: String,
    /// Upper bound for a single summary request. `None` waits as long as the
    /// caller does not cancel.
    #[serde(with = "option_duration_secs")]
    pub request_timeout: Option<Duration>,
}

impl Default for KubeletClientConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_KUBELET_PORT,
            insecure_no_tls: false,
            use_api_server_proxy: false,
            api_server_host: String::new(),
            request_timeout: None,
        }
    }
}

impl KubeletClientConfig {
    /// Reads the configuration from `KUBELET_*` environment variables.
    ///
    /// Unset variables keep their default value.
    ///
    /// # Errors
    /// Returns `KubeletError::Configuration` if a variable is set but cannot be parsed.
    pub fn from_env() -> KubeletResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> KubeletResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = lookup(ENV_PORT) {
            config.port = parse_var(ENV_PORT, &port)?;
        }
        if let Some(value) = lookup(ENV_INSECURE_NO_TLS) {
            config.insecure_no_tls = parse_bool(ENV_INSECURE_NO_TLS, &value)?;
        }
        if let Some(value) = lookup(ENV_USE_API_SERVER_PROXY) {
            config.use_api_server_proxy = parse_bool(ENV_USE_API_SERVER_PROXY, &value)?;
        }
        if let Some(host) = lookup(ENV_API_SERVER_HOST) {
            config.api_server_host = host;
        }
        if let Some(secs) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            let secs: u64 = parse_var(ENV_REQUEST_TIMEOUT_SECS, &secs)?;
            config.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(config)
    }
}

fn parse_var<T>(field: &str, value: &str) -> Result<T, ValidationError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ValidationError::Field {
        field: field.to_string(),
        message: format!("cannot parse {value:?}: {e}"),
    })
}

fn parse_bool(field: &str, value: &str) -> Result<bool, ValidationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ValidationError::Field {
            field: field.to_string(),
            message: format!("expected a boolean, got {value:?}"),
        }),
    }
}
