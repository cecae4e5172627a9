use crate::core::domain::error::ValidationError;
use std::fmt;
use url::{Host, Url};

/// The `host:port` authority of the API server, used as the request target
/// when node stats are fetched through the API server proxy.
///
/// The configured value is a URL such as `https://apiserver:6443`. Only the
/// authority survives parsing; scheme and path of the configured URL are not
/// used for proxied requests.
///
/// # Examples
///
/// ```
/// use kubelet_summary::ApiServerHost;
///
/// let host = ApiServerHost::parse("https://apiserver:6443").unwrap();
/// assert_eq!(host.as_str(), "apiserver:6443");
///
/// // Without an explicit port the scheme's default is used.
/// let host = ApiServerHost::parse("https://10.0.0.1").unwrap();
/// assert_eq!(host.as_str(), "10.0.0.1:443");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiServerHost(String);

impl ApiServerHost {
    /// Parses the API server URL and keeps its normalized `host:port`.
    ///
    /// A value without a scheme (`apiserver:6443`) is read as `https`.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ValidationError::Field {
                field: "api_server_host".to_string(),
                message: "API server host cannot be empty".to_string(),
            });
        }

        let url = if value.contains("://") {
            Url::parse(value)
        } else {
            Url::parse(&format!("https://{value}"))
        }
        .map_err(|e| ValidationError::Format(format!("Invalid API server URL: {}", e)))?;

        let host = match url.host() {
            Some(Host::Ipv6(addr)) => format!("[{addr}]"),
            Some(Host::Ipv4(addr)) => addr.to_string(),
            Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_string(),
            _ => {
                return Err(ValidationError::ConstraintViolation(format!(
                    "API server URL {value:?} has no host"
                )));
            }
        };

        let port = url.port_or_known_default().ok_or_else(|| {
            ValidationError::ConstraintViolation(format!(
                "API server URL {value:?} has no port and scheme {:?} has no default",
                url.scheme()
            ))
        })?;

        Ok(Self(format!("{host}:{port}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiServerHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parses a node identifier as a bare URL host, bracketing IPv6 literals.
///
/// Anything that would spill into userinfo, port, path, query or fragment is
/// rejected.
pub(crate) fn parse_node_host(node: &str) -> Result<Host, url::ParseError> {
    if node.contains(':') && !node.starts_with('[') {
        Host::parse(&format!("[{node}]"))
    } else {
        Host::parse(node)
    }
}
