//! HTTP client that fetches stats summaries from kubelets.

use crate::core::{
    domain::{
        error::{KubeletError, KubeletResult, ValidationError},
        model::{kubelet_client_config::KubeletClientConfig, summary::Summary},
        value_object::{ApiServerHost, KubeletPort, parse_node_host},
    },
    infrastructure::response::read_json,
};
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const SUMMARY_PATH: &str = "/stats/summary/";

/// Knows how to fetch summary metrics from a kubelet.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KubeletInterface: Send + Sync {
    /// Fetches the stats summary of `node`.
    ///
    /// The request is abandoned as soon as `ctx` is cancelled.
    async fn get_summary(&self, ctx: &CancellationToken, node: &str) -> KubeletResult<Summary>;
}

/// Where summary requests are sent, fixed at construction.
#[derive(Debug, Clone)]
enum Target {
    /// `{node}:{port}/stats/summary/`
    Direct { port: KubeletPort },
    /// `{api_server}/api/v1/nodes/{node}/proxy/stats/summary/`
    ApiServerProxy { api_server: ApiServerHost },
}

/// Fetches kubelet stats summaries, either from the kubelet itself or through
/// the API server proxy.
///
/// The client holds no per-request state and is cheap to clone, so a single
/// instance can serve concurrent collectors.
///
/// Certificate verification, client certificates and bearer tokens are all
/// configured on the injected [`reqwest::Client`]; this type adds nothing to
/// the TLS setup.
#[derive(Debug, Clone)]
pub struct KubeletClient {
    http_client: Client,
    scheme: &'static str,
    target: Target,
    request_timeout: Option<Duration>,
}

impl KubeletClient {
    /// Creates a new `KubeletClient` from an HTTP client and its configuration.
    ///
    /// # Errors
    /// Returns `KubeletError::Configuration` if proxying is enabled and the API
    /// server URL is missing or malformed, or if the kubelet port is 0 when
    /// kubelets are addressed directly.
    pub fn new(http_client: Client, config: KubeletClientConfig) -> KubeletResult<Self> {
        let target = if config.use_api_server_proxy {
            Target::ApiServerProxy {
                api_server: ApiServerHost::parse(&config.api_server_host)?,
            }
        } else {
            Target::Direct {
                port: KubeletPort::new(config.port)?,
            }
        };

        let scheme = if config.insecure_no_tls {
            warn!(
                message = "kubelet summaries are fetched over plain http, this mode is deprecated"
            );
            "http"
        } else {
            "https"
        };

        Ok(Self {
            http_client,
            scheme,
            target,
            request_timeout: config.request_timeout,
        })
    }

    /// Creates a new builder for KubeletClient configuration
    pub fn builder() -> KubeletClientBuilder {
        KubeletClientBuilder::default()
    }

    /// Returns true if requests are routed through the API server proxy.
    pub fn uses_api_server_proxy(&self) -> bool {
        matches!(self.target, Target::ApiServerProxy { .. })
    }

    /// Builds the summary URL for `node` without sending anything.
    ///
    /// ```
    /// use kubelet_summary::{KubeletClient, KubeletClientConfig};
    ///
    /// let client = KubeletClient::new(reqwest::Client::new(), KubeletClientConfig::default()).unwrap();
    /// let url = client.summary_url("node-1").unwrap();
    /// assert_eq!(url.as_str(), "https://node-1:10250/stats/summary/");
    /// ```
    pub fn summary_url(&self, node: &str) -> KubeletResult<Url> {
        match &self.target {
            Target::Direct { port } => {
                let host = parse_node_host(node).map_err(|source| KubeletError::Url {
                    url: node.to_string(),
                    source,
                })?;
                let raw = format!("{}://{}:{}{}", self.scheme, host, port.get(), SUMMARY_PATH);
                Url::parse(&raw).map_err(|source| KubeletError::Url { url: raw, source })
            }
            Target::ApiServerProxy { api_server } => {
                // The node always lands in exactly one path segment.
                if matches!(node, "" | "." | "..") {
                    return Err(KubeletError::NodeName {
                        node: node.to_string(),
                        reason: "not usable as a path segment".to_string(),
                    });
                }

                let raw = format!("{}://{}/", self.scheme, api_server);
                let mut url =
                    Url::parse(&raw).map_err(|source| KubeletError::Url { url: raw, source })?;
                url.path_segments_mut()
                    .map_err(|()| KubeletError::NodeName {
                        node: node.to_string(),
                        reason: "API server URL cannot carry a path".to_string(),
                    })?
                    .clear()
                    .extend(["api", "v1", "nodes", node, "proxy", "stats", "summary", ""]);
                Ok(url)
            }
        }
    }

    async fn fetch(&self, url: Url, endpoint: &str) -> KubeletResult<Summary> {
        let mut request = self.http_client.get(url);
        if let Some(timeout) = self.request_timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|source| KubeletError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        read_json(response, endpoint).await
    }
}

#[async_trait]
impl KubeletInterface for KubeletClient {
    async fn get_summary(&self, ctx: &CancellationToken, node: &str) -> KubeletResult<Summary> {
        let url = self.summary_url(node)?;
        let endpoint = url.to_string();
        debug!(message = "fetching kubelet summary", node, endpoint = %endpoint);

        tokio::select! {
            biased;

            _ = ctx.cancelled() => Err(KubeletError::Cancelled {
                endpoint: endpoint.clone(),
            }),
            result = self.fetch(url, &endpoint) => result,
        }
    }
}

/// Builder for KubeletClient configuration
#[derive(Debug, Default)]
pub struct KubeletClientBuilder {
    http_client: Option<Client>,
    config: KubeletClientConfig,
}

impl KubeletClientBuilder {
    /// Sets the HTTP client used for every request. Required.
    pub fn http_client(mut self, http_client: Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Replaces the whole configuration, e.g. with one read from the environment.
    pub fn config(mut self, config: KubeletClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Fetch over plain `http`. Deprecated and insecure.
    pub fn insecure_no_tls(mut self, insecure: bool) -> Self {
        self.config.insecure_no_tls = insecure;
        self
    }

    /// Route requests through the API server at `api_server_host`.
    pub fn api_server_proxy(mut self, api_server_host: impl Into<String>) -> Self {
        self.config.use_api_server_proxy = true;
        self.config.api_server_host = api_server_host.into();
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> KubeletResult<KubeletClient> {
        let http_client = self.http_client.ok_or_else(|| {
            KubeletError::from(ValidationError::Field {
                field: "http_client".to_string(),
                message: "HTTP client is required".to_string(),
            })
        })?;
        KubeletClient::new(http_client, self.config)
    }
}
