mod api_server_host;
mod kubelet_port;
pub(crate) mod serde_helpers;

pub use api_server_host::ApiServerHost;
pub use kubelet_port::{DEFAULT_KUBELET_PORT, KubeletPort};

pub(crate) use api_server_host::parse_node_host;
