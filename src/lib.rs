//! Async client for kubelet stats summaries.
//!
//! Fetches `/stats/summary/` for one node, either straight from the node's
//! kubelet or through the API server's node proxy.

mod core;

#[cfg(test)]
mod tests;

pub use crate::core::domain::error::{KubeletError, KubeletResult, ValidationError, is_not_found};
pub use crate::core::domain::model::kubelet_client_config::KubeletClientConfig;
pub use crate::core::domain::model::summary::{
    AcceleratorStats, ContainerStats, CpuStats, FsStats, InterfaceStats, MemoryStats,
    NetworkStats, NodeStats, PodReference, PodStats, PvcReference, RlimitStats, RuntimeStats,
    Summary, UserDefinedMetric, UserDefinedMetricType, VolumeStats,
};
pub use crate::core::domain::value_object::{ApiServerHost, DEFAULT_KUBELET_PORT, KubeletPort};
pub use crate::core::infrastructure::kubelet_client::{
    KubeletClient, KubeletClientBuilder, KubeletInterface,
};
pub use tokio_util::sync::CancellationToken;
