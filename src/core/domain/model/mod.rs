pub mod kubelet_client_config;
pub mod summary;
