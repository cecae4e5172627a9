pub mod kubelet_client;
pub(crate) mod response;
