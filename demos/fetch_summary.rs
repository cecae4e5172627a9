use kubelet_summary::{
    CancellationToken, KubeletClient, KubeletClientConfig, KubeletInterface, is_not_found,
};
use std::env;
use std::error::Error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let node = env::args()
        .nth(1)
        .or_else(|| env::var("KUBELET_NODE_NAME").ok())
        .unwrap_or_else(|| "localhost".to_string());

    let http_client = reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .build()
        .map_err(|err| format!("failed to build HTTP client: {err}"))?;

    let client = KubeletClient::builder()
        .http_client(http_client)
        .config(KubeletClientConfig::from_env()?)
        .build()?;

    let ctx = CancellationToken::new();
    let canceller = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            canceller.cancel();
        }
    });

    match client.get_summary(&ctx, &node).await {
        Ok(summary) => {
            println!("Node: {}", summary.node.node_name);
            if let Some(cpu) = &summary.node.cpu {
                println!("  CPU: {:?} nanocores", cpu.usage_nano_cores);
            }
            if let Some(memory) = &summary.node.memory {
                println!("  Working set: {:?} bytes", memory.working_set_bytes);
            }
            for pod in &summary.pods {
                println!(
                    "  Pod {}/{} ({} containers)",
                    pod.pod_ref.namespace,
                    pod.pod_ref.name,
                    pod.containers.len()
                );
            }
        }
        Err(err) if is_not_found(&err) => {
            println!("No stats available yet: {}", err);
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
