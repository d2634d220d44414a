//! Shared fixtures for the client integration tests.

use httpmock::MockServer;
use neuro_config_client::ConfigClient;
use neuro_config_core::ClientConfig;
use serde_json::{Value, json};

pub const ADMIN_TOKEN: &str = "admin-token";
pub const CLUSTER_NAME: &str = "default";

/// Builds a client pointed at the mock server, authenticated as admin.
#[allow(clippy::unwrap_used)]
pub fn client_for(server: &MockServer) -> ConfigClient {
    let config = ClientConfig::from_url(&server.base_url())
        .unwrap()
        .with_token(ADMIN_TOKEN);
    ConfigClient::new(config).unwrap()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// A freshly created cluster as the service returns it.
pub fn cluster_json(name: &str) -> Value {
    json!({
        "name": name,
        "status": "blank",
        "created_at": "2024-01-01T00:00:00Z"
    })
}

pub fn node_pool_json(name: &str) -> Value {
    json!({
        "name": name,
        "role": "platform_job",
        "min_size": 0,
        "max_size": 2,
        "idle_size": 0,
        "machine_type": "n1-highmem-8",
        "cpu": 8.0,
        "available_cpu": 7.0,
        "memory_mb": 53248,
        "available_memory_mb": 46080,
        "disk_size_gb": 150,
        "gpu": 1,
        "gpu_model": "nvidia-tesla-k80"
    })
}

pub fn preset_json(name: &str) -> Value {
    json!({
        "name": name,
        "credits_per_hour": "10",
        "cpu": 4.0,
        "memory_mb": 1024
    })
}
