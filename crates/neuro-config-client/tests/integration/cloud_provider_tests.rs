//! Integration tests for cloud provider options.

use crate::integration::common::client_for;
use httpmock::prelude::*;
use neuro_config_core::{AppError, CloudProviderType};
use serde_json::json;

fn gcp_options() -> serde_json::Value {
    json!({
        "regions": ["us-central1"],
        "node_pools": [{
            "id": "n1-highmem-8",
            "machine_type": "n1-highmem-8",
            "cpu": 8.0,
            "available_cpu": 7.0,
            "memory_mb": 53248,
            "available_memory_mb": 46080
        }]
    })
}

/// Test 1: Options are keyed by provider type.
#[tokio::test]
async fn test_list_cloud_provider_options() {
    // Arrange
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/cloud_providers");
            then.status(200).json_body(json!({
                "gcp": gcp_options(),
                "on_prem": {"node_pools": []}
            }));
        })
        .await;
    let client = client_for(&server);

    // Act
    let options = client.list_cloud_provider_options().await.unwrap();

    // Assert
    mock.assert_async().await;
    assert_eq!(options.len(), 2);
    let gcp = options
        .iter()
        .find(|o| o.provider_type == CloudProviderType::Gcp)
        .unwrap();
    assert_eq!(gcp.node_pools.len(), 1);
    assert_eq!(gcp.extras["regions"], json!(["us-central1"]));
    assert!(
        options
            .iter()
            .any(|o| o.provider_type == CloudProviderType::OnPrem)
    );
}

/// Test 2: An unknown provider type is rejected.
#[tokio::test]
async fn test_list_cloud_provider_options_unknown_type() {
    // Arrange
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/cloud_providers");
            then.status(200).json_body(json!({"oracle": {"node_pools": []}}));
        })
        .await;
    let client = client_for(&server);

    // Act
    let err = client.list_cloud_provider_options().await.unwrap_err();

    // Assert
    assert!(
        matches!(err, AppError::UnsupportedCloudProvider(ref name) if name == "oracle"),
        "got {:?}",
        err
    );
}

/// Test 3: Options for one provider type.
#[tokio::test]
async fn test_get_cloud_provider_options() {
    // Arrange
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/cloud_providers/gcp");
            then.status(200).json_body(gcp_options());
        })
        .await;
    let client = client_for(&server);

    // Act
    let options = client
        .get_cloud_provider_options(CloudProviderType::Gcp)
        .await
        .unwrap();

    // Assert
    mock.assert_async().await;
    assert_eq!(options.provider_type, CloudProviderType::Gcp);
    let pool = options.node_pools[0].to_node_pool("gpu-pool", 0, 3);
    assert_eq!(pool.name, "gpu-pool");
    assert_eq!(pool.max_size, 3);
    assert_eq!(pool.machine_type.as_deref(), Some("n1-highmem-8"));
}
