//! Integration tests for node pool operations.

use crate::integration::common::{CLUSTER_NAME, client_for, cluster_json, node_pool_json};
use httpmock::prelude::*;
use neuro_config_core::entities::NodeRole;
use neuro_config_core::{NodePool, PatchNodePoolRequest};
use rust_decimal::Decimal;
use serde_json::json;

#[allow(clippy::unwrap_used)]
fn node_pool() -> NodePool {
    serde_json::from_value(node_pool_json("gpu-pool")).unwrap()
}

/// Test 1: Listing node pools decodes every pool.
#[tokio::test]
async fn test_list_node_pools() {
    // Arrange
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/clusters/default/cloud_provider/node_pools");
            then.status(200).json_body(json!([
                node_pool_json("cpu-pool"),
                node_pool_json("gpu-pool")
            ]));
        })
        .await;
    let client = client_for(&server);

    // Act
    let pools = client.list_node_pools(CLUSTER_NAME).await.unwrap();

    // Assert
    mock.assert_async().await;
    assert_eq!(pools.len(), 2);
    assert_eq!(pools[0].name, "cpu-pool");
    assert_eq!(pools[1].role, NodeRole::PlatformJob);
}

/// Test 2: Getting a node pool fills in defaults.
#[tokio::test]
async fn test_get_node_pool() {
    // Arrange
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/clusters/default/cloud_provider/node_pools/gpu-pool");
            then.status(200).json_body(node_pool_json("gpu-pool"));
        })
        .await;
    let client = client_for(&server);

    // Act
    let pool = client
        .get_node_pool(CLUSTER_NAME, "gpu-pool")
        .await
        .unwrap();

    // Assert
    assert_eq!(pool.gpu, Some(1));
    assert_eq!(pool.price, Decimal::ZERO);
    assert!(!pool.is_preemptible);
}

/// Test 3: Adding a node pool posts the write-side payload.
#[tokio::test]
async fn test_add_node_pool() {
    // Arrange
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/clusters/default/cloud_provider/node_pools")
                .query_param("start_deployment", "true")
                .json_body(json!({
                    "name": "gpu-pool",
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
                }));
            then.status(201).json_body(cluster_json(CLUSTER_NAME));
        })
        .await;
    let client = client_for(&server);

    // Act
    let result = client.add_node_pool(CLUSTER_NAME, &node_pool(), true).await;

    // Assert
    mock.assert_async().await;
    assert!(result.is_ok());
}

/// Test 4: Replacing a node pool uses its name in the path.
#[tokio::test]
async fn test_put_node_pool() {
    // Arrange
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/v1/clusters/default/cloud_provider/node_pools/gpu-pool")
                .query_param("start_deployment", "false");
            then.status(200).json_body(cluster_json(CLUSTER_NAME));
        })
        .await;
    let client = client_for(&server);

    // Act
    let result = client
        .put_node_pool(CLUSTER_NAME, &node_pool(), false)
        .await;

    // Assert
    mock.assert_async().await;
    assert!(result.is_ok());
}

/// Test 5: Patching a node pool sends only its sizes.
#[tokio::test]
async fn test_patch_node_pool_size() {
    // Arrange
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/api/v1/clusters/default/cloud_provider/node_pools/gpu-pool")
                .query_param("start_deployment", "true")
                .json_body(json!({"min_size": 1, "max_size": 4}));
            then.status(200).json_body(cluster_json(CLUSTER_NAME));
        })
        .await;
    let client = client_for(&server);

    // Act
    let result = client
        .patch_node_pool(
            CLUSTER_NAME,
            "gpu-pool",
            &PatchNodePoolRequest::size(1, 4),
            true,
        )
        .await;

    // Assert
    mock.assert_async().await;
    assert!(result.is_ok());
}

/// Test 6: Deleting a node pool returns the updated cluster.
#[tokio::test]
async fn test_delete_node_pool() {
    // Arrange
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(DELETE)
                .path("/api/v1/clusters/default/cloud_provider/node_pools/gpu-pool")
                .query_param("start_deployment", "true");
            then.status(200).json_body(cluster_json(CLUSTER_NAME));
        })
        .await;
    let client = client_for(&server);

    // Act
    let cluster = client
        .delete_node_pool(CLUSTER_NAME, "gpu-pool", true)
        .await
        .unwrap();

    // Assert
    mock.assert_async().await;
    assert_eq!(cluster.name, CLUSTER_NAME);
}
