//! Integration tests for cluster storage operations.

use crate::integration::common::{CLUSTER_NAME, client_for, cluster_json};
use httpmock::prelude::*;
use serde_json::json;

/// Test 1: Adding a storage posts its name and size and deploys.
#[tokio::test]
async fn test_add_storage() {
    // Arrange
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/clusters/default/cloud_provider/storages")
                .query_param("start_deployment", "true")
                .json_body(json!({"name": "org", "size": 1024}));
            then.status(201).json_body(cluster_json(CLUSTER_NAME));
        })
        .await;
    let client = client_for(&server);

    // Act
    let cluster = client
        .add_storage(CLUSTER_NAME, "org", Some(1024), true, false)
        .await
        .unwrap();

    // Assert
    mock.assert_async().await;
    assert_eq!(cluster.name, CLUSTER_NAME);
}

/// Test 2: A 409 is swallowed when `ignore_existing` is set.
#[tokio::test]
async fn test_add_storage_ignore_existing() {
    // Arrange
    let server = MockServer::start_async().await;
    let add = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/clusters/default/cloud_provider/storages")
                .query_param("start_deployment", "false")
                .json_body(json!({"name": "org"}));
            then.status(409).json_body(json!({"error": "Storage already exists"}));
        })
        .await;
    let get = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/clusters/default");
            then.status(200).json_body(cluster_json(CLUSTER_NAME));
        })
        .await;
    let client = client_for(&server);

    // Act
    let cluster = client
        .add_storage(CLUSTER_NAME, "org", None, false, true)
        .await
        .unwrap();

    // Assert
    add.assert_async().await;
    get.assert_async().await;
    assert_eq!(cluster.name, CLUSTER_NAME);
}

/// Test 3: Without `ignore_existing` the conflict is reported.
#[tokio::test]
async fn test_add_storage_conflict() {
    // Arrange
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/clusters/default/cloud_provider/storages");
            then.status(409).json_body(json!({"error": "Storage already exists"}));
        })
        .await;
    let client = client_for(&server);

    // Act
    let err = client
        .add_storage(CLUSTER_NAME, "org", None, true, false)
        .await
        .unwrap_err();

    // Assert
    assert!(err.is_conflict());
}

/// Test 4: Patching without a name targets the default storage.
#[tokio::test]
async fn test_patch_default_storage() {
    // Arrange
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/api/v1/clusters/default/cloud_provider/storages/default/entry")
                .json_body(json!({"ready": true}));
            then.status(200).json_body(cluster_json(CLUSTER_NAME));
        })
        .await;
    let client = client_for(&server);

    // Act
    let result = client
        .patch_storage(CLUSTER_NAME, None, Some(true), false)
        .await;

    // Assert
    mock.assert_async().await;
    assert!(result.is_ok());
}

/// Test 5: A missing named storage is swallowed with `ignore_not_found`.
#[tokio::test]
async fn test_patch_storage_ignore_not_found() {
    // Arrange
    let server = MockServer::start_async().await;
    let patch = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/api/v1/clusters/default/cloud_provider/storages/org")
                .json_body(json!({"ready": false}));
            then.status(404).json_body(json!({"error": "Storage not found"}));
        })
        .await;
    let get = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/clusters/default");
            then.status(200).json_body(cluster_json(CLUSTER_NAME));
        })
        .await;
    let client = client_for(&server);

    // Act
    let result = client
        .patch_storage(CLUSTER_NAME, Some("org"), Some(false), true)
        .await;

    // Assert
    patch.assert_async().await;
    get.assert_async().await;
    assert!(result.is_ok());
}

/// Test 6: Removing a storage passes the deployment flag.
#[tokio::test]
async fn test_remove_storage() {
    // Arrange
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(DELETE)
                .path("/api/v1/clusters/default/cloud_provider/storages/org")
                .query_param("start_deployment", "false");
            then.status(200).json_body(cluster_json(CLUSTER_NAME));
        })
        .await;
    let client = client_for(&server);

    // Act
    let result = client
        .remove_storage(CLUSTER_NAME, "org", false, false)
        .await;

    // Assert
    mock.assert_async().await;
    assert!(result.is_ok());
}

/// Test 7: A missing storage is reported without `ignore_not_found`.
#[tokio::test]
async fn test_remove_storage_not_found() {
    // Arrange
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/v1/clusters/default/cloud_provider/storages/org");
            then.status(404).json_body(json!({"error": "Storage not found"}));
        })
        .await;
    let client = client_for(&server);

    // Act
    let err = client
        .remove_storage(CLUSTER_NAME, "org", true, false)
        .await
        .unwrap_err();

    // Assert
    assert!(err.is_not_found());
}
