//! Integration tests for cluster operations, authentication and errors.

use std::time::Duration;

use crate::integration::common::{ADMIN_TOKEN, CLUSTER_NAME, bearer, client_for, cluster_json};
use httpmock::prelude::*;
use neuro_config_client::ConfigClient;
use neuro_config_core::entities::RegistryConfig;
use neuro_config_core::{
    ApiErrorKind, AppError, ClientConfig, ClusterStatus, NotificationType, PatchClusterRequest,
};
use serde_json::json;

/// Test 1: Listing clusters sends the configured token.
#[tokio::test]
async fn test_list_clusters() {
    // Arrange
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/clusters")
                .header("authorization", bearer(ADMIN_TOKEN));
            then.status(200).json_body(json!([cluster_json("default"), cluster_json("other")]));
        })
        .await;
    let client = client_for(&server);

    // Act
    let clusters = client.list_clusters().await.unwrap();

    // Assert
    mock.assert_async().await;
    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0].name, "default");
    assert_eq!(clusters[1].status, ClusterStatus::Blank);
}

/// Test 2: A per-call token replaces the configured one.
#[tokio::test]
async fn test_token_override() {
    // Arrange
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/clusters/default")
                .header("authorization", bearer("user-token"));
            then.status(200).json_body(cluster_json(CLUSTER_NAME));
        })
        .await;
    let client = client_for(&server);

    // Act
    let cluster = client
        .with_token("user-token")
        .get_cluster(CLUSTER_NAME)
        .await
        .unwrap();

    // Assert
    mock.assert_async().await;
    assert_eq!(cluster.name, CLUSTER_NAME);
}

/// Test 3: Creating a cluster posts its name and service token.
#[tokio::test]
async fn test_create_blank_cluster() {
    // Arrange
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/clusters")
                .json_body(json!({"name": "default", "token": "service-token"}));
            then.status(201).json_body(cluster_json(CLUSTER_NAME));
        })
        .await;
    let client = client_for(&server);

    // Act
    let cluster = client
        .create_blank_cluster(CLUSTER_NAME, "service-token", false)
        .await
        .unwrap();

    // Assert
    mock.assert_async().await;
    assert_eq!(cluster.status, ClusterStatus::Blank);
}

/// Test 4: An existing cluster is fetched when `ignore_existing` is set.
#[tokio::test]
async fn test_create_blank_cluster_ignore_existing() {
    // Arrange
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/clusters");
            then.status(400).json_body(json!({"error": "Cluster 'default' already exists"}));
        })
        .await;
    let get = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/clusters/default")
                .header("authorization", bearer("user-token"));
            then.status(200).json_body(cluster_json(CLUSTER_NAME));
        })
        .await;
    let client = client_for(&server).with_token("user-token");

    // Act
    let cluster = client
        .create_blank_cluster(CLUSTER_NAME, "service-token", true)
        .await
        .unwrap();

    // Assert
    create.assert_async().await;
    get.assert_async().await;
    assert_eq!(cluster.name, CLUSTER_NAME);
}

/// Test 5: Without `ignore_existing` the conflict is reported.
#[tokio::test]
async fn test_create_blank_cluster_existing_fails() {
    // Arrange
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/clusters");
            then.status(400).json_body(json!({"error": "Cluster 'default' already exists"}));
        })
        .await;
    let client = client_for(&server);

    // Act
    let err = client
        .create_blank_cluster(CLUSTER_NAME, "service-token", false)
        .await
        .unwrap_err();

    // Assert
    assert_eq!(err.status_code(), Some(400));
    assert_eq!(err.api_kind(), Some(ApiErrorKind::Validation));
}

/// Test 6: Patching sends only the sections that are set.
#[tokio::test]
async fn test_patch_cluster() {
    // Arrange
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/api/v1/clusters/default")
                .json_body(json!({"registry": {"url": "https://registry-dev.neu.ro/"}}));
            then.status(200).json_body(json!({
                "name": "default",
                "status": "deployed",
                "created_at": "2024-01-01T00:00:00Z",
                "registry": {"url": "https://registry-dev.neu.ro"}
            }));
        })
        .await;
    let client = client_for(&server);
    let request = PatchClusterRequest {
        registry: Some(RegistryConfig {
            url: "https://registry-dev.neu.ro".parse().unwrap(),
        }),
        ..Default::default()
    };

    // Act
    let cluster = client.patch_cluster(CLUSTER_NAME, &request).await.unwrap();

    // Assert
    mock.assert_async().await;
    assert_eq!(cluster.status, ClusterStatus::Deployed);
    assert!(cluster.registry.is_some());
}

/// Test 7: Deleting a cluster ignores the response body.
#[tokio::test]
async fn test_delete_cluster() {
    // Arrange
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/v1/clusters/default");
            then.status(204);
        })
        .await;
    let client = client_for(&server);

    // Act
    let result = client.delete_cluster(CLUSTER_NAME).await;

    // Assert
    mock.assert_async().await;
    assert!(result.is_ok());
}

/// Test 8: Notifications carry the type and a non-empty message.
#[tokio::test]
async fn test_notify() {
    // Arrange
    let server = MockServer::start_async().await;
    let with_message = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/clusters/default/notifications")
                .json_body(json!({
                    "notification_type": "cluster_update_failed",
                    "message": "Helm release failed"
                }));
            then.status(201);
        })
        .await;
    let client = client_for(&server);

    // Act
    client
        .notify(
            CLUSTER_NAME,
            NotificationType::ClusterUpdateFailed,
            Some("Helm release failed"),
        )
        .await
        .unwrap();

    // Assert
    with_message.assert_async().await;
}

/// Test 9: An empty notification message is left out of the body.
#[tokio::test]
async fn test_notify_without_message() {
    // Arrange
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/clusters/default/notifications")
                .json_body(json!({"notification_type": "cluster_updating"}));
            then.status(201);
        })
        .await;
    let client = client_for(&server);

    // Act
    let result = client
        .notify(CLUSTER_NAME, NotificationType::ClusterUpdating, Some(""))
        .await;

    // Assert
    mock.assert_async().await;
    assert!(result.is_ok());
}

/// Test 10: Non-success responses are classified with the service message.
#[tokio::test]
async fn test_error_classification() {
    // Arrange
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/clusters/missing");
            then.status(404).json_body(json!({"error": "Cluster not found"}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/clusters");
            then.status(401).body("");
        })
        .await;
    let client = client_for(&server);

    // Act
    let not_found = client.get_cluster("missing").await.unwrap_err();
    let unauthorized = client.list_clusters().await.unwrap_err();

    // Assert
    assert!(not_found.is_not_found());
    match not_found {
        AppError::ApiError(details) => assert_eq!(details.message, "Cluster not found"),
        other => panic!("Expected ApiError, got {:?}", other),
    }
    assert_eq!(unauthorized.api_kind(), Some(ApiErrorKind::Authentication));
    match unauthorized {
        AppError::ApiError(details) => assert_eq!(details.message, "Unauthorized"),
        other => panic!("Expected ApiError, got {:?}", other),
    }
}

/// Test 11: A malformed success body is a serialization error.
#[tokio::test]
async fn test_malformed_response() {
    // Arrange
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/clusters/default");
            then.status(200).json_body(json!({"name": "default"}));
        })
        .await;
    let client = client_for(&server);

    // Act
    let err = client.get_cluster(CLUSTER_NAME).await.unwrap_err();

    // Assert
    assert!(matches!(err, AppError::SerializationError(_)));
}

/// Test 12: Slow responses surface as timeouts.
#[tokio::test]
async fn test_timeout() {
    // Arrange
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/clusters");
            then.status(200)
                .json_body(json!([]))
                .delay(Duration::from_secs(2));
        })
        .await;
    let config = ClientConfig::from_url(&server.base_url())
        .unwrap()
        .with_timeout(Duration::from_millis(200));
    let client = ConfigClient::new(config).unwrap();

    // Act
    let err = client.list_clusters().await.unwrap_err();

    // Assert
    assert!(matches!(err, AppError::Timeout(1)), "got {:?}", err);
}

/// Test 13: An unreachable service is a network error.
#[tokio::test]
async fn test_connection_refused() {
    // Arrange
    let config = ClientConfig::from_url("http://127.0.0.1:1").unwrap();
    let client = ConfigClient::new(config).unwrap();

    // Act
    let err = client.list_clusters().await.unwrap_err();

    // Assert
    assert!(matches!(err, AppError::NetworkError(_)), "got {:?}", err);
}
