//! Config service HTTP client.

use std::str::FromStr;
use std::time::Duration;

use neuro_config_core::error::ApiErrorDetails;
use neuro_config_core::{
    AppError, ClientConfig, CloudProviderOptions, CloudProviderType, Cluster, NodePool,
    NotificationType, PatchClusterRequest, PatchNodePoolRequest, ResourcePreset,
};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use crate::endpoints::Endpoints;
use crate::payload::{
    AddStoragePayload, CreateClusterPayload, NodePoolPayload, NotificationPayload,
    PatchClusterPayload, PatchStoragePayload, ResourcePresetPayload,
};

/// HTTP client for the Neu.ro config service.
///
/// Wraps one pooled `reqwest::Client`; cloning is cheap and clones share the
/// connection pool.
///
/// # Authentication
///
/// The token from [`ClientConfig`] is sent as `Authorization: Bearer <token>`
/// on every request. Use [`ConfigClient::with_token`] to act on behalf of a
/// different token for some calls without building a new client.
///
/// # Examples
///
/// ```no_run
/// use neuro_config_client::ConfigClient;
/// use neuro_config_core::ClientConfig;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ClientConfig::from_url("https://dev.neu.ro")?.with_token("admin-token");
/// let client = ConfigClient::new(config)?;
///
/// for cluster in client.list_clusters().await? {
///     println!("{} {}", cluster.name, cluster.status);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ConfigClient {
    client: Client,
    endpoints: Endpoints,
    token: Option<String>,
    timeout_secs: u64,
}

impl std::fmt::Debug for ConfigClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigClient")
            .field("base_url", &self.endpoints.base_url().as_str())
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

impl ConfigClient {
    /// Creates a client for the service described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidUrl` if the API base URL cannot be derived
    /// from `config.url`, or `AppError::ClientError` if the HTTP client
    /// cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, AppError> {
        let base_url = config.api_base_url()?;
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::ClientError(e.to_string()))?;

        Ok(Self {
            client,
            endpoints: Endpoints::new(base_url),
            token: config.token,
            timeout_secs: timeout_secs(config.timeout),
        })
    }

    /// Returns a client sharing this one's connection pool that
    /// authenticates with `token` instead of the configured one. An empty
    /// `token` keeps the configured one.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        let token = Some(token.into()).filter(|t| !t.is_empty());
        Self {
            token: token.or_else(|| self.token.clone()),
            ..self.clone()
        }
    }

    /// Versioned API base URL every request is built from.
    pub fn base_url(&self) -> &Url {
        self.endpoints.base_url()
    }

    // =========================================================================
    // Cloud providers
    // =========================================================================

    /// Lists the options of every cloud provider the service supports.
    ///
    /// # Errors
    ///
    /// Returns `AppError::UnsupportedCloudProvider` if the service lists a
    /// provider type this client does not model.
    pub async fn list_cloud_provider_options(&self) -> Result<Vec<CloudProviderOptions>, AppError> {
        let url = self.endpoints.cloud_providers();
        let response = self.send(self.request(Method::GET, url)).await?;
        let payload: Map<String, Value> = parse_json(response).await?;

        payload
            .into_iter()
            .map(|(key, value)| {
                let provider_type = CloudProviderType::from_str(&key)?;
                CloudProviderOptions::from_value(provider_type, value)
            })
            .collect()
    }

    pub async fn get_cloud_provider_options(
        &self,
        provider_type: CloudProviderType,
    ) -> Result<CloudProviderOptions, AppError> {
        let url = self.endpoints.cloud_provider_options(provider_type);
        let response = self.send(self.request(Method::GET, url)).await?;
        let payload: Value = parse_json(response).await?;
        CloudProviderOptions::from_value(provider_type, payload)
    }

    // =========================================================================
    // Clusters
    // =========================================================================

    pub async fn list_clusters(&self) -> Result<Vec<Cluster>, AppError> {
        let url = self.endpoints.clusters();
        let response = self.send(self.request(Method::GET, url)).await?;
        parse_json(response).await
    }

    pub async fn get_cluster(&self, cluster_name: &str) -> Result<Cluster, AppError> {
        let url = self.endpoints.cluster(cluster_name);
        let response = self.send(self.request(Method::GET, url)).await?;
        parse_json(response).await
    }

    /// Registers a new cluster with no configuration yet.
    ///
    /// With `ignore_existing`, a cluster that is already registered is
    /// fetched and returned instead of failing.
    pub async fn create_blank_cluster(
        &self,
        cluster_name: &str,
        service_token: &str,
        ignore_existing: bool,
    ) -> Result<Cluster, AppError> {
        let request = self
            .request(Method::POST, self.endpoints.clusters())
            .json(&CreateClusterPayload {
                name: cluster_name,
                token: service_token,
            });

        match self.send_for_cluster(request).await {
            Err(err) if ignore_existing && is_already_exists(&err) => {
                warn!(
                    cluster = cluster_name,
                    "Cluster already exists, fetching it"
                );
                self.get_cluster(cluster_name).await
            }
            result => result,
        }
    }

    /// Updates the sections set in `request`, leaving the others untouched.
    pub async fn patch_cluster(
        &self,
        cluster_name: &str,
        request: &PatchClusterRequest,
    ) -> Result<Cluster, AppError> {
        let request = self
            .request(Method::PATCH, self.endpoints.cluster(cluster_name))
            .json(&PatchClusterPayload::from(request));
        self.send_for_cluster(request).await
    }

    pub async fn delete_cluster(&self, cluster_name: &str) -> Result<(), AppError> {
        let url = self.endpoints.cluster(cluster_name);
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    // =========================================================================
    // Storages
    // =========================================================================

    pub async fn add_storage(
        &self,
        cluster_name: &str,
        storage_name: &str,
        size: Option<u64>,
        start_deployment: bool,
        ignore_existing: bool,
    ) -> Result<Cluster, AppError> {
        let request = self
            .request(Method::POST, self.endpoints.storages(cluster_name))
            .query(&[("start_deployment", start_deployment)])
            .json(&AddStoragePayload {
                name: storage_name,
                size,
            });

        match self.send_for_cluster(request).await {
            Err(err) if ignore_existing && err.is_conflict() => {
                warn!(
                    cluster = cluster_name,
                    storage = storage_name,
                    "Storage already exists, fetching cluster"
                );
                self.get_cluster(cluster_name).await
            }
            result => result,
        }
    }

    /// Updates a storage; `None` targets the cluster's default storage.
    pub async fn patch_storage(
        &self,
        cluster_name: &str,
        storage_name: Option<&str>,
        ready: Option<bool>,
        ignore_not_found: bool,
    ) -> Result<Cluster, AppError> {
        let url = match storage_name {
            Some(storage_name) => self.endpoints.storage(cluster_name, storage_name),
            None => self.endpoints.default_storage(cluster_name),
        };
        let request = self
            .request(Method::PATCH, url)
            .json(&PatchStoragePayload { ready });

        match self.send_for_cluster(request).await {
            Err(err) if ignore_not_found && err.is_not_found() => {
                warn!(
                    cluster = cluster_name,
                    storage = storage_name.unwrap_or("default"),
                    "Storage not found, fetching cluster"
                );
                self.get_cluster(cluster_name).await
            }
            result => result,
        }
    }

    pub async fn remove_storage(
        &self,
        cluster_name: &str,
        storage_name: &str,
        start_deployment: bool,
        ignore_not_found: bool,
    ) -> Result<Cluster, AppError> {
        let url = self.endpoints.storage(cluster_name, storage_name);
        let request = self
            .request(Method::DELETE, url)
            .query(&[("start_deployment", start_deployment)]);

        match self.send_for_cluster(request).await {
            Err(err) if ignore_not_found && err.is_not_found() => {
                warn!(
                    cluster = cluster_name,
                    storage = storage_name,
                    "Storage not found, fetching cluster"
                );
                self.get_cluster(cluster_name).await
            }
            result => result,
        }
    }

    // =========================================================================
    // Node pools
    // =========================================================================

    pub async fn list_node_pools(&self, cluster_name: &str) -> Result<Vec<NodePool>, AppError> {
        let url = self.endpoints.node_pools(cluster_name);
        let response = self.send(self.request(Method::GET, url)).await?;
        parse_json(response).await
    }

    pub async fn get_node_pool(
        &self,
        cluster_name: &str,
        node_pool_name: &str,
    ) -> Result<NodePool, AppError> {
        let url = self.endpoints.node_pool(cluster_name, node_pool_name);
        let response = self.send(self.request(Method::GET, url)).await?;
        parse_json(response).await
    }

    pub async fn add_node_pool(
        &self,
        cluster_name: &str,
        node_pool: &NodePool,
        start_deployment: bool,
    ) -> Result<Cluster, AppError> {
        let request = self
            .request(Method::POST, self.endpoints.node_pools(cluster_name))
            .query(&[("start_deployment", start_deployment)])
            .json(&NodePoolPayload::from(node_pool));
        self.send_for_cluster(request).await
    }

    /// Replaces the node pool named `node_pool.name`.
    pub async fn put_node_pool(
        &self,
        cluster_name: &str,
        node_pool: &NodePool,
        start_deployment: bool,
    ) -> Result<Cluster, AppError> {
        let url = self.endpoints.node_pool(cluster_name, &node_pool.name);
        let request = self
            .request(Method::PUT, url)
            .query(&[("start_deployment", start_deployment)])
            .json(&NodePoolPayload::from(node_pool));
        self.send_for_cluster(request).await
    }

    pub async fn patch_node_pool(
        &self,
        cluster_name: &str,
        node_pool_name: &str,
        request: &PatchNodePoolRequest,
        start_deployment: bool,
    ) -> Result<Cluster, AppError> {
        let url = self.endpoints.node_pool(cluster_name, node_pool_name);
        let request = self
            .request(Method::PATCH, url)
            .query(&[("start_deployment", start_deployment)])
            .json(request);
        self.send_for_cluster(request).await
    }

    pub async fn delete_node_pool(
        &self,
        cluster_name: &str,
        node_pool_name: &str,
        start_deployment: bool,
    ) -> Result<Cluster, AppError> {
        let url = self.endpoints.node_pool(cluster_name, node_pool_name);
        let request = self
            .request(Method::DELETE, url)
            .query(&[("start_deployment", start_deployment)]);
        self.send_for_cluster(request).await
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Sends a cluster lifecycle notification. An empty message is not sent.
    pub async fn notify(
        &self,
        cluster_name: &str,
        notification_type: NotificationType,
        message: Option<&str>,
    ) -> Result<(), AppError> {
        let request = self
            .request(Method::POST, self.endpoints.notifications(cluster_name))
            .json(&NotificationPayload::new(notification_type, message));
        self.send(request).await?;
        Ok(())
    }

    // =========================================================================
    // Resource presets
    // =========================================================================

    pub async fn list_resource_presets(
        &self,
        cluster_name: &str,
    ) -> Result<Vec<ResourcePreset>, AppError> {
        let url = self.endpoints.resource_presets(cluster_name);
        let response = self.send(self.request(Method::GET, url)).await?;
        parse_json(response).await
    }

    pub async fn get_resource_preset(
        &self,
        cluster_name: &str,
        preset_name: &str,
    ) -> Result<ResourcePreset, AppError> {
        let url = self.endpoints.resource_preset(cluster_name, preset_name);
        let response = self.send(self.request(Method::GET, url)).await?;
        parse_json(response).await
    }

    pub async fn add_resource_preset(
        &self,
        cluster_name: &str,
        preset: &ResourcePreset,
    ) -> Result<Cluster, AppError> {
        let request = self
            .request(Method::POST, self.endpoints.resource_presets(cluster_name))
            .json(&ResourcePresetPayload::from(preset));
        self.send_for_cluster(request).await
    }

    /// Creates or replaces the preset named `preset.name`.
    pub async fn put_resource_preset(
        &self,
        cluster_name: &str,
        preset: &ResourcePreset,
    ) -> Result<Cluster, AppError> {
        let url = self.endpoints.resource_preset(cluster_name, &preset.name);
        let request = self
            .request(Method::PUT, url)
            .json(&ResourcePresetPayload::from(preset));
        self.send_for_cluster(request).await
    }

    pub async fn delete_resource_preset(
        &self,
        cluster_name: &str,
        preset_name: &str,
    ) -> Result<Cluster, AppError> {
        let url = self.endpoints.resource_preset(cluster_name, preset_name);
        self.send_for_cluster(self.request(Method::DELETE, url)).await
    }

    // =========================================================================
    // Transport
    // =========================================================================

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_for_cluster(&self, request: RequestBuilder) -> Result<Cluster, AppError> {
        let response = self.send(request).await?;
        parse_json(response).await
    }

    /// Executes a request and turns non-success responses into
    /// `AppError::ApiError`.
    async fn send(&self, request: RequestBuilder) -> Result<Response, AppError> {
        let request = request
            .build()
            .map_err(|e| AppError::ClientError(e.to_string()))?;
        let method = request.method().clone();
        let path = request.url().path().to_string();

        let response = self.client.execute(request).await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                AppError::NetworkError(format!("Connection failed: {}", e))
            } else {
                AppError::ClientError(e.to_string())
            }
        })?;

        let status = response.status();
        debug!(%method, %path, status = status.as_u16(), "Config service request");

        if status.is_success() {
            return Ok(response);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!(error = %e, "Failed to read error response body");
                String::new()
            }
        };
        let details = ApiErrorDetails::from_status(status.as_u16(), error_message(status, &body));
        Err(AppError::ApiError(details))
    }
}

/// Whole seconds reported by `AppError::Timeout`, rounded up.
fn timeout_secs(timeout: Duration) -> u64 {
    timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0)
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    let body = response
        .bytes()
        .await
        .map_err(|e| AppError::ClientError(format!("Failed to read response: {}", e)))?;
    Ok(serde_json::from_slice(&body)?)
}

/// Picks the most specific message available from an error response.
fn error_message(status: StatusCode, body: &str) -> String {
    let structured = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        ["error", "message", "detail"]
            .into_iter()
            .find_map(|key| value.get(key)?.as_str().map(str::to_string))
    });

    structured
        .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        })
}

fn is_already_exists(err: &AppError) -> bool {
    matches!(
        err,
        AppError::ApiError(details)
            if details.status_code == 400 && details.message.contains("already exists")
    )
}
