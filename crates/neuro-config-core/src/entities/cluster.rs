use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use super::{
    CloudProvider, CredentialsConfig, OrchestratorConfig, deserialize_timestamp, empty_as_none,
    is_blank, is_false,
};

/// Lifecycle status of a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterStatus {
    /// Created without any configuration yet.
    Blank,
    Deploying,
    Deployed,
    Destroying,
    Destroyed,
    Failed,
    Testing,
}

impl fmt::Display for ClusterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Self::Blank => "blank",
            Self::Deploying => "deploying",
            Self::Deployed => "deployed",
            Self::Destroying => "destroying",
            Self::Destroyed => "destroyed",
            Self::Failed => "failed",
            Self::Testing => "testing",
        };
        f.write_str(value)
    }
}

/// Full configuration of a platform cluster.
///
/// Every section except the name, status and creation time is optional: a
/// freshly created cluster is `blank` and carries none of them.
///
/// # Examples
///
/// ```
/// use neuro_config_core::entities::{Cluster, ClusterStatus};
///
/// let json = r#"{
///     "name": "default",
///     "status": "blank",
///     "orchestrator": {},
///     "created_at": "2024-01-01T00:00:00Z"
/// }"#;
///
/// let cluster: Cluster = serde_json::from_str(json).unwrap();
/// assert_eq!(cluster.status, ClusterStatus::Blank);
/// assert!(cluster.orchestrator.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub name: String,
    pub status: ClusterStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_infra_image_tag: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub orchestrator: Option<OrchestratorConfig>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub storage: Option<StorageConfig>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub registry: Option<RegistryConfig>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub monitoring: Option<MonitoringConfig>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub secrets: Option<SecretsConfig>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub metrics: Option<MetricsConfig>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub disks: Option<DisksConfig>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub buckets: Option<BucketsConfig>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub ingress: Option<IngressConfig>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub dns: Option<DnsConfig>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub cloud_provider: Option<CloudProvider>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub credentials: Option<CredentialsConfig>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Platform storage service endpoint and its volumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub url: Url,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<VolumeConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeConfig {
    #[serde(default, skip_serializing_if = "is_blank")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_mb: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretsConfig {
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub url: Url,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisksConfig {
    pub url: Url,
    pub storage_limit_per_user_gb: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketsConfig {
    pub url: Url,
    /// Always sent on write, even when false.
    #[serde(default)]
    pub disable_creation: bool,
}

/// ACME directory used to issue ingress certificates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcmeEnvironment {
    Staging,
    Production,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngressConfig {
    pub acme_environment: AcmeEnvironment,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnsConfig {
    /// DNS zone name
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub a_records: Vec<ARecord>,
}

/// DNS A record, either a plain list of IPs or an alias to a load balancer
/// (`dns_name` + `zone_id`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ARecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ips: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dns_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub zone_id: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub evaluate_target_health: bool,
}

/// Cluster event reported to the config service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    ClusterUpdating,
    ClusterUpdateSucceeded,
    ClusterUpdateFailed,
}

impl std::str::FromStr for NotificationType {
    type Err = crate::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cluster_updating" => Ok(Self::ClusterUpdating),
            "cluster_update_succeeded" => Ok(Self::ClusterUpdateSucceeded),
            "cluster_update_failed" => Ok(Self::ClusterUpdateFailed),
            _ => Err(crate::AppError::ConfigError(format!(
                "Unknown notification type: '{}'. Valid options: {}",
                s, "cluster_updating, cluster_update_succeeded, cluster_update_failed"
            ))),
        }
    }
}
