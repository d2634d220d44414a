//! Domain entities returned and accepted by the config service.
//!
//! Entities deserialize directly from the service's JSON. Optional fields
//! fall back to the same defaults the service applies, so a sparse payload
//! such as `{"name": "node-pool"}` still yields a complete value.
//!
//! Serialization emits the compact form the service accepts on write:
//! empty lists, unset options and `false` flags are left out.

mod cloud_provider;
mod cluster;
mod credentials;
mod orchestrator;
mod requests;

pub use cloud_provider::{
    AwsCloudProvider, AwsCredentials, AwsStorage, AzureCloudProvider, AzureCredentials,
    AzureReplicationType, AzureStorage, AzureStorageTier, CloudProvider, CloudProviderOptions,
    CloudProviderType, ClusterLocationType, EfsPerformanceMode, EfsThroughputMode,
    GoogleCloudProvider, GoogleFilestoreTier, GoogleStorage, KubernetesCredentials, NodePool,
    NodePoolTemplate, NodeRole, OnPremCloudProvider, StorageInstance, VcdCloudProvider,
    VcdCredentials, VcdStorage,
};
pub use cluster::{
    ARecord, AcmeEnvironment, BucketsConfig, Cluster, ClusterStatus, DisksConfig, DnsConfig,
    IngressConfig, MetricsConfig, MonitoringConfig, NotificationType, RegistryConfig,
    SecretsConfig, StorageConfig, VolumeConfig,
};
pub use credentials::{
    CredentialsConfig, DockerRegistryConfig, EmcEcsCredentials, GrafanaCredentials,
    HelmRegistryConfig, MinioCredentials, NeuroAuthConfig, OpenStackCredentials, SentryCredentials,
};
pub use orchestrator::{
    IdleJobConfig, OrchestratorConfig, ResourcePoolType, ResourcePreset, Resources, TpuPreset,
    TpuResource,
};
pub use requests::{PatchClusterRequest, PatchNodePoolRequest};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde::de::{DeserializeOwned, Deserializer, Error as _};
use serde_json::Value;

/// Treats `null` and `{}` as an absent section.
pub(crate) fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) if map.is_empty() => Ok(None),
        Some(value) => T::deserialize(value).map(Some).map_err(D::Error::custom),
    }
}

/// Reads an RFC 3339 timestamp. A timestamp without an offset, with a `T` or
/// space separator and optional fractional seconds, is taken as UTC.
pub(crate) fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(&value) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&value, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| D::Error::custom(format!("invalid timestamp: '{value}'")))
}

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

pub(crate) fn is_zero(value: &u32) -> bool {
    *value == 0
}

pub(crate) fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}
