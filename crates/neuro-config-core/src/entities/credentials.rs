use serde::{Deserialize, Serialize};
use url::Url;

use super::empty_as_none;

/// Secrets the platform services of a cluster need.
///
/// The first three sections are always present; the others depend on the
/// cluster's installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialsConfig {
    pub neuro: NeuroAuthConfig,
    pub neuro_registry: DockerRegistryConfig,
    pub neuro_helm: HelmRegistryConfig,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub grafana: Option<GrafanaCredentials>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub sentry: Option<SentryCredentials>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub docker_hub: Option<DockerRegistryConfig>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub minio: Option<MinioCredentials>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub emc_ecs: Option<EmcEcsCredentials>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub open_stack: Option<OpenStackCredentials>,
}

/// Platform API endpoint and the cluster's service token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuroAuthConfig {
    pub url: Url,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DockerRegistryConfig {
    pub url: Url,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Helm chart registry, usually an `oci://` URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelmRegistryConfig {
    pub url: Url,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrafanaCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentryCredentials {
    pub client_key_id: String,
    pub public_dsn: Url,
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f64,
}

fn default_sample_rate() -> f64 {
    0.01
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinioCredentials {
    pub username: String,
    pub password: String,
}

/// Dell EMC ECS object storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmcEcsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub s3_endpoint: Url,
    pub management_endpoint: Url,
    pub s3_assumable_role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenStackCredentials {
    pub account_id: String,
    pub password: String,
    pub s3_endpoint: Url,
    pub endpoint: Url,
    pub region_name: String,
}
