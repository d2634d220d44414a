use serde::{Deserialize, Serialize};

use super::{
    BucketsConfig, CredentialsConfig, DisksConfig, DnsConfig, IngressConfig, MetricsConfig,
    MonitoringConfig, OrchestratorConfig, RegistryConfig, SecretsConfig, StorageConfig,
};

/// Partial cluster update. Only the sections that are set are sent.
///
/// # Examples
///
/// ```
/// use neuro_config_core::entities::{PatchClusterRequest, RegistryConfig};
///
/// let request = PatchClusterRequest {
///     registry: Some(RegistryConfig {
///         url: "https://registry-dev.neu.ro".parse().unwrap(),
///     }),
///     ..Default::default()
/// };
/// assert!(!request.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatchClusterRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<CredentialsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<RegistryConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orchestrator: Option<OrchestratorConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitoring: Option<MonitoringConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secrets: Option<SecretsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disks: Option<DisksConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buckets: Option<BucketsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingress: Option<IngressConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<DnsConfig>,
}

impl PatchClusterRequest {
    /// Returns true when no section is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Partial node pool update: either its sizes or its machine resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatchNodePoolRequest {
    Size {
        min_size: u32,
        max_size: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        idle_size: Option<u32>,
    },
    Resources {
        cpu: f64,
        available_cpu: f64,
        memory_mb: u64,
        available_memory_mb: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        gpu: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        gpu_model: Option<String>,
    },
}

impl PatchNodePoolRequest {
    pub fn size(min_size: u32, max_size: u32) -> Self {
        Self::Size {
            min_size,
            max_size,
            idle_size: None,
        }
    }
}
