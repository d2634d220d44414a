use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{empty_as_none, is_blank, is_false, is_zero};

/// Job scheduling settings of a cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    pub job_hostname_template: String,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub job_internal_hostname_template: Option<String>,
    pub job_fallback_hostname: String,
    pub job_schedule_timeout_s: f64,
    pub job_schedule_scale_up_timeout_s: f64,
    pub is_http_ingress_secure: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource_pool_types: Vec<ResourcePoolType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource_presets: Vec<ResourcePreset>,
    pub allow_privileged_mode: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pre_pull_images: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub idle_jobs: Vec<IdleJobConfig>,
}

/// Machine shape available to the job scheduler.
///
/// Every field except `name` has a default, so `{"name": "node-pool"}` is a
/// valid resource pool type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcePoolType {
    pub name: String,
    #[serde(default)]
    pub min_size: u32,
    #[serde(default = "default_max_size")]
    pub max_size: u32,
    #[serde(default)]
    pub idle_size: u32,
    #[serde(default = "default_cpu")]
    pub cpu: f64,
    #[serde(default = "default_cpu")]
    pub available_cpu: f64,
    #[serde(default = "default_memory_mb")]
    pub memory_mb: u64,
    #[serde(default = "default_memory_mb")]
    pub available_memory_mb: u64,
    #[serde(default = "default_disk_size_gb")]
    pub disk_size_gb: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_model: Option<String>,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub tpu: Option<TpuResource>,
    #[serde(default)]
    pub is_preemptible: bool,
}

fn default_max_size() -> u32 {
    1
}

fn default_cpu() -> f64 {
    1.0
}

fn default_memory_mb() -> u64 {
    1024
}

fn default_disk_size_gb() -> u32 {
    150
}

impl ResourcePoolType {
    /// Creates a resource pool type with default sizes and resources.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_size: 0,
            max_size: default_max_size(),
            idle_size: 0,
            cpu: default_cpu(),
            available_cpu: default_cpu(),
            memory_mb: default_memory_mb(),
            available_memory_mb: default_memory_mb(),
            disk_size_gb: default_disk_size_gb(),
            gpu: None,
            gpu_model: None,
            price: Decimal::ZERO,
            currency: None,
            tpu: None,
            is_preemptible: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TpuResource {
    pub ipv4_cidr_block: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub software_versions: Vec<String>,
}

/// Named job resource shape with its price in credits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcePreset {
    pub name: String,
    pub credits_per_hour: Decimal,
    pub cpu: f64,
    pub memory_mb: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_model: Option<String>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub tpu: Option<TpuPreset>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub scheduler_enabled: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub preemptible_node: bool,
    /// Resource pool types the preset may be scheduled on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource_affinity: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TpuPreset {
    #[serde(rename = "type")]
    pub tpu_type: String,
    pub software_version: String,
}

/// Placeholder job kept running to hold capacity warm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdleJobConfig {
    pub name: String,
    pub count: u32,
    pub image: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub image_pull_secret: Option<String>,
    pub resources: Resources,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub env: BTreeMap<String, String>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub node_selector: BTreeMap<String, String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    /// CPU in millicores
    pub cpu_m: u32,
    pub memory_mb: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub gpu: u32,
}
