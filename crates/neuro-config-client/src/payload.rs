//! Request bodies sent to the config service.
//!
//! The service accepts a narrower shape on write than it returns on read:
//! registry URLs, preset affinities and zero GPU counts are dropped, and
//! prices travel only together with their currency. These borrowed views
//! produce that shape without cloning the entities.

use neuro_config_core::entities::{
    BucketsConfig, CredentialsConfig, DisksConfig, DnsConfig, DockerRegistryConfig,
    EmcEcsCredentials, GrafanaCredentials, HelmRegistryConfig, IdleJobConfig, IngressConfig,
    MetricsConfig, MinioCredentials, MonitoringConfig, NodePool, NodeRole, NotificationType,
    OpenStackCredentials, OrchestratorConfig, PatchClusterRequest, RegistryConfig,
    ResourcePoolType, ResourcePreset, SecretsConfig, SentryCredentials, StorageConfig, TpuPreset,
    TpuResource,
};
use rust_decimal::Decimal;
use serde::Serialize;

// =============================================================================
// Clusters and storages
// =============================================================================

#[derive(Serialize)]
pub(crate) struct CreateClusterPayload<'a> {
    pub name: &'a str,
    pub token: &'a str,
}

#[derive(Serialize)]
pub(crate) struct AddStoragePayload<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

#[derive(Serialize)]
pub(crate) struct PatchStoragePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ready: Option<bool>,
}

#[derive(Serialize)]
pub(crate) struct NotificationPayload<'a> {
    pub notification_type: NotificationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'a str>,
}

impl<'a> NotificationPayload<'a> {
    pub(crate) fn new(notification_type: NotificationType, message: Option<&'a str>) -> Self {
        Self {
            notification_type,
            message: message.filter(|m| !m.is_empty()),
        }
    }
}

#[derive(Serialize)]
pub(crate) struct PatchClusterPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    credentials: Option<CredentialsPayload<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    storage: Option<&'a StorageConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    registry: Option<&'a RegistryConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    orchestrator: Option<OrchestratorPayload<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    monitoring: Option<&'a MonitoringConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    secrets: Option<&'a SecretsConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics: Option<&'a MetricsConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disks: Option<&'a DisksConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    buckets: Option<&'a BucketsConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ingress: Option<&'a IngressConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dns: Option<&'a DnsConfig>,
}

impl<'a> From<&'a PatchClusterRequest> for PatchClusterPayload<'a> {
    fn from(request: &'a PatchClusterRequest) -> Self {
        Self {
            credentials: request.credentials.as_ref().map(CredentialsPayload::from),
            storage: request.storage.as_ref(),
            registry: request.registry.as_ref(),
            orchestrator: request.orchestrator.as_ref().map(OrchestratorPayload::from),
            monitoring: request.monitoring.as_ref(),
            secrets: request.secrets.as_ref(),
            metrics: request.metrics.as_ref(),
            disks: request.disks.as_ref(),
            buckets: request.buckets.as_ref(),
            ingress: request.ingress.as_ref(),
            dns: request.dns.as_ref(),
        }
    }
}

// =============================================================================
// Orchestrator
// =============================================================================

#[derive(Serialize)]
pub(crate) struct OrchestratorPayload<'a> {
    job_hostname_template: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    job_internal_hostname_template: Option<&'a str>,
    job_fallback_hostname: &'a str,
    job_schedule_timeout_s: f64,
    job_schedule_scale_up_timeout_s: f64,
    is_http_ingress_secure: bool,
    allow_privileged_mode: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    resource_pool_types: Vec<ResourcePoolTypePayload<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    resource_presets: Vec<ResourcePresetPayload<'a>>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pre_pull_images: &'a [String],
    #[serde(skip_serializing_if = "<[IdleJobConfig]>::is_empty")]
    idle_jobs: &'a [IdleJobConfig],
}

impl<'a> From<&'a OrchestratorConfig> for OrchestratorPayload<'a> {
    fn from(orchestrator: &'a OrchestratorConfig) -> Self {
        Self {
            job_hostname_template: &orchestrator.job_hostname_template,
            job_internal_hostname_template: non_empty(
                &orchestrator.job_internal_hostname_template,
            ),
            job_fallback_hostname: &orchestrator.job_fallback_hostname,
            job_schedule_timeout_s: orchestrator.job_schedule_timeout_s,
            job_schedule_scale_up_timeout_s: orchestrator.job_schedule_scale_up_timeout_s,
            is_http_ingress_secure: orchestrator.is_http_ingress_secure,
            allow_privileged_mode: orchestrator.allow_privileged_mode,
            resource_pool_types: orchestrator
                .resource_pool_types
                .iter()
                .map(ResourcePoolTypePayload::from)
                .collect(),
            resource_presets: orchestrator
                .resource_presets
                .iter()
                .map(ResourcePresetPayload::from)
                .collect(),
            pre_pull_images: &orchestrator.pre_pull_images,
            idle_jobs: &orchestrator.idle_jobs,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct ResourcePoolTypePayload<'a> {
    name: &'a str,
    is_preemptible: bool,
    min_size: u32,
    max_size: u32,
    idle_size: u32,
    cpu: f64,
    available_cpu: f64,
    memory_mb: u64,
    available_memory_mb: u64,
    disk_size_gb: u32,
    #[serde(flatten)]
    gpu: GpuPayload<'a>,
    #[serde(flatten)]
    price: PricePayload<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tpu: Option<&'a TpuResource>,
}

impl<'a> From<&'a ResourcePoolType> for ResourcePoolTypePayload<'a> {
    fn from(pool: &'a ResourcePoolType) -> Self {
        Self {
            name: &pool.name,
            is_preemptible: pool.is_preemptible,
            min_size: pool.min_size,
            max_size: pool.max_size,
            idle_size: pool.idle_size,
            cpu: pool.cpu,
            available_cpu: pool.available_cpu,
            memory_mb: pool.memory_mb,
            available_memory_mb: pool.available_memory_mb,
            disk_size_gb: pool.disk_size_gb,
            gpu: GpuPayload::new(pool.gpu, &pool.gpu_model),
            price: PricePayload::new(pool.price, &pool.currency),
            tpu: pool.tpu.as_ref(),
        }
    }
}

#[derive(Serialize)]
pub(crate) struct ResourcePresetPayload<'a> {
    name: &'a str,
    credits_per_hour: Decimal,
    cpu: f64,
    memory_mb: u64,
    #[serde(flatten)]
    gpu: GpuPayload<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tpu: Option<&'a TpuPreset>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    scheduler_enabled: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    preemptible_node: bool,
}

impl<'a> From<&'a ResourcePreset> for ResourcePresetPayload<'a> {
    fn from(preset: &'a ResourcePreset) -> Self {
        Self {
            name: &preset.name,
            credits_per_hour: preset.credits_per_hour,
            cpu: preset.cpu,
            memory_mb: preset.memory_mb,
            gpu: GpuPayload::new(preset.gpu, &preset.gpu_model),
            tpu: preset.tpu.as_ref(),
            scheduler_enabled: preset.scheduler_enabled,
            preemptible_node: preset.preemptible_node,
        }
    }
}

/// GPU count and model, sent only for a non-zero count.
#[derive(Serialize)]
struct GpuPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    gpu: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gpu_model: Option<&'a str>,
}

impl<'a> GpuPayload<'a> {
    fn new(gpu: Option<u32>, gpu_model: &'a Option<String>) -> Self {
        let gpu = gpu.filter(|count| *count > 0);
        Self {
            gpu,
            gpu_model: gpu.and(gpu_model.as_deref()),
        }
    }
}

/// Price and currency, sent only when a currency is set.
#[derive(Serialize)]
struct PricePayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    currency: Option<&'a str>,
}

impl<'a> PricePayload<'a> {
    fn new(price: Decimal, currency: &'a Option<String>) -> Self {
        let currency = non_empty(currency);
        Self {
            price: currency.map(|_| price),
            currency,
        }
    }
}

// =============================================================================
// Node pools
// =============================================================================

#[derive(Serialize)]
pub(crate) struct NodePoolPayload<'a> {
    name: &'a str,
    role: NodeRole,
    min_size: u32,
    max_size: u32,
    idle_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    machine_type: Option<&'a str>,
    cpu: f64,
    available_cpu: f64,
    memory_mb: u64,
    available_memory_mb: u64,
    disk_size_gb: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_type: Option<&'a str>,
    #[serde(flatten)]
    gpu: GpuPayload<'a>,
    #[serde(flatten)]
    price: PricePayload<'a>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    is_preemptible: bool,
}

impl<'a> From<&'a NodePool> for NodePoolPayload<'a> {
    fn from(pool: &'a NodePool) -> Self {
        Self {
            name: &pool.name,
            role: pool.role,
            min_size: pool.min_size,
            max_size: pool.max_size,
            idle_size: pool.idle_size,
            machine_type: non_empty(&pool.machine_type),
            cpu: pool.cpu,
            available_cpu: pool.available_cpu,
            memory_mb: pool.memory_mb,
            available_memory_mb: pool.available_memory_mb,
            disk_size_gb: pool.disk_size_gb,
            disk_type: non_empty(&pool.disk_type),
            gpu: GpuPayload::new(pool.gpu, &pool.gpu_model),
            price: PricePayload::new(pool.price, &pool.currency),
            is_preemptible: pool.is_preemptible,
        }
    }
}

// =============================================================================
// Credentials
// =============================================================================

#[derive(Serialize)]
pub(crate) struct CredentialsPayload<'a> {
    neuro: NeuroAuthPayload<'a>,
    neuro_registry: RegistryAuthPayload<'a>,
    neuro_helm: RegistryAuthPayload<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    grafana: Option<&'a GrafanaCredentials>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sentry: Option<&'a SentryCredentials>,
    #[serde(skip_serializing_if = "Option::is_none")]
    docker_hub: Option<RegistryAuthPayload<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    minio: Option<&'a MinioCredentials>,
    #[serde(skip_serializing_if = "Option::is_none")]
    emc_ecs: Option<&'a EmcEcsCredentials>,
    #[serde(skip_serializing_if = "Option::is_none")]
    open_stack: Option<&'a OpenStackCredentials>,
}

/// The platform URL is fixed per installation; only the token is writable.
#[derive(Serialize)]
struct NeuroAuthPayload<'a> {
    token: &'a str,
}

#[derive(Serialize)]
struct RegistryAuthPayload<'a> {
    username: Option<&'a str>,
    password: Option<&'a str>,
}

impl<'a> From<&'a DockerRegistryConfig> for RegistryAuthPayload<'a> {
    fn from(registry: &'a DockerRegistryConfig) -> Self {
        Self {
            username: registry.username.as_deref(),
            password: registry.password.as_deref(),
        }
    }
}

impl<'a> From<&'a HelmRegistryConfig> for RegistryAuthPayload<'a> {
    fn from(registry: &'a HelmRegistryConfig) -> Self {
        Self {
            username: registry.username.as_deref(),
            password: registry.password.as_deref(),
        }
    }
}

impl<'a> From<&'a CredentialsConfig> for CredentialsPayload<'a> {
    fn from(credentials: &'a CredentialsConfig) -> Self {
        Self {
            neuro: NeuroAuthPayload {
                token: &credentials.neuro.token,
            },
            neuro_registry: RegistryAuthPayload::from(&credentials.neuro_registry),
            neuro_helm: RegistryAuthPayload::from(&credentials.neuro_helm),
            grafana: credentials.grafana.as_ref(),
            sentry: credentials.sentry.as_ref(),
            docker_hub: credentials.docker_hub.as_ref().map(RegistryAuthPayload::from),
            minio: credentials.minio.as_ref(),
            emc_ecs: credentials.emc_ecs.as_ref(),
            open_stack: credentials.open_stack.as_ref(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
