use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use url::Url;

use super::is_false;
use crate::error::AppError;

// =============================================================================
// Provider Types
// =============================================================================

/// Cloud provider kinds known to the config service.
///
/// Parsing is case-insensitive; an unknown value is reported as
/// [`AppError::UnsupportedCloudProvider`].
///
/// # Examples
///
/// ```
/// use neuro_config_core::entities::CloudProviderType;
///
/// let provider: CloudProviderType = "AWS".parse().unwrap();
/// assert_eq!(provider, CloudProviderType::Aws);
/// assert_eq!(provider.to_string(), "aws");
/// assert!("openstack".parse::<CloudProviderType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CloudProviderType {
    Aws,
    Gcp,
    Azure,
    OnPrem,
    VcdMts,
    VcdSelectel,
}

impl CloudProviderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aws => "aws",
            Self::Gcp => "gcp",
            Self::Azure => "azure",
            Self::OnPrem => "on_prem",
            Self::VcdMts => "vcd_mts",
            Self::VcdSelectel => "vcd_selectel",
        }
    }

    /// Returns true for VMware Cloud Director based providers.
    pub fn is_vcd(&self) -> bool {
        matches!(self, Self::VcdMts | Self::VcdSelectel)
    }
}

impl fmt::Display for CloudProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CloudProviderType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aws" => Ok(Self::Aws),
            "gcp" => Ok(Self::Gcp),
            "azure" => Ok(Self::Azure),
            "on_prem" => Ok(Self::OnPrem),
            "vcd_mts" => Ok(Self::VcdMts),
            "vcd_selectel" => Ok(Self::VcdSelectel),
            _ => Err(AppError::UnsupportedCloudProvider(s.to_string())),
        }
    }
}

impl TryFrom<String> for CloudProviderType {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CloudProviderType> for String {
    fn from(value: CloudProviderType) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    Kubernetes,
    Platform,
    #[default]
    PlatformJob,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterLocationType {
    Zonal,
    Regional,
}

// =============================================================================
// Node Pools
// =============================================================================

/// Group of identical machines managed by the cluster's cloud provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePool {
    pub name: String,
    #[serde(default)]
    pub role: NodeRole,
    pub min_size: u32,
    pub max_size: u32,
    #[serde(default)]
    pub idle_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_type: Option<String>,
    pub cpu: f64,
    pub available_cpu: f64,
    pub memory_mb: u64,
    pub available_memory_mb: u64,
    #[serde(default)]
    pub disk_size_gb: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_model: Option<String>,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_preemptible: bool,
}

/// Machine type offered by a cloud provider, used to create node pools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePoolTemplate {
    pub id: String,
    pub machine_type: String,
    pub cpu: f64,
    pub available_cpu: f64,
    pub memory_mb: u64,
    pub available_memory_mb: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_model: Option<String>,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl NodePoolTemplate {
    /// Builds a node pool of this machine type, ready to be sent with
    /// `add_node_pool` or `put_node_pool`.
    pub fn to_node_pool(&self, name: impl Into<String>, min_size: u32, max_size: u32) -> NodePool {
        NodePool {
            name: name.into(),
            role: NodeRole::default(),
            min_size,
            max_size,
            idle_size: 0,
            machine_type: Some(self.machine_type.clone()),
            cpu: self.cpu,
            available_cpu: self.available_cpu,
            memory_mb: self.memory_mb,
            available_memory_mb: self.available_memory_mb,
            disk_size_gb: 0,
            disk_type: None,
            gpu: self.gpu,
            gpu_model: self.gpu_model.clone(),
            price: self.price,
            currency: self.currency.clone(),
            is_preemptible: false,
        }
    }
}

/// Node pool templates and provider-specific settings offered for one
/// provider type.
///
/// Fields other than `type` and `node_pools` (regions, storage classes and
/// the like) differ per provider and are kept verbatim in `extras`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudProviderOptions {
    #[serde(rename = "type")]
    pub provider_type: CloudProviderType,
    #[serde(default)]
    pub node_pools: Vec<NodePoolTemplate>,
    #[serde(flatten)]
    pub extras: Map<String, Value>,
}

impl CloudProviderOptions {
    /// Decodes options listed under `provider_type`. A `type` field in the
    /// payload itself is ignored.
    pub fn from_value(provider_type: CloudProviderType, value: Value) -> Result<Self, AppError> {
        let Value::Object(mut map) = value else {
            return Err(AppError::Generic(format!(
                "Cloud provider options for '{}' must be a JSON object",
                provider_type
            )));
        };
        map.insert("type".to_string(), Value::String(provider_type.to_string()));
        Ok(serde_json::from_value(Value::Object(map))?)
    }
}

// =============================================================================
// Storage
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageInstance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_mb: Option<u64>,
    #[serde(default)]
    pub ready: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EfsPerformanceMode {
    #[serde(rename = "generalPurpose")]
    GeneralPurpose,
    #[serde(rename = "maxIO")]
    MaxIo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EfsThroughputMode {
    Bursting,
    Provisioned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GoogleFilestoreTier {
    Standard,
    Premium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AzureStorageTier {
    Standard,
    Premium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AzureReplicationType {
    Lrs,
    Zrs,
}

/// AWS EFS storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwsStorage {
    pub id: String,
    pub description: String,
    pub performance_mode: EfsPerformanceMode,
    pub throughput_mode: EfsThroughputMode,
    #[serde(default)]
    pub instances: Vec<StorageInstance>,
}

/// Google Filestore storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoogleStorage {
    pub id: String,
    pub description: String,
    pub tier: GoogleFilestoreTier,
    #[serde(default)]
    pub instances: Vec<StorageInstance>,
}

/// Azure Files storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AzureStorage {
    pub id: String,
    pub description: String,
    pub replication_type: AzureReplicationType,
    pub tier: AzureStorageTier,
    #[serde(default)]
    pub instances: Vec<StorageInstance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VcdStorage {
    pub description: String,
    pub profile_name: String,
    pub size_gib: u32,
    #[serde(default)]
    pub instances: Vec<StorageInstance>,
}

// =============================================================================
// Providers
// =============================================================================

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwsCloudProvider {
    pub region: String,
    pub zones: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,
    pub credentials: AwsCredentials,
    #[serde(default)]
    pub node_pools: Vec<NodePool>,
    pub storage: AwsStorage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoogleCloudProvider {
    pub location_type: ClusterLocationType,
    pub region: String,
    #[serde(default)]
    pub zones: Vec<String>,
    pub project: String,
    /// Service account key, passed through untouched.
    pub credentials: Map<String, Value>,
    #[serde(default)]
    pub tpu_enabled: bool,
    #[serde(default)]
    pub node_pools: Vec<NodePool>,
    pub storage: GoogleStorage,
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct AzureCredentials {
    pub subscription_id: String,
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for AzureCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureCredentials")
            .field("subscription_id", &self.subscription_id)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AzureCloudProvider {
    pub region: String,
    pub resource_group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtual_network_cidr: Option<String>,
    pub credentials: AzureCredentials,
    #[serde(default)]
    pub node_pools: Vec<NodePool>,
    pub storage: AzureStorage,
}

/// Credentials of an existing Kubernetes cluster.
///
/// When a payload carries both a token and a client certificate, the
/// certificate is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KubernetesCredentials {
    ClientCertificate {
        ca_data: String,
        client_key_data: String,
        client_cert_data: String,
    },
    Token {
        ca_data: String,
        token: String,
    },
}

impl KubernetesCredentials {
    pub fn ca_data(&self) -> &str {
        match self {
            Self::ClientCertificate { ca_data, .. } | Self::Token { ca_data, .. } => ca_data,
        }
    }
}

/// Self-managed Kubernetes cluster. It has no provider-managed storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnPremCloudProvider {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubernetes_url: Option<Url>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<KubernetesCredentials>,
    #[serde(default)]
    pub node_pools: Vec<NodePool>,
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct VcdCredentials {
    pub user: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_password: Option<String>,
}

impl fmt::Debug for VcdCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ssh_password = self.ssh_password.as_ref().map(|_| "<redacted>");
        f.debug_struct("VcdCredentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("ssh_password", &ssh_password)
            .finish()
    }
}

/// VMware Cloud Director installation. `provider_type` keeps which VCD
/// flavour the cluster runs on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VcdCloudProvider {
    #[serde(rename = "type")]
    pub provider_type: CloudProviderType,
    pub url: Url,
    pub organization: String,
    pub virtual_data_center: String,
    pub edge_name: String,
    pub edge_external_network_name: String,
    pub edge_public_ip: String,
    pub catalog_name: String,
    pub credentials: VcdCredentials,
    #[serde(default)]
    pub node_pools: Vec<NodePool>,
    pub storage: VcdStorage,
}

/// Cloud provider section of a cluster, dispatched on its `type` field.
#[derive(Debug, Clone, PartialEq)]
pub enum CloudProvider {
    Aws(AwsCloudProvider),
    Gcp(GoogleCloudProvider),
    Azure(AzureCloudProvider),
    OnPrem(OnPremCloudProvider),
    Vcd(VcdCloudProvider),
}

impl CloudProvider {
    pub fn provider_type(&self) -> CloudProviderType {
        match self {
            Self::Aws(_) => CloudProviderType::Aws,
            Self::Gcp(_) => CloudProviderType::Gcp,
            Self::Azure(_) => CloudProviderType::Azure,
            Self::OnPrem(_) => CloudProviderType::OnPrem,
            Self::Vcd(provider) => provider.provider_type,
        }
    }

    pub fn node_pools(&self) -> &[NodePool] {
        match self {
            Self::Aws(provider) => &provider.node_pools,
            Self::Gcp(provider) => &provider.node_pools,
            Self::Azure(provider) => &provider.node_pools,
            Self::OnPrem(provider) => &provider.node_pools,
            Self::Vcd(provider) => &provider.node_pools,
        }
    }

    /// Storage instances of the provider-managed storage, empty for on-prem.
    pub fn storage_instances(&self) -> &[StorageInstance] {
        match self {
            Self::Aws(provider) => &provider.storage.instances,
            Self::Gcp(provider) => &provider.storage.instances,
            Self::Azure(provider) => &provider.storage.instances,
            Self::OnPrem(_) => &[],
            Self::Vcd(provider) => &provider.storage.instances,
        }
    }
}

impl<'de> Deserialize<'de> for CloudProvider {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let provider_type = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| D::Error::missing_field("type"))?
            .parse::<CloudProviderType>()
            .map_err(D::Error::custom)?;

        let provider = match provider_type {
            CloudProviderType::Aws => serde_json::from_value(value).map(Self::Aws),
            CloudProviderType::Gcp => serde_json::from_value(value).map(Self::Gcp),
            CloudProviderType::Azure => serde_json::from_value(value).map(Self::Azure),
            CloudProviderType::OnPrem => serde_json::from_value(value).map(Self::OnPrem),
            CloudProviderType::VcdMts | CloudProviderType::VcdSelectel => {
                serde_json::from_value(value).map(Self::Vcd)
            }
        };
        provider.map_err(D::Error::custom)
    }
}

impl Serialize for CloudProvider {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let value = match self {
            Self::Aws(provider) => serde_json::to_value(provider),
            Self::Gcp(provider) => serde_json::to_value(provider),
            Self::Azure(provider) => serde_json::to_value(provider),
            Self::OnPrem(provider) => serde_json::to_value(provider),
            Self::Vcd(provider) => serde_json::to_value(provider),
        };
        let mut value = value.map_err(S::Error::custom)?;
        if let Value::Object(map) = &mut value {
            map.insert(
                "type".to_string(),
                Value::String(self.provider_type().to_string()),
            );
        }
        value.serialize(serializer)
    }
}
