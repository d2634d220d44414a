//! URL layout of the config service API.
//!
//! Every path is built from the versioned base URL by appending
//! percent-encoded segments, so cluster or node pool names containing `/`
//! or spaces never escape their segment.

use neuro_config_core::CloudProviderType;
use url::Url;

#[derive(Debug, Clone)]
pub(crate) struct Endpoints {
    base_url: Url,
}

impl Endpoints {
    /// `base_url` must be able to carry path segments (see
    /// `ClientConfig::api_base_url`).
    pub(crate) fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    pub(crate) fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn build(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub(crate) fn cloud_providers(&self) -> Url {
        self.build(&["cloud_providers"])
    }

    pub(crate) fn cloud_provider_options(&self, provider_type: CloudProviderType) -> Url {
        self.build(&["cloud_providers", provider_type.as_str()])
    }

    pub(crate) fn clusters(&self) -> Url {
        self.build(&["clusters"])
    }

    pub(crate) fn cluster(&self, cluster_name: &str) -> Url {
        self.build(&["clusters", cluster_name])
    }

    pub(crate) fn node_pools(&self, cluster_name: &str) -> Url {
        self.build(&["clusters", cluster_name, "cloud_provider", "node_pools"])
    }

    pub(crate) fn node_pool(&self, cluster_name: &str, node_pool_name: &str) -> Url {
        self.build(&[
            "clusters",
            cluster_name,
            "cloud_provider",
            "node_pools",
            node_pool_name,
        ])
    }

    pub(crate) fn storages(&self, cluster_name: &str) -> Url {
        self.build(&["clusters", cluster_name, "cloud_provider", "storages"])
    }

    pub(crate) fn storage(&self, cluster_name: &str, storage_name: &str) -> Url {
        self.build(&[
            "clusters",
            cluster_name,
            "cloud_provider",
            "storages",
            storage_name,
        ])
    }

    /// The unnamed storage every cluster starts with.
    pub(crate) fn default_storage(&self, cluster_name: &str) -> Url {
        self.build(&[
            "clusters",
            cluster_name,
            "cloud_provider",
            "storages",
            "default",
            "entry",
        ])
    }

    pub(crate) fn notifications(&self, cluster_name: &str) -> Url {
        self.build(&["clusters", cluster_name, "notifications"])
    }

    pub(crate) fn resource_presets(&self, cluster_name: &str) -> Url {
        self.build(&["clusters", cluster_name, "orchestrator", "resource_presets"])
    }

    pub(crate) fn resource_preset(&self, cluster_name: &str, preset_name: &str) -> Url {
        self.build(&[
            "clusters",
            cluster_name,
            "orchestrator",
            "resource_presets",
            preset_name,
        ])
    }
}
