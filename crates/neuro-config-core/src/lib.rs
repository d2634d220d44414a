//! Neu.ro Config Core - Domain types and errors for the config service.
//!
//! This crate holds everything that does not perform I/O:
//!
//! - **Entities**: [`Cluster`], [`NodePool`], [`ResourcePreset`], [`CloudProvider`], etc.
//! - **Requests**: [`PatchClusterRequest`], [`PatchNodePoolRequest`]
//! - **Configuration**: [`ClientConfig`] for building an HTTP client
//! - **Errors**: [`AppError`] with HTTP status classification
//!
//! The HTTP client itself lives in `neuro-config-client`.
//!
//! # Example
//!
//! ```
//! use neuro_config_core::{Cluster, ClusterStatus};
//!
//! let cluster: Cluster = serde_json::from_str(
//!     r#"{"name": "default", "status": "deployed", "created_at": "2024-01-01T00:00:00Z"}"#,
//! )
//! .unwrap();
//! assert_eq!(cluster.status, ClusterStatus::Deployed);
//! ```

pub mod config;
pub mod entities;
pub mod error;

// Configuration
pub use config::{API_PREFIX, ClientConfig, DEFAULT_TIMEOUT};

// Error handling
pub use error::{ApiErrorDetails, ApiErrorKind, AppError};

// Domain entities
pub use entities::{
    CloudProvider, CloudProviderOptions, CloudProviderType, Cluster, ClusterStatus, NodePool,
    NodePoolTemplate, NotificationType, PatchClusterRequest, PatchNodePoolRequest, ResourcePreset,
};
