//! Neu.ro Config CLI - argument parsing for the `neuro-config` binary.

pub mod config;

pub use config::{
    CloudProviderCommand, ClusterCommand, Command, Config, DeploymentArgs, NodePoolCommand,
    PresetCommand,
};
