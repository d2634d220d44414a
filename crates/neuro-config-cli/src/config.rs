use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use neuro_config_core::{AppError, ClientConfig, CloudProviderType, NotificationType};

/// CLI configuration parsed from command line arguments and environment variables
#[derive(Parser, Debug)]
#[command(name = "neuro-config")]
#[command(
    author,
    version,
    about = "Command line client for the Neu.ro config service"
)]
#[command(after_help = "Examples:
  neuro-config clusters list
  neuro-config clusters create default --service-token $CLUSTER_TOKEN --ignore-existing
  neuro-config node-pools list default --json
  neuro-config notify default cluster_update_failed --message \"Helm release failed\"

Environment:
  NEURO_CONFIG_URL, NEURO_CONFIG_TOKEN and NEURO_CONFIG_TIMEOUT may also be set in .env")]
pub struct Config {
    /// Config service root URL, e.g. https://dev.neu.ro
    #[arg(long, env = "NEURO_CONFIG_URL")]
    pub url: String,

    /// Bearer token sent with every request
    #[arg(long, env = "NEURO_CONFIG_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "NEURO_CONFIG_TIMEOUT", default_value = "30")]
    pub timeout: u64,

    /// Print raw JSON instead of a summary
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Config {
    /// Builds the HTTP client configuration from the global options.
    pub fn client_config(&self) -> Result<ClientConfig, AppError> {
        let config =
            ClientConfig::from_url(&self.url)?.with_timeout(Duration::from_secs(self.timeout));
        Ok(match &self.token {
            Some(token) => config.with_token(token.as_str()),
            None => config,
        })
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage clusters
    #[command(subcommand)]
    Clusters(ClusterCommand),
    /// Inspect and remove node pools of a cluster
    #[command(subcommand)]
    NodePools(NodePoolCommand),
    /// Inspect and remove resource presets of a cluster
    #[command(subcommand)]
    Presets(PresetCommand),
    /// Show cloud provider options
    #[command(subcommand)]
    CloudProviders(CloudProviderCommand),
    /// Send a cluster lifecycle notification
    #[command(
        after_help = "Types: cluster_updating, cluster_update_succeeded, cluster_update_failed"
    )]
    Notify {
        /// Cluster name
        cluster: String,
        /// Notification type
        notification_type: NotificationType,
        /// Optional message shown to the cluster owner
        #[arg(short, long)]
        message: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ClusterCommand {
    /// List all clusters
    List,
    /// Show one cluster
    Get { name: String },
    /// Register a blank cluster
    Create {
        name: String,
        /// Service token the cluster's platform components authenticate with
        #[arg(long)]
        service_token: String,
        /// Return the existing cluster instead of failing
        #[arg(long)]
        ignore_existing: bool,
    },
    /// Delete a cluster
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
pub enum NodePoolCommand {
    /// List node pools of a cluster
    List { cluster: String },
    /// Show one node pool
    Get { cluster: String, node_pool: String },
    /// Delete a node pool
    Delete {
        cluster: String,
        node_pool: String,
        #[command(flatten)]
        deployment: DeploymentArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum PresetCommand {
    /// List resource presets of a cluster
    List { cluster: String },
    /// Show one resource preset
    Get { cluster: String, preset: String },
    /// Delete a resource preset
    Delete { cluster: String, preset: String },
}

#[derive(Subcommand, Debug)]
pub enum CloudProviderCommand {
    /// List options of every supported cloud provider
    List,
    /// Show options of one cloud provider type
    Get {
        /// aws, gcp, azure, on_prem, vcd_mts or vcd_selectel
        provider_type: CloudProviderType,
    },
}

#[derive(Args, Debug, Clone, Copy)]
pub struct DeploymentArgs {
    /// Record the change without deploying it
    #[arg(long)]
    pub no_deploy: bool,
}

impl DeploymentArgs {
    pub fn start_deployment(&self) -> bool {
        !self.no_deploy
    }
}
