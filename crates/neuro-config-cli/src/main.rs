use std::process::ExitCode;

use clap::Parser;
use dotenvy::dotenv;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use neuro_config_cli::{
    CloudProviderCommand, ClusterCommand, Command, Config, NodePoolCommand, PresetCommand,
};
use neuro_config_client::ConfigClient;
use neuro_config_core::{AppError, CloudProviderOptions, Cluster, NodePool, ResourcePreset};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<AppError>() {
                Some(app_error) => error!("{}", app_error.user_message()),
                None => error!("{:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    let client = ConfigClient::new(config.client_config()?)?;
    let output = Output { json: config.json };

    match config.command {
        Command::Clusters(command) => clusters(&client, &output, command).await,
        Command::NodePools(command) => node_pools(&client, &output, command).await,
        Command::Presets(command) => presets(&client, &output, command).await,
        Command::CloudProviders(command) => cloud_providers(&client, &output, command).await,
        Command::Notify {
            cluster,
            notification_type,
            message,
        } => {
            client
                .notify(&cluster, notification_type, message.as_deref())
                .await?;
            info!(
                "Sent {:?} notification to cluster '{}'",
                notification_type, cluster
            );
            Ok(())
        }
    }
}

async fn clusters(
    client: &ConfigClient,
    output: &Output,
    command: ClusterCommand,
) -> anyhow::Result<()> {
    match command {
        ClusterCommand::List => {
            let clusters = client.list_clusters().await?;
            output.list(&clusters, "clusters", print_cluster_row)
        }
        ClusterCommand::Get { name } => {
            let cluster = client.get_cluster(&name).await?;
            output.one(&cluster, print_cluster)
        }
        ClusterCommand::Create {
            name,
            service_token,
            ignore_existing,
        } => {
            let cluster = client
                .create_blank_cluster(&name, &service_token, ignore_existing)
                .await?;
            info!("Cluster '{}' is {}", cluster.name, cluster.status);
            output.one(&cluster, print_cluster)
        }
        ClusterCommand::Delete { name } => {
            client.delete_cluster(&name).await?;
            info!("Deleted cluster '{}'", name);
            Ok(())
        }
    }
}

async fn node_pools(
    client: &ConfigClient,
    output: &Output,
    command: NodePoolCommand,
) -> anyhow::Result<()> {
    match command {
        NodePoolCommand::List { cluster } => {
            let pools = client.list_node_pools(&cluster).await?;
            output.list(&pools, "node pools", print_node_pool_row)
        }
        NodePoolCommand::Get { cluster, node_pool } => {
            let pool = client.get_node_pool(&cluster, &node_pool).await?;
            output.one(&pool, print_node_pool_row)
        }
        NodePoolCommand::Delete {
            cluster,
            node_pool,
            deployment,
        } => {
            client
                .delete_node_pool(&cluster, &node_pool, deployment.start_deployment())
                .await?;
            info!(
                "Deleted node pool '{}' from cluster '{}'",
                node_pool, cluster
            );
            Ok(())
        }
    }
}

async fn presets(
    client: &ConfigClient,
    output: &Output,
    command: PresetCommand,
) -> anyhow::Result<()> {
    match command {
        PresetCommand::List { cluster } => {
            let presets = client.list_resource_presets(&cluster).await?;
            output.list(&presets, "resource presets", print_preset_row)
        }
        PresetCommand::Get { cluster, preset } => {
            let preset = client.get_resource_preset(&cluster, &preset).await?;
            output.one(&preset, print_preset_row)
        }
        PresetCommand::Delete { cluster, preset } => {
            client.delete_resource_preset(&cluster, &preset).await?;
            info!(
                "Deleted resource preset '{}' from cluster '{}'",
                preset, cluster
            );
            Ok(())
        }
    }
}

async fn cloud_providers(
    client: &ConfigClient,
    output: &Output,
    command: CloudProviderCommand,
) -> anyhow::Result<()> {
    match command {
        CloudProviderCommand::List => {
            let options = client.list_cloud_provider_options().await?;
            output.list(&options, "cloud providers", print_cloud_provider)
        }
        CloudProviderCommand::Get { provider_type } => {
            let options = client.get_cloud_provider_options(provider_type).await?;
            output.one(&options, print_cloud_provider)
        }
    }
}

// =============================================================================
// Output
// =============================================================================

struct Output {
    json: bool,
}

impl Output {
    fn one<T: Serialize>(&self, value: &T, print: fn(&T)) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print(value);
        }
        Ok(())
    }

    fn list<T: Serialize>(&self, values: &[T], noun: &str, print: fn(&T)) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(values)?);
        } else if values.is_empty() {
            println!("No {} found.", noun);
        } else {
            values.iter().for_each(print);
        }
        Ok(())
    }
}

fn print_cluster_row(cluster: &Cluster) {
    println!(
        "{:<30} {:<12} {}",
        cluster.name,
        cluster.status.to_string(),
        cluster.created_at.format("%Y-%m-%d %H:%M")
    );
}

fn print_cluster(cluster: &Cluster) {
    println!("  Name:            {}", cluster.name);
    println!("  Status:          {}", cluster.status);
    println!("  Created:         {}", cluster.created_at);
    if let Some(cloud_provider) = &cluster.cloud_provider {
        println!("  Cloud provider:  {}", cloud_provider.provider_type());
        println!("  Node pools:      {}", cloud_provider.node_pools().len());
    }
    if let Some(orchestrator) = &cluster.orchestrator {
        println!("  Presets:         {}", orchestrator.resource_presets.len());
    }
    if let Some(dns) = &cluster.dns {
        println!("  DNS zone:        {}", dns.name);
    }
}

fn print_node_pool_row(pool: &NodePool) {
    let gpu = match (pool.gpu, &pool.gpu_model) {
        (Some(count), Some(model)) if count > 0 => format!("{} x {}", count, model),
        (Some(count), None) if count > 0 => count.to_string(),
        _ => "-".to_string(),
    };
    println!(
        "{:<24} {:>3}..{:<3} {:<20} cpu {:>5.1}  mem {:>7} MB  gpu {}",
        pool.name,
        pool.min_size,
        pool.max_size,
        pool.machine_type.as_deref().unwrap_or("-"),
        pool.available_cpu,
        pool.available_memory_mb,
        gpu
    );
}

fn print_preset_row(preset: &ResourcePreset) {
    let gpu = match (preset.gpu, &preset.gpu_model) {
        (Some(count), Some(model)) if count > 0 => format!("{} x {}", count, model),
        _ => "-".to_string(),
    };
    println!(
        "{:<24} cpu {:>5.1}  mem {:>7} MB  gpu {:<24} {} credits/h",
        preset.name, preset.cpu, preset.memory_mb, gpu, preset.credits_per_hour
    );
}

fn print_cloud_provider(options: &CloudProviderOptions) {
    println!("{}", options.provider_type);
    for template in &options.node_pools {
        println!(
            "  {:<30} cpu {:>5.1}  mem {:>7} MB",
            template.machine_type, template.available_cpu, template.available_memory_mb
        );
    }
}
