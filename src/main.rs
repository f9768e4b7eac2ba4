use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shardkeeper::observability::{LogFormat, init_logging};
use shardkeeper::{
    BackupConfig, Backuper, InMemoryQuerier, OperationContext, ServerVersion, ShardBackupType,
    StaticVersioner, Table, TableReplicaMetadata, can_shard_operation,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Parser)]
#[command(name = "shardkeeper", version, about = "Plan sharded backups of replicated tables")]
struct Cli {
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute which tables this replica backs up in full
    Plan(PlanArgs),
    /// Check whether a server version supports sharded operation
    CheckVersion {
        /// Dotted server version, e.g. 21.8.3.44
        version: String,
    },
}

#[derive(Args)]
struct PlanArgs {
    /// JSON array of `system.replicas` rows as seen by this replica
    #[arg(long)]
    replicas: PathBuf,

    /// JSON array of tables to back up (defaults to every table in the replica dump)
    #[arg(long)]
    tables: Option<PathBuf>,

    /// Dotted server version, e.g. 21.8.3.44
    #[arg(long)]
    server_version: String,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable sharded operation regardless of the configuration file
    #[arg(long)]
    sharded: bool,
}

#[derive(Serialize)]
struct PlanReport {
    server_version: String,
    sharded_operation: bool,
    full: usize,
    schema_only: usize,
    tables: Vec<Table>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    match cli.command {
        Commands::Plan(args) => plan(args).await,
        Commands::CheckVersion { version } => check_version(&version).await,
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("malformed JSON in {}", path.display()))
}

fn cancel_on_ctrl_c(shutdown: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.cancel();
        }
    });
}

async fn plan(args: PlanArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => BackupConfig::from_file(path)?,
        None => BackupConfig::default(),
    };
    if args.sharded {
        config = config.sharded_operation(true);
    }
    let version = ServerVersion::parse(&args.server_version)?;

    let rows: Vec<serde_json::Value> = read_json(&args.replicas)?;
    let mut tables: Vec<Table> = match &args.tables {
        Some(path) => read_json(path)?,
        None => rows
            .iter()
            .map(|row| {
                serde_json::from_value::<TableReplicaMetadata>(row.clone())
                    .map(|md| Table::new(md.database, md.table))
            })
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("malformed replica row")?,
    };

    let shutdown = CancellationToken::new();
    cancel_on_ctrl_c(shutdown.clone());
    let ctx = config.operation_context(shutdown);

    let backuper = Backuper::new(
        config.clone(),
        Arc::new(StaticVersioner::from(version)),
        Arc::new(InMemoryQuerier::new(rows)),
    );
    backuper
        .populate_backup_shard_field(&ctx, &mut tables)
        .await
        .context("backup shard assignment failed")?;

    let schema_only = tables
        .iter()
        .filter(|table| table.backup_type == ShardBackupType::Schema)
        .count();
    info!(tables = tables.len(), schema_only, "backup plan ready");

    let report = PlanReport {
        server_version: version.to_string(),
        sharded_operation: config.sharded_operation,
        full: tables.len() - schema_only,
        schema_only,
        tables,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn check_version(version: &str) -> Result<()> {
    let version = ServerVersion::parse(version)?;
    let versioner = StaticVersioner::from(version);
    can_shard_operation(&OperationContext::new(), &versioner).await?;
    println!("sharded operation supported on {}", version);
    Ok(())
}
