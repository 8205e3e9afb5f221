use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use dynamap::config::Config;
use dynamap::models::{sample_descriptor, SampleEntity};
use dynamap::output::{format_json, format_optional_sample, format_sample, OutputFormat};
use dynamap::repository::{CancellableRepository, GenericRepository, TimeoutRepository};
use dynamap_core::mapping::{EntityMapper, GenericEntityMapper, Value};
use dynamap_core::storage::{CancellationHandle, CancellationSignal, ItemStore, Repository};

/// dynamap - Map typed entities to DynamoDB items
#[derive(Parser, Debug)]
#[command(name = "dynamap")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Storage backend.
    #[arg(long, value_enum, default_value_t = Backend::default(), env = "DYNAMAP_BACKEND")]
    backend: Backend,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// Process-local tables, discarded on exit.
    #[cfg(feature = "inmemory")]
    Inmemory,
    /// AWS DynamoDB, or DynamoDB Local via AWS_ENDPOINT_URL.
    #[cfg(feature = "dynamodb")]
    Dynamodb,
}

impl Default for Backend {
    #[cfg(feature = "inmemory")]
    fn default() -> Self {
        Backend::Inmemory
    }

    #[cfg(not(feature = "inmemory"))]
    fn default() -> Self {
        Backend::Dynamodb
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Create, read, update and delete a sample entity.
    Demo,
    /// Create a sample entity.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "0")]
        price: Decimal,
        /// Comma separated tags.
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// Get a sample entity by id.
    Get { id: Uuid },
    /// Delete a sample entity by id, printing what was removed.
    Delete { id: Uuid },
}

type SampleRepository =
    CancellableRepository<TimeoutRepository<GenericRepository<SampleEntity>>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dynamap=info,dynamap_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    tracing::debug!(?config, backend = ?cli.backend, "Loaded configuration");

    let shutdown = CancellationHandle::new();
    let repository = build_repository(&config, cli.backend, shutdown.signal()).await?;

    // Ctrl-C cancels the in-flight repository call
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling");
            shutdown.cancel();
        }
    });

    run(cli.command, cli.format, &repository).await
}

async fn build_repository(
    config: &Config,
    backend: Backend,
    shutdown: CancellationSignal,
) -> Result<SampleRepository> {
    let descriptor = sample_descriptor(&config.table_name)?;
    let mapper = GenericEntityMapper::new(Arc::new(descriptor))?
        .with_missing_attribute_policy(config.missing_attributes);
    let store: Arc<dyn ItemStore> = match backend {
        #[cfg(feature = "inmemory")]
        Backend::Inmemory => Arc::new(inmemory_store(config, &mapper)?),
        #[cfg(feature = "dynamodb")]
        Backend::Dynamodb => Arc::new(dynamodb_store(config).await),
    };

    let repository = GenericRepository::<SampleEntity>::bind(Arc::new(mapper), store)
        .await
        .with_context(|| format!("Failed to bind table {}", config.table_name))?
        .with_create_policy(config.create_policy);

    let timed = TimeoutRepository::new(Arc::new(repository), config.request_timeout());
    Ok(CancellableRepository::new(Arc::new(timed), shutdown))
}

/// In-memory tables are created on the spot from the mapper's key schema.
#[cfg(feature = "inmemory")]
fn inmemory_store(
    config: &Config,
    mapper: &GenericEntityMapper<SampleEntity>,
) -> Result<dynamap::storage::InMemoryStore> {
    let key_schema = mapper
        .key_schema()
        .context("Sample descriptor declares no hash key")?;
    Ok(dynamap::storage::InMemoryStore::with_tables([(
        config.table_name.clone(),
        key_schema,
    )]))
}

/// DynamoDB tables must already exist.
#[cfg(feature = "dynamodb")]
async fn dynamodb_store(config: &Config) -> dynamap::storage::DynamoDbStore {
    tracing::info!(target_env = %config.target_display(), "Using DynamoDB");
    let client = dynamap::storage::dynamodb::create_client(config).await;
    dynamap::storage::DynamoDbStore::new(client)
}

async fn run(
    command: Commands,
    format: OutputFormat,
    repository: &SampleRepository,
) -> Result<()> {
    match command {
        Commands::Demo => demo(format, repository).await,
        Commands::Create {
            title,
            description,
            price,
            tags,
        } => {
            let entity = SampleEntity::new(title, description, price, tags);
            repository.create(&entity).await?;
            print_sample(Some(&entity), format);
            Ok(())
        }
        Commands::Get { id } => {
            let entity = repository.find_by_id(Value::from(id)).await?;
            print_sample(entity.as_ref(), format);
            Ok(())
        }
        Commands::Delete { id } => {
            let entity = repository.delete(Value::from(id)).await?;
            print_sample(entity.as_ref(), format);
            Ok(())
        }
    }
}

/// Runs create, find, save and delete against one entity.
async fn demo(format: OutputFormat, repository: &SampleRepository) -> Result<()> {
    let entity = SampleEntity::demo();
    let id = Value::from(entity.id);

    repository.create(&entity).await?;
    tracing::info!(id = %entity.id, "Created");

    let mut found = repository
        .find_by_id(id.clone())
        .await?
        .context("Created entity was not found")?;
    tracing::info!(id = %found.id, "Retrieved");
    print_step("Retrieved", &found, format);

    found.updated_on = Utc::now();
    found.tags.push("New Tag".to_string());
    let saved = repository.save(&found).await?;
    tracing::info!(id = %saved.id, "Updated");
    print_step("Updated", &saved, format);

    let deleted = repository
        .delete(id)
        .await?
        .context("Saved entity was not found on delete")?;
    tracing::info!(id = %deleted.id, "Deleted");
    print_step("Deleted", &deleted, format);

    Ok(())
}

fn print_sample(entity: Option<&SampleEntity>, format: OutputFormat) {
    println!("{}", format_optional_sample(entity, format));
}

fn print_step(step: &str, entity: &SampleEntity, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let record = serde_json::json!({ "step": step, "entity": entity });
            println!("{}", format_json(&record));
        }
        OutputFormat::Pretty => println!("{}:\n{}\n", step, format_sample(entity)),
    }
}
