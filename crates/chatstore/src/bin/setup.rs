//! Creates the `ChatHistory` and `UserSessions` tables.
//!
//! Targets DynamoDB Local by default; point `AWS_ENDPOINT_URL` elsewhere or
//! clear it to target AWS directly. Exits with status 1 on any fatal failure.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chatstore::output::{aprintln, p_b, p_c, p_g, p_r, p_y};
use chatstore::schema::{
    chat_history_table, create_client, create_table, delete_table, insert_sample_data, list_tables,
    user_sessions_table, wait_for_table_active, wait_for_table_deleted, StoreConfig, TableNames,
};

/// Set up the chatstore DynamoDB tables
#[derive(Parser, Debug)]
#[command(name = "chatstore-setup")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Delete existing tables before creating them
    #[arg(long)]
    reset: bool,

    /// Insert fixed sample data once the tables are active
    #[arg(long)]
    with_sample_data: bool,

    /// DynamoDB endpoint URL; pass an empty string to target AWS directly
    #[arg(long, env = "AWS_ENDPOINT_URL", default_value = "http://localhost:8000")]
    endpoint_url: String,

    /// AWS region
    #[arg(long, env = "AWS_REGION", default_value = "ap-northeast-1")]
    region: String,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        aprintln!("{}", p_r(&format!("Setup failed: {err:#}")));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatstore=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store_config = StoreConfig {
        endpoint_url: if cli.endpoint_url.is_empty() {
            None
        } else {
            Some(cli.endpoint_url.clone())
        },
        region: cli.region.clone(),
    };

    aprintln!("{}", p_b("=== DynamoDB table setup ==="));
    aprintln!("Target: {}", p_c(&store_config.target_display()));
    aprintln!();

    let client = create_client(&store_config).await?;
    let tables = TableNames::default();

    let existing = list_tables(&client).await?;
    aprintln!("Existing tables: {:?}", existing);

    if cli.reset {
        aprintln!();
        aprintln!("{}", p_y("Resetting tables..."));
        for table_name in [&tables.chat_history, &tables.user_sessions] {
            if delete_table(&client, table_name).await? {
                wait_for_table_deleted(&client, table_name).await?;
                aprintln!("  {} {}", p_y("-"), table_name);
            }
        }
    }

    aprintln!();
    aprintln!("{}", p_b("Creating tables..."));
    let configs = [
        chat_history_table(&tables.chat_history),
        user_sessions_table(&tables.user_sessions),
    ];
    for config in &configs {
        if create_table(&client, config).await? {
            wait_for_table_active(&client, &config.table_name).await?;
            aprintln!("  {} {}", p_g("+"), config.table_name);
        } else {
            aprintln!("  {} {} (already exists)", p_c("="), config.table_name);
        }
    }

    if cli.with_sample_data {
        aprintln!();
        aprintln!("{}", p_b("Inserting sample data..."));
        let inserted = insert_sample_data(&client, &tables).await?;
        aprintln!("  {} {} items", p_g("+"), inserted);
    }

    let all_tables = list_tables(&client).await?;
    aprintln!();
    aprintln!("{}", p_g("Setup complete."));
    aprintln!("Tables: {:?}", all_tables);

    Ok(())
}
