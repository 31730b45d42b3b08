//! Walks through the access layer against a running DynamoDB instance.
//!
//! Lists sessions, reuses or creates an active session, appends a short
//! exchange, and prints the resulting history. Run `chatstore-setup` first.

use anyhow::Result;
use chrono::DateTime;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chatstore::output::{aprintln, p_b, p_c, p_g, p_r, p_y};
use chatstore::schema::{create_client, StoreConfig, TableNames};
use chatstore::storage::DynamoDbRepository;
use chatstore_core::chat::Sender;
use chatstore_core::storage::{MessageRepository, SessionRepository};

const DEMO_USER: &str = "user001";

/// Exercise the chatstore access layer end to end
#[derive(Parser, Debug)]
#[command(name = "chatstore-demo")]
#[command(version, about, long_about = None)]
struct Cli {
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
        aprintln!("{}", p_r(&format!("Demo failed: {err:#}")));
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

    aprintln!("{}", p_b("=== Chatstore demo ==="));
    aprintln!("Target: {}", p_c(&store_config.target_display()));
    aprintln!("User: {}", p_c(DEMO_USER));
    aprintln!();

    let client = create_client(&store_config).await?;
    let repo = DynamoDbRepository::new(client, TableNames::default());

    aprintln!("{}", p_b("Sessions:"));
    let sessions = repo.list_sessions(DEMO_USER).await?;
    if sessions.is_empty() {
        aprintln!("  (none)");
    }
    for session in &sessions {
        aprintln!(
            "  - {}: {} ({} messages)",
            session.id,
            session.name,
            session.message_count
        );
    }

    aprintln!();
    let session_id = match repo.get_active_session(DEMO_USER).await? {
        Some(session) => {
            aprintln!("Active session: {}", p_g(&session.name));
            session.id
        }
        None => {
            aprintln!("{}", p_y("No active session, creating one..."));
            let id = repo.create_session(DEMO_USER, "Demo session").await?;
            aprintln!("Created session: {}", p_g(&id.to_string()));
            id
        }
    };

    aprintln!();
    aprintln!("{}", p_b("Appending messages..."));
    repo.append_message(
        DEMO_USER,
        session_id,
        "Hello! Here is a new message.",
        Sender::User,
    )
    .await?;
    repo.append_message(DEMO_USER, session_id, "Hi! Happy to help.", Sender::Ai)
        .await?;

    aprintln!();
    aprintln!("{}", p_b("History:"));
    let history = repo.get_history(DEMO_USER, session_id).await?;
    for message in &history {
        let time = DateTime::from_timestamp_millis(message.timestamp)
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| message.timestamp.to_string());
        aprintln!(
            "  [{}] {}: {}",
            time,
            p_c(message.sender.as_str()),
            message.content
        );
    }

    aprintln!();
    aprintln!("{}", p_b("Sessions after:"));
    for session in repo.list_sessions(DEMO_USER).await? {
        let marker = if session.is_active { p_g("*") } else { " ".to_string() };
        aprintln!(
            "  {} {}: {} ({} messages)",
            marker,
            session.id,
            session.name,
            session.message_count
        );
    }

    Ok(())
}
