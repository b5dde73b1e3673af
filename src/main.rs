mod actions;
mod config;
mod db;
mod error;
mod models;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::actions::cache::StalePaths;
use crate::actions::schema::{Field, FormData};
use crate::actions::{ActionOutcome, FormState, InvoiceActions};

/// Submit invoice form actions against the configured database
#[derive(Parser)]
#[command(name = "invoice-actions", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an invoice dated today
    Create(FormArgs),
    /// Edit an existing invoice
    Update {
        id: String,
        #[command(flatten)]
        form: FormArgs,
    },
    /// Delete an invoice
    Delete { id: String },
    /// Print a stored invoice
    Show { id: String },
    /// Apply database migrations
    Migrate,
}

/// Form fields; a flag left out is submitted as a missing field
#[derive(Args)]
struct FormArgs {
    #[arg(long)]
    customer_id: Option<String>,
    /// Amount in dollars
    #[arg(long, allow_hyphen_values = true)]
    amount: Option<String>,
    /// pending or paid
    #[arg(long)]
    status: Option<String>,
}

impl FormArgs {
    fn into_form(self) -> FormData {
        [
            (Field::CustomerId, self.customer_id),
            (Field::Amount, self.amount),
            (Field::Status, self.status),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|value| (field.input_name(), value)))
        .collect()
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration before logging so RUST_LOG may come from .env
    let config = config::init()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let db = Arc::new(db::init(&config).await?);
    tracing::debug!("database connection established");

    let cache = Arc::new(StalePaths::new());
    let actions = InvoiceActions::from_config(&config, db.clone(), cache.clone());
    let prev_state = FormState::default();

    let success = match cli.command {
        Command::Create(form) => {
            let outcome = actions.create_invoice(&prev_state, &form.into_form()).await;
            report(&outcome)?
        }
        Command::Update { id, form } => {
            let outcome = actions
                .update_invoice(&id, &prev_state, &form.into_form())
                .await;
            report(&outcome)?
        }
        Command::Delete { id } => {
            let outcome = actions.delete_invoice(&id).await?;
            report(&outcome)?;
            true
        }
        Command::Show { id } => match db.get_invoice(&id).await? {
            Some(invoice) => {
                println!("{}", serde_json::to_string_pretty(&invoice)?);
                true
            }
            None => {
                eprintln!("invoice {} not found", id);
                false
            }
        },
        Command::Migrate => {
            db.migrate().await?;
            println!("Migrations applied");
            true
        }
    };

    for path in cache.take_stale() {
        println!("revalidated: {}", path);
    }

    Ok(if success { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Print an action outcome; returns whether the action redirected
fn report(outcome: &ActionOutcome) -> Result<bool> {
    match outcome {
        ActionOutcome::Redirect(path) => {
            println!("redirect: {}", path);
            Ok(true)
        }
        ActionOutcome::StateUpdate(state) => {
            println!("{}", serde_json::to_string_pretty(state)?);
            Ok(false)
        }
    }
}
