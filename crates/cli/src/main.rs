use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use docchat_app::bootstrap;
use docchat_kernel::Settings;

#[derive(Debug, Parser)]
#[command(name = "docchat", version, about = "Prepare and inspect the docchat chunk store")]
struct Cli {
    /// Environment to load (local, staging, production); defaults to DOCCHAT_ENV
    #[arg(long, global = true)]
    env: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the chunk collection and its indexes (default)
    Init,
    /// Report missing collections or indexes without changing anything
    Verify,
    /// Print the effective settings with secrets redacted
    Config,
    /// Print the collections and indexes the bootstrap declares
    Schema,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = match cli.env.as_deref() {
        Some(environment) => Settings::load_for(environment),
        None => Settings::load(),
    }
    .with_context(|| "failed to load docchat settings")?;

    docchat_telemetry::init(&settings.telemetry)?;

    match cli.command.unwrap_or(Command::Init) {
        Command::Init => {
            let report = bootstrap::run(&settings).await?;
            for collection in &report.collections_created {
                println!("created collection {}", collection);
            }
            for index in &report.indexes_created {
                println!("created index {}", index);
            }
            if report.is_noop() {
                println!("schema already up to date");
            }
            println!("{}", bootstrap::COMPLETION_MESSAGE);
        }
        Command::Verify => {
            let report = bootstrap::verify(&settings).await?;
            if !report.is_complete() {
                for collection in &report.missing_collections {
                    println!("missing collection {}", collection);
                }
                for index in &report.missing_indexes {
                    println!("missing index {}", index);
                }
                bail!("schema is incomplete; run `docchat init`");
            }
            println!("schema is complete");
        }
        Command::Config => {
            let rendered = serde_json::to_string_pretty(&settings.redacted())
                .with_context(|| "failed to render settings")?;
            println!("{}", rendered);
        }
        Command::Schema => {
            let specs = bootstrap::schema(&settings).await?;
            let rendered = serde_json::to_string_pretty(&specs)
                .with_context(|| "failed to render schema")?;
            println!("{}", rendered);
        }
    }

    Ok(())
}
