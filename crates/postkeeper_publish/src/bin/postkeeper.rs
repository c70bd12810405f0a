//! Postkeeper operator CLI.
//!
//! Inspects the content inventory, publishes posts and toggles the autopost
//! switch. All text rendering of engine results happens here.

use clap::{Parser, Subcommand};
use postkeeper_core::{ConfigSource, Forecast};
use postkeeper_publish::{
    NoOpSink, PublicationOutcome, PublishSink, Publisher, StateStore, TelegramSink,
    TelegramSinkConfigBuilder,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "postkeeper")]
#[command(about = "Postkeeper - content inventory and publication engine")]
#[command(version)]
struct Args {
    /// Path to engine configuration file
    #[arg(short, long, env = "POSTKEEPER_CONFIG", default_value = "postkeeper.toml")]
    config: PathBuf,

    /// Directory that relative inventory paths are resolved against
    #[arg(long, env = "POSTKEEPER_ROOT", default_value = ".")]
    root: PathBuf,

    /// Telegram bot token; without it posts go to a no-op sink
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    telegram_token: Option<String>,

    /// Telegram chat or channel to post to
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    chat_id: Option<String>,

    /// Telegram Bot API base URL
    #[arg(long, env = "TELEGRAM_API_BASE")]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show inventory counts, remaining posts and the bottleneck
    Stats,
    /// Publish one post of a recipe
    Publish {
        /// Recipe name
        recipe: String,
        /// Publish even when autopost is disabled
        #[arg(long)]
        force: bool,
        /// Only show which categories would be used
        #[arg(long)]
        dry_run: bool,
    },
    /// Turn scheduled publication on
    Enable,
    /// Turn scheduled publication off
    Disable,
    /// Validate the configuration and exit
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    info!(config_file = ?args.config, "Loading configuration");
    let source = Arc::new(ConfigSource::open(&args.config)?);

    match &args.command {
        Command::CheckConfig => {
            let config = source.current();
            println!(
                "Configuration OK: {} categories, {} recipes, {} day entries",
                config.categories().len(),
                config.recipes().len(),
                config.day().entries().len()
            );
        }
        Command::Stats => {
            let publisher = build_publisher(&args, source).await?;
            let forecast = publisher.forecast().await?;
            print_forecast(&forecast, publisher.state().autopost_enabled());
        }
        Command::Publish {
            recipe,
            force,
            dry_run,
        } => {
            let publisher = build_publisher(&args, source).await?;
            if *dry_run {
                let plan = publisher.preview(recipe).await?;
                println!("Recipe '{}' is satisfiable:", plan.recipe());
                for slot in plan.slots() {
                    let marker = if *slot.substituted() { " (fallback)" } else { "" };
                    println!(
                        "  slot {:>2}: {} x{}{}",
                        slot.slot_index(),
                        slot.category(),
                        slot.quantity(),
                        marker
                    );
                }
                if let Some(aux) = plan.auxiliary() {
                    println!("  auxiliary: {} x{}", aux.category(), aux.quantity());
                }
                return Ok(());
            }

            let outcome = if *force {
                publisher.publish(recipe).await?
            } else {
                publisher.publish_scheduled(recipe).await?
            };
            report_outcome(&outcome)?;
        }
        Command::Enable => {
            let publisher = build_publisher(&args, source).await?;
            publisher.state().set_autopost(true).await?;
            println!("Autopost enabled");
        }
        Command::Disable => {
            let publisher = build_publisher(&args, source).await?;
            publisher.state().set_autopost(false).await?;
            println!("Autopost disabled");
        }
    }

    Ok(())
}

async fn build_publisher(
    args: &Args,
    source: Arc<ConfigSource>,
) -> Result<Publisher, Box<dyn std::error::Error>> {
    let config = source.current();
    let state = StateStore::load(args.root.join(config.publish().state_file())).await?;

    let sink: Arc<dyn PublishSink> = match (&args.telegram_token, &args.chat_id) {
        (Some(token), Some(chat_id)) => {
            let mut builder = TelegramSinkConfigBuilder::default();
            builder.token(token.as_str()).chat_id(chat_id.as_str());
            if let Some(base) = &args.api_base {
                builder.api_base(base.as_str());
            }
            Arc::new(TelegramSink::new(builder.build()?))
        }
        _ => {
            warn!("TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID not set - using no-op sink");
            Arc::new(NoOpSink::new())
        }
    };

    Ok(Publisher::new(source, args.root.clone(), sink, state))
}

fn print_forecast(forecast: &Forecast, autopost_enabled: bool) {
    println!(
        "Autopost: {}",
        if autopost_enabled { "enabled" } else { "disabled" }
    );

    println!("\nInventory:");
    for (category, count) in forecast.snapshot().iter() {
        println!("  {:<16} {}", category.as_str(), count);
    }

    println!("\nPosts remaining:");
    for (recipe, posts) in forecast.posts() {
        println!("  {:<16} {}", recipe, render_count(*posts));
    }
    println!("  {:<16} {}", "full days", render_count(*forecast.days()));

    let report = forecast.bottleneck();
    match report.bottleneck() {
        Some(limit) => println!(
            "\nBottleneck: {} ({} of {} per day, {} days)",
            limit.category(),
            limit.count(),
            limit.daily(),
            limit.days()
        ),
        None => println!("\nBottleneck: none (no daily requirements)"),
    }
    for ratio in report.primary() {
        println!(
            "  {:<16} {:>6.2} days",
            ratio.category().as_str(),
            ratio.ratio()
        );
    }
    if !report.replaceable().is_empty() {
        println!("Replaceable:");
        for ratio in report.replaceable() {
            println!(
                "  {:<16} {:>6.2} days",
                ratio.category().as_str(),
                ratio.ratio()
            );
        }
    }
}

fn render_count(count: u64) -> String {
    if count == u64::MAX {
        "unbounded".to_string()
    } else {
        count.to_string()
    }
}

fn report_outcome(outcome: &PublicationOutcome) -> Result<(), Box<dyn std::error::Error>> {
    match outcome {
        PublicationOutcome::Published {
            recipe,
            items,
            archive_failures,
            ..
        } => {
            println!("Published '{}' with {} items", recipe, items.len());
            for failure in archive_failures {
                println!("  needs manual cleanup: {}", failure);
            }
            Ok(())
        }
        PublicationOutcome::Disabled => {
            println!("Autopost is disabled; use --force to publish anyway");
            Ok(())
        }
        PublicationOutcome::RolledBack { items, error } => {
            println!("Publication failed, nothing archived. Selected items:");
            for item in items {
                println!("  {}", item);
            }
            Err(error.to_string().into())
        }
        other => Err(other.to_string().into()),
    }
}
