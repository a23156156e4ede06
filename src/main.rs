use anyhow::{Context, Result};
use armstor::cli::output::*;
use armstor::cli::{CheckConfigCommand, Cli, Command, RunCommand};
use armstor::execution::{PipelineRunner, RunEvent};
use armstor::{scenario, Settings};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    match &cli.command {
        Command::Run(cmd) => run_walkthrough(cmd, &cli).await?,
        Command::CheckConfig(cmd) => check_config(cmd, &cli)?,
    }

    Ok(())
}

async fn run_walkthrough(cmd: &RunCommand, cli: &Cli) -> Result<()> {
    let mut settings = Settings::load(cli.profile.as_deref())?;
    if let Some(location) = &cmd.location {
        settings.location = location.clone();
    }

    println!(
        "{} Running the walkthrough in {} (subscription {})",
        INFO,
        style(&settings.location).bold(),
        style(&settings.subscription_id).dim()
    );

    let bar = create_progress_bar(scenario::STEP_COUNT);
    let mut runner = PipelineRunner::new();
    let progress = bar.clone();
    runner.add_event_handler(move |event| {
        progress.println(format_run_event(event));
        if matches!(event, RunEvent::StepCompleted { .. }) {
            progress.inc(1);
        }
    });

    let result = match cmd.timeout_secs {
        Some(secs) => {
            let deadline = Duration::from_secs(secs);
            match timeout(deadline, scenario::run_live(&settings, &runner)).await {
                Ok(result) => result,
                Err(_) => {
                    bar.finish_and_clear();
                    println!(
                        "{} Run cancelled after {}s; the in-flight call was abandoned",
                        CROSS, secs
                    );
                    std::process::exit(1);
                }
            }
        }
        None => scenario::run_live(&settings, &runner).await,
    };
    bar.finish_and_clear();

    match result {
        Ok(ctx) => {
            println!(
                "\n{} All operations {} (resource group {}, account {})",
                CHECK,
                style("completed successfully").green(),
                style(&ctx.resource_group).bold(),
                style(&ctx.account_name).bold()
            );
            Ok(())
        }
        Err(e) => {
            println!("\n{} Walkthrough {}: {}", CROSS, style("failed").red(), e);
            println!(
                "{} Resources created before the failure are left in place",
                WARN
            );
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

fn check_config(cmd: &CheckConfigCommand, cli: &Cli) -> Result<()> {
    match Settings::load(cli.profile.as_deref()) {
        Ok(settings) => {
            println!("{} Settings are complete", CHECK);
            if cmd.json {
                // The secret is never echoed back.
                let value = serde_json::json!({
                    "client_id": settings.client_id,
                    "tenant": settings.tenant,
                    "subscription_id": settings.subscription_id,
                    "location": settings.location,
                    "group_prefix": settings.group_prefix,
                    "account_prefix": settings.account_prefix,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("  Client id: {}", style(&settings.client_id).bold());
                println!("  Tenant: {}", style(&settings.tenant).bold());
                println!(
                    "  Subscription: {}",
                    style(&settings.subscription_id).bold()
                );
                println!("  Location: {}", style(&settings.location).cyan());
                println!(
                    "  Name prefixes: {} / {}",
                    style(&settings.group_prefix).cyan(),
                    style(&settings.account_prefix).cyan()
                );
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Configuration invalid:", CROSS);
            println!("  {}", style(e).red());
            std::process::exit(1);
        }
    }
}
