use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde_json::json;
use tracing::{info, warn};

use dealflow_core::app::{AppBuilder, DealflowApp, SaveOptions, SavedDeal};
use dealflow_core::config::CoreConfig;
use dealflow_core::domain::{
    CompanyEnrichment, CompanyInput, Contact, DealForm, Direction, SaveError, StageId,
};
use dealflow_core::impls::StaticRegistry;
use dealflow_core::ports::SystemClock;

/// Save a deal against in-memory stores and print the result as JSON.
#[derive(Debug, Parser)]
#[command(name = "dealflow")]
#[command(about = "Resolve a company, save a deal and render its activity feed")]
struct Cli {
    /// Company name as typed in the deal form
    #[arg(long)]
    name: String,

    /// Tax id as typed (any separators)
    #[arg(long)]
    tax_id: Option<String>,

    #[arg(long, default_value = "New deal")]
    title: String,

    #[arg(long, default_value = "lead")]
    stage: String,

    /// Skip the registry and create the company manually
    #[arg(long)]
    manual: bool,

    /// Query the registry even if the tax id has the wrong digit count
    #[arg(long)]
    force_lookup: bool,

    /// Retry with manual fallback when the registry fails or misses
    #[arg(long)]
    auto_fallback: bool,

    /// JSON object of tax id -> registry record
    #[arg(long, env = "DEALFLOW_REGISTRY")]
    registry: Option<PathBuf>,

    /// Simulate a registry outage
    #[arg(long)]
    registry_offline: bool,

    /// Core config (JSON). Defaults apply to every missing field.
    #[arg(long, env = "DEALFLOW_CONFIG")]
    config: Option<PathBuf>,

    /// Post sample messages and a task, then print the timeline
    #[arg(long)]
    demo_activity: bool,
}

fn load_registry(path: Option<&Path>) -> anyhow::Result<StaticRegistry> {
    let Some(path) = path else {
        return Ok(StaticRegistry::new());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read registry file {}", path.display()))?;
    let records: HashMap<String, CompanyEnrichment> =
        serde_json::from_str(&raw).context("invalid registry file")?;
    info!(records = records.len(), "loaded registry records");
    Ok(StaticRegistry::from_records(records))
}

async fn save(app: &DealflowApp, cli: &Cli) -> Result<SavedDeal, SaveError> {
    let form = DealForm {
        deal_id: None,
        title: cli.title.clone(),
        company: CompanyInput::new(cli.name.as_str(), cli.tax_id.as_deref()),
        stage: StageId::new(cli.stage.as_str()),
        contact: Contact::default(),
        value: None,
    };
    let options = SaveOptions {
        manual_fallback: cli.manual,
        force_lookup: cli.force_lookup,
    };

    match app.orchestrator.save_deal(form.clone(), options).await {
        Err(SaveError::Resolve(err)) if cli.auto_fallback && err.allows_manual_fallback() => {
            warn!(error = %err, "retrying with manual fallback");
            app.orchestrator
                .save_deal(form, SaveOptions::manual_fallback())
                .await
        }
        other => other,
    }
}

async fn demo_activity(app: &DealflowApp, saved: &SavedDeal) -> anyhow::Result<()> {
    let deal_id = saved.deal.id;
    let company = &saved.resolution.company.name;

    let task = app
        .activity
        .create_task(
            deal_id,
            &format!("Prepare proposal for {company}"),
            vec!["Collect requirements".into(), "Price the offer".into()],
        )
        .await?
        .record;
    let question = app
        .activity
        .post_message(deal_id, "Can you send the proposal this week?", Direction::Incoming, None)
        .await?
        .record;
    app.activity
        .post_message(deal_id, "Yes, by Friday.", Direction::Outgoing, Some(question.id))
        .await?;

    app.activity.toggle_subtask(task.id, 0).await?;
    let pending = app.activity.request_task_completion(task.id).await?;
    app.activity
        .commit_task_completion(pending, Some("sent on Thursday"))
        .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CoreConfig::load(path)?,
        None => CoreConfig::default(),
    };
    let registry = load_registry(cli.registry.as_deref())?;
    registry.set_unavailable(cli.registry_offline);

    let app = AppBuilder::new()
        .with_in_memory_stores(Arc::new(SystemClock))
        .with_registry(Arc::new(registry))
        .with_config(config)
        .build()?;

    let saved = match save(&app, &cli).await {
        Ok(saved) => saved,
        Err(err) => {
            if let SaveError::Resolve(resolve) = &err
                && resolve.allows_manual_fallback()
            {
                warn!("re-run with --manual or --auto-fallback to save without the registry");
            }
            return Err(err).context("failed to save deal");
        }
    };

    if cli.demo_activity {
        demo_activity(&app, &saved).await?;
    }
    let timeline = app.orchestrator.deal_timeline(saved.deal.id).await?;

    let out = json!({
        "saved": saved,
        "timeline": timeline,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
