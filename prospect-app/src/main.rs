use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use prospect_common::observability::{init_tracing, LogOptions};
use prospect_config::{ProspectConfig, ProspectConfigLoader};

mod setup;

/// Iterative web research: expand a topic into queries and documents until
/// a budget runs out, then print everything collected as JSON.
#[derive(Parser, Debug)]
#[command(name = "prospect", version, about)]
struct Args {
    /// Research topic seeding the tree.
    topic: String,

    /// Configuration file (YAML/TOML/JSON).
    #[arg(short, long, default_value = "prospect.yaml")]
    config: PathBuf,

    /// Override the configured document budget.
    #[arg(long)]
    max_documents: Option<usize>,

    /// Override the configured token budget.
    #[arg(long)]
    max_tokens: Option<usize>,

    /// Directory for the rolling log file (logs go to stderr regardless).
    #[arg(long, env = "PROSPECT_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(LogOptions {
        log_dir: args.log_dir.clone(),
        ..Default::default()
    })?;

    let mut cfg: ProspectConfig = ProspectConfigLoader::new().with_file(&args.config).load()?;
    if args.max_documents.is_some() {
        cfg.session.max_documents = args.max_documents;
    }
    if args.max_tokens.is_some() {
        cfg.session.max_tokens = args.max_tokens;
    }

    let mut session = setup::build_session(&args.topic, &cfg).await?;

    // budget exhaustion stops the run on its own; Ctrl-C asks the loop to
    // stop after the in-flight capability call returns
    let cancel = session.cancellation();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received; finishing current step");
            cancel.cancel();
        }
    });

    let summary = session.run().await;
    tracing::info!(
        stopped = ?summary.stopped,
        documents = summary.metrics.documents,
        tokens = summary.metrics.tokens,
        "run finished"
    );

    let out = serde_json::json!({
        "topic": args.topic,
        "stopped": summary.stopped,
        "metrics": summary.metrics,
        "documents": summary.documents,
    });
    serde_json::to_writer_pretty(std::io::stdout().lock(), &out)?;
    println!();
    Ok(())
}
