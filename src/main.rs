//! t2c-cleanup - flags problem records in a text2cypher dataset.

use std::io;
use std::sync::Arc;

use text2cypher_cleanup::app::{run_cleanup, RunOptions};
use text2cypher_cleanup::cli::Cli;
use text2cypher_cleanup::config::Config;
use text2cypher_cleanup::dataset::Split;
use text2cypher_cleanup::error::{CleanupError, Result};
use text2cypher_cleanup::graph::{ConnectorFactory, DemoConnectorFactory, MockConnectorFactory};
use text2cypher_cleanup::llm::{self, LlmClient, MockLlmClient};
use text2cypher_cleanup::logging;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();
    match &cli.log_file {
        Some(path) => logging::init_file_logging(path),
        None => logging::init_stderr_logging(),
    }

    if let Err(e) = run(cli).await {
        error!("{}: {}", e.category(), e);
        eprintln!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    config.apply_env_overrides();
    cli.apply_to(&mut config);
    config.validate()?;

    let split = match cli.split {
        Some(split) => split,
        None => Split::prompt(io::stdin().lock(), io::stderr())?,
    };

    let factory: Box<dyn ConnectorFactory> = if cli.mock_graph {
        info!("Using mock graph clients");
        Box::new(MockConnectorFactory::default())
    } else {
        info!("Using Neo4j demo server at {}", config.graph.base_url);
        Box::new(DemoConnectorFactory::new(config.graph.clone()))
    };

    // No model is needed when the semantic checks are off.
    let llm: Arc<dyn LlmClient> = if config.detection.semantic_checks {
        Arc::from(llm::create_client(&config.llm)?)
    } else {
        Arc::new(MockLlmClient::new())
    };

    let options = RunOptions::new(&cli.input, split, &config)
        .with_limit(cli.limit)
        .with_progress(!cli.no_progress);
    let report = run_cleanup(&options, &config, factory.as_ref(), llm).await?;

    print!("{}", report.summary);
    println!(
        "Wrote {} clean records to {}",
        report.cleaned_records,
        report.cleaned_path.display()
    );
    if let Some(path) = &report.annotated_path {
        println!("Wrote annotated records to {}", path.display());
    }

    if let Some(path) = &cli.summary_json {
        let json = serde_json::to_string_pretty(&report.summary)
            .map_err(|e| CleanupError::internal(format!("Failed to serialize summary: {}", e)))?;
        std::fs::write(path, json).map_err(|e| {
            CleanupError::dataset(format!("Cannot write {}: {}", path.display(), e))
        })?;
        info!("Wrote summary to {}", path.display());
    }

    Ok(())
}
