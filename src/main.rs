use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use forest_loss::cli::Args;
use forest_loss::credential::Credential;
use forest_loss::fetch::fetch_and_save;
use forest_loss::provider::GlobalForestWatch;
use forest_loss::query::{loss_query_toml, LossQuery};

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries only the outcome line, logs go to stderr (RUST_LOG to raise the level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Some(path) = &args.write_template {
        LossQuery::from_template(&loss_query_toml())?.write(path)?;
        println!("Query template written to {}", path.display());
        return Ok(());
    }

    let query = args.resolve()?;
    query.validate()?;
    let credential = Credential::from_env(&query.token_env)?;

    let api = GlobalForestWatch::from_query(&query)?;
    let outcome = fetch_and_save(&api, &query, &credential).await?;
    println!("{}", outcome);

    Ok(())
}
