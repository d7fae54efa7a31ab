use anyhow::{Context, Result};
use cers_dashboard::{config::Config, ingest::kobo, normalize, serve};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    // 1) environment + logging
    dotenv::dotenv().ok();
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(env).init();
    info!("startup");

    // 2) configuration (credentials are never compiled in)
    let config = Config::load().context("loading configuration")?;

    // 3) single fetch of all submissions
    let client = kobo::build_client()?;
    let submissions =
        kobo::fetch_submissions(&client, &config).context("fetching submissions")?;

    // 4) normalize into the session table
    let table = normalize::build_table(&submissions);
    info!(
        rows = table.len(),
        columns = table.columns.len(),
        "session table built"
    );

    // 5) serve the dashboard over it
    serve::run(&config, table).context("serving dashboard")?;
    Ok(())
}
