//! capsule-migrate CLI binary

use anyhow::Result;

use capsule_migrate::cli::CliApp;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "capsule_migrate=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = CliApp::app().get_matches();

    CliApp::run(&matches).await
}
