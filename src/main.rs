use std::path::PathBuf;

use withinha::config::Configuration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    withinha::telemetry::init_tracing()?;

    let mut config = Configuration::default();
    if let Some(path) = std::env::args().nth(1) {
        config = config.path(PathBuf::from(path));
    }
    let config = config.read();

    let state = withinha::initialize_state(config).await?;

    tracing::info!(
        name = %state.config.name,
        version = %state.config.version(),
        "withinha ready"
    );

    Ok(())
}
