use std::process::ExitCode;

use todosvc::{Config, StartupError};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match start().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "todosvc failed");
            ExitCode::FAILURE
        }
    }
}

async fn start() -> Result<(), StartupError> {
    todosvc::serve(Config::from_env()?).await
}
