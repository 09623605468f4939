use std::process::ExitCode;

use fruit_slot::{binding, config, screen, slot};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let config = match config::StoreConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid store configuration");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(backend = ?config.backend, "fruit slot starting");

    let slot = slot::PersistentSlot::new(config.build_backend());
    let binding = binding::PresentationBinding::new(slot);

    let stdin = BufReader::new(tokio::io::stdin());
    if let Err(e) = screen::run(&binding, stdin, tokio::io::stdout()).await {
        tracing::error!(error = %e, "screen io failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
