use anyhow::Result;
use twogate::cli::{actions, actions::Action, start, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    let (action, globals) = start()?;

    match action {
        Action::Server { .. } => actions::server::handle(action, &globals).await?,
    }

    // Flush any pending spans before the process exits.
    telemetry::shutdown_tracer();

    Ok(())
}
