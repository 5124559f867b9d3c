use anyhow::Context;
use clap::Parser;
use roulette_server::config::Config;
use roulette_server::draw::RngDraw;
use roulette_server::{ws, Hub, Session};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_tracing(&config.log)?;

    let options = config.initial_options();
    info!(
        options = options.len(),
        lock = config.lock_options_while_spinning,
        "roulette server starting"
    );

    let session = Session::new(options, Box::new(RngDraw::from_entropy()))
        .with_options_lock(config.lock_options_while_spinning);
    let hub = Hub::new(session);

    ws::serve(&config.addr(), hub)
        .await
        .context("websocket server failed")?;
    Ok(())
}

fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
