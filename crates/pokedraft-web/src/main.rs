// Draft server entry point.
//
// Startup sequence:
// 1. Initialize tracing
// 2. Load config (copying defaults on first run)
// 3. Build the catalog client and the draft generator
// 4. Bind and serve until Ctrl+C

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use pokedraft_api::PokeApiClient;
use pokedraft_core::config;
use pokedraft_core::draft::DraftGenerator;
use pokedraft_core::exclusions::Exclusions;
use pokedraft_web::routes::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("pokedraft starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: {} picks x {} options from {} families, catalog at {}",
        config.draft.pick_count,
        config.draft.options_per_pick,
        config.draft.family_count,
        config.pokeapi.base_url
    );

    // 3. Catalog client and generator
    let client =
        PokeApiClient::from_config(&config.pokeapi).context("failed to build PokeAPI client")?;
    let generator = DraftGenerator::new(
        Arc::new(client),
        Arc::new(Exclusions::standard()),
        config.draft.clone(),
    );
    let app = routes::router(AppState::new(generator));

    // 4. Serve
    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("pokedraft shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Initialize tracing to stdout, filtered by `RUST_LOG`.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("pokedraft_web=info,pokedraft_core=info,tower_http=info,warn")
        }))
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
