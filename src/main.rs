use anyhow::Result;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use topholders::api::routes::create_router;
use topholders::api::state::build_state;
use topholders::config::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("topholders=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!(
        "Default RPC {} (eager program lookup: {}, rate limit: {:?}/s)",
        config.rpc_url,
        config.eager_program_lookup,
        config.rate_limit_per_second
    );

    let state = build_state(&config)?;
    let app = create_router(state);

    let addr = config.socket_addr();
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        tracing::error!("Failed to serve API: {:?}", e);
        return Err(e.into());
    }

    Ok(())
}
