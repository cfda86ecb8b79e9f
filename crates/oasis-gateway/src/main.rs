use std::net::SocketAddr;

use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "oasis_gateway=info,tower_http=debug".into()),
        )
        .init();

    // load config: explicit OASIS_CONFIG path > ~/.oasis/oasis.toml
    let config_path = std::env::var("OASIS_CONFIG").ok();
    let config = oasis_core::OasisConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        oasis_core::OasisConfig::default()
    });

    let bind = config.gateway.bind.clone();
    let port = config.gateway.port;

    let state = oasis_gateway::init_state(config)?;
    let router = oasis_gateway::build_router(state);

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    info!("OASIS gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
