// src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use tributario_backend::{
    config::{AppState, Config},
    create_router,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let bind_addr = config.bind_addr.clone();

    let app_state = AppState::new(config).await?;
    app_state.bootstrap().await?;

    let app = create_router(app_state);

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    tracing::info!("📚 Documentação em http://{}/swagger-ui", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
