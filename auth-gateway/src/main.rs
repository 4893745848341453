use anyhow::Context;
use auth_gateway::{build_router, spawn_config_reload, AppState, GateFile, GatewayConfig};
use common_auth::{AuthorizerRegistry, EnvSecretSource, SharedAuthorizer};
use common_observability::{init_tracing, GateMetrics};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("info");

    let config = GatewayConfig::from_env()?;
    let registry = Arc::new(AuthorizerRegistry::with_defaults());

    // Refuse to serve at all if the initial configuration is invalid.
    let authorizer = GateFile::load(&config.config_path)?
        .build(&registry, &EnvSecretSource)
        .context("authorizer could not be brought online")?;

    let metrics = Arc::new(GateMetrics::new()?);
    let state = AppState::new(SharedAuthorizer::new(authorizer), metrics);

    if let Some(secs) = config.reload_secs {
        info!(reload_secs = secs, path = %config.config_path.display(), "Watching gate config");
        spawn_config_reload(
            state.clone(),
            config.config_path.clone(),
            registry.clone(),
            Duration::from_secs(secs),
        );
    }

    let app = build_router(state);

    let ip: IpAddr = config.host.parse()?;
    let addr = SocketAddr::from((ip, config.port));
    info!(%addr, "starting auth-gateway");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
