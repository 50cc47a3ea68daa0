use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tokio::{net::TcpListener, sync::broadcast};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use markdown_blog::{
    config::Config,
    hot_reload::start_content_watcher,
    routes::router,
    state::{AppState, RouterState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        posts_dir = %config.posts_dir.display(),
        development = config.development,
        "starting blog"
    );

    let state = Arc::new(AppState::from_config(&config));

    let (tx, _rx) = broadcast::channel(1);
    if config.development {
        info!("Hot reload enabled. Check logs for file change events.");
        start_content_watcher(
            tx.clone(),
            vec![config.posts_dir.clone(), config.static_dir.clone()],
        )
        .context("failed to start content watcher")?;
    }

    let router_state = RouterState {
        app_state: state,
        broadcaster: tx,
    };
    let app = router(router_state, &config.static_dir);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.host, config.port))?;

    info!(%addr, "listening");
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;
    Ok(())
}
