use std::{fs::OpenOptions, path::Path, sync::Arc};

use axum_server::Handle;
use clap::Parser;
use tracing_subscriber::{
    EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt,
};

use budgie::{
    AppState, Config, Error, add_tracing_layer, build_router, create_pool, graceful_shutdown,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::parse();

    setup_logging(config.log_file.as_deref())?;

    let db_pool = create_pool(
        config.connection_manager(),
        config.pool_size,
        config.connection_timeout(),
    )?;
    let state = AppState::new(db_pool, &config.default_settings())?;
    tracing::info!("Using database at {}", config.db_path.display());

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    let addr = config.socket_addr();
    tracing::info!("HTTP server listening on {addr}");
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;

    Ok(())
}

/// Log to stdout at the level set by `RUST_LOG` (`info` if unset), and at
/// `debug` to `log_file` if one is given.
fn setup_logging(log_file: Option<&Path>) -> Result<(), std::io::Error> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(env_filter);

    let debug_log = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;

            Some(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_ansi(false)
                    .with_writer(Arc::new(file))
                    .with_filter(filter::LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();

    Ok(())
}
