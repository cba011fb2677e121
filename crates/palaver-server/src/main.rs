use error_stack::{Report, Result, ResultExt};
use palaver_server::App;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{error, info};

#[derive(Debug, Error)]
#[error("Could not start Palaver content server")]
struct StartError;

#[tracing::instrument(skip_all, name = "server.run")]
async fn start_server(config: palaver_config::Server) -> Result<(), StartError> {
    let app = App::new(config).await.map_err(|error| {
        error!(%error, "could not wire application state");
        Report::new(StartError)
    })?;
    app.events.open().await;

    let listener = TcpListener::bind((app.config.ip, app.config.port))
        .await
        .change_context(StartError)
        .attach_printable("could not bind server with address and port")?;

    let addr = listener
        .local_addr()
        .change_context(StartError)
        .attach_printable("could not get socket address of the server")?;

    let make_service = palaver_server::build_axum_router(app.clone())
        .into_make_service_with_connect_info::<SocketAddr>();

    info!("Palaver content server is listening at http://{addr}");

    axum::serve(listener, make_service)
        .with_graceful_shutdown(async {
            palaver_server::util::shutdown_signal().await;
            info!("Received graceful shutdown signal. Shutting down server...");
        })
        .await
        .change_context(StartError)
        .attach_printable("could not serve Palaver content service")?;

    app.events.close().await;

    Ok(())
}

fn main() -> Result<(), StartError> {
    let config = palaver_config::Server::load().change_context(StartError)?;
    palaver_config::logging::init(&config.logging).change_context(StartError)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .change_context(StartError)?;

    rt.block_on(start_server(config))
}
