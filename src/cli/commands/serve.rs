use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{debug, error, info, trace, warn};

use crate::config::{initialize_app_state, Settings};
use crate::router::{create_router, create_unavailable_router};

pub async fn serve(settings: Settings) -> Result<()> {
    trace!("Entering serve function");
    info!("MeteoCast application starting up");
    debug!("Data directory: {}", settings.data_dir.display());
    debug!("Bind address: {}", settings.bind_address);

    let bind_address = settings.bind_address.clone();

    // A failed load still serves, but only the blocking notice
    trace!("Initializing application state");
    let app = match initialize_app_state(settings) {
        Ok(state) => {
            debug!("Application state initialized successfully");
            create_router(state)
        }
        Err(e) if e.is_load_failure() => {
            warn!("Input data could not be loaded, serving 503 on every route: {}", e);
            create_unavailable_router(e.to_string())
        }
        Err(e) => {
            error!("Failed to initialize application state: {}", e);
            return Err(e.into());
        }
    };
    debug!("Router created successfully");

    info!("Starting server on {}", bind_address);
    trace!("Attempting to bind TCP listener to {}", bind_address);
    let listener = match TcpListener::bind(&bind_address).await {
        Ok(listener) => {
            debug!("Successfully bound to address: {}", bind_address);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", bind_address, e);
            return Err(e.into());
        }
    };

    info!("MeteoCast dashboard running on http://{}", bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", bind_address);
    debug!("Server is ready to accept connections");

    trace!("Starting axum server");
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown gracefully");
    Ok(())
}
