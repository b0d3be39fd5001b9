//! ServerBuilder for fluent API to build HTTP servers

use super::router::{build_inventory_routes, health_routes};
use crate::config::AppConfig;
use crate::core::store::SockStore;
use crate::inventory::handlers::AppState;
use crate::inventory::service::InventoryService;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Builder for the inventory HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_store(InMemorySockStore::new())
///     .with_config(AppConfig::load()?)
///     .build()?;
/// ```
pub struct ServerBuilder {
    store: Option<Arc<dyn SockStore>>,
    config: AppConfig,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with default configuration
    pub fn new() -> Self {
        Self {
            store: None,
            config: AppConfig::default(),
            custom_routes: Vec::new(),
        }
    }

    /// Set the record store (required)
    pub fn with_store(self, store: impl SockStore + 'static) -> Self {
        self.with_shared_store(Arc::new(store))
    }

    /// Set a record store that is already shared, e.g. one built from
    /// configuration by [`crate::storage::connect`]
    pub fn with_shared_store(mut self, store: Arc<dyn SockStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Use this configuration instead of the defaults
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Add custom routes to the server
    ///
    /// Use this for endpoints outside the inventory API, such as metrics or
    /// admin pages. Custom routes are merged before the inventory routes.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use axum::{Router, routing::get};
    ///
    /// let extra = Router::new().route("/version", get(|| async { "1.0" }));
    ///
    /// ServerBuilder::new()
    ///     .with_store(store)
    ///     .with_custom_routes(extra)
    ///     .build()?;
    /// ```
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the inventory service backing the routes
    pub fn build_service(&self) -> Result<InventoryService> {
        let store = self
            .store
            .clone()
            .ok_or_else(|| anyhow::anyhow!("SockStore is required. Call .with_store()"))?;

        Ok(InventoryService::new(store).with_import_config(self.config.import))
    }

    /// Build the final router
    ///
    /// This generates:
    /// - Health check routes
    /// - Custom routes
    /// - Inventory routes under `/api/socks`
    ///
    /// Every route is wrapped in a request tracing layer.
    pub fn build(mut self) -> Result<Router> {
        let state = AppState {
            service: Arc::new(self.build_service()?),
        };

        let mut app = health_routes();
        for custom_router in std::mem::take(&mut self.custom_routes) {
            app = app.merge(custom_router);
        }
        app = app.merge(build_inventory_routes(state));

        Ok(app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http())))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    ///
    /// # Example
    ///
    /// ```ignore
    /// ServerBuilder::new()
    ///     .with_store(store)
    ///     .serve("127.0.0.1:8080").await?;
    /// ```
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Serve on the address from the configured `server` section
    pub async fn serve_configured(self) -> Result<()> {
        let addr = self.config.server.bind_address();
        self.serve(&addr).await
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
