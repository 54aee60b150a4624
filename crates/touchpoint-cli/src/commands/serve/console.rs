use axum::routing::get;
use axum::Router;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use touchpoint_core::plugin::PluginManager;
use touchpoint_database::DbConnection;
use touchpoint_heartbeats::HeartbeatsPlugin;
use touchpoint_sessions::SessionsPlugin;
use tracing::{debug, info};
use utoipa_swagger_ui::SwaggerUi;

fn create_openapi(plugin_manager: &PluginManager) -> anyhow::Result<utoipa::openapi::OpenApi> {
    plugin_manager
        .get_unified_openapi()
        .map_err(|e| anyhow::anyhow!("Failed to build OpenAPI schema: {}", e))
}

fn create_swagger_router(plugin_manager: &PluginManager) -> anyhow::Result<Router> {
    let api_doc = create_openapi(plugin_manager)?;
    Ok(Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_doc)))
}

/// Liveness banner served at the root path.
async fn index() -> &'static str {
    "Touchpoint API is running"
}

/// Start the HTTP API server with all plugins registered.
pub async fn start_console_api(
    db: Arc<DbConnection>,
    address: String,
    heartbeat_window_secs: u64,
) -> anyhow::Result<()> {
    let mut plugin_manager = PluginManager::new();

    // Register core services that plugins can access
    let service_context = plugin_manager.service_context();
    service_context.register_service(db.clone());

    // Register plugins in dependency order:
    // 1. SessionsPlugin - visit session capture (depends on database)
    debug!("Registering SessionsPlugin");
    let sessions_plugin = Box::new(SessionsPlugin);
    plugin_manager.register_plugin(sessions_plugin);

    // 2. HeartbeatsPlugin - bot liveness tracking (depends on database)
    debug!("Registering HeartbeatsPlugin");
    let heartbeats_plugin = Box::new(HeartbeatsPlugin::new(heartbeat_window_secs));
    plugin_manager.register_plugin(heartbeats_plugin);

    // Initialize all plugins
    debug!("Initializing plugins");
    if let Err(e) = plugin_manager.initialize_plugins().await {
        tracing::error!("Plugin initialization failed: {}", e);
        return Err(anyhow::anyhow!("Plugin initialization failed: {}", e));
    }
    debug!("All plugins initialized successfully");

    // Build the application with all plugin routes and OpenAPI schemas
    debug!("Building application with plugin routes");
    let app = plugin_manager
        .build_application()
        .map_err(|e| anyhow::anyhow!("Failed to build application: {}", e))?
        .merge(create_swagger_router(&plugin_manager)?)
        .route("/", get(index));

    // Start the HTTP server
    let listener = TcpListener::bind(&address).await?;
    info!("Touchpoint server listening on {}", address);

    // ConnectInfo supplies the peer address used for forwarded-for fallback
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .into_future()
    .await?;
    info!("Touchpoint server exited");
    Ok(())
}
