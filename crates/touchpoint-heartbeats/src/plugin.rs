use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use touchpoint_core::plugin::{
    PluginContext, PluginError, PluginRoutes, ServiceRegistrationContext, TouchpointPlugin,
};
use tracing::debug;

use crate::services::DEFAULT_HEARTBEAT_WINDOW_SECS;

/// Bot liveness tracking plugin
pub struct HeartbeatsPlugin {
    window_secs: u64,
}

impl HeartbeatsPlugin {
    /// Create the plugin with an explicit liveness window in seconds.
    pub fn new(window_secs: u64) -> Self {
        Self { window_secs }
    }
}

impl Default for HeartbeatsPlugin {
    fn default() -> Self {
        Self::new(DEFAULT_HEARTBEAT_WINDOW_SECS)
    }
}

impl TouchpointPlugin for HeartbeatsPlugin {
    fn name(&self) -> &'static str {
        "heartbeats"
    }

    fn register_services<'a>(
        &'a self,
        context: &'a ServiceRegistrationContext,
    ) -> Pin<Box<dyn Future<Output = Result<(), PluginError>> + Send + 'a>> {
        Box::pin(async move {
            let db = context.require_service::<sea_orm::DatabaseConnection>();

            let heartbeat_service =
                Arc::new(crate::services::HeartbeatService::new(db, self.window_secs));
            context.register_service(heartbeat_service);

            debug!("Heartbeat services registered successfully");
            Ok(())
        })
    }

    fn configure_routes(&self, context: &PluginContext) -> Option<PluginRoutes> {
        let heartbeat_service = context.get_service::<crate::services::HeartbeatService>()?;

        let routes =
            crate::handlers::configure_routes().with_state(Arc::new(crate::handlers::AppState {
                heartbeat_service,
            }));

        Some(PluginRoutes { router: routes })
    }

    fn openapi_schema(&self) -> Option<utoipa::openapi::OpenApi> {
        Some(<crate::handlers::HeartbeatsApiDoc as utoipa::OpenApi>::openapi())
    }
}
