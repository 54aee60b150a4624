use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use touchpoint_core::plugin::{
    PluginContext, PluginError, PluginRoutes, ServiceRegistrationContext, TouchpointPlugin,
};
use tracing::debug;

/// Visit session capture plugin
pub struct SessionsPlugin;

impl Default for SessionsPlugin {
    fn default() -> Self {
        Self
    }
}

impl TouchpointPlugin for SessionsPlugin {
    fn name(&self) -> &'static str {
        "sessions"
    }

    fn register_services<'a>(
        &'a self,
        context: &'a ServiceRegistrationContext,
    ) -> Pin<Box<dyn Future<Output = Result<(), PluginError>> + Send + 'a>> {
        Box::pin(async move {
            let db = context.require_service::<sea_orm::DatabaseConnection>();

            let session_service = Arc::new(crate::services::SessionService::new(db));
            context.register_service(session_service);

            debug!("Session services registered successfully");
            Ok(())
        })
    }

    fn configure_routes(&self, context: &PluginContext) -> Option<PluginRoutes> {
        let session_service = context.get_service::<crate::services::SessionService>()?;

        let routes =
            crate::handlers::configure_routes().with_state(Arc::new(crate::handlers::AppState {
                session_service,
            }));

        Some(PluginRoutes { router: routes })
    }

    fn openapi_schema(&self) -> Option<utoipa::openapi::OpenApi> {
        Some(<crate::handlers::SessionsApiDoc as utoipa::OpenApi>::openapi())
    }
}
