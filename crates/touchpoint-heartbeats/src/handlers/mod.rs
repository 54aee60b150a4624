pub mod heartbeats_handler;

pub use heartbeats_handler::{configure_routes, AppState, HeartbeatsApiDoc};
