pub mod heartbeat_service;

pub use heartbeat_service::{HeartbeatService, DEFAULT_HEARTBEAT_WINDOW_SECS};
