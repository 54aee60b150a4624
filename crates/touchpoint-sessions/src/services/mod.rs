pub mod session_service;
pub mod tracking;

pub use session_service::SessionService;
