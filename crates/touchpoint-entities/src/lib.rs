pub mod bot_heartbeats;
pub mod sessions;

pub mod prelude;
