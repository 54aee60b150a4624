pub use super::bot_heartbeats::Entity as BotHeartbeats;
pub use super::sessions::Entity as Sessions;
