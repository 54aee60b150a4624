pub mod handlers;
pub mod plugin;
pub mod services;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export main types
pub use plugin::SessionsPlugin;
pub use services::*;
pub use types::*;
