pub mod console;

use clap::Args;
use tracing::{debug, info};

pub use console::start_console_api;

#[derive(Args)]
pub struct ServeCommand {
    /// Address to bind the server to
    #[arg(long, default_value = "0.0.0.0:5000", env = "TOUCHPOINT_ADDRESS")]
    pub address: String,

    /// Database connection URL
    #[arg(long, env = "TOUCHPOINT_DATABASE_URL")]
    pub database_url: String,

    /// Seconds after its last heartbeat during which a bot counts as active
    #[arg(
        long,
        default_value_t = touchpoint_heartbeats::DEFAULT_HEARTBEAT_WINDOW_SECS,
        env = "TOUCHPOINT_HEARTBEAT_WINDOW_SECS"
    )]
    pub heartbeat_window_secs: u64,
}

impl ServeCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        debug!("Initializing database connection...");
        let rt = tokio::runtime::Runtime::new()?;
        let db = rt.block_on(touchpoint_database::establish_connection(
            &self.database_url,
        ))?;

        info!("Starting Touchpoint server on {}", self.address);

        rt.block_on(start_console_api(
            db,
            self.address,
            self.heartbeat_window_secs,
        ))
    }
}
