//! Server configuration

use anyhow::Result;
use config::{Config, Environment};
use serde::Deserialize;

use crate::repositories::BlockList;

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Usernames that may not publish books, compared case-insensitively
    pub blocked_authors: Vec<String>,
    /// Load the demo users and books at startup
    pub seed_demo_data: bool,
}

impl ServerConfig {
    /// Create a new ServerConfig from environment variables
    ///
    /// # Environment Variables
    /// - `BOOKS_HOST`: Interface to bind (default: "0.0.0.0")
    /// - `BOOKS_PORT`: Port to listen on (default: 3000)
    /// - `BOOKS_BLOCKED_AUTHORS`: Comma-separated usernames barred from publishing
    ///   (default: "darth vader,_darth vader_")
    /// - `BOOKS_SEED_DEMO_DATA`: Load demo users and books (default: true)
    pub fn from_env() -> Result<Self> {
        let settings = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000)?
            .set_default("blocked_authors", vec!["darth vader", "_darth vader_"])?
            .set_default("seed_demo_data", true)?
            .add_source(
                Environment::with_prefix("BOOKS")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("blocked_authors"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Address to bind the listener to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn block_list(&self) -> BlockList {
        BlockList::new(&self.blocked_authors)
    }
}
