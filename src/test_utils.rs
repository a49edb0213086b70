use crate::{Config, Server};

/// Configuration pointed at an in-memory sqlite database. A single
/// connection is required: every pooled connection to `sqlite::memory:`
/// would otherwise get its own empty database.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.database.url = "sqlite::memory:".to_string();
    config.database.max_connections = 1;
    config.logging.log_request = false;
    config
}

/// Test server builder for creating test instances
pub struct TestServerBuilder {
    config: Config,
}

impl TestServerBuilder {
    pub fn new() -> Self {
        Self {
            config: test_config(),
        }
    }

    /// Set a custom configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Build the test server with migrations applied
    pub async fn build(self) -> Server {
        let server = Server::new(self.config).await.unwrap();
        server.database.migrate().await.unwrap();
        server
    }
}

impl Default for TestServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
