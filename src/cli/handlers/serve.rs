//! Serve command handler

use crate::config::settings::Settings;
use crate::error::AppResult;

pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Validates the configuration and reports what the server would do.
    ///
    /// The server itself is started by the binary once command execution
    /// returns, so a non dry-run call does nothing here.
    pub async fn execute(&self, dry_run: bool) -> AppResult<()> {
        if !dry_run {
            return Ok(());
        }

        self.config.validate()?;

        let database = &self.config.database;
        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!(
            "✓ Database pool: {}-{} connections, {}s checkout timeout{}",
            database.min_connections,
            database.max_connections,
            database.connection_timeout,
            if database.auto_migrate {
                ", migrations applied on startup"
            } else {
                ""
            }
        );
        println!(
            "✓ Logging: level {}, format {}",
            self.config.logger.level, self.config.logger.format
        );
        println!("Dry run completed successfully");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
