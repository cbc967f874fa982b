//! Migrate command handler

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::MigrationHarness;

use crate::config::settings::Settings;
use crate::db::MIGRATIONS;
use crate::error::{AppError, AppResult};

pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Applies pending migrations, lists them (`dry_run`), or reverts the
    /// last `rollback` migrations.
    ///
    /// # Errors
    /// - Database configuration or connection errors
    /// - Migration execution errors
    /// - Rolling back more migrations than are applied
    pub async fn execute(&self, dry_run: bool, rollback: Option<u32>) -> AppResult<()> {
        self.config.database.validate()?;

        if dry_run {
            let pending = self.pending_migrations().await?;
            if pending.is_empty() {
                println!("✓ No pending migrations - database is up to date");
            } else {
                println!("Found {} pending migration(s):", pending.len());
                for name in &pending {
                    println!("  - {}", name);
                }
                println!("\nRun without --dry-run to apply them");
            }
            return Ok(());
        }

        match rollback {
            Some(steps) => {
                let reverted = self.rollback_migrations(steps).await?;
                println!("✓ Rolled back {} migration(s):", reverted.len());
                for name in &reverted {
                    println!("  - {}", name);
                }
            }
            None => {
                let applied = crate::db::run_pending_migrations(&self.config.database.url).await?;
                if applied.is_empty() {
                    println!("✓ No migrations to apply - database is up to date");
                } else {
                    println!("✓ Applied {} migration(s):", applied.len());
                    for name in &applied {
                        println!("  - {}", name);
                    }
                }
            }
        }

        Ok(())
    }

    async fn pending_migrations(&self) -> AppResult<Vec<String>> {
        self.with_connection(|conn| {
            let pending = conn
                .pending_migrations(MIGRATIONS)
                .map_err(|e| migration_error("check pending migrations", e))?;
            Ok(pending.iter().map(|m| m.name().to_string()).collect())
        })
        .await
    }

    async fn rollback_migrations(&self, steps: u32) -> AppResult<Vec<String>> {
        if steps == 0 {
            return Err(AppError::Validation {
                field: "rollback_steps".to_string(),
                reason: "Number of rollback steps must be greater than 0".to_string(),
            });
        }

        tracing::warn!(steps, "Reverting migrations");

        self.with_connection(move |conn| {
            let applied = conn
                .applied_migrations()
                .map_err(|e| migration_error("list applied migrations", e))?;

            if applied.len() < steps as usize {
                return Err(AppError::Validation {
                    field: "rollback_steps".to_string(),
                    reason: format!(
                        "Cannot roll back {} migration(s): only {} applied",
                        steps,
                        applied.len()
                    ),
                });
            }

            (0..steps)
                .map(|_| {
                    conn.revert_last_migration(MIGRATIONS)
                        .map(|version| version.to_string())
                        .map_err(|e| migration_error("revert migration", e))
                })
                .collect()
        })
        .await
    }

    /// Runs `f` on a blocking thread with a synchronous connection.
    async fn with_connection<T, F>(&self, f: F) -> AppResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> AppResult<T> + Send + 'static,
    {
        let database_url = self.config.database.url.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn =
                PgConnection::establish(&database_url).map_err(|e| AppError::ConnectionPool {
                    source: anyhow::Error::from(e).context("connect for migrations"),
                })?;
            f(&mut conn)
        })
        .await
        .map_err(|e| AppError::Internal {
            source: anyhow::Error::from(e),
        })?
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}

fn migration_error(
    operation: &str,
    error: Box<dyn std::error::Error + Send + Sync>,
) -> AppError {
    AppError::Database {
        operation: operation.to_string(),
        source: anyhow::Error::msg(error),
    }
}
