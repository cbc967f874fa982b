//! Dispatches parsed CLI commands to their handlers.

use super::handlers::{MigrateCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::settings::Settings;
use crate::error::{AppError, AppResult};

/// Runs the selected command.
///
/// A plain `serve` (or no subcommand) returns immediately; starting the
/// server is left to the caller, see [`Cli::starts_server`].
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    cli.validate().map_err(|reason| AppError::Validation {
        field: "cli_arguments".to_string(),
        reason,
    })?;

    match &cli.command {
        Some(Commands::Serve {
            host,
            port,
            dry_run,
            ..
        }) => {
            warn_privileged_bind(host.as_deref(), *port);
            ServeCommandHandler::new(settings).execute(*dry_run).await
        }
        None => Ok(()),
        Some(Commands::Migrate { dry_run, rollback }) => {
            MigrateCommandHandler::new(settings)
                .execute(*dry_run, *rollback)
                .await
        }
    }
}

fn warn_privileged_bind(host: Option<&str>, port: Option<u16>) {
    if let (Some("0.0.0.0"), Some(port)) = (host, port)
        && port < 1024
    {
        tracing::warn!(
            port,
            "Binding to all interfaces on a privileged port usually requires root"
        );
    }
}
