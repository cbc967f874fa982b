//! Merges CLI overrides into file and environment based configuration.
//!
//! Precedence, lowest first: configuration files, `STUDY_*` variables,
//! global flags (`--verbose`, `--quiet`), then subcommand flags.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, settings::Settings};

pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Loads the base configuration the way the CLI asks for it.
    ///
    /// `--config` switches the loader to a single file and `--env` replaces
    /// `STUDY_APP_ENV` when picking the environment file.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut loader = ConfigLoader::new()?.with_environment(cli.environment());
        if let Some(path) = &cli.config {
            loader = loader.with_config_file(path);
        }
        Ok(Self::new(loader.load()?))
    }

    /// Applies CLI overrides on a copy of the base configuration and
    /// validates the result.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(Commands::Serve {
            host,
            port,
            log_level,
            ..
        }) = &cli.command
        {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            if let Some(level) = log_level {
                config.logger.level = level.as_str().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::{EnvGuard, lock_env, setup_config_dir};
    use clap::Parser;

    fn merged(args: &[&str]) -> Settings {
        let cli = Cli::try_parse_from(args).unwrap();
        ConfigurationMerger::new(Settings::default())
            .merge_cli_args(&cli)
            .unwrap()
    }

    #[test]
    fn test_merge_without_flags_keeps_base() {
        let base = Settings::default();
        let merger = ConfigurationMerger::new(base.clone());
        let cli = Cli::try_parse_from(["study-api"]).unwrap();
        assert_eq!(merger.merge_cli_args(&cli).unwrap(), base);
        assert_eq!(merger.config(), &base);
    }

    #[test]
    fn test_verbose_and_quiet_set_level() {
        assert_eq!(merged(&["study-api", "--verbose"]).logger.level, "debug");
        assert_eq!(merged(&["study-api", "--quiet"]).logger.level, "error");
    }

    #[test]
    fn test_serve_overrides_host_and_port() {
        let config = merged(&["study-api", "serve", "--host", "0.0.0.0", "--port", "8080"]);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_command_log_level_overrides_global() {
        let config = merged(&["study-api", "--verbose", "serve", "--log-level", "warn"]);
        assert_eq!(config.logger.level, "warn");
    }

    #[test]
    fn test_migrate_leaves_server_untouched() {
        let config = merged(&["study-api", "migrate"]);
        assert_eq!(config.server, Settings::default().server);
    }

    #[test]
    fn test_from_cli_uses_config_file_and_env_flag() {
        let _lock = lock_env();
        let _guard = EnvGuard::clean();
        let dir = setup_config_dir(&[(
            "single.toml",
            "[server]\nport = 4100\n\n[database]\nurl = \"postgres://localhost/single\"\n",
        )]);
        let path = dir.path().join("single.toml");

        let cli = Cli::try_parse_from([
            "study-api",
            "--env",
            "test",
            "--config",
            path.to_str().unwrap(),
        ])
        .unwrap();
        let merger = ConfigurationMerger::from_cli(&cli).unwrap();

        assert_eq!(merger.config().server.port, 4100);
        assert_eq!(merger.config().database.url, "postgres://localhost/single");
    }

    #[test]
    fn test_from_cli_surfaces_invalid_file() {
        let _lock = lock_env();
        let _guard = EnvGuard::clean();
        let dir = setup_config_dir(&[("bad.toml", "[server]\nport = 0\n")]);
        let path = dir.path().join("bad.toml");

        let cli = Cli::try_parse_from(["study-api", "--config", path.to_str().unwrap()]).unwrap();
        assert!(ConfigurationMerger::from_cli(&cli).is_err());
    }
}
