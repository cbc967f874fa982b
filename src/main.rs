use clap::Parser;

use study_api::cli::{Cli, execute_command, load_and_merge_config};
use study_api::logger::init_logger;
use study_api::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = load_and_merge_config(&cli)?;
    init_logger(settings.logger.clone().into_logger_config()?)?;

    execute_command(&cli, settings.clone()).await?;

    if cli.starts_server() {
        Server::new(settings, cli.environment()).run().await?;
    }

    Ok(())
}
