//! Terminal client for the CRM list pages.

use clap::Parser;
use dotenvy::dotenv;

use pushkind_crm_console::cli::{Cli, load_config};

#[tokio::main]
async fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();

    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            log::error!("Error loading console config: {}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = cli.run(config).await {
        log::error!("{err}");
        std::process::exit(1);
    }
}
