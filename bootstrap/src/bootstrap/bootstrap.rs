use crate::bootstrap::download::{download, format_size};
use crate::bootstrap::launcher::Launcher;
use crate::utils::cli::{Cli, Command};
use crate::utils::config::load_model_config;
use crate::utils::logging::*;
use model::ModelConfig;

pub struct Bootstrap;

impl Bootstrap {
    pub async fn run(cli: Cli) -> bool {
        let config = match load_model_config(&cli.config).await {
            Ok(config) => config,
            Err(entry) => {
                logging_emergency!(entry);
                return false;
            }
        };
        match cli.command {
            Command::Download { force } => Self::download(config, force).await,
            Command::Setup => {
                Self::setup(config).await;
                true
            }
            Command::Start { target } => match Launcher::start(target).await {
                Ok(()) => true,
                Err(entry) => {
                    logging_emergency!(entry);
                    false
                }
            },
        }
    }

    async fn download(config: ModelConfig, force: bool) -> bool {
        let cache_dir = config.cache_dir.clone();
        println!("Downloading {} into {}", config.repository, cache_dir);
        println!("This may take a few minutes depending on your internet connection.");
        match download(config, force).await {
            Ok(files) => {
                println!("\nCached files:");
                for file in files {
                    println!("  {} ({})", file.path.display(), format_size(file.size));
                }
                true
            }
            Err(entry) => {
                logging_error!(entry);
                false
            }
        }
    }

    async fn setup(config: ModelConfig) {
        if Self::download(config, false).await {
            println!("\nSetup completed successfully.");
        } else {
            println!("\nSetup completed with warnings.");
            println!("Models will be downloaded automatically when the detection service starts.");
        }
        println!("\nNext steps:");
        println!("1. Start the detection service: bootstrap start service");
        println!("2. Start the web frontend: bootstrap start frontend");
        println!("3. Open http://localhost:5000 in your browser");
    }
}
