use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Model download and launcher for the object detection servers", long_about = None)]
pub struct Cli {
    /// Service configuration holding the `[Config.Model]` table
    #[arg(long, global = true, default_value = "./service.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Download the model weights and processor configuration into the cache
    Download {
        /// Download again even if the files are already cached
        #[arg(long)]
        force: bool,
    },
    /// Prepare the model cache and print the next steps
    Setup,
    /// Launch servers as child processes until Ctrl-C
    Start {
        #[arg(value_enum, default_value_t = Target::All)]
        target: Target,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Service,
    Frontend,
    All,
}

impl Target {
    pub fn binaries(&self) -> &'static [&'static str] {
        match self {
            Target::Service => &["service"],
            Target::Frontend => &["frontend"],
            Target::All => &["service", "frontend"],
        }
    }
}
