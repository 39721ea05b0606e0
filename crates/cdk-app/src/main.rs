use anyhow::{Context, Result};
use cdk_app::build_stack;
use cdk_config::{ConfigLoader, StackConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing stack.toml
    #[arg(short, long, default_value = ".")]
    config_dir: PathBuf,

    /// Override the configured log level
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Synthesize the stack template
    Synth {
        /// Write the template to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit compact JSON
        #[arg(long)]
        compact: bool,
    },
    /// List resources in the stack
    List,
    /// Load and validate the configuration
    Validate,
    /// Write a default stack.toml
    Init,
}

fn load_config(loader: &ConfigLoader, log_level: Option<String>) -> Result<StackConfig> {
    let mut config = loader.load()?;
    if let Some(level) = log_level {
        config.logging.level = level;
    }
    cdk_logging::init(&config.logging)?;
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let loader = ConfigLoader::new(&args.config_dir);

    match args.command {
        Command::Init => {
            let path = loader.write_default()?;
            println!("Wrote {}", path.display());
        }
        Command::Synth { output, compact } => {
            let config = load_config(&loader, args.log_level)?;
            let app = build_stack(&config)?;
            let template = app.stack.synth_json(!compact)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, template)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    tracing::info!("Template written to {}", path.display());
                }
                None => println!("{}", template),
            }
        }
        Command::List => {
            let config = load_config(&loader, args.log_level)?;
            let app = build_stack(&config)?;
            for handle in app.stack.handles() {
                println!(
                    "{:<40} {:<48} {}",
                    handle.construct_id, handle.logical_id, handle.resource_type
                );
            }
        }
        Command::Validate => {
            let config = load_config(&loader, args.log_level)?;
            println!(
                "{}: {} alarm collections OK",
                config.stack.name,
                config.alarms.len()
            );
        }
    }

    Ok(())
}
