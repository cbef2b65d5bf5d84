use clap::{Arg, Command};
use paintscrape::configuration::{create_config, ConfigFolder};
use paintscrape::startup::run;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "paintscrape=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Command::new("paintscrape")
        .about("🎨 Download paintings and their stories from online catalogues 🎨")
        .subcommand(
            Command::new("run")
                .about("🚀 Scrape every configured painter into the assets folder")
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_name("FILE")
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Configuration file to use instead of ~/.paintscrape/config.yaml"),
                ),
        )
        .subcommand(
            Command::new("config").about("🛠️ Create or update the configuration file"),
        )
        .get_matches();

    let cfg_folder = ConfigFolder::new();

    match args.subcommand() {
        Some(("run", run_args)) => {
            let cfg_file = run_args
                .get_one::<PathBuf>("config")
                .cloned()
                .unwrap_or(cfg_folder.config_file);
            println!("\x1b[1m\x1b[34mStarting the scrape...\x1b[0m");
            run(&cfg_file).await
        }
        Some(("config", _)) => {
            println!("\x1b[1m\x1b[34mConfiguring paintscrape...\x1b[0m");
            create_config(cfg_folder)
        }
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn print_usage() {
    println!("\x1b[1m\x1b[31mInvalid command!\x1b[0m\n");
    println!("📖 Available Commands:");
    println!("  \x1b[1m\x1b[32mpaintscrape run\x1b[0m    - 🚀 Download the paintings");
    println!("  \x1b[1m\x1b[32mpaintscrape config\x1b[0m - 🛠️  Create or update configuration file");
    println!("\x1b[33mRun `paintscrape run --config <FILE>` to use another configuration.\x1b[0m\n");
}
