//! Binary entrypoint for the petshell CLI.
//!
//! Commands:
//! - `chat` - interactive pet chat session
//! - `game` - text adventure session
//! - `status` - print the pet's cached condition, no backend required
//! - `init [--force]` - create a starter `petshell.toml`
//!
//! See the library crate docs for module-level details: `petshell::`.
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;

use petshell::config::Config;

#[derive(Parser)]
#[command(name = "petshell")]
#[command(about = "Terminal client for a virtual pet chat and its adventure backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "petshell.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with your pet
    Chat,
    /// Play the text adventure
    Game,
    /// Show the pet's condition from the local cache
    Status,
    /// Create a starter configuration file
    Init {
        /// Replace an existing configuration file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config early to configure logging (except for Init which writes it)
    let pre_config = match cli.command {
        Commands::Init { .. } => None,
        _ => Some(load_config(&cli.config).await?),
    };
    init_logging(pre_config.as_ref(), cli.verbose);

    match cli.command {
        Commands::Chat => {
            let config = pre_config.unwrap_or_default();
            info!("petshell v{} pet chat starting", env!("CARGO_PKG_VERSION"));
            petshell::pet::session::run(&config).await?;
        }
        Commands::Game => {
            let config = pre_config.unwrap_or_default();
            info!("petshell v{} adventure starting", env!("CARGO_PKG_VERSION"));
            petshell::game::session::run(&config).await?;
        }
        Commands::Status => {
            let config = pre_config.unwrap_or_default();
            petshell::pet::session::show_status(&config)?;
        }
        Commands::Init { force } => {
            if !force && tokio::fs::try_exists(&cli.config).await.unwrap_or(false) {
                println!("{} already exists (use --force to overwrite)", cli.config);
                return Ok(());
            }
            Config::create_default(&cli.config).await?;
            println!("configuration written to {}", cli.config);
        }
    }

    Ok(())
}

/// Read the config file when it exists, otherwise run on defaults. A file
/// that exists but fails to parse is an error.
async fn load_config(path: &str) -> Result<Config> {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        Config::load(path).await
    } else {
        Ok(Config::default())
    }
}

fn init_logging(config: Option<&Config>, verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .and_then(|c| c.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    match config.and_then(|c| c.logging.file.as_deref()) {
        Some(path) => {
            use std::io::Write;
            if let Ok(f) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
            {
                let sink = std::sync::Arc::new(std::sync::Mutex::new(f));
                // In a pipeline stdout is redirected, so keep log lines out of it
                let is_tty = atty::is(atty::Stream::Stdout);
                builder.format(move |fmt, record| {
                    let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                    let line = format!("{} [{}] {}", ts, record.level(), record.args());
                    if let Ok(mut guard) = sink.lock() {
                        let _ = writeln!(guard, "{}", line);
                    }
                    if is_tty {
                        writeln!(fmt, "{}", line)
                    } else {
                        Ok(())
                    }
                });
            } else {
                console_format(&mut builder);
            }
        }
        None => console_format(&mut builder),
    }
    let _ = builder.try_init();
}

fn console_format(builder: &mut env_logger::Builder) {
    use std::io::Write;
    builder.format(|fmt, record| {
        writeln!(
            fmt,
            "{} [{}] {}",
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
            record.level(),
            record.args()
        )
    });
}
