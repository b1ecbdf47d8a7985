use anyhow::{Context, Result};
use clap::Parser;
use procmem::cli::{CommandRegistry, LineOutcome, Session};
use procmem::config::{self, Config, ConfigValidator, LoggingConfig};
use procmem::process::is_root;
use procmem::{ProcessId, ProcessMemory, VERSION};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "procmem")]
#[command(about = "Memory scanner and value freezer for Linux processes", version)]
struct Args {
    /// Process to attach to on startup
    #[arg(short, long)]
    pid: Option<ProcessId>,

    /// Path to config file (defaults to procmem.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level, overrides the config file (RUST_LOG takes precedence)
    #[arg(short, long, env = "PROCMEM_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = config::load_validated(args.config.as_deref()).context("failed to load config")?;
    init_logging(&args, &config)?;

    println!("procmem v{}", VERSION);
    println!("Type 'help' to see a list of commands.");
    if !is_root() {
        eprintln!("WARNING: not running as root, reading other processes may be denied.");
    }

    let registry = CommandRegistry::new();
    let mut session = Session::new(Arc::new(ProcessMemory::new()), config);

    if let Some(pid) = args.pid {
        match session.attach(pid) {
            Ok(()) => println!("Using pid: {}", pid),
            Err(e) => eprintln!("pid: {}", e),
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };
        let Some(line) = line else {
            println!();
            break;
        };

        let outcome = tokio::task::block_in_place(|| registry.execute_line(&mut session, &line));
        match outcome {
            LineOutcome::Empty => {}
            LineOutcome::Output(text) => print!("{}", text),
            LineOutcome::Failed(message) => eprintln!("{}", message),
            LineOutcome::Exit => break,
        }

        for message in session.drain_messages() {
            eprintln!("{}", message);
        }
    }

    info!("shutting down");
    Ok(())
}

/// `RUST_LOG` wins, then `--log-level`, then the config file
fn init_logging(args: &Args, config: &Config) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let logging = match &args.log_level {
                Some(level) => {
                    let logging = LoggingConfig {
                        level: level.clone(),
                    };
                    ConfigValidator::validate_logging(&logging)?;
                    logging
                }
                None => config.logging.clone(),
            };
            EnvFilter::new(format!("procmem={}", logging.level))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!(?config, "configuration loaded");
    Ok(())
}
