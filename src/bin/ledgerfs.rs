//! Ledgerfs CLI binary
//!
//! Starts the interactive shell over an in-memory filesystem. With
//! `--secret`, decrypts the transport credentials from configuration,
//! connects to the durable queue, and restores the filesystem from its
//! event history before the shell starts.

use clap::Parser;
use ledgerfs::config::LedgerfsConfig;
use ledgerfs::event::{EventTransport, RedisTransport};
use ledgerfs::logging::{init_logging, LoggingConfig};
use ledgerfs::vfs::VirtualFs;
use ledgerfs::{crypto, shell};
use std::path::PathBuf;
use std::process;
use tracing::{error, info};

/// Ledgerfs - event-sourced in-memory virtual filesystem
#[derive(Parser)]
#[command(name = "ledgerfs")]
#[command(about = "Event-sourced in-memory virtual filesystem")]
struct Cli {
    /// Secret key for decrypting the transport credentials
    #[arg(long)]
    secret: Option<String>,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    log_format: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let config = match LedgerfsConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            process::exit(1);
        }
    };

    let logging_config = build_logging_config(&cli, &config);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {e}");
        process::exit(1);
    }

    let fs = match build_filesystem(&cli, &config) {
        Ok(fs) => fs,
        Err(e) => {
            error!("startup failed: {e}");
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = shell::run(fs) {
        error!("shell failed: {e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Precedence: CLI flags override the config file, which overrides defaults.
fn build_logging_config(cli: &Cli, config: &LedgerfsConfig) -> LoggingConfig {
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        logging.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        logging.format = format.clone();
    }
    logging
}

fn build_filesystem(cli: &Cli, config: &LedgerfsConfig) -> anyhow::Result<VirtualFs> {
    let Some(ref secret) = cli.secret else {
        info!("no secret provided, running in-memory only");
        return Ok(VirtualFs::new());
    };

    let Some(ref transport_config) = config.transport else {
        anyhow::bail!("--secret given but the configuration has no [transport] section");
    };

    let addr = crypto::decrypt(secret, &transport_config.encrypted_addr)?;
    let password = transport_config
        .encrypted_password
        .as_deref()
        .map(|sealed| crypto::decrypt(secret, sealed))
        .transpose()?;

    let transport: Box<dyn EventTransport> = Box::new(RedisTransport::connect(
        &addr,
        password.as_deref(),
        transport_config.db,
    )?);
    info!(addr = %addr, db = transport_config.db, "connected to durable queue");

    Ok(VirtualFs::with_transport_key(
        transport,
        &transport_config.queue_key,
    ))
}
