use clap::Parser;
use std::path::PathBuf;
use utsushi::config::Config;
use utsushi::proxy::UtsushiService;
use utsushi::server::{ServerArgs, UtsushiServer};

/// Utsushi - signed media URL issuer built with Cloudflare's Pingora
#[derive(Parser, Debug)]
#[command(name = "utsushi")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (environment only when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Daemon mode
    #[arg(short = 'd', long)]
    daemon: bool,

    /// Test configuration and exit
    #[arg(long)]
    test: bool,

    /// Upgrade workers gracefully
    #[arg(long)]
    upgrade: bool,
}

fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    let config = Config::load(args.config.as_deref()).unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = utsushi::logging::init_with_config(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Configuration is invalid");
        std::process::exit(1);
    }

    let missing = config.media.missing_credentials();
    if !missing.is_empty() {
        tracing::error!(
            missing = ?missing,
            "Signing credentials are not configured; issue requests will fail with 500"
        );
    }

    tracing::info!(
        config_file = ?args.config,
        server_address = %config.server.address,
        server_port = config.server.port,
        issue_paths = ?config.issue_paths(),
        cdn_host = %config.media.cdn_host,
        credentials_configured = missing.is_empty(),
        "Configuration loaded successfully"
    );

    if args.test {
        tracing::info!("Configuration test passed");
        return;
    }

    let service = UtsushiService::new(&config).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to build service");
        std::process::exit(1);
    });

    let server = UtsushiServer::from_config(
        &config,
        ServerArgs {
            daemon: args.daemon,
            test: args.test,
            upgrade: args.upgrade,
        },
    );

    if let Err(e) = server.run(service) {
        tracing::error!(error = %e, "Server terminated");
        std::process::exit(1);
    }
}
