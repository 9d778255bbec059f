//! # webserver - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor HTTP/1.0.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use webserver::config::Config;
use webserver::error::ServerError;
use webserver::server::Server;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("webserver=info")),
        )
        .with_thread_names(true)
        .init();

    if let Err(e) = run(Config::parse()) {
        eprintln!("Error fatal: {}", e);
        std::process::exit(1);
    }
}

fn run(config: Config) -> Result<(), ServerError> {
    config.validate()?;
    config.log_summary();

    Server::bind(config)?.run()?;
    Ok(())
}
