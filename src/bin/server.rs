use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;

use athenaeum::auth::hash_secret;
use athenaeum::config::AuthConfig;
use athenaeum::handlers::{routes, AuthState};
use athenaeum::security::init_production_warnings;
use athenaeum::security_logger::init_security_logger;
use athenaeum::storage::{MemoryUserStore, SharedUserStore};

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  athenaeum_server                    start the auth server");
    eprintln!("  athenaeum_server hash-password PW   print an argon2id PHC string for PW");
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None => {}
        Some("hash-password") => {
            let Some(password) = args.get(1) else {
                print_usage();
                std::process::exit(2);
            };
            match hash_secret(password) {
                Ok(phc) => println!("{}", phc),
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
            }
            return;
        }
        Some(_) => {
            print_usage();
            std::process::exit(2);
        }
    }

    // Initialize env
    let dotenv_result = dotenvy::dotenv();

    // Initialize logging
    env_logger::init();

    match dotenv_result {
        Ok(path) => info!("Environment variables loaded from {}", path.display()),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    init_security_logger();

    // Load config from .env
    let config = match AuthConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!("Configuration: host={}, port={}", config.host, config.port);
    init_production_warnings(&config).await;

    let store: SharedUserStore = match &config.users_file {
        Some(path) => match MemoryUserStore::from_json_file(path) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        },
        None => {
            warn!("ATHENAEUM_USERS_FILE not set; starting with an empty user store, every login will fail");
            Arc::new(MemoryUserStore::new())
        }
    };

    let addr: SocketAddr = match config.bind_address().parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    let state = match AuthState::new(config, store) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize auth: {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting Athenaeum auth server on {}", addr);
    warp::serve(routes(state)).run(addr).await;
}
