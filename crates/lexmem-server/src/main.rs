//! Lexmem Server
//!
//! HTTP API for the adaptive vocabulary review scheduler. Serves word
//! management, review submission, and study sessions, and hosts the
//! detached explanation generator.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use lexmem_core::{SessionRegistry, Storage};
use lexmem_server::config::Config;
use lexmem_server::explain::Explainer;
use lexmem_server::router;
use lexmem_server::state::AppState;

/// Parse command-line arguments on top of the environment config.
/// Exits the process if `--help` or `--version` is requested.
fn parse_args(config: &mut Config) {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!("Lexmem Server v{}", env!("CARGO_PKG_VERSION"));
                println!();
                println!("Adaptive review scheduling for vocabulary study, over HTTP.");
                println!();
                println!("USAGE:");
                println!("    lexmem-server [OPTIONS]");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help              Print help information");
                println!("    -V, --version           Print version information");
                println!("    --addr <ADDR>           Listen address (default: 127.0.0.1:8080)");
                println!("    --data-dir <PATH>       Custom data directory");
                println!();
                println!("ENVIRONMENT:");
                println!("    RUST_LOG                Log level filter (e.g., debug, info, warn)");
                println!("    LEXMEM_ADDR             Listen address");
                println!("    LEXMEM_DATA_DIR         Custom data directory");
                println!("    LEXMEM_AI_API_KEY       Enables explanation generation");
                println!("    LEXMEM_AI_BASE_URL      OpenAI-compatible endpoint base URL");
                println!("    LEXMEM_AI_MODEL         Model used for explanations");
                println!();
                println!("EXAMPLES:");
                println!("    lexmem-server");
                println!("    lexmem-server --addr 0.0.0.0:9090 --data-dir /custom/path");
                println!("    RUST_LOG=debug lexmem-server");
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("lexmem-server {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--addr" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --addr requires an address argument");
                    eprintln!("Usage: lexmem-server --addr <ADDR>");
                    std::process::exit(1);
                }
                config.addr = args[i].clone();
            }
            "--data-dir" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --data-dir requires a path argument");
                    eprintln!("Usage: lexmem-server --data-dir <PATH>");
                    std::process::exit(1);
                }
                config.data_dir = Some(PathBuf::from(&args[i]));
            }
            arg => {
                eprintln!("error: unknown argument '{}'", arg);
                eprintln!("Usage: lexmem-server [OPTIONS]");
                eprintln!("Try 'lexmem-server --help' for more information.");
                std::process::exit(1);
            }
        }
        i += 1;
    }
}

#[tokio::main]
async fn main() {
    // Parse CLI arguments first so --help/--version work cleanly
    let mut config = Config::from_env();
    parse_args(&mut config);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    info!("lexmem-server v{} starting", env!("CARGO_PKG_VERSION"));

    let storage = match Storage::new(config.data_dir.clone()) {
        Ok(storage) => {
            info!("storage initialized");
            Arc::new(storage)
        }
        Err(err) => {
            error!("failed to initialize storage: {}", err);
            std::process::exit(1);
        }
    };

    let sessions = Arc::new(SessionRegistry::new());

    let explainer = match &config.ai {
        Some(ai) => {
            info!(model = %ai.model, "explanation generation enabled");
            Some(Arc::new(Explainer::new(ai)))
        }
        None => {
            info!("LEXMEM_AI_API_KEY not set; explanation generation disabled");
            None
        }
    };

    let app = router(AppState {
        storage,
        sessions,
        explainer,
    });

    let listener = match tokio::net::TcpListener::bind(&config.addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(addr = %config.addr, "failed to bind: {}", err);
            std::process::exit(1);
        }
    };

    info!(addr = %config.addr, "listening");

    if let Err(err) = axum::serve(listener, app).await {
        error!("server error: {}", err);
        std::process::exit(1);
    }

    info!("lexmem-server shutting down");
}
