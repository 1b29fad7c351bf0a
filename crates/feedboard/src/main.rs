//! Feedboard Server
//!
//! Barn feed board server with WebSocket API and timed page rotation.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use feedboard::board::{BoardLoader, BoardWatcher};
use feedboard::rotation::BoardRotator;
use feedboard::server::{AppState, create_router};

/// Feedboard Server
#[derive(Parser, Debug)]
#[command(name = "feedboard")]
#[command(about = "Barn feed board server", long_about = None)]
struct Args {
    /// Path to the board directory
    #[arg(short, long, default_value = "./board")]
    board: PathBuf,

    /// Server host address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Server port
    #[arg(long, default_value = "9700")]
    port: u16,

    /// Don't start the file watcher
    #[arg(long)]
    no_watch: bool,

    /// Don't rotate pages automatically
    #[arg(long)]
    no_rotate: bool,

    /// Print the current frame as JSON and exit
    #[arg(long)]
    dump: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("feedboard=info,tower_http=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command line arguments
    let args = Args::parse();

    info!("Starting feedboard v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::new();

    let board_path = &args.board;
    let board = BoardLoader::load(board_path)
        .await
        .with_context(|| format!("Failed to load board from {}", board_path.display()))?;
    info!("Loaded board: {} ({})", board.name(), board.id());
    state.set_board(board).await;

    if args.dump {
        if let Some(frame) = state.current_frame().await {
            println!("{}", serde_json::to_string_pretty(&frame)?);
        }
        return Ok(());
    }

    // Start file watcher if not disabled
    if !args.no_watch {
        match BoardWatcher::new(board_path, state.clone()) {
            Ok(watcher) => {
                tokio::spawn(watcher.run());
                info!("File watcher started");
            }
            Err(e) => {
                error!("Failed to start file watcher: {}", e);
            }
        }
    }

    // The rotator also pushes time mode changes, so it runs even with --no-rotate
    tokio::spawn(BoardRotator::new(state.clone()).rotate(!args.no_rotate).run());
    info!("Page rotation started");

    // Create router
    let app = create_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("WebSocket endpoint: ws://{}/ws", addr);

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down...");
        },
    }
}
