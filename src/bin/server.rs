use clap::Parser;
use connector_monitor::db::{DocumentStore, MemoryStore, MongoStore};
use connector_monitor::server::config::ServerConfig;
use connector_monitor::version::VERSION;
use connector_monitor::web::create_axum_router;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version = VERSION, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Address to listen on, overrides `bind_address`
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Keep documents in memory instead of CosmosDB (development only)
    #[arg(long)]
    in_memory: bool,
}

fn init_logging(log_dir: &str) {
    // Log to a file: JSON format, daily rotation
    let file_appender = rolling::daily(log_dir, "server.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .json();

    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mongodb=warn,tower_http=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C.");
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
                error!(error = %e, "Failed to listen for SIGTERM.");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received, draining connections.");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    // --- Server Config Setup ---
    let mut server_config = match ServerConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load server configuration: {e}");
            return Err(e.into());
        }
    };
    if let Some(bind) = args.bind {
        server_config.bind_address = bind;
    }

    init_logging(&server_config.log_dir);
    info!("Starting connector monitor API, version: {}", VERSION);

    // --- Document Store Setup ---
    let store: Arc<dyn DocumentStore> = if args.in_memory {
        warn!("Running with the in-memory store; documents are lost on exit.");
        Arc::new(MemoryStore::new())
    } else {
        let uri = server_config.connection_uri().inspect_err(|e| {
            error!(error = %e, "CosmosDB credentials are incomplete.");
        })?;
        let store = MongoStore::connect(&uri, &server_config.database_name).await?;
        if let Err(e) = store.ping().await {
            error!(error = %e, "Failed to connect to Cosmos DB.");
            return Err(e.into());
        }
        info!(database = %server_config.database_name, "Connected to Cosmos DB.");
        if let Err(e) = store.ensure_indexes().await {
            warn!(error = %e, "Failed to create indexes; sorted queries may be rejected.");
        }
        Arc::new(store)
    };

    // --- Axum HTTP Server Setup ---
    let app = create_axum_router(store, &server_config);

    let addr = server_config.bind_address;
    let socket = if addr.is_ipv4() {
        tokio::net::TcpSocket::new_v4()?
    } else {
        tokio::net::TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket.set_keepalive(true)?;
    socket.bind(addr)?;
    let listener = socket.listen(1024)?;
    info!(address = %addr, "HTTP server listening with TCP Keepalive");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped.");
    Ok(())
}
