// main.rs - Portfolio server entry point
use clap::Parser;
use std::path::Path;
use std::sync::Arc;

use portfolio::{
    auth::{AuthDatabase, AuthState, SessionConfig},
    content::ContentDatabase,
    db::SharedConnection,
    logging,
    servers::{AppState, WebConfig, WebServer},
};

#[derive(Parser, Debug)]
#[command(name = "portfolio", version, about)]
struct Config {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// HTTP port
    #[arg(short = 'p', long, default_value_t = 3000)]
    port: u16,

    /// Path to the SQLite database (accounts + content)
    #[arg(long, default_value = "data/portfolio.db")]
    db_path: String,

    /// Write rotating log files here instead of stderr
    #[arg(long)]
    log_dir: Option<String>,

    /// Directory served under /static
    #[arg(long, default_value = "public")]
    static_dir: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();

    let _logger = logging::setup_logging(config.log_dir.as_deref())?;

    // The signing secret is mandatory: stop here rather than serve unsigned sessions.
    let session_config = match SessionConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            log::error!("❌ {}", e);
            std::process::exit(1);
        }
    };
    log::info!(
        "🔐 Sessions valid for {} days",
        session_config.lifetime().num_days()
    );

    // Ensure data directory exists
    if let Some(parent) = Path::new(&config.db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Accounts and content share one SQLite file and connection.
    let conn = SharedConnection::open(&config.db_path)?;
    let auth_db = AuthDatabase::with_connection(conn.clone())?;
    let content_db = ContentDatabase::with_connection(conn)?;
    log::info!("🗄️ Database opened at {}", config.db_path);

    let state = AppState {
        auth: Arc::new(AuthState::with_system_clock(auth_db, &session_config)),
        content: content_db,
    };

    let web_config = WebConfig {
        port: config.port,
        host: config.host,
        static_dir: config.static_dir,
    };

    WebServer::new(web_config, state).start().await
}
