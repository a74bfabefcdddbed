/// Setlist Server - Multi-user playlist service
use anyhow::Context;
use clap::{Parser, Subcommand};
use setlist_server::{config::ServerConfig, create_router, services::AuthService, state::AppState};
use setlist_storage::Database;
use sqlx::SqlitePool;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "setlist-server")]
#[command(about = "Setlist multi-user playlist server", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./config.toml if present)
    #[arg(short, long, global = true, env = "SETLIST_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a new user
    AddUser {
        /// Username
        #[arg(short, long)]
        username: String,
        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// List all users
    ListUsers,
    /// Apply pending migrations, or revert to an older schema version
    Migrate {
        /// Revert every migration newer than this version (0 reverts all)
        #[arg(long)]
        revert_to: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "setlist_server=info,setlist_storage=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load_from(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve => serve(config).await?,
        Commands::AddUser { username, password } => add_user(&config, &username, &password).await?,
        Commands::ListUsers => list_users(&config).await?,
        Commands::Migrate { revert_to } => migrate(&config, revert_to).await?,
    }

    Ok(())
}

async fn open_pool(config: &ServerConfig) -> anyhow::Result<SqlitePool> {
    let pool = setlist_storage::create_pool_with(
        &config.storage.database_url,
        config.storage.max_connections,
        config.storage.busy_timeout(),
    )
    .await
    .with_context(|| format!("Failed to open {}", config.storage.database_url))?;
    Ok(pool)
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting Setlist Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    // Initialize database
    let pool = open_pool(&config).await?;
    setlist_storage::run_migrations(&pool).await?;
    let db = Arc::new(Database::from_pool(pool));
    tracing::info!("Database connected");

    let auth_service = Arc::new(AuthService::new(
        &config.auth.jwt_secret,
        config.auth.jwt_expiration_hours,
    ));

    let app = create_router(AppState::new(db, auth_service));

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

async fn add_user(config: &ServerConfig, username: &str, password: &str) -> anyhow::Result<()> {
    let pool = open_pool(config).await?;
    setlist_storage::run_migrations(&pool).await?;

    let password_hash = AuthService::hash_password(password)?;
    let user = setlist_storage::users::create(&pool, username, Some(&password_hash)).await?;

    tracing::info!(user_id = %user.id, "Created user {}", user.name);
    println!("Created user {} ({})", user.name, user.id);

    Ok(())
}

async fn list_users(config: &ServerConfig) -> anyhow::Result<()> {
    let pool = open_pool(config).await?;
    setlist_storage::run_migrations(&pool).await?;

    let users = setlist_storage::users::get_all(&pool).await?;

    println!("Users:");
    for user in users {
        println!("  {} - {}", user.id, user.name);
    }

    Ok(())
}

async fn migrate(config: &ServerConfig, revert_to: Option<i64>) -> anyhow::Result<()> {
    let pool = open_pool(config).await?;

    match revert_to {
        Some(version) => {
            setlist_storage::revert_migrations(&pool, version).await?;
            println!("Reverted migrations newer than {version}");
        }
        None => {
            setlist_storage::run_migrations(&pool).await?;
            println!("Migrations applied");
        }
    }

    Ok(())
}
