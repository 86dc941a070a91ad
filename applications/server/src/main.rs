/// Tempo Server - social music discovery API
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tempo_core::types::CreateUser;
use tempo_server::{api, config::ServerConfig, services::AuthService, state::AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tempo-server")]
#[command(about = "Tempo social music discovery server", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "TEMPO_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a new user with a password
    AddUser {
        /// Username
        #[arg(short, long)]
        username: String,
        /// Password
        #[arg(short, long)]
        password: String,
        /// Email address
        #[arg(short, long)]
        email: Option<String>,
        /// Display name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// List all users
    ListUsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tempo_server=info,tempo_storage=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve => serve(config).await?,
        Commands::AddUser {
            username,
            password,
            email,
            name,
        } => add_user(&config, username, &password, email, name).await?,
        Commands::ListUsers => list_users(&config).await?,
    }

    Ok(())
}

fn auth_service(config: &ServerConfig) -> AuthService {
    AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
        config.auth.jwt_refresh_expiration_days,
    )
}

async fn open_database(config: &ServerConfig) -> anyhow::Result<sqlx::SqlitePool> {
    let pool = tempo_storage::create_pool(&config.storage.database_url).await?;
    tempo_storage::run_migrations(&pool).await?;
    Ok(pool)
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!(host = %config.server.host, port = config.server.port, "starting tempo server");

    let pool = open_database(&config).await?;
    tracing::info!("database ready");

    let app_state = AppState::new(pool, Arc::new(auth_service(&config)))
        .with_limits(config.discovery, config.listening);

    let app = api::router(app_state);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn add_user(
    config: &ServerConfig,
    username: String,
    password: &str,
    email: Option<String>,
    name: Option<String>,
) -> anyhow::Result<()> {
    config.validate()?;
    let pool = open_database(config).await?;

    let user = tempo_storage::users::create(
        &pool,
        CreateUser {
            username: Some(username),
            name,
            email,
        },
    )
    .await?;

    let password_hash = auth_service(config).hash_password(password)?;
    tempo_storage::users::set_password_hash(&pool, user.id, &password_hash).await?;

    println!("Created user {} ({})", user.username, user.id);

    Ok(())
}

async fn list_users(config: &ServerConfig) -> anyhow::Result<()> {
    let pool = open_database(config).await?;
    let users = tempo_storage::users::get_all(&pool).await?;

    println!("Users:");
    for user in users {
        println!("  {} - {} ({})", user.id, user.username, user.display_name());
    }

    Ok(())
}
