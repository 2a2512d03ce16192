/**
 * Folio Session CLI
 *
 * Drives the session client from a terminal: sign up, log in, inspect and
 * end the session persisted on this machine.
 */

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use folio::session::{Config, FileStore, HttpAdminCheck, SessionManager};
use folio::shared::AppConfig;

#[derive(Parser)]
#[command(name = "folio-session")]
#[command(version, about = "Manage the Folio session stored on this machine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Auth API base URL
    #[arg(long, env = "FOLIO_API_URL")]
    api_url: Option<String>,

    /// Session file (defaults to the platform data directory)
    #[arg(long, value_name = "PATH")]
    store: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and store its session
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "FOLIO_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "FOLIO_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Clear the stored session
    Logout,
    /// Show the stored user
    Whoami,
    /// Check the stored token against the server
    Verify,
    /// Re-read admin/owner flags from the server
    RefreshAdmin,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match cli.api_url {
        Some(url) => Config::with_builder(AppConfig::builder().server_url(url))?,
        None => Config::new(),
    };
    let store = match cli.store {
        Some(path) => FileStore::new(path),
        None => FileStore::open_default(),
    };
    tracing::debug!("Using session file {}", store.path().display());

    let manager = SessionManager::new(config.clone(), store)
        .with_admin_check(Arc::new(HttpAdminCheck::new(config)));

    match cli.command {
        Commands::Signup { name, email, password } => {
            let session = manager.signup(&name, &email, &password).await?;
            if session.is_authenticated() {
                println!("Account created; logged in as {email}");
            } else {
                println!("Account created for {email}; check your inbox to confirm it");
            }
        }
        Commands::Login { email, password } => {
            manager.login(&email, &password).await?;
            println!("Logged in as {email}");
        }
        Commands::Logout => {
            manager.logout().await;
            println!("Logged out");
        }
        Commands::Whoami => match manager.session() {
            session if session.is_authenticated() => {
                if let Some(user) = session.user {
                    println!("{}", serde_json::to_string_pretty(&user)?);
                }
            }
            _ => println!("Not logged in"),
        },
        Commands::Verify => match manager.token() {
            Some(token) => {
                let outcome = manager.verify_token(&token).await;
                println!("{}", if outcome.valid { "Token is valid" } else { "Token is not valid" });
            }
            None => println!("Not logged in"),
        },
        Commands::RefreshAdmin => {
            manager.refresh_admin_status().await;
            match manager.user() {
                Some(user) => println!("admin: {}, owner: {}", user.is_admin, user.is_owner),
                None => println!("Not logged in"),
            }
        }
    }

    Ok(())
}
