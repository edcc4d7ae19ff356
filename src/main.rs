use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use killstreaks::adapters::{FileCredentialStore, JsonFileAchievements, ReqwestHttpClient};
use killstreaks::auth::{LoginResult, LogoutResult, SessionManager, SessionState, ValidationResult};
use killstreaks::config::ClientConfig;
use killstreaks::sync::SyncPipeline;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const USAGE: &str = "\
Usage: killstreaks <command>

Commands:
  login <email>        Sign in (password is read from the terminal)
  logout               Sign out and forget the stored session
  validate             Check the stored session with the server
  status               Show the local session state
  sync <export.json>   Upload medals from an achievement export

Options:
  --version            Print version and exit
  --help               Print this help and exit";

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("killstreaks=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Wire the production adapters from configuration.
fn build_session(config: ClientConfig) -> Result<SessionManager> {
    config.validate().wrap_err("invalid configuration")?;

    let store = match &config.credentials_path {
        Some(path) => FileCredentialStore::open(path.clone()),
        None => FileCredentialStore::open_default(),
    }
    .wrap_err("failed to open credential store")?;

    let http = ReqwestHttpClient::from_config(&config).wrap_err("failed to build HTTP client")?;

    Ok(SessionManager::new(
        Arc::new(http),
        Arc::new(store),
        Arc::new(config),
    ))
}

fn read_password() -> Result<String> {
    print!("Password: ");
    io::stdout().flush().wrap_err("failed to flush stdout")?;
    rpassword::read_password().wrap_err("failed to read password")
}

async fn login(session: &SessionManager, email: &str) -> Result<()> {
    let password = read_password()?;
    match session.login(email, &password).await? {
        LoginResult::LoggedIn(_) => {
            println!("Signed in as {}", email);
            Ok(())
        }
        LoginResult::Unauthorized(body) => Err(eyre!("sign in rejected: {}", body)),
        LoginResult::ConnectionFailed => Err(eyre!("could not reach the leaderboard server")),
    }
}

async fn logout(session: &SessionManager) -> Result<()> {
    match session.logout().await? {
        LogoutResult::LoggedOut => {
            println!("Signed out");
            Ok(())
        }
        LogoutResult::NotFound(body) => Err(eyre!("server did not recognize the session: {}", body)),
        LogoutResult::ConnectionFailed => Err(eyre!("could not reach the leaderboard server")),
    }
}

async fn validate(session: &SessionManager) -> Result<()> {
    match session.validate_token().await? {
        ValidationResult::Refreshed => {
            println!("Session is valid");
            Ok(())
        }
        ValidationResult::Invalidated(_) => Err(eyre!("session expired, please sign in again")),
        ValidationResult::ConnectionFailed => Err(eyre!("could not reach the leaderboard server")),
    }
}

async fn status(session: &SessionManager) -> Result<()> {
    match session.status().await? {
        SessionState::Active { uid } => println!("Signed in as {}", uid),
        SessionState::LoggedOut => println!("Not signed in"),
    }
    Ok(())
}

async fn sync(session: SessionManager, export: PathBuf) -> Result<()> {
    if !session.is_logged_in().await? {
        return Err(eyre!("not signed in"));
    }
    let pipeline = SyncPipeline::new(session, Arc::new(JsonFileAchievements::new(export)));
    let report = pipeline.sync().await.map_err(|e| {
        let message = e.user_message();
        color_eyre::Report::new(e).wrap_err(message)
    })?;
    println!(
        "Uploaded {} medal(s) since {} ({} bytes)",
        report.uploaded,
        report.since.to_rfc3339(),
        report.compressed_bytes
    );
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|arg| arg == "--version") {
        println!("killstreaks {}", VERSION);
        return Ok(());
    }
    if args.is_empty() || args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("{}", USAGE);
        return Ok(());
    }

    color_eyre::install()?;
    init_logging();

    let config = ClientConfig::from_env().wrap_err("invalid environment configuration")?;
    let session = build_session(config)?;
    let runtime = tokio::runtime::Runtime::new()?;

    let outcome = match (args[0].as_str(), args.get(1)) {
        ("login", Some(email)) => runtime.block_on(login(&session, email)),
        ("logout", None) => runtime.block_on(logout(&session)),
        ("validate", None) => runtime.block_on(validate(&session)),
        ("status", None) => runtime.block_on(status(&session)),
        ("sync", Some(export)) => runtime.block_on(sync(session, PathBuf::from(export))),
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    if let Err(e) = outcome {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}
