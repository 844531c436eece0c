//! `medportal` command-line shell over the session core.
//!
//! Every invocation is one "page load": the cached session is restored from
//! the state file, the command runs, and any change is persisted for the
//! next invocation. Results go to stdout; prompts and logs go to stderr.


use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use medportal::gateway::http::HttpGateway;
use medportal::guard::{self, GuardDecision};
use medportal::role::{self, Role};
use medportal::{
    ConfigError, Credentials, FileStorage, GatewayError, PortalConfig, Session, SessionError, SessionStore, SignupFlow,
    SignupRequest, SignupStep, UserProfile,
};

type Store = SessionStore<FileStorage, HttpGateway>;

/// Typed at the OTP prompt to request a new code.
const RESEND_KEYWORD: &str = "resend";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Gateway(#[from] GatewayError),
    #[error("{}", .0.user_message())]
    Session(#[from] SessionError),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("aborted")]
    Aborted,
    #[error("not signed in; run `medportal login` first")]
    NotSignedIn,
}

#[derive(Parser, Debug)]
#[command(name = "medportal", about = "MedPortal session CLI")]
struct Cli {
    /// Overrides `MEDPORTAL_API_BASE_URL`.
    #[arg(long, global = true)]
    api_base_url: Option<String>,

    /// Overrides `MEDPORTAL_STATE_FILE`.
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in with email and password.
    Login {
        #[arg(long)]
        email: String,
        /// Prompted for when omitted.
        #[arg(long, env = "MEDPORTAL_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Create an account, verifying the email with a one-time code.
    Signup {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "MEDPORTAL_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Show the current user, revalidating the cached token first.
    Whoami,
    /// Re-fetch the profile for the cached token.
    Refresh,
    /// Forget the cached session.
    Logout,
    /// Show what the route guard decides for a path.
    Route {
        path: String,
        /// Role required by the route; inferred from the path when omitted.
        #[arg(long)]
        role: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("ignoring unreadable .env: {e}");
        }
    }
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(&cli)?;
    tracing::debug!(api = %config.api_base_url, state = %config.state_file.display(), "config loaded");
    let store = SessionStore::new(FileStorage::new(&config.state_file), HttpGateway::new(&config)?);

    match cli.command {
        Command::Login { email, password } => login(&store, email, password).await,
        Command::Signup { first_name, last_name, email, password } => {
            let password = password_or_prompt(password)?;
            let request = SignupRequest { first_name, last_name, email, password };
            signup(&store, request, &mut io::stdin().lock()).await
        }
        Command::Whoami => whoami(&store).await,
        Command::Refresh => refresh(&store).await,
        Command::Logout => {
            store.restore();
            store.logout()?;
            println!("signed out");
            Ok(())
        }
        Command::Route { path, role } => route(&store, &path, role.as_deref()).await,
    }
}

fn load_config(cli: &Cli) -> Result<PortalConfig, CliError> {
    let mut config = PortalConfig::from_env()?;
    if let Some(url) = &cli.api_base_url {
        config.api_base_url = PortalConfig::new(url)?.api_base_url;
    }
    if let Some(path) = &cli.state_file {
        config.state_file.clone_from(path);
    }
    Ok(config)
}

// =============================================================================
// COMMANDS
// =============================================================================

async fn login(store: &Store, email: String, password: Option<String>) -> Result<(), CliError> {
    store.restore();
    let password = password_or_prompt(password)?;
    let user = store.login(&Credentials::new(email, password)).await?;
    println!("{}", describe_user(&user));
    Ok(())
}

async fn signup<R: BufRead>(store: &Store, request: SignupRequest, input: &mut R) -> Result<(), CliError> {
    store.restore();
    let mut flow = SignupFlow::new();
    flow.submit_details(store.gateway(), request).await?;

    while matches!(flow.step(), SignupStep::AwaitingVerification { .. }) {
        if let Some(message) = flow.message() {
            eprintln!("{message}");
        }
        let line = prompt(input, &format!("code (or `{RESEND_KEYWORD}`)"))?;
        if line.is_empty() {
            return Err(CliError::Aborted);
        }
        let result = if line.eq_ignore_ascii_case(RESEND_KEYWORD) {
            flow.resend_otp(store.gateway()).await.map(|()| None)
        } else {
            flow.verify(store, &line).await.map(Some)
        };
        match result {
            Ok(Some(user)) => println!("{}", describe_user(&user)),
            Ok(None) => {}
            Err(e) => tracing::debug!(error = %e, "sign-up step failed"),
        }
    }
    Ok(())
}

async fn whoami(store: &Store) -> Result<(), CliError> {
    let session = store.restore_and_revalidate().await;
    let user = session.user.as_ref().ok_or(CliError::NotSignedIn)?;
    println!("{}", describe_user(user));
    Ok(())
}

async fn refresh(store: &Store) -> Result<(), CliError> {
    if store.restore().is_none() {
        return Err(CliError::NotSignedIn);
    }
    let user = store.refresh().await?;
    println!("{}", describe_user(&user));
    Ok(())
}

async fn route(store: &Store, path: &str, role: Option<&str>) -> Result<(), CliError> {
    let session = store.restore_and_revalidate().await;
    let required = role.and_then(Role::parse).or_else(|| role::required_role_for(path));
    println!("{}", describe_decision(&session, required, path));
    Ok(())
}

// =============================================================================
// OUTPUT
// =============================================================================

fn describe_user(user: &UserProfile) -> String {
    let role = user.role().map_or("unknown", Role::label);
    format!(
        "{} <{}>\nrole: {role} ({})\nhome: {}",
        user.display_name(),
        user.email,
        user.role,
        role::dashboard_path(Some(&user.role)),
    )
}

fn describe_decision(session: &Session, required: Option<Role>, path: &str) -> String {
    let decision = guard::evaluate(session, required, path);
    let required = required.map_or("any signed-in user", Role::label);
    match &decision {
        GuardDecision::Allowed | GuardDecision::Loading => format!("{} {path} (requires {required})", decision.label()),
        GuardDecision::Unauthenticated { redirect } | GuardDecision::Unauthorized { redirect } => {
            format!("{} {path} (requires {required}) -> {redirect}", decision.label())
        }
    }
}

// =============================================================================
// PROMPTS
// =============================================================================

fn password_or_prompt(password: Option<String>) -> Result<String, CliError> {
    match password {
        Some(password) => Ok(password),
        None => prompt(&mut io::stdin().lock(), "password"),
    }
}

fn prompt<R: BufRead>(input: &mut R, label: &str) -> Result<String, CliError> {
    let mut stderr = io::stderr();
    write!(stderr, "{label}: ")?;
    stderr.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(CliError::Aborted);
    }
    Ok(line.trim().to_owned())
}
