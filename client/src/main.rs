//! Meetly Client - command-line frontend for the event API.
//!
//! # Commands
//!
//! - `meetly login`: Sign in and obtain a backend session cookie
//! - `meetly whoami`: Show the identity behind a fresh session
//! - `meetly logout`: End the backend session
//! - `meetly create-event`: Submit a new event
//!
//! # Environment Variables
//!
//! See the [`meetly_client::config`] module for available configuration
//! options.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use meetly_client::api::ApiClient;
use meetly_client::config::Config;
use meetly_client::error::ClientError;
use meetly_client::flow::{self, LoginForm};
use meetly_client::form::{Category, EventForm};
use meetly_client::identity::{IdentityClient, IdentityError};

/// Meetly Client - command-line frontend for the event API.
///
/// Signs in against the configured identity provider, holds the backend
/// session cookie for the duration of the command, and submits events.
#[derive(Parser, Debug)]
#[command(name = "meetly")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
ENVIRONMENT VARIABLES:
    MEETLY_API_URL      Backend base URL (default: http://localhost:5000)
    MEETLY_IDP_URL      Identity provider base URL (required for login)
    MEETLY_IDP_API_KEY  Identity provider public API key (required for login)

EXAMPLES:
    # Sign in with email and password
    meetly login --email ada@example.com --password hunter2

    # Sign in with a federated ID token
    meetly login --email ada@example.com --provider google --id-token <token>

    # Create an event
    meetly create-event --name 'Tech Meetup' --date 2025-06-01 \\
        --time 18:00 --location 'Hall A'
")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and obtain a backend session cookie.
    ///
    /// Authenticates against the identity provider (password or federated
    /// ID token) and then requests a session from the backend.
    Login {
        /// Email address to sign in with.
        #[arg(short, long)]
        email: String,

        /// Password for the password flow.
        #[arg(short, long)]
        password: Option<String>,

        /// Federated provider name (e.g. google) for the ID-token flow.
        #[arg(long)]
        provider: Option<String>,

        /// Provider-issued ID token for the federated flow.
        #[arg(long)]
        id_token: Option<String>,
    },

    /// Show the identity behind a fresh session.
    ///
    /// Requests a session cookie for the given email and echoes what the
    /// protected endpoint reports back.
    Whoami {
        /// Email address to request the session for.
        #[arg(short, long)]
        email: String,
    },

    /// End the backend session.
    Logout,

    /// Submit a new event.
    CreateEvent {
        /// Event name.
        #[arg(short, long)]
        name: String,

        /// Calendar date (YYYY-MM-DD).
        #[arg(short, long)]
        date: String,

        /// Time of day (HH:MM).
        #[arg(short, long)]
        time: String,

        /// Venue.
        #[arg(short, long)]
        location: String,

        /// Longer description.
        #[arg(long, default_value = "")]
        description: String,

        /// Attendee cap; omit for no cap.
        #[arg(long)]
        max_attendees: Option<u32>,

        /// Event category.
        #[arg(long, value_enum, default_value_t = Category::Social)]
        category: Category,

        /// Whether the event is publicly visible.
        #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
        public: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = Config::from_env();
    let api = ApiClient::new(&config.api_url).context("failed to create backend client")?;

    match cli.command {
        Command::Login {
            email,
            password,
            provider,
            id_token,
        } => login(&config, &api, email, password, provider, id_token).await,
        Command::Whoami { email } => whoami(&api, &email).await,
        Command::Logout => logout(&api).await,
        Command::CreateEvent {
            name,
            date,
            time,
            location,
            description,
            max_attendees,
            category,
            public,
        } => {
            let form = EventForm {
                event_name: name,
                description,
                date,
                time,
                location,
                max_attendees: max_attendees.map(|n| n.to_string()).unwrap_or_default(),
                category,
                is_public: public,
            };
            create_event(&api, &form).await
        }
    }
}

async fn login(
    config: &Config,
    api: &ApiClient,
    email: String,
    password: Option<String>,
    provider: Option<String>,
    id_token: Option<String>,
) -> Result<()> {
    let identity = config.identity()?;
    let idp = IdentityClient::new(&identity.url, &identity.api_key)
        .context("failed to create identity provider client")?;

    let result = match (password, provider, id_token) {
        (Some(password), None, None) => {
            let mut form = LoginForm::new(email, password);
            form.sign_in(&idp, api).await
        }
        (None, Some(provider), Some(id_token)) => {
            flow::sign_in_with_provider(&idp, api, &provider, &id_token).await
        }
        _ => bail!("provide either --password, or --provider together with --id-token"),
    };

    match result {
        Ok(session) => {
            let email = session.user.email.as_deref().unwrap_or("<no email>");
            println!("Signed in as {email}");
            Ok(())
        }
        Err(ClientError::Identity(IdentityError::InvalidCredentials)) => {
            // Matches the login page's toast.
            eprintln!("Invalid Credentials");
            std::process::exit(1);
        }
        Err(err) => Err(err.into()),
    }
}

async fn whoami(api: &ApiClient, email: &str) -> Result<()> {
    // Each invocation starts with an empty cookie store, so obtain a fresh
    // session before hitting the protected endpoint.
    api.request_token(email).await?;
    let identity = api.whoami().await?;
    println!("{}", identity.email);
    Ok(())
}

async fn logout(api: &ApiClient) -> Result<()> {
    api.logout().await?;
    println!("Logged out");
    Ok(())
}

async fn create_event(api: &ApiClient, form: &EventForm) -> Result<()> {
    let created = form.submit(api).await?;
    println!("{} (id: {})", created.message, created.event_id);
    Ok(())
}

/// Initialize logging with an environment-driven filter.
///
/// Defaults to `warn` so command output stays clean; set `RUST_LOG` for
/// more detail.
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}
