use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use storyfeed_api::Client;
use storyfeed_core::constants::DEFAULT_PAGE_SIZE;
use storyfeed_core::env_config::env_string_with_default;
use storyfeed_service::{SessionService, StoryService};
use storyfeed_store::Store;

mod commands;

#[derive(Parser)]
#[command(name = "storyfeed")]
#[command(about = "Story-sharing client with an offline page cache", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and persist the session
    Login {
        email: String,
        password: String,
    },
    /// Create a new account
    Register {
        name: String,
        email: String,
        password: String,
    },
    /// Drop the session and clear the local story cache
    Logout,
    /// Page through stories, cached locally and refreshed from the service
    Stories {
        /// How many windows to walk before stopping
        #[arg(short, long, default_value = "3")]
        pages: u32,
        #[arg(short = 's', long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: u32,
    },
    /// Upload a new story with an optional geotag
    Upload {
        #[arg(short = 'f', long)]
        photo: PathBuf,
        #[arg(short, long)]
        description: String,
        #[arg(long, requires = "lon")]
        lat: Option<f64>,
        #[arg(long, requires = "lat")]
        lon: Option<f64>,
    },
    /// List geotagged stories for map display
    Map,
    /// Show the logged-in user
    Whoami,
    /// Show local cache statistics
    Stats,
}

fn get_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("storyfeed")
        .join("stories.db")
}

fn get_base_url() -> String {
    env_string_with_default("STORYFEED_API_URL", "https://story-api.dicoding.dev/v1")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    let db_path = get_db_path();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let store = Store::open(&db_path)?;
    let base_url = get_base_url();
    let sessions = SessionService::new(store.clone(), Client::new(base_url.as_str())?);
    let stories = StoryService::new(store.clone(), base_url);

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&sessions, &email, &password).await?;
        },
        Commands::Register { name, email, password } => {
            commands::auth::register(&sessions, &name, &email, &password).await?;
        },
        Commands::Logout => {
            commands::auth::logout(&sessions).await?;
        },
        Commands::Stories { pages, page_size } => {
            commands::stories::run(&sessions, &stories, pages, page_size).await?;
        },
        Commands::Upload { photo, description, lat, lon } => {
            commands::upload::run(&sessions, &stories, photo, description, lat, lon).await?;
        },
        Commands::Map => {
            commands::map::run(&sessions, &stories).await?;
        },
        Commands::Whoami => {
            match sessions.session().await? {
                Some(session) => println!("{} <{}>", session.name, session.email),
                None => println!("not logged in"),
            }
        },
        Commands::Stats => {
            let stats = store.stats().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        },
    }

    Ok(())
}
