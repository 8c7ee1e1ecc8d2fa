use anyhow::{Context, Result};
use clap::Parser;
use netplate::credentials::{FileSecretStore, REFRESH_TOKEN_KEY, SecretStore};
use netplate::person::{PersonDto, PersonRepository};
use netplate::{Client, ClientConfig};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// netplate - authenticated REST client
///
/// Talks to a persons API, refreshing the access token from the stored
/// refresh token whenever the server answers 401.
///
/// Examples:
///   netplate token set <REFRESH_TOKEN>
///   netplate persons list
///   netplate persons create --first-name Ada --last-name Lovelace --age 36
#[derive(Parser, Debug)]
#[command(author, version = env!("NETPLATE_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API base URL (defaults to http://127.0.0.1:8080)
    #[arg(
        long = "base-url",
        env = "NETPLATE_BASE_URL",
        value_name = "URL",
        global = true
    )]
    base_url: Option<String>,

    /// Secrets file holding the refresh token (also via NETPLATE_SECRETS)
    #[arg(
        long = "secrets",
        env = "NETPLATE_SECRETS",
        value_name = "PATH",
        global = true
    )]
    secrets: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Manage people on the server
    #[command(subcommand)]
    Persons(PersonsCommand),

    /// Manage the stored refresh token
    #[command(subcommand)]
    Token(TokenCommand),
}

#[derive(clap::Subcommand, Debug)]
enum PersonsCommand {
    /// List all people
    List,
    /// Show one person
    Get { id: i64 },
    /// Create a person
    Create(PersonArgs),
    /// Replace a person's details
    Update {
        id: i64,
        #[command(flatten)]
        person: PersonArgs,
    },
    /// Delete a person
    Delete { id: i64 },
    /// Give a person admin rights
    GrantAdmin { id: i64 },
}

#[derive(clap::Args, Debug)]
struct PersonArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    age: i64,
}

impl From<PersonArgs> for PersonDto {
    fn from(args: PersonArgs) -> Self {
        PersonDto::new(&args.first_name, &args.last_name, args.age)
    }
}

#[derive(clap::Subcommand, Debug)]
enum TokenCommand {
    /// Store a refresh token
    Set { refresh_token: String },
    /// Forget the stored refresh token
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let secrets_path = match cli.secrets {
        Some(path) => path,
        None => FileSecretStore::default_path()?,
    };
    let secrets = Arc::new(FileSecretStore::new(secrets_path));

    match cli.command {
        Commands::Token(command) => run_token(command, secrets.as_ref()),
        Commands::Persons(command) => {
            let config = match cli.base_url {
                Some(base_url) => ClientConfig::with_base_url(base_url),
                None => ClientConfig::default(),
            };
            let client = Client::new(config, secrets)?;
            run_persons(command, PersonRepository::new(client.service)).await
        }
    }
}

fn run_token(command: TokenCommand, secrets: &dyn SecretStore) -> Result<()> {
    match command {
        TokenCommand::Set { refresh_token } => secrets
            .set(REFRESH_TOKEN_KEY, &refresh_token)
            .context("Failed to store refresh token"),
        TokenCommand::Clear => secrets
            .set(REFRESH_TOKEN_KEY, "")
            .context("Failed to clear refresh token"),
    }
}

async fn run_persons(command: PersonsCommand, repo: PersonRepository) -> Result<()> {
    match command {
        PersonsCommand::List => print_json(&repo.fetch_persons().await?),
        PersonsCommand::Get { id } => print_json(&repo.fetch_person(id).await?),
        PersonsCommand::Create(args) => print_json(&repo.create_person(args.into()).await?),
        PersonsCommand::Update { id, person } => {
            print_json(&repo.update_person(id, person.into()).await?)
        }
        PersonsCommand::Delete { id } => {
            repo.delete_person(id).await?;
            println!("Deleted person {}", id);
            Ok(())
        }
        PersonsCommand::GrantAdmin { id } => {
            repo.grant_admin(id).await?;
            println!("Granted admin to person {}", id);
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
