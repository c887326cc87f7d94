//! `roster`: command-line client for the Roster people directory.
//!
//! # Usage
//!
//! ```text
//! roster --url http://localhost:8080 list
//! roster search jo
//! roster add --first-name Ada --last-name Lovelace \
//!   --email ada@example.com --address "12 St James's Square"
//! roster --config ~/.config/roster/config.toml delete 3
//! ```

mod client;

use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use client::{ApiClient, Rejected};
use roster_core::person::{NewPerson, PersonId, UpdatePerson};
use serde::{Deserialize, Serialize};

const DEFAULT_URL: &str = "http://localhost:8080";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "roster", about = "Command-line client for the Roster people directory")]
struct Cli {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the roster server (default: http://localhost:8080).
  #[arg(long, env = "ROSTER_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List every person.
  List,
  /// Show one person.
  Get { id: PersonId },
  /// Case-insensitive search over first and last names.
  Search {
    #[arg(default_value = "")]
    term: String,
  },
  /// Create a person and print the assigned id.
  Add(PersonArgs),
  /// Replace every field of an existing person.
  Update {
    id: PersonId,
    #[command(flatten)]
    person: PersonArgs,
  },
  /// Delete a person.
  Delete { id: PersonId },
}

#[derive(Args, Debug)]
struct PersonArgs {
  #[arg(long)]
  first_name:    String,
  #[arg(long)]
  last_name:     String,
  #[arg(long)]
  middle_name:   Option<String>,
  #[arg(long)]
  email:         String,
  #[arg(long)]
  address:       String,
  /// RFC 3339 timestamp, e.g. 1990-05-17T00:00:00Z.
  #[arg(long)]
  date_of_birth: Option<DateTime<Utc>>,
}

impl From<PersonArgs> for NewPerson {
  fn from(a: PersonArgs) -> Self {
    NewPerson {
      first_name:    a.first_name,
      last_name:     a.last_name,
      middle_name:   a.middle_name,
      email:         a.email,
      address:       a.address,
      date_of_birth: a.date_of_birth,
    }
  }
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

/// CLI flag, then config file, then the default.
fn resolve_url(flag: Option<String>, file: &ConfigFile) -> String {
  flag
    .or_else(|| (!file.url.is_empty()).then(|| file.url.clone()))
    .unwrap_or_else(|| DEFAULT_URL.to_string())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<ExitCode> {
  let cli = Cli::parse();

  match run(cli).await {
    Ok(()) => Ok(ExitCode::SUCCESS),
    Err(e) => match e.downcast_ref::<Rejected>() {
      Some(Rejected(report)) => {
        for failure in report.failures() {
          eprintln!("{}: {}", failure.field, failure.message);
        }
        Ok(ExitCode::from(2))
      }
      None => Err(e),
    },
  }
}

async fn run(cli: Cli) -> Result<()> {
  let file_cfg: ConfigFile = if let Some(path) = &cli.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  let client = ApiClient::new(resolve_url(cli.url, &file_cfg))?;

  match cli.command {
    Command::List => print_json(&client.list().await?),
    Command::Get { id } => match client.get(id).await? {
      Some(person) => print_json(&person),
      None => anyhow::bail!("person {id} not found"),
    },
    Command::Search { term } => print_json(&client.search(&term).await?),
    Command::Add(person) => {
      let id = client.create(&NewPerson::from(person)).await?;
      print_json(&serde_json::json!({ "id": id }))
    }
    Command::Update { id, person } => {
      client
        .update(&UpdatePerson { id, details: NewPerson::from(person) })
        .await
    }
    Command::Delete { id } => print_json(&client.delete(id).await?),
  }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}
