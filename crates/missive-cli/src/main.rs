//! # missive
//!
//! Command-line front end for the messenger core:
//! - **ingest / send** write inbound and outbound messages to the local ledger
//! - **show / list** render conversations through the merge pipeline
//! - **merge** runs the merge over provider rows dumped as JSON
//! - **avatar** composes a group icon from image files

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use missive_client::{fetch_complete_conversation, merge_rows, ClientConfig, NoContacts};
use missive_media::{clip_to_round_rect, compose_avatar, load_image, save_image};
use missive_shared::constants::APP_NAME;
use missive_shared::ProviderRow;
use missive_store::{Database, IncomingMessage};

#[derive(Parser)]
#[command(name = "missive")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Ledger database (overrides MISSIVE_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record an inbound message, collapsing duplicates
    Ingest {
        address: String,
        body: String,
        /// Sender timestamp, epoch millis
        #[arg(long)]
        date_sent: i64,
        /// Contact reference of the sender
        #[arg(long)]
        person: Option<String>,
    },

    /// Record an outbound message
    Send {
        address: String,
        body: String,
        /// Epoch millis; defaults to now
        #[arg(long)]
        date: Option<i64>,
    },

    /// Remove every message from an address and unmute it
    Detach { address: String },

    /// Show one conversation
    Show {
        address: String,
        /// Mark the conversation read afterwards
        #[arg(long)]
        mark_read: bool,
    },

    /// List conversations, most recent first
    List,

    /// List inbound messages not yet surfaced
    Unseen {
        #[arg(long, default_value_t = 10)]
        limit: u32,
        /// Mark the listed messages seen
        #[arg(long)]
        mark: bool,
    },

    /// Merge ledgers dumped as JSON arrays of provider rows
    Merge {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Defaults to the configured conversation limit
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Mute or unmute a conversation
    Mute {
        conversation_id: String,
        #[arg(long)]
        off: bool,
    },

    /// Compose a conversation icon from image files
    Avatar {
        /// Output image; format follows the extension
        #[arg(long, short)]
        out: PathBuf,
        /// Clip a single image instead of composing
        #[arg(long)]
        clip: bool,
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,missive_cli=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting {} v{}", APP_NAME, env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let cli = Cli::parse();
    let mut config = ClientConfig::from_env();
    if cli.db.is_some() {
        config.db_path = cli.db.clone();
    }
    tracing::debug!(?config, "Loaded configuration");

    // -----------------------------------------------------------------------
    // 3. Dispatch
    // -----------------------------------------------------------------------
    match cli.command {
        Commands::Ingest {
            address,
            body,
            date_sent,
            person,
        } => {
            let db = open_database(&config)?;
            let incoming = IncomingMessage {
                address,
                body,
                date_sent,
                person_id: person,
            };
            let outcome = db.upsert_message(&incoming)?;
            info!(?outcome, "ingested message");
            println!("{outcome:?}");
        }

        Commands::Send {
            address,
            body,
            date,
        } => {
            let db = open_database(&config)?;
            let date = date.unwrap_or_else(|| chrono::Utc::now().timestamp_millis());
            let id = db.insert_sent_message(&address, &body, date)?;
            println!("sent #{id}");
        }

        Commands::Detach { address } => {
            let db = open_database(&config)?;
            let removed = db.forget_conversation(&address)?;
            println!("removed {removed} message(s) from {address}");
        }

        Commands::Show { address, mark_read } => {
            let db = open_database(&config)?;
            let conversation = fetch_complete_conversation(
                &address,
                &db,
                &NoContacts,
                |id| db.is_conversation_muted(id).unwrap_or(false),
                &config,
            );

            let muted = if conversation.is_muted() { " [muted]" } else { "" };
            println!(
                "{} ({} unread){muted}",
                conversation.title(),
                conversation.unread_count_label()
            );
            for message in conversation.messages() {
                let marker = if message.is_sent() {
                    ">"
                } else if message.is_unread() {
                    "*"
                } else {
                    " "
                };
                println!(
                    "{marker} {} {}: {}",
                    format_timestamp(message.timestamp_millis),
                    message.sender.display_name,
                    message.text
                );
            }

            if mark_read {
                db.mark_conversation_read(&address)?;
            }
        }

        Commands::List => {
            let db = open_database(&config)?;
            let muted = db.muted_conversations()?;
            for address in db.addresses()? {
                let preview = db
                    .latest_message(&address)?
                    .map(|m| (m.date, m.body))
                    .unwrap_or_default();
                let flag = if muted.contains(&address) { "muted" } else { "" };
                println!(
                    "{address}\t{}\t{flag}\t{}",
                    format_timestamp(preview.0),
                    preview.1
                );
            }
        }

        Commands::Unseen { limit, mark } => {
            let db = open_database(&config)?;
            for record in db.latest_unseen(limit)? {
                println!(
                    "#{} {} {}: {}",
                    record.id,
                    format_timestamp(record.date),
                    record.address,
                    record.body
                );
                if mark {
                    db.mark_message_seen(record.id)?;
                }
            }
        }

        Commands::Merge { files, limit } => {
            let mut ledgers = Vec::with_capacity(files.len());
            for path in &files {
                let data = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                let rows: Vec<ProviderRow> = serde_json::from_str(&data)
                    .with_context(|| format!("parsing {}", path.display()))?;
                ledgers.push(rows);
            }

            let limit = limit.unwrap_or(config.conversation_size_limit);
            let result = merge_rows(&ledgers, limit, &NoContacts);
            info!(
                messages = result.messages.len(),
                unread = result.unread_prefix_count,
                has_reply = result.has_reply,
                "merged ledgers"
            );
            println!("{}", serde_json::to_string_pretty(&result.messages)?);
        }

        Commands::Mute {
            conversation_id,
            off,
        } => {
            let db = open_database(&config)?;
            db.set_conversation_muted(&conversation_id, !off)?;
        }

        Commands::Avatar { out, clip, images } => {
            let mut loaded = Vec::with_capacity(images.len());
            for path in &images {
                loaded.push(
                    load_image(path).with_context(|| format!("loading {}", path.display()))?,
                );
            }

            let icon = if clip {
                let [single] = loaded.as_slice() else {
                    bail!("--clip takes exactly one image");
                };
                clip_to_round_rect(single, config.avatar.corner_radius)
            } else {
                match compose_avatar(&loaded, &config.avatar) {
                    Some(icon) => icon,
                    None => bail!("no images to compose"),
                }
            };

            save_image(&icon, &out).with_context(|| format!("writing {}", out.display()))?;
            info!(path = %out.display(), "wrote avatar");
        }
    }

    Ok(())
}

fn open_database(config: &ClientConfig) -> Result<Database> {
    let db = match &config.db_path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            Database::open_at(path)?
        }
        None => Database::new()?,
    };
    Ok(db)
}

fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| millis.to_string())
}
