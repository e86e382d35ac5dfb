// quillnotes - snapshot-persisted notes store
// Entry point and command dispatch

use anyhow::Context;
use clap::{Parser, Subcommand};
use quillnotes::app::App;
use quillnotes::database::{Note, NoteStatus};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "quillnotes", about = "Snapshot-persisted notes store", version)]
struct Cli {
    /// Data directory override (defaults to the platform data dir)
    #[arg(long)]
    data_dir: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a note
    Add {
        content: String,
        #[arg(long, default_value = "default")]
        status: NoteStatus,
    },
    /// List notes in a lifecycle bucket
    List {
        #[arg(long, default_value = "default")]
        status: NoteStatus,
    },
    /// Search note content
    Search {
        term: String,
        #[arg(long)]
        status: Option<NoteStatus>,
    },
    /// Move a note to the archive
    Archive { id: i64 },
    /// Move a note to the deleted bucket
    Trash { id: i64 },
    /// Return a note to where it previously lived
    Restore { id: i64 },
    /// Permanently delete a note (deleted bucket only)
    Delete { id: i64 },
    /// Toggle a note's favorite flag
    Favorite { id: i64 },
    /// List favorite notes
    Favorites,
    /// Read a setting, or write it when a value is given
    Setting { key: String, value: Option<String> },
    /// Show note counts per bucket
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quillnotes=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => dirs::data_dir()
            .context("Could not resolve the platform data directory")?
            .join("quillnotes"),
    };

    let app = App::bootstrap(&data_dir).await?;
    let result = run(&app, cli.command).await;
    app.shutdown().await;

    result
}

async fn run(app: &App, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Add { content, status } => {
            let id = app.notes.create_note(&content, status).await?;
            println!("Created note {}", id);
        }
        Command::List { status } => print_notes(&app.notes.list_notes(status).await?),
        Command::Search { term, status } => print_notes(&app.notes.search(&term, status).await),
        Command::Archive { id } => {
            app.notes.move_to(id, NoteStatus::Archived).await?;
            println!("Note {} archived", id);
        }
        Command::Trash { id } => {
            app.notes.move_to(id, NoteStatus::Deleted).await?;
            println!("Note {} moved to deleted", id);
        }
        Command::Restore { id } => {
            let status = app.notes.restore_note(id).await?;
            println!("Note {} restored to {}", id, status);
        }
        Command::Delete { id } => {
            app.notes.delete_forever(id).await?;
            println!("Note {} permanently deleted", id);
        }
        Command::Favorite { id } => {
            app.notes.toggle_favorite(id).await?;
            println!("Toggled favorite on note {}", id);
        }
        Command::Favorites => print_notes(&app.notes.list_favorites().await?),
        Command::Setting { key, value } => match value {
            Some(value) => {
                app.settings.set(&key, &value).await?;
                println!("{} = {}", key, value);
            }
            None => match app.settings.get(&key).await {
                Some(value) => println!("{}", value),
                None => println!("(not set)"),
            },
        },
        Command::Status => {
            for status in [NoteStatus::Default, NoteStatus::Archived, NoteStatus::Deleted] {
                let notes = app.notes.list_notes(status).await?;
                println!("{:>8}: {} note(s)", status, notes.len());
            }
        }
    }

    Ok(())
}

fn print_notes(notes: &[Note]) {
    if notes.is_empty() {
        println!("(no notes)");
        return;
    }

    for note in notes {
        let marker = if note.is_favorite { "*" } else { " " };
        println!(
            "{} [{}] {}  {}",
            marker,
            note.id,
            note.created_at.format("%Y-%m-%d %H:%M"),
            preview(&note.content)
        );
    }
}

/// First line of the content, clipped for terminal display.
fn preview(content: &str) -> String {
    let line = content.lines().next().unwrap_or("");
    let mut out: String = line.chars().take(60).collect();
    if line.chars().count() > 60 {
        out.push('…');
    }
    out
}
