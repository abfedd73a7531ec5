use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use client_core::{
    load_stats, MessageSet, MutationController, NotificationChannel, NotificationEvent,
    NotificationKind, PreferenceStore, SessionContext, TomlPreferenceStore,
};
use shared::domain::{Note, NoteDraft, RecordId, TableRecord};
use table_store::{Filter, MemoryTableStore, RestTableStore, TableStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

/// Notes demo: session-scoped notes over a hosted table store, with the
/// usage-statistics screen.
#[derive(Parser, Debug)]
struct Args {
    /// Base URL of the hosted table-store REST endpoint.
    #[arg(long, conflicts_with = "memory")]
    server_url: Option<String>,
    /// Project api key for the hosted endpoint.
    #[arg(long)]
    api_key: Option<String>,
    /// Run against an in-process table store instead of a remote backend.
    #[arg(long)]
    memory: bool,
    /// Reuse a fixed session identity instead of an ephemeral one.
    #[arg(long)]
    user_id: Option<String>,
    #[arg(long, default_value = "notes_demo_prefs.toml")]
    prefs: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let store: Arc<dyn TableStore> = if args.memory {
        Arc::new(MemoryTableStore::new())
    } else {
        let server_url = args
            .server_url
            .ok_or_else(|| anyhow::anyhow!("--server-url is required unless --memory is set"))?;
        let mut rest = RestTableStore::new(&server_url)?;
        if let Some(api_key) = args.api_key {
            rest = rest.with_api_key(api_key);
        }
        Arc::new(rest)
    };

    let session = match args.user_id {
        Some(user_id) => SessionContext::with_user_id(user_id),
        None => SessionContext::ephemeral(),
    };
    info!(user_id = %session.user_id, "session started");

    let prefs_store = TomlPreferenceStore::new(args.prefs);
    let mut prefs = prefs_store.load()?;

    let notifications = NotificationChannel::new();
    spawn_toast_printer(&notifications);

    let controller = MutationController::new(
        Arc::clone(&store),
        notifications.clone(),
        MessageSet {
            saved: "Note created".into(),
            conflict: "Note already exists".into(),
            save_failed: "Failed to create note".into(),
            deleted: "Note deleted".into(),
            delete_failed: "Failed to delete note".into(),
            load_failed: "Failed to load notes".into(),
        },
        NoteDraft::for_user(session.user_id.clone()),
    )
    .with_scope(vec![Filter::eq("user_id", session.user_id.clone())]);

    controller.refresh().await;
    print_notes(&controller).await;

    println!("commands: list | refresh | add <title> [content...] | view <id> | del <id> | stats | dark | quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("list") => print_notes(&controller).await,
            Some("refresh") => {
                controller.refresh().await;
                print_notes(&controller).await;
            }
            Some("add") => {
                let title = parts.next().unwrap_or_default().to_string();
                let content = parts.collect::<Vec<_>>().join(" ");
                controller
                    .set_draft(NoteDraft {
                        title,
                        content,
                        user_id: session.user_id.clone(),
                    })
                    .await;
                controller.submit().await;
            }
            Some("view") => match parts.next() {
                Some(id) => print_note(&controller, id).await,
                None => println!("usage: view <id>"),
            },
            Some("del") => match parts.next() {
                Some(id) => {
                    controller.remove(&RecordId::from(id)).await;
                }
                None => println!("usage: del <id>"),
            },
            Some("stats") => match load_stats(store.as_ref(), Note::TABLE, Utc::now()).await {
                Ok(stats) => {
                    println!("total notes: {}", stats.total);
                    println!("this week:   {}", stats.last_week);
                    println!("this month:  {}", stats.last_month);
                }
                Err(err) => println!("[error] failed to load stats: {err}"),
            },
            Some("dark") => {
                prefs.dark_mode = !prefs.dark_mode;
                prefs_store.save(prefs)?;
                println!(
                    "appearance: {}",
                    if prefs.dark_mode { "dark" } else { "light" }
                );
            }
            Some("quit") | Some("exit") => break,
            Some(other) => println!("unknown command: {other}"),
            None => {}
        }
    }

    Ok(())
}

fn spawn_toast_printer(notifications: &NotificationChannel) {
    let mut events = notifications.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let NotificationEvent::Shown(notification) = event {
                let tag = match notification.kind {
                    NotificationKind::Success => "ok",
                    NotificationKind::Error => "error",
                };
                println!("[{tag}] {}", notification.message);
            }
        }
    });
}

async fn print_notes(controller: &MutationController<NoteDraft>) {
    let notes = controller.list().snapshot().await;
    if notes.is_empty() {
        println!("(no notes yet; add one with: add <title> [content...])");
        return;
    }
    for note in notes.iter() {
        let preview: String = note.content.chars().take(40).collect();
        println!(
            "{}  {}  {}  {}",
            note.id,
            note.title,
            preview,
            note.created_at.format("%b %e, %Y")
        );
    }
}

async fn print_note(controller: &MutationController<NoteDraft>, id: &str) {
    let notes = controller.list().snapshot().await;
    match notes.iter().find(|note| note.id.as_str() == id) {
        Some(note) => {
            println!("{}", note.title);
            if note.content.is_empty() {
                println!("(no content)");
            } else {
                println!("{}", note.content);
            }
        }
        None => println!("no note with id {id}"),
    }
}
