use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use client_core::{
    MessageSet, MutationController, NotificationChannel, NotificationEvent, NotificationKind,
    PreferenceStore, TomlPreferenceStore,
};
use shared::domain::{RecordId, UserDraft};
use table_store::{MemoryTableStore, RestTableStore, TableStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

/// User-directory demo: create and delete users against a hosted table
/// store, with a uniqueness constraint on email.
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
    #[arg(long, default_value = "users_demo_prefs.toml")]
    prefs: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let store: Arc<dyn TableStore> = if args.memory {
        Arc::new(MemoryTableStore::new().with_unique_column("users", "email"))
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

    let prefs_store = TomlPreferenceStore::new(args.prefs);
    let mut prefs = prefs_store.load()?;
    info!(dark_mode = prefs.dark_mode, "loaded preferences");

    let notifications = NotificationChannel::new();
    spawn_toast_printer(&notifications);

    let controller = MutationController::new(
        Arc::clone(&store),
        notifications.clone(),
        MessageSet {
            saved: "User saved successfully!".into(),
            conflict: "Email already exists".into(),
            save_failed: "Failed to save user".into(),
            deleted: "User deleted".into(),
            delete_failed: "Failed to delete user".into(),
            load_failed: "Failed to load users".into(),
        },
        UserDraft::default(),
    );

    controller.refresh().await;
    print_users(&controller).await;

    println!("commands: list | refresh | add <name> <email> | del <id> | dark | quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("list") => print_users(&controller).await,
            Some("refresh") => {
                controller.refresh().await;
                print_users(&controller).await;
            }
            Some("add") => {
                let name = parts.next().unwrap_or_default().to_string();
                let email = parts.next().unwrap_or_default().to_string();
                controller.open_dialog().await;
                controller.set_draft(UserDraft { name, email }).await;
                controller.submit().await;
            }
            Some("del") => match parts.next() {
                Some(id) => {
                    controller.remove(&RecordId::from(id)).await;
                }
                None => println!("usage: del <id>"),
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

async fn print_users(controller: &MutationController<UserDraft>) {
    let users = controller.list().snapshot().await;
    if users.is_empty() {
        println!("(no users yet)");
        return;
    }
    for user in users.iter() {
        println!(
            "{}  {} <{}>  {}",
            user.id,
            user.name,
            user.email,
            user.created_at.format("%b %e, %Y")
        );
    }
}
