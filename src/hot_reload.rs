use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use notify_debouncer_full::notify::{Error as NotifyError, RecursiveMode, Watcher};
use notify_debouncer_full::{new_debouncer, DebouncedEvent};
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error, info, warn};

use crate::state::RefreshBroadcaster;

const DEBOUNCE: Duration = Duration::from_millis(200);

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(tx): State<RefreshBroadcaster>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, tx))
}

async fn handle_socket(mut socket: WebSocket, tx: RefreshBroadcaster) {
    let mut rx = tx.subscribe();

    if rx.recv().await.is_ok() {
        if socket.send(Message::Text("reload".into())).await.is_err() {
            debug!("Client disconnected before reload message could be sent");
        }
    }
}

/// Editor scratch files and dot-files never trigger a reload.
fn is_ignored(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map_or(false, |s| s.starts_with('.') || s.ends_with('~'))
}

fn is_relevant(event: &DebouncedEvent) -> bool {
    let kind = &event.kind;
    (kind.is_modify() || kind.is_create() || kind.is_remove())
        && !event.event.paths.iter().all(|path| is_ignored(path))
}

/// Broadcast a reload to every open socket whenever a watched directory
/// changes. Posts are read per request, so nothing is reloaded server-side.
pub fn start_content_watcher(
    tx: RefreshBroadcaster,
    dirs: Vec<PathBuf>,
) -> Result<(), NotifyError> {
    info!(?dirs, "Starting content watcher for hot-reload...");
    let (watcher_tx, mut watcher_rx) = tokio::sync::mpsc::channel(1);

    let handler = move |res: Result<Vec<DebouncedEvent>, Vec<NotifyError>>| {
        match res {
            Ok(events) => {
                let changed: Vec<_> = events
                    .iter()
                    .filter(|event| is_relevant(event))
                    .flat_map(|event| &event.event.paths)
                    .map(|p| p.display().to_string())
                    .collect();

                if changed.is_empty() {
                    return;
                }
                debug!(?changed, "Relevant file change detected");
                match watcher_tx.try_send(()) {
                    Ok(()) | Err(TrySendError::Full(())) => {}
                    Err(TrySendError::Closed(())) => error!("Watcher channel closed"),
                }
            }
            Err(errors) => {
                for e in errors {
                    error!("Watcher error: {}", e);
                }
            }
        }
    };
    let mut debouncer = new_debouncer(DEBOUNCE, None, handler)?;

    for dir in &dirs {
        if dir.exists() {
            debouncer.watcher().watch(dir, RecursiveMode::Recursive)?;
        } else {
            warn!(dir = %dir.display(), "not watching missing directory");
        }
    }

    tokio::spawn(async move {
        // Owning the debouncer keeps the watcher alive.
        let _debouncer = debouncer;
        while watcher_rx.recv().await.is_some() {
            info!("Content change detected, sending reload signal...");
            if tx.send(()).is_err() {
                debug!("No live-reload clients connected");
            }
        }
    });

    Ok(())
}
