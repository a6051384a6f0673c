//! Plumb - example server
//!
//! Serves a small in-memory notes API built from the handler adapters.
//! Configuration is read from the YAML files given as arguments, merged in
//! order.
//!
//! ```text
//! plumb config/base.yaml config/local.yaml
//! ```

use chrono::{DateTime, Utc};
use plumb::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Serialize)]
struct Note {
    id: i64,
    text: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct NewNote {
    text: String,
}

#[derive(Bind)]
struct NoteId {
    #[bind("id,path,required")]
    id: i64,
}

#[derive(Bind)]
struct ListNotes {
    #[bind("since,omitempty")]
    since: Option<DateTime<Utc>>,
    #[bind("limit")]
    limit: Option<i32>,
}

/// Notes kept in memory for the lifetime of the process.
#[derive(Default)]
struct Notes {
    next_id: AtomicI64,
    notes: Mutex<BTreeMap<i64, Note>>,
}

impl Notes {
    fn insert(&self, text: String) -> Result<Note, BoxError> {
        let note = Note {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            text,
            created_at: Utc::now(),
        };
        self.notes
            .lock()
            .map_err(|_| "notes store poisoned")?
            .insert(note.id, note.clone());
        Ok(note)
    }

    fn list(&self, args: &ListNotes) -> Result<Vec<Note>, BoxError> {
        let notes = self.notes.lock().map_err(|_| "notes store poisoned")?;
        let limit = args.limit.map(|l| l.max(0) as usize).unwrap_or(usize::MAX);

        Ok(notes
            .values()
            .filter(|note| args.since.map_or(true, |since| note.created_at >= since))
            .take(limit)
            .cloned()
            .collect())
    }

    fn get(&self, id: i64) -> Result<Option<Note>, BoxError> {
        let notes = self.notes.lock().map_err(|_| "notes store poisoned")?;
        Ok(notes.get(&id).cloned())
    }

    fn remove(&self, id: i64) -> Result<bool, BoxError> {
        let mut notes = self.notes.lock().map_err(|_| "notes store poisoned")?;
        Ok(notes.remove(&id).is_some())
    }
}

fn routes(logger: &Logger, notes: Arc<Notes>) -> Router {
    let (create, list, get, delete) = (notes.clone(), notes.clone(), notes.clone(), notes);

    Router::new()
        .get("/_health", handle(logger, |_ctx| async { Ok::<_, Error>(()) }))
        .post(
            "/notes",
            with_input_output(logger, move |_ctx, input: NewNote| {
                let notes = create.clone();
                async move {
                    if input.text.is_empty() {
                        return Err(Error::invalid_input("text must not be empty").into());
                    }
                    notes.insert(input.text)
                }
            }),
        )
        .get(
            "/notes",
            with_args_output(logger, move |_ctx, args: ListNotes| {
                let notes = list.clone();
                async move { notes.list(&args) }
            }),
        )
        .get(
            "/notes/{id}",
            with_args_output(logger, move |_ctx, args: NoteId| {
                let notes = get.clone();
                async move {
                    match notes.get(args.id)? {
                        Some(note) => Ok(note),
                        None => Err(BoxError::from(format!("note {} not found", args.id))),
                    }
                }
            }),
        )
        .delete(
            "/notes/{id}",
            with_args(logger, move |_ctx, args: NoteId| {
                let notes = delete.clone();
                async move {
                    if notes.remove(args.id)? {
                        Ok(())
                    } else {
                        Err(BoxError::from(format!("note {} not found", args.id)))
                    }
                }
            }),
        )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let files: Vec<String> = std::env::args().skip(1).collect();
    let config = ServerConfig::from_files(&files[..])?;

    let logger = config.logger();
    logger.install()?;

    tracing::info!("Starting plumb example server...");

    let router = routes(&logger, Arc::new(Notes::default()));
    for route in router.routes() {
        tracing::info!("Route: {} {}", route.method(), route.pattern());
    }

    Server::new(config, router, logger).run().await
}
