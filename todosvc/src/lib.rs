//! Plain-text HTTP service over a single `todo` table.
//!
//! # Overview
//! Four routes map one-to-one onto four SQL statements:
//!
//! | Method   | Path    | Statement                                   |
//! |----------|---------|---------------------------------------------|
//! | `GET`    | `/`     | `select id, note from todo order by id`     |
//! | `POST`   | `/`     | `insert into todo (note) values (?)`        |
//! | `PATCH`  | `/{id}` | `update todo set note=? where id=?`         |
//! | `DELETE` | `/{id}` | `delete from todo where id=?`               |
//!
//! # Design
//! - The store is injected into the router as `Arc<dyn TodoStore>`, so tests
//!   can swap in doubles.
//! - `{id}` is passed to the database untouched; no 4xx is ever produced.
//! - Failures are `500` with a literal diagnostic and a server-side log line.

pub mod config;
pub mod error;
pub mod handlers;
pub mod store;
pub mod types;

use axum::{
    routing::{get, patch},
    Router,
};
use tokio::net::TcpListener;

pub use config::Config;
pub use error::{ApiError, StartupError, StoreError};
pub use store::{initialize, DatabaseConfig, SharedStore, SqlStore, TodoStore, TodoStream};
pub use types::{Todo, TodoId};

pub fn app(store: SharedStore) -> Router {
    Router::new()
        .route("/", get(handlers::list_todos).post(handlers::create_todo))
        .route(
            "/{id}",
            patch(handlers::update_todo).delete(handlers::delete_todo),
        )
        .with_state(store)
}

pub async fn run(listener: TcpListener, store: SharedStore) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store)).await
}

/// Initialize the store, then bind and serve until the process is killed.
///
/// The listener is only bound once the `todo` table is ready, so a database
/// failure leaves no socket behind.
pub async fn serve(config: Config) -> Result<(), StartupError> {
    let store = initialize(&config.database).await?;

    let addr = config.listen_addr();
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Starting todosvc on {addr}");
    run(listener, store).await?;
    Ok(())
}
