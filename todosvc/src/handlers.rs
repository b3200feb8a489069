//! The four route handlers.
//!
//! Each handler issues one store call and answers with plain text. Every
//! failure is a `500` carrying the literal diagnostic from `ApiError`.

use std::convert::Infallible;

use axum::{
    body::{to_bytes, Body},
    extract::{rejection::PathRejection, Path, State},
    http::{header, Uri},
    response::IntoResponse,
};
use futures::{future, StreamExt};

use crate::error::{ApiError, BodyError, Operation};
use crate::store::SharedStore;
use crate::types::TodoId;

/// Streams `<id>,<note>\n` per row. A row that fails after the response has
/// started ends the body early; the client sees only the rows before it.
pub async fn list_todos(
    State(store): State<SharedStore>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = store
        .list()
        .await
        .map_err(|err| ApiError::store(Operation::List, &err))?;
    let lines = rows.scan(0usize, |written, row| {
        future::ready(match row {
            Ok(todo) => {
                *written += 1;
                Some(Ok::<_, Infallible>(todo.line()))
            }
            Err(err) => {
                tracing::error!(error = %err, rows = *written, "List scan failed, remaining rows abandoned");
                None
            }
        })
    });
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(lines),
    ))
}

pub async fn create_todo(
    State(store): State<SharedStore>,
    body: Body,
) -> Result<&'static str, ApiError> {
    let note = read_note(body)
        .await
        .map_err(|err| ApiError::body(Operation::Create, &err))?;
    store
        .create(&note)
        .await
        .map_err(|err| ApiError::store(Operation::Create, &err))?;
    Ok("Todo created")
}

pub async fn update_todo(
    State(store): State<SharedStore>,
    uri: Uri,
    path: Result<Path<TodoId>, PathRejection>,
    body: Body,
) -> Result<&'static str, ApiError> {
    let id = todo_id(path, &uri);
    let note = read_note(body)
        .await
        .map_err(|err| ApiError::body(Operation::Update, &err))?;
    store
        .update(&id, &note)
        .await
        .map_err(|err| ApiError::store(Operation::Update, &err))?;
    Ok("Todo updated")
}

pub async fn delete_todo(
    State(store): State<SharedStore>,
    uri: Uri,
    path: Result<Path<TodoId>, PathRejection>,
) -> Result<&'static str, ApiError> {
    let id = todo_id(path, &uri);
    store
        .delete(&id)
        .await
        .map_err(|err| ApiError::store(Operation::Delete, &err))?;
    Ok("Todo deleted")
}

/// The decoded `{id}` segment, or the raw percent-encoded segment when it
/// does not decode to UTF-8. Either way it goes to the store as-is.
fn todo_id(path: Result<Path<TodoId>, PathRejection>, uri: &Uri) -> TodoId {
    match path {
        Ok(Path(id)) => id,
        Err(rejection) => {
            tracing::debug!(%rejection, "passing raw id segment through");
            TodoId::new(uri.path().rsplit('/').next().unwrap_or_default())
        }
    }
}

/// Read the whole body as the note text. No size limit is applied.
async fn read_note(body: Body) -> Result<String, BodyError> {
    let bytes = to_bytes(body, usize::MAX).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}
