use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json,
    extract::{Multipart, Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;

use super::AppState;
use super::dto::{
    AskRequest, AskResponse, DocumentDto, MeResponse, ProgressParams, UploadResponse,
};
use crate::auth::Identity;
use crate::error::AppError;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn me(identity: Identity) -> Json<MeResponse> {
    Json(MeResponse { sub: identity.sub })
}

pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    identity: Identity,
) -> Result<Json<Vec<DocumentDto>>, AppError> {
    let documents = state.documents.list_by_owner(&identity.sub).await?;
    Ok(Json(documents.into_iter().map(DocumentDto::from).collect()))
}

/// Accept a multipart batch of files, validate synchronously, then spawn one
/// independent ingestion pipeline per file. The response acknowledges the
/// queueing only; progress is observable on the SSE stream.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut files: Vec<(String, String, Vec<u8>)> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        let Some(filename) = field.file_name().map(|n| n.to_string()) else {
            continue;
        };
        let content_type = field
            .content_type()
            .map(|ct| ct.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let content = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read file: {}", e)))?
            .to_vec();

        files.push((filename, content_type, content));
    }

    if files.is_empty() {
        return Err(AppError::BadRequest("No files uploaded".to_string()));
    }
    if files.len() > state.settings.max_upload_files {
        return Err(AppError::BadRequest(format!(
            "Max {} files",
            state.settings.max_upload_files
        )));
    }

    let count = files.len();
    for (filename, content_type, content) in files {
        state
            .pipeline
            .spawn(identity.sub.clone(), filename, content, content_type);
    }

    Ok(Json(UploadResponse {
        status: "queued",
        count,
    }))
}

pub async fn ask(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError> {
    let question = request.question.trim().to_string();
    if question.is_empty() {
        return Err(AppError::BadRequest("Question must not be empty".to_string()));
    }

    let top_k = request.top_k.unwrap_or(state.settings.top_k);

    let session = match request.session_id {
        Some(id) => state
            .chats
            .find_session(&identity.sub, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?,
        None => {
            let title: String = question.chars().take(80).collect();
            state.chats.create_session(&identity.sub, &title).await?
        }
    };

    let composed = state.composer.answer(&identity.sub, &question, top_k).await?;

    state
        .chats
        .append_message(session.id, "user", &question)
        .await?;
    state
        .chats
        .append_message(session.id, "assistant", &composed.answer)
        .await?;

    Ok(Json(AskResponse {
        answer: composed.answer,
        citations: composed.citations,
        session_id: session.id,
    }))
}

/// Long-lived SSE stream of ingestion progress for one owner.
///
/// The owner comes from the `sub` query parameter (EventSource cannot set
/// headers), defaulting to the mock subject. Events published while no
/// listener is attached are simply missed.
pub async fn progress_stream(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ProgressParams>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let owner_sub = params
        .sub
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| state.settings.auth_mock_sub.clone());

    let rx = state.progress.subscribe(&owner_sub);

    let stream = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => match Event::default().json_data(&event) {
                    Ok(sse_event) => return Some((Ok::<_, Infallible>(sse_event), rx)),
                    Err(_) => continue,
                },
                // dropped behind: skip to the live edge, progress is advisory
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("keep-alive"),
    )
}
