use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};

use crate::error::{AppError, AppResult, InternalContext};
use crate::models::{MessageResponse, Note, NoteCreate};
use crate::repo::NoteRepo;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/notes", get(list_notes).post(create_note))
        .route("/notes/:id", get(get_note).delete(delete_note))
        .with_state(state)
}

async fn create_note(
    State(state): State<AppState>,
    payload: Result<Json<NoteCreate>, JsonRejection>,
) -> AppResult<Json<Note>> {
    let Json(input) = payload?;
    let note = Note::from(input);

    NoteRepo::insert(state.store(), &note)
        .await
        .internal("Failed to create note")?;

    tracing::info!(note_id = %note.id, "Created note");
    Ok(Json(note))
}

async fn list_notes(State(state): State<AppState>) -> AppResult<Json<Vec<Note>>> {
    let notes = NoteRepo::list(state.store())
        .await
        .internal("Failed to fetch notes")?;

    Ok(Json(notes))
}

async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Note>> {
    NoteRepo::find_by_id(state.store(), &id)
        .await
        .internal("Failed to fetch note")?
        .map(Json)
        .ok_or(AppError::not_found("Note"))
}

async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let deleted = NoteRepo::delete_by_id(state.store(), &id)
        .await
        .internal("Failed to delete note")?;

    if !deleted {
        return Err(AppError::not_found("Note"));
    }

    Ok(Json(MessageResponse::new("Note deleted successfully")))
}
