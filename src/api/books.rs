//! Book resource endpoints

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{
    ApiError, BookListResponse, BookResponse, Json, ListBooksParams, RefreshErrorResponse,
    RefreshStatusResponse,
};
use crate::domain::book::{BookInput, BookQuery};

/// Routes mounted under `/api/books`
pub fn create_books_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/{id}",
            get(get_book)
                .put(update_book)
                .patch(patch_book)
                .delete(delete_book),
        )
        .route("/{id}/refresh_enriched_data", post(refresh_enriched_data))
}

/// GET /api/books
pub async fn list_books(
    State(state): State<AppState>,
    params: Result<Query<ListBooksParams>, QueryRejection>,
) -> Result<Json<BookListResponse>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;
    debug!(page = ?params.page, page_size = ?params.page_size, "Listing books");

    let query = BookQuery::try_from(params)?;
    let page = state.book_service.list(query).await?;

    Ok(Json(page.into()))
}

/// POST /api/books
pub async fn create_book(
    State(state): State<AppState>,
    Json(input): Json<BookInput>,
) -> Result<(StatusCode, Json<BookResponse>), ApiError> {
    let book = state.book_service.create(input).await?;

    Ok((StatusCode::CREATED, Json(BookResponse::from(&book))))
}

/// GET /api/books/{id}
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = state.book_service.get(&id).await?;

    Ok(Json(BookResponse::from(&book)))
}

/// PUT /api/books/{id}
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<BookInput>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = state.book_service.update(&id, input).await?;

    Ok(Json(BookResponse::from(&book)))
}

/// PATCH /api/books/{id}
pub async fn patch_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<BookInput>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = state.book_service.patch(&id, input).await?;

    Ok(Json(BookResponse::from(&book)))
}

/// DELETE /api/books/{id}
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.book_service.delete(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/books/{id}/refresh_enriched_data
pub async fn refresh_enriched_data(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    if state.book_service.refresh_enrichment(&id).await? {
        let body = RefreshStatusResponse {
            status: "Data updated successfully".to_string(),
        };
        return Ok(Json(body).into_response());
    }

    let body = RefreshErrorResponse {
        error: "Could not update data".to_string(),
    };
    Ok((StatusCode::BAD_REQUEST, Json(body)).into_response())
}
