//! Class handlers. Every route here sits behind `auth_middleware`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{ClassDetails, ClassResponse, NewClass};
use crate::errors::{AppError, AppResult};
use crate::services::Identity;
use crate::types::MessageResponse;

/// Class creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    #[schema(example = "Intro to Rust")]
    pub title: String,
    pub description: Option<String>,
    /// Teacher user id
    pub teacher: Uuid,
    #[validate(length(min = 1, message = "Time slot is required"))]
    #[schema(example = "Mon 09:00-10:30")]
    pub time_slot: String,
}

/// Create class routes (full paths, merged at the root)
pub fn class_routes() -> Router<AppState> {
    Router::new()
        .route("/classes", get(list_classes))
        .route("/classes/create", post(create_class))
        .route("/classes/:class_id/enroll", post(enroll))
}

/// Create a class
#[utoipa::path(
    post,
    path = "/classes/create",
    tag = "Classes",
    request_body = CreateClassRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Class created", body = ClassResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Server error")
    )
)]
pub async fn create_class(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateClassRequest>,
) -> AppResult<(StatusCode, Json<ClassResponse>)> {
    let class = state
        .class_service
        .create_class(NewClass {
            title: payload.title,
            description: payload.description,
            teacher_id: payload.teacher,
            time_slot: payload.time_slot,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ClassResponse::from(class))))
}

/// List all classes with teacher and students resolved
#[utoipa::path(
    get,
    path = "/classes",
    tag = "Classes",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All classes", body = [ClassDetails]),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Server error")
    )
)]
pub async fn list_classes(State(state): State<AppState>) -> AppResult<Json<Vec<ClassDetails>>> {
    Ok(Json(state.class_service.list_classes().await?))
}

/// Enroll the caller in a class
///
/// The enrolling student is always the token holder.
#[utoipa::path(
    post,
    path = "/classes/{class_id}/enroll",
    tag = "Classes",
    params(("class_id" = Uuid, Path, description = "Class identifier")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Enrolled", body = MessageResponse),
        (status = 400, description = "Already enrolled"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Class not found"),
        (status = 500, description = "Server error")
    )
)]
pub async fn enroll(
    State(state): State<AppState>,
    Extension(caller): Extension<Identity>,
    Path(class_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    // A malformed id cannot name an existing class
    let class_id = Uuid::parse_str(&class_id).map_err(|_| AppError::NotFound)?;

    state.enrollment_service.enroll(&caller, class_id).await?;

    Ok(Json(MessageResponse::new("Enrolled successfully")))
}
