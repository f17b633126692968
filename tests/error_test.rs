use axum::{http::StatusCode, response::IntoResponse};
use serde_json::json;
use workout_tracker::error::AppError;
use workout_tracker::models::TemplateCreate;
use workout_tracker::validation::FromPayload;

#[test]
fn test_not_found_returns_404() {
    let error = AppError::NotFound("Template 3".to_string());
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_bad_request_returns_400() {
    let error = AppError::BadRequest("Invalid input".to_string());
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_internal_returns_500() {
    let error = AppError::Internal("Something went wrong".to_string());
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn test_validation_returns_422() {
    let errors = TemplateCreate::from_payload(&json!({"label": "Day A"})).unwrap_err();
    let error = AppError::from(errors);
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[test]
fn test_validation_message_names_fields() {
    let errors = TemplateCreate::from_payload(&json!({"label": "Day A"})).unwrap_err();
    let error = AppError::Validation(errors);

    assert_eq!(
        error.to_string(),
        "Validation error: focus: field required; exercises: field required"
    );
}

#[test]
fn test_password_hash_returns_500() {
    let error = AppError::PasswordHash;
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
