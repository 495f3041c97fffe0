use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::{CreateTestAttemptRequest, TestAttemptsQuery},
    quiz::ClientMetadata,
};

#[post("/api/test-attempts")]
async fn create_test_attempt(
    state: web::Data<AppState>,
    request: web::Json<CreateTestAttemptRequest>,
    metadata: ClientMetadata,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = state
        .test_attempt_service
        .record_attempt(request.into_inner(), &auth.0.sub, &metadata)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/test-attempts")]
async fn list_test_attempts(
    state: web::Data<AppState>,
    query: web::Query<TestAttemptsQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = state
        .test_attempt_service
        .list_attempts(query.into_inner(), &auth.0)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/test-attempts/{id}")]
async fn get_test_attempt(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let record = state.test_attempt_service.get_attempt(&id, &auth.0).await?;
    Ok(HttpResponse::Ok().json(record))
}
