use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{require_staff, AuthenticatedUser},
    errors::AppError,
    models::dto::request::{CreateTestRequest, TestsQuery},
};

#[post("/api/tests")]
async fn create_test(
    state: web::Data<AppState>,
    request: web::Json<CreateTestRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_staff(&auth.0)?;

    let response = state
        .test_service
        .create_test(request.into_inner(), &auth.0.sub)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/tests")]
async fn list_tests(
    state: web::Data<AppState>,
    query: web::Query<TestsQuery>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = state.test_service.list_tests(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/tests/{id}")]
async fn get_test(
    state: web::Data<AppState>,
    id: web::Path<String>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let test = state.test_service.get_test(&id).await?;
    Ok(HttpResponse::Ok().json(test))
}
