use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{require_staff, AuthenticatedUser},
    errors::AppError,
    models::dto::request::{
        BulkAddQuestionsRequest, CreateQuestionRequest, QuestionsQuery, UpdateQuestionRequest,
    },
};

#[get("/api/questions")]
async fn list_questions(
    state: web::Data<AppState>,
    query: web::Query<QuestionsQuery>,
) -> Result<HttpResponse, AppError> {
    let response = state.question_service.list_questions(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/questions/{id}")]
async fn get_question(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let question = state.question_service.get_question(&id).await?;
    Ok(HttpResponse::Ok().json(question))
}

#[post("/api/questions")]
async fn create_question(
    state: web::Data<AppState>,
    request: web::Json<CreateQuestionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_staff(&auth.0)?;

    let response = state
        .question_service
        .create_question(request.into_inner(), &auth.0.sub)
        .await?;
    Ok(HttpResponse::Created().json(response))
}

#[post("/api/questions/bulk-add")]
async fn bulk_add_questions(
    state: web::Data<AppState>,
    request: web::Json<BulkAddQuestionsRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_staff(&auth.0)?;

    let response = state
        .question_service
        .bulk_add_questions(request.into_inner(), &auth.0.sub)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[put("/api/questions/{id}")]
async fn update_question(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateQuestionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_staff(&auth.0)?;

    let response = state
        .question_service
        .update_question(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[delete("/api/questions/{id}")]
async fn delete_question(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_staff(&auth.0)?;

    let response = state.question_service.delete_question(&id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/api/subjects/stats")]
async fn subject_stats(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let stats = state.question_service.subject_stats().await?;
    Ok(HttpResponse::Ok().json(stats))
}
