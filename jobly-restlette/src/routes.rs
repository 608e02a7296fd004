use crate::ApiError;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use jobly_core::auth::AUTHORIZATION as AUTH_CONTEXT_KEY;
use jobly_core::{
    Auth, Company, CompanyRepository, FieldMap, JobRepository, JoblyError, NewJob, Stash,
};
use serde_json::{json, Value};
use std::sync::Arc;

type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Clone)]
struct CompanyState {
    repo: Arc<dyn CompanyRepository>,
    auth: Arc<dyn Auth>,
}

#[derive(Clone)]
struct JobState {
    repo: Arc<dyn JobRepository>,
    auth: Arc<dyn Auth>,
}

fn item_path(path: &str, param: &str) -> String {
    format!("{}/:{}", path.trim_end_matches('/'), param)
}

fn require_admin(auth: &dyn Auth, headers: &HeaderMap) -> ApiResult<()> {
    let mut context = Stash::new();
    if let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        context.insert(AUTH_CONTEXT_KEY.to_string(), json!(value));
    }
    if auth.is_admin(&context) {
        Ok(())
    } else {
        Err(JoblyError::Unauthorized.into())
    }
}

/// Query-string pairs in the order they were sent; values stay text for the filter builder.
fn to_filters(params: Vec<(String, String)>) -> Stash {
    params
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect()
}

pub fn build_company_router(
    path: &str,
    repo: Arc<dyn CompanyRepository>,
    auth: Arc<dyn Auth>,
) -> Router {
    let state = CompanyState { repo, auth };

    Router::new()
        .route(path, get(list_companies).post(create_company))
        .route(
            &item_path(path, "handle"),
            get(get_company).patch(update_company).delete(delete_company),
        )
        .with_state(state)
}

async fn create_company(
    State(state): State<CompanyState>,
    headers: HeaderMap,
    body: Result<Json<Company>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    require_admin(state.auth.as_ref(), &headers)?;
    let Json(company) = body?;
    let company = state.repo.create(company).await?;
    Ok((StatusCode::CREATED, Json(json!({ "company": company }))))
}

async fn list_companies(
    State(state): State<CompanyState>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<impl IntoResponse> {
    let companies = state.repo.find_all(&to_filters(params)).await?;
    Ok(Json(json!({ "companies": companies })))
}

async fn get_company(
    State(state): State<CompanyState>,
    Path(handle): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let company = state.repo.get(&handle).await?;
    Ok(Json(json!({ "company": company })))
}

async fn update_company(
    State(state): State<CompanyState>,
    Path(handle): Path<String>,
    headers: HeaderMap,
    body: Result<Json<Stash>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    require_admin(state.auth.as_ref(), &headers)?;
    let Json(data) = body?;
    let company = state.repo.update(&handle, &FieldMap::from(data)).await?;
    Ok(Json(json!({ "company": company })))
}

async fn delete_company(
    State(state): State<CompanyState>,
    Path(handle): Path<String>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    require_admin(state.auth.as_ref(), &headers)?;
    state.repo.remove(&handle).await?;
    Ok(Json(json!({ "deleted": handle })))
}

pub fn build_job_router(path: &str, repo: Arc<dyn JobRepository>, auth: Arc<dyn Auth>) -> Router {
    let state = JobState { repo, auth };

    Router::new()
        .route(path, get(list_jobs).post(create_job))
        .route(
            &item_path(path, "id"),
            get(get_job).patch(update_job).delete(delete_job),
        )
        .with_state(state)
}

async fn create_job(
    State(state): State<JobState>,
    headers: HeaderMap,
    body: Result<Json<NewJob>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    require_admin(state.auth.as_ref(), &headers)?;
    let Json(job) = body?;
    let job = state.repo.create(job).await?;
    Ok((StatusCode::CREATED, Json(json!({ "job": job }))))
}

async fn list_jobs(
    State(state): State<JobState>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<impl IntoResponse> {
    let jobs = state.repo.find_all(&to_filters(params)).await?;
    Ok(Json(json!({ "jobs": jobs })))
}

async fn get_job(
    State(state): State<JobState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(id) = id?;
    let job = state.repo.get(id).await?;
    Ok(Json(json!({ "job": job })))
}

async fn update_job(
    State(state): State<JobState>,
    id: Result<Path<i32>, PathRejection>,
    headers: HeaderMap,
    body: Result<Json<Stash>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    require_admin(state.auth.as_ref(), &headers)?;
    let Path(id) = id?;
    let Json(data) = body?;
    let job = state.repo.update(id, &FieldMap::from(data)).await?;
    Ok(Json(json!({ "job": job })))
}

async fn delete_job(
    State(state): State<JobState>,
    id: Result<Path<i32>, PathRejection>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    require_admin(state.auth.as_ref(), &headers)?;
    let Path(id) = id?;
    state.repo.remove(id).await?;
    Ok(Json(json!({ "deleted": id })))
}
