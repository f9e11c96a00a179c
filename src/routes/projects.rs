use crate::{
    error::AppError,
    models::{ProjectInput, ProjectPatch, TaskInput},
    store::Store,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

/// Creates a new project.
///
/// ## Responses:
/// - `201 Created`: the stored `Project`, id and timestamp assigned.
/// - `401 Unauthorized`: missing or invalid token.
/// - `422 Unprocessable Entity`: payload failed validation.
#[post("")]
pub async fn create_project(
    store: web::Data<dyn Store>,
    project_data: web::Json<ProjectInput>,
) -> Result<impl Responder, AppError> {
    project_data.validate()?;

    let project = store.create_project(project_data.into_inner()).await?;

    Ok(HttpResponse::Created().json(project))
}

/// Retrieves a project by id.
///
/// ## Responses:
/// - `200 OK`: the `Project`.
/// - `401 Unauthorized`: missing or invalid token.
/// - `404 Not Found`: no project with that id.
#[get("/{id}")]
pub async fn get_project(
    store: web::Data<dyn Store>,
    project_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let project = store
        .get_project(project_id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

    Ok(HttpResponse::Ok().json(project))
}

/// Partially updates a project. Fields absent from the payload keep their
/// stored values.
///
/// ## Responses:
/// - `200 OK`: the refreshed `Project`.
/// - `401 Unauthorized`: missing or invalid token.
/// - `404 Not Found`: no project with that id.
/// - `422 Unprocessable Entity`: payload failed validation.
#[put("/{id}")]
pub async fn update_project(
    store: web::Data<dyn Store>,
    project_id: web::Path<Uuid>,
    patch: web::Json<ProjectPatch>,
) -> Result<impl Responder, AppError> {
    patch.validate()?;

    let project = store
        .update_project(project_id.into_inner(), patch.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

    Ok(HttpResponse::Ok().json(project))
}

/// Deletes a project and, atomically with it, every task it owns.
///
/// ## Responses:
/// - `204 No Content`: project and dependent tasks removed.
/// - `401 Unauthorized`: missing or invalid token.
/// - `404 Not Found`: no project with that id.
#[delete("/{id}")]
pub async fn delete_project(
    store: web::Data<dyn Store>,
    project_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let deleted = store.delete_project(project_id.into_inner()).await?;

    if !deleted {
        return Err(AppError::NotFound("Project not found".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}

/// Creates a task under a project. `priority` defaults to 1 and
/// `completed` to false when omitted.
///
/// ## Responses:
/// - `201 Created`: the stored `Task`.
/// - `401 Unauthorized`: missing or invalid token.
/// - `404 Not Found`: no project with that id; no task is created.
/// - `422 Unprocessable Entity`: payload failed validation.
#[post("/{id}/tasks")]
pub async fn create_project_task(
    store: web::Data<dyn Store>,
    project_id: web::Path<Uuid>,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = store
        .create_task(project_id.into_inner(), task_data.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

    Ok(HttpResponse::Created().json(task))
}

/// Lists all tasks of a project, most urgent first (priority descending).
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects.
/// - `401 Unauthorized`: missing or invalid token.
/// - `404 Not Found`: no project with that id.
#[get("/{id}/tasks")]
pub async fn list_project_tasks(
    store: web::Data<dyn Store>,
    project_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let tasks = store
        .list_tasks(project_id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

    Ok(HttpResponse::Ok().json(tasks))
}
