use crate::{
    error::AppError,
    models::TaskPatch,
    store::Store,
};
use actix_web::{delete, put, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

/// Partially updates a task. Fields absent from the payload keep their
/// stored values. A `project_id` in the patch must name an existing
/// project; otherwise the whole update fails and nothing is applied.
///
/// ## Responses:
/// - `200 OK`: the refreshed `Task`.
/// - `401 Unauthorized`: missing or invalid token.
/// - `404 Not Found`: no task with that id, or the patch references a
///   nonexistent project.
/// - `422 Unprocessable Entity`: payload failed validation.
#[put("/{id}")]
pub async fn update_task(
    store: web::Data<dyn Store>,
    task_id: web::Path<Uuid>,
    patch: web::Json<TaskPatch>,
) -> Result<impl Responder, AppError> {
    patch.validate()?;

    let task = store
        .update_task(task_id.into_inner(), patch.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task by id.
///
/// ## Responses:
/// - `204 No Content`: task removed.
/// - `401 Unauthorized`: missing or invalid token.
/// - `404 Not Found`: no task with that id.
#[delete("/{id}")]
pub async fn delete_task(
    store: web::Data<dyn Store>,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let deleted = store.delete_task(task_id.into_inner()).await?;

    if !deleted {
        return Err(AppError::NotFound("Task not found".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}
