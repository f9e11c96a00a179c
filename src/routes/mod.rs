pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;

use actix_web::web;

/// Registers every API route. Mounted under the gated scope by the caller;
/// health endpoints live outside it.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::login)
            .service(auth::me),
    )
    .service(
        web::scope("/projects")
            .service(projects::create_project)
            .service(projects::create_project_task)
            .service(projects::list_project_tasks)
            .service(projects::get_project)
            .service(projects::update_project)
            .service(projects::delete_project),
    )
    .service(
        web::scope("/tasks")
            .service(tasks::update_task)
            .service(tasks::delete_task),
    );
}
