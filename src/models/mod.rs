pub mod project;
pub mod task;
pub mod user;

pub use project::{Project, ProjectInput, ProjectPatch};
pub use task::{Task, TaskInput, TaskPatch};
pub use user::User;
