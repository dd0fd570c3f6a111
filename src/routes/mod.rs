pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::web;

use crate::auth::AuthMiddleware;

/// Mounts every route. Everything under `/api` sits behind `AuthMiddleware`,
/// which lets only the login, register and logout endpoints through untouched.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(health::index).service(health::health).service(
        web::scope("/api")
            .wrap(AuthMiddleware)
            .service(
                web::scope("/auth")
                    .service(auth::register)
                    .service(auth::login)
                    .service(auth::logout)
                    .service(auth::me)
                    .service(auth::user_id),
            )
            .service(
                web::scope("/tasks")
                    .service(tasks::get_tasks)
                    .service(tasks::create_task)
                    .service(tasks::get_task)
                    .service(tasks::update_task)
                    .service(tasks::delete_task)
                    .service(tasks::complete_task),
            ),
    );
}
