use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use std::sync::Arc;

use atelier::auth::AuthGate;
use atelier::config::Config;
use atelier::db;
use atelier::routes;
use atelier::store::{PgStore, Store};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    let pool = db::connect_with_retry(&config.database_url)
        .await
        .expect("Failed to connect to database");
    db::init_schema(&pool)
        .await
        .expect("Failed to initialize database schema");

    let store: Arc<dyn Store> = Arc::new(PgStore::new(pool));
    db::seed_admin(store.as_ref())
        .await
        .expect("Failed to seed bootstrap credential");

    let store_data = web::Data::from(Arc::clone(&store));

    log::info!("Starting atelier server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(store_data.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(routes::health::root)
            .service(routes::health::health)
            .service(
                web::scope("/api/v1")
                    .wrap(AuthGate::new(Arc::clone(&store)))
                    .configure(routes::config),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
