use actix_files as fs;
use actix_web::dev::Server;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::PgPool;
use std::net::TcpListener;
use std::sync::Arc;

use crate::auth::RefreshTokenStore;
use crate::configuration::{ApplicationSettings, JwtSettings};
use crate::db::{ChirpRepository, PgRefreshTokenStore, UserRepository};
use crate::middleware::{FileServerHits, HitCounter};
use crate::routes::{
    create_chirp, create_user, delete_chirp, get_chirp, health_check, list_chirps, login,
    metrics, polka_webhook, refresh, reset, revoke, update_user, validate_chirp,
};

/// Build the HTTP server on an already bound listener.
///
/// `hits` is shared with the caller so tests can observe the file-server count.
pub fn run(
    listener: TcpListener,
    pool: PgPool,
    application: ApplicationSettings,
    jwt_config: JwtSettings,
    hits: HitCounter,
) -> Result<Server, std::io::Error> {
    let users = web::Data::new(UserRepository::new(pool.clone()));
    let chirps = web::Data::new(ChirpRepository::new(pool.clone()));
    let store: Arc<dyn RefreshTokenStore> = Arc::new(PgRefreshTokenStore::new(pool));
    let store = web::Data::from(store);
    let jwt_config = web::Data::new(jwt_config);
    let platform = web::Data::new(application.platform);
    let hits_data = web::Data::new(hits.clone());
    let filepath_root = application.filepath_root;

    tracing::info!(
        platform = ?application.platform,
        filepath_root = %filepath_root,
        "Configuring HTTP server"
    );

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            // Shared state
            .app_data(users.clone())
            .app_data(chirps.clone())
            .app_data(store.clone())
            .app_data(jwt_config.clone())
            .app_data(platform.clone())
            .app_data(hits_data.clone())
            .service(
                web::scope("/api")
                    .route("/healthz", web::get().to(health_check))
                    .route("/validate_chirp", web::post().to(validate_chirp))
                    .route("/users", web::post().to(create_user))
                    .route("/users", web::put().to(update_user))
                    .route("/login", web::post().to(login))
                    .route("/refresh", web::post().to(refresh))
                    .route("/revoke", web::post().to(revoke))
                    .route("/chirps", web::post().to(create_chirp))
                    .route("/chirps", web::get().to(list_chirps))
                    .route("/chirps/{chirp_id}", web::get().to(get_chirp))
                    .route("/chirps/{chirp_id}", web::delete().to(delete_chirp))
                    .route("/polka/webhooks", web::post().to(polka_webhook)),
            )
            .service(
                web::scope("/admin")
                    .route("/metrics", web::get().to(metrics))
                    .route("/reset", web::post().to(reset)),
            )
            .service(
                web::scope("/app")
                    .wrap(FileServerHits::new(hits.clone()))
                    .service(fs::Files::new("", filepath_root.clone()).index_file("index.html")),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
