use chirpy::configuration::get_configuration;
use chirpy::middleware::HitCounter;
use chirpy::startup::run;
use chirpy::telemetry::init_telemetry;
use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    tracing::info!("Starting chirpy");

    let configuration = match get_configuration() {
        Ok(config) => {
            tracing::info!(
                database = ?config.database,
                jwt = ?config.jwt,
                "Configuration loaded"
            );
            config
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to read configuration");
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&configuration.database.connection_string())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create connection pool");
            std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "Database connection error",
            )
        })?;

    sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to run migrations");
        std::io::Error::new(std::io::ErrorKind::Other, "Migration error")
    })?;

    let address = configuration.application.address();
    let listener = TcpListener::bind(&address)?;
    tracing::info!(address = %address, "Server listening");

    let server = run(
        listener,
        pool,
        configuration.application,
        configuration.jwt,
        HitCounter::new(),
    )?;

    server.await
}
