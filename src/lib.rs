pub mod auth;
pub mod configuration;
pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod validators;
