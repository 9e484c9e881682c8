pub mod health;
pub mod person;
pub mod roulette;

pub use health::health_config;
pub use person::person_config;
pub use roulette::roulette_config;

use crate::error::AppError;
use actix_web::web;

/// Everything mounted under `/api`, including the JSON and path extractor
/// error handlers so that malformed requests get the regular error body.
pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|_err, _req| AppError::ValidationError("Invalid ID".into()).into()),
    );

    health_config(cfg);
    person_config(cfg);
    roulette_config(cfg);
}
