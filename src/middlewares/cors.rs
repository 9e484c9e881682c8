use crate::config::CorsConfig;
use actix_cors::Cors;

pub fn create_cors(config: &CorsConfig) -> Cors {
    let cors = if config.allowed_origin == "*" {
        Cors::default().allow_any_origin()
    } else {
        Cors::default()
            .allowed_origin(&config.allowed_origin)
            .supports_credentials()
    };

    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"])
        // 本地开发放宽，防止前端自定义 Header 导致预检失败
        .allow_any_header()
        .max_age(3600)
}
