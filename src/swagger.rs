use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::person::list_persons,
        handlers::person::get_person,
        handlers::person::create_person,
        handlers::person::update_person,
        handlers::person::delete_person,
        handlers::person::set_presence,
        handlers::person::set_all_presence,
        handlers::person::reset_person_wins,
        handlers::roulette::spin,
        handlers::roulette::get_history,
        handlers::roulette::reset_wins,
    ),
    components(
        schemas(
            Person,
            CreatePersonRequest,
            UpdatePersonRequest,
            PresenceRequest,
            SpinResult,
            Winner,
            MessageResponse,
            HealthResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "person", description = "Roster and attendance API"),
        (name = "roulette", description = "Draw and win history API"),
    ),
    info(
        title = "Roulette Backend API",
        version = "1.0.0",
        description = "Attendance roster and wheel-of-names draw REST API"
    ),
    servers(
        (url = "/api", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
