use crate::models::*;
use crate::services::RouletteService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/roulette/spin",
    tag = "roulette",
    responses(
        (status = 200, description = "抽奖成功", body = SpinResult),
        (status = 400, description = "没有出席成员", body = ErrorResponse)
    )
)]
/// 在出席成员中加权抽取一名中奖者并记录
pub async fn spin(service: web::Data<RouletteService>) -> Result<HttpResponse> {
    match service.spin().await {
        Ok(result) => Ok(HttpResponse::Ok().json(result)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/roulette/history",
    tag = "roulette",
    responses(
        (status = 200, description = "最近的中奖记录", body = [Winner])
    )
)]
pub async fn get_history(service: web::Data<RouletteService>) -> Result<HttpResponse> {
    match service.history().await {
        Ok(list) => Ok(HttpResponse::Ok().json(list)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/roulette/reset",
    tag = "roulette",
    responses(
        (status = 200, description = "所有中奖次数已清零", body = MessageResponse)
    )
)]
pub async fn reset_wins(service: web::Data<RouletteService>) -> Result<HttpResponse> {
    match service.reset_all().await {
        Ok(_) => Ok(HttpResponse::Ok().json(MessageResponse::new(
            "Win counts reset successfully",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn roulette_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/roulette")
            .route("/spin", web::post().to(spin))
            .route("/history", web::get().to(get_history))
            .route("/reset", web::post().to(reset_wins)),
    );
}
