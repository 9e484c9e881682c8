use crate::models::*;
use crate::services::PersonService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/persons",
    tag = "person",
    responses(
        (status = 200, description = "成员列表", body = [Person])
    )
)]
pub async fn list_persons(service: web::Data<PersonService>) -> Result<HttpResponse> {
    match service.list().await {
        Ok(list) => Ok(HttpResponse::Ok().json(list)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/persons/{id}",
    tag = "person",
    params(("id" = i64, Path, description = "成员ID")),
    responses(
        (status = 200, description = "成员详情", body = Person),
        (status = 404, description = "成员不存在", body = ErrorResponse)
    )
)]
pub async fn get_person(
    service: web::Data<PersonService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.get(path.into_inner()).await {
        Ok(person) => Ok(HttpResponse::Ok().json(person)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/persons",
    tag = "person",
    request_body = CreatePersonRequest,
    responses(
        (status = 201, description = "创建成功", body = Person),
        (status = 400, description = "姓名为空", body = ErrorResponse)
    )
)]
pub async fn create_person(
    service: web::Data<PersonService>,
    request: web::Json<CreatePersonRequest>,
) -> Result<HttpResponse> {
    match service.create(request.into_inner()).await {
        Ok(person) => Ok(HttpResponse::Created().json(person)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/persons/{id}",
    tag = "person",
    params(("id" = i64, Path, description = "成员ID")),
    request_body = UpdatePersonRequest,
    responses(
        (status = 200, description = "更新成功", body = Person),
        (status = 400, description = "请求参数错误", body = ErrorResponse),
        (status = 404, description = "成员不存在", body = ErrorResponse)
    )
)]
pub async fn update_person(
    service: web::Data<PersonService>,
    path: web::Path<i64>,
    request: web::Json<UpdatePersonRequest>,
) -> Result<HttpResponse> {
    match service.update(path.into_inner(), request.into_inner()).await {
        Ok(person) => Ok(HttpResponse::Ok().json(person)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/persons/{id}",
    tag = "person",
    params(("id" = i64, Path, description = "成员ID")),
    responses(
        (status = 200, description = "删除成功", body = MessageResponse),
        (status = 404, description = "成员不存在", body = ErrorResponse)
    )
)]
pub async fn delete_person(
    service: web::Data<PersonService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.delete(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(MessageResponse::new("Person deleted successfully"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    patch,
    path = "/persons/{id}/presence",
    tag = "person",
    params(("id" = i64, Path, description = "成员ID")),
    request_body = PresenceRequest,
    responses(
        (status = 200, description = "出席状态已更新", body = Person),
        (status = 404, description = "成员不存在", body = ErrorResponse)
    )
)]
pub async fn set_presence(
    service: web::Data<PersonService>,
    path: web::Path<i64>,
    request: web::Json<PresenceRequest>,
) -> Result<HttpResponse> {
    match service.set_presence(path.into_inner(), request.present).await {
        Ok(person) => Ok(HttpResponse::Ok().json(person)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/persons/presence",
    tag = "person",
    request_body = PresenceRequest,
    responses(
        (status = 200, description = "全部成员出席状态已更新", body = MessageResponse)
    )
)]
/// 一次性设置所有成员的出席状态
pub async fn set_all_presence(
    service: web::Data<PersonService>,
    request: web::Json<PresenceRequest>,
) -> Result<HttpResponse> {
    match service.set_all_presence(request.present).await {
        Ok(_) => Ok(HttpResponse::Ok().json(MessageResponse::new(
            "All presence updated successfully",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/persons/{id}/reset-wins",
    tag = "person",
    params(("id" = i64, Path, description = "成员ID")),
    responses(
        (status = 200, description = "中奖次数已清零", body = Person),
        (status = 404, description = "成员不存在", body = ErrorResponse)
    )
)]
pub async fn reset_person_wins(
    service: web::Data<PersonService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.reset_wins(path.into_inner()).await {
        Ok(person) => Ok(HttpResponse::Ok().json(person)),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
/// `/presence` 必须先于 `/{id}` 注册
pub fn person_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/persons")
            .route("", web::get().to(list_persons))
            .route("", web::post().to(create_person))
            .route("/presence", web::post().to(set_all_presence))
            .route("/{id}", web::get().to(get_person))
            .route("/{id}", web::put().to(update_person))
            .route("/{id}", web::delete().to(delete_person))
            .route("/{id}/presence", web::patch().to(set_presence))
            .route("/{id}/reset-wins", web::post().to(reset_person_wins)),
    );
}
