use crate::models::*;
use crate::services::LotteryService;
use actix_web::{HttpResponse, Result, web};

#[utoipa::path(
    get,
    path = "/persons",
    tag = "person",
    params(
        ("page" = Option<u32>, Query, description = "页码 (默认1)"),
        ("per_page" = Option<u32>, Query, description = "每页数量 (默认20)"),
        ("won" = Option<bool>, Query, description = "按是否中奖过滤")
    ),
    responses(
        (status = 200, description = "获取人员列表成功", body = PaginatedResponse<PersonResponse>)
    )
)]
/// 分页获取人员列表
pub async fn list_persons(
    service: web::Data<LotteryService>,
    query: web::Query<PersonQuery>,
) -> Result<HttpResponse> {
    Ok(respond(service.list_persons(&query.into_inner()).await))
}

#[utoipa::path(
    post,
    path = "/persons",
    tag = "person",
    request_body = ImportPersonsRequest,
    responses(
        (status = 200, description = "导入成功", body = [PersonResponse]),
        (status = 400, description = "数据不合法（如 uuid 重复）")
    )
)]
/// 批量导入人员
pub async fn import_persons(
    service: web::Data<LotteryService>,
    body: web::Json<ImportPersonsRequest>,
) -> Result<HttpResponse> {
    Ok(respond(service.import_persons(body.into_inner()).await))
}

#[utoipa::path(
    get,
    path = "/persons/{id}",
    tag = "person",
    params(("id" = i64, Path, description = "人员ID")),
    responses(
        (status = 200, description = "获取人员成功", body = PersonResponse),
        (status = 404, description = "人员不存在")
    )
)]
pub async fn get_person(
    service: web::Data<LotteryService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    Ok(respond(service.get_person(path.into_inner()).await))
}

#[utoipa::path(
    delete,
    path = "/persons/{id}",
    tag = "person",
    params(("id" = i64, Path, description = "人员ID")),
    responses(
        (status = 200, description = "删除成功", body = PersonResponse),
        (status = 404, description = "人员不存在")
    )
)]
pub async fn delete_person(
    service: web::Data<LotteryService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    Ok(respond(service.delete_person(path.into_inner()).await))
}

#[utoipa::path(
    delete,
    path = "/persons",
    tag = "person",
    responses(
        (status = 200, description = "已删除全部人员", body = ResetResponse)
    )
)]
/// 删除所有人员数据（不可恢复）
pub async fn delete_all_persons(service: web::Data<LotteryService>) -> Result<HttpResponse> {
    Ok(respond(service.delete_all_persons().await))
}

#[utoipa::path(
    post,
    path = "/persons/reset-wins",
    tag = "person",
    responses(
        (status = 200, description = "已清空中奖信息", body = ResetResponse)
    )
)]
/// 清空人员中奖信息，人员本身保留
pub async fn reset_wins(service: web::Data<LotteryService>) -> Result<HttpResponse> {
    Ok(respond(service.reset_wins().await))
}

/// 路由配置
pub fn person_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/persons")
            .route("", web::get().to(list_persons))
            .route("", web::post().to(import_persons))
            .route("", web::delete().to(delete_all_persons))
            .route("/reset-wins", web::post().to(reset_wins))
            .route("/{id}", web::get().to(get_person))
            .route("/{id}", web::delete().to(delete_person)),
    );
}
