use crate::models::*;
use crate::services::LotteryService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/prizes",
    tag = "prize",
    responses(
        (status = 200, description = "获取奖项列表成功（按 sort 排序）", body = [PrizeResponse])
    )
)]
pub async fn list_prizes(service: web::Data<LotteryService>) -> Result<HttpResponse> {
    Ok(respond(service.list_prizes().await))
}

#[utoipa::path(
    post,
    path = "/prizes",
    tag = "prize",
    request_body = CreatePrizeRequest,
    responses(
        (status = 200, description = "创建成功", body = PrizeResponse),
        (status = 400, description = "配置不合法")
    )
)]
/// 创建奖项（含临时增加的抽奖）
pub async fn create_prize(
    service: web::Data<LotteryService>,
    body: web::Json<CreatePrizeRequest>,
) -> Result<HttpResponse> {
    match service.create_prize(body.into_inner()).await {
        Ok(prize) => Ok(HttpResponse::Ok().json(ApiResponse::success(prize))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/prizes/{id}",
    tag = "prize",
    params(("id" = String, Path, description = "奖项ID")),
    responses(
        (status = 200, description = "获取奖项成功", body = PrizeResponse),
        (status = 404, description = "奖项不存在")
    )
)]
pub async fn get_prize(
    service: web::Data<LotteryService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    Ok(respond(service.get_prize(&path).await))
}

#[utoipa::path(
    put,
    path = "/prizes/{id}",
    tag = "prize",
    params(("id" = String, Path, description = "奖项ID")),
    request_body = UpdatePrizeRequest,
    responses(
        (status = 200, description = "修改成功", body = PrizeResponse),
        (status = 400, description = "修改后计数不一致或配置不合法"),
        (status = 404, description = "奖项不存在")
    )
)]
/// 修改奖项配置，已抽出的计数保留
pub async fn update_prize(
    service: web::Data<LotteryService>,
    path: web::Path<String>,
    body: web::Json<UpdatePrizeRequest>,
) -> Result<HttpResponse> {
    Ok(respond(service.update_prize(&path, body.into_inner()).await))
}

#[utoipa::path(
    delete,
    path = "/prizes/{id}",
    tag = "prize",
    params(("id" = String, Path, description = "奖项ID")),
    responses(
        (status = 200, description = "删除成功", body = PrizeResponse),
        (status = 404, description = "奖项不存在")
    )
)]
pub async fn delete_prize(
    service: web::Data<LotteryService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    Ok(respond(service.delete_prize(&path).await))
}

#[utoipa::path(
    post,
    path = "/prizes/{id}/reset",
    tag = "prize",
    params(("id" = String, Path, description = "奖项ID")),
    responses(
        (status = 200, description = "计数已清零", body = PrizeResponse),
        (status = 404, description = "奖项不存在")
    )
)]
/// 清零奖项的已抽计数与各批次计数
pub async fn reset_prize(
    service: web::Data<LotteryService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match service.reset_prize_counts(&path).await {
        Ok(prize) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            prize,
            "Prize counts reset",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn prize_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/prizes")
            .route("", web::get().to(list_prizes))
            .route("", web::post().to(create_prize))
            .route("/{id}", web::get().to(get_prize))
            .route("/{id}", web::put().to(update_prize))
            .route("/{id}", web::delete().to(delete_prize))
            .route("/{id}/reset", web::post().to(reset_prize)),
    );
}
