use actix_web::{HttpResponse, ResponseError, Result, web};

use crate::models::*;
use crate::services::LotteryService;

#[utoipa::path(
    post,
    path = "/admin/reset-counts",
    tag = "admin",
    responses(
        (status = 200, description = "所有奖项计数已清零", body = ResetResponse)
    )
)]
pub async fn reset_counts(service: web::Data<LotteryService>) -> Result<HttpResponse> {
    match service.reset_all_counts().await {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            data,
            "All prize counts reset",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/reset-all",
    tag = "admin",
    responses(
        (status = 200, description = "已重置全部数据", body = ResetResponse)
    )
)]
/// 重置所有数据：删除人员并清零奖项计数（奖项配置保留）
pub async fn reset_all(service: web::Data<LotteryService>) -> Result<HttpResponse> {
    match service.reset_all().await {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            data,
            "All data reset",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/reset-counts", web::post().to(reset_counts))
            .route("/reset-all", web::post().to(reset_all)),
    );
}
