use crate::models::*;
use crate::services::LotteryService;
use actix_web::{HttpResponse, Result, web};

#[utoipa::path(
    post,
    path = "/draws",
    tag = "draw",
    request_body = DrawRequest,
    responses(
        (status = 200, description = "抽奖成功并已提交", body = DrawResultResponse),
        (status = 400, description = "单次人数超过上限"),
        (status = 404, description = "奖项不存在"),
        (status = 409, description = "奖项名额已抽完或候选人不足")
    )
)]
/// 进行一次抽奖:
/// 1. 校验单次人数上限
/// 2. 根据剩余名额与批次计算本次人数
/// 3. 内定人员优先占位，其余从候选人中随机抽取
/// 4. 写入中奖记录并扣减名额（失败整体回滚）
pub async fn draw(
    service: web::Data<LotteryService>,
    body: web::Json<DrawRequest>,
) -> Result<HttpResponse> {
    Ok(respond(service.draw(&body).await))
}

#[utoipa::path(
    post,
    path = "/draws/preview",
    tag = "draw",
    request_body = DrawRequest,
    responses(
        (status = 200, description = "预览结果（未提交）", body = DrawResultResponse),
        (status = 400, description = "单次人数超过上限"),
        (status = 409, description = "奖项名额已抽完或候选人不足")
    )
)]
/// 预览抽奖结果，不修改任何状态
pub async fn preview(
    service: web::Data<LotteryService>,
    body: web::Json<DrawRequest>,
) -> Result<HttpResponse> {
    Ok(respond(service.preview(&body).await))
}

/// 路由配置
pub fn draw_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/draws")
            .route("", web::post().to(draw))
            .route("/preview", web::post().to(preview)),
    );
}
